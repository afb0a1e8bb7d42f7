use std::{
    collections::BTreeMap,
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::contact::ContactPayload;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_CONTACT_MAX_BYTES: usize = 16 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";

const CONTACT_MAX_BYTES_BOUNDS: (usize, usize) = (1_024, 1024 * 1024);
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub contact_max_bytes: usize,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            contact_max_bytes: DEFAULT_CONTACT_MAX_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let dist_dir = non_empty(lookup("DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let contact_max_bytes = parse_with_bounds(
            lookup("CONTACT_MAX_BYTES"),
            DEFAULT_CONTACT_MAX_BYTES,
            CONTACT_MAX_BYTES_BOUNDS,
        );
        let log_level = parse_log_level(lookup("LOG_LEVEL"));

        Self {
            port,
            dist_dir,
            contact_max_bytes,
            log_level,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_with_bounds<T>(value: Option<String>, default: T, bounds: (T, T)) -> T
where
    T: FromStr + PartialOrd,
{
    value
        .and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value >= bounds.0 && *value <= bounds.1)
        .unwrap_or(default)
}

fn parse_log_level(value: Option<String>) -> String {
    match non_empty(value)
        .map(|value| value.to_ascii_lowercase())
        .as_deref()
    {
        Some(level @ ("trace" | "debug" | "info" | "warn" | "error")) => level.to_string(),
        _ => DEFAULT_LOG_LEVEL.to_string(),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub async fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config.log_level);

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(
        port = config.port,
        dist = %config.dist_dir.display(),
        "server listening on http://127.0.0.1:{}",
        config.port
    );
    axum::serve(listener, router(&config)).await?;
    Ok(())
}

pub fn router(config: &ServerConfig) -> Router {
    let static_service = ServeDir::new(&config.dist_dir)
        .not_found_service(ServeFile::new(config.dist_dir.join("index.html")));

    Router::new()
        .route("/api/contact", post(submit_contact))
        .layer(DefaultBodyLimit::max(config.contact_max_bytes))
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<&'static str, &'static str>,
}

impl ContactResponse {
    fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
            errors: BTreeMap::new(),
        }
    }

    fn rejected(error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
            errors: BTreeMap::new(),
        }
    }
}

async fn submit_contact(
    headers: HeaderMap,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Response {
    let request_id = resolve_request_id(&headers);

    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!(
                request_id = %request_id,
                status = rejection.status().as_u16(),
                "unreadable contact body"
            );
            return response_with_request_id(
                rejection.status(),
                ContactResponse::rejected(rejection.body_text()),
                &request_id,
            );
        }
    };

    let invalid = payload.invalid_fields();
    if !invalid.is_empty() {
        warn!(request_id = %request_id, ?invalid, "contact message failed validation");
        let errors = invalid
            .into_iter()
            .map(|field| (field.id(), field.submit_error()))
            .collect();
        return response_with_request_id(
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactResponse {
                ok: false,
                error: None,
                errors,
            },
            &request_id,
        );
    }

    info!(
        request_id = %request_id,
        name = %payload.name,
        email = %payload.email,
        message_chars = payload.message.chars().count(),
        "contact message received"
    );
    response_with_request_id(StatusCode::OK, ContactResponse::accepted(), &request_id)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}

fn response_with_request_id(
    status: StatusCode,
    payload: ContactResponse,
    request_id: &str,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            dist_dir: PathBuf::from("/tmp/portfolio-view-test-dist"),
            contact_max_bytes: 1_024,
            ..ServerConfig::default()
        }
    }

    async fn post_contact(body: Body, request_id: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("Content-Type", "application/json");
        if let Some(request_id) = request_id {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }

        let response = router(&test_config())
            .oneshot(request.body(body).expect("request builds"))
            .await
            .expect("router responds");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, json)
    }

    fn json_body(value: Value) -> Body {
        Body::from(serde_json::to_vec(&value).expect("json encodes"))
    }

    #[tokio::test]
    async fn valid_message_is_accepted_and_echoes_request_id() {
        let (status, headers, body) = post_contact(
            json_body(json!({"name": "Al", "email": "a@b.co", "message": "1234567890"})),
            Some("req-test"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(
            headers.get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()),
            Some("req-test")
        );
        assert_eq!(
            headers.get(header::CACHE_CONTROL).and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }

    #[tokio::test]
    async fn invalid_message_lists_every_failing_field() {
        let (status, headers, body) = post_contact(
            json_body(json!({"name": "A", "email": "bad", "message": "short"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["ok"], json!(false));
        assert_eq!(
            body["errors"],
            json!({
                "name": "Please enter your name (at least 2 characters)",
                "email": "Please enter a valid email address",
                "message": "Please enter a message (at least 10 characters)",
            })
        );
        let generated = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(generated.starts_with("req-"));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (status, _, body) = post_contact(Body::from("{not json"), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], json!(false));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let message = "x".repeat(4_096);
        let (status, _, body) = post_contact(
            json_body(json!({"name": "Al", "email": "a@b.co", "message": message})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["ok"], json!(false));
    }

    #[test]
    fn config_defaults_when_environment_is_empty() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn config_reads_values_and_rejects_out_of_bounds() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", " 3000 "),
            ("DIST_DIR", "public"),
            ("CONTACT_MAX_BYTES", "512"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|value| value.to_string()));

        assert_eq!(config.port, 3000);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.contact_max_bytes, DEFAULT_CONTACT_MAX_BYTES);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(parse_log_level(Some("verbose".into())), "info");
        assert_eq!(parse_log_level(Some("  ".into())), "info");
        assert_eq!(parse_log_level(Some("warn".into())), "warn");
    }

    #[test]
    fn request_id_header_is_trimmed_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  abc  "));
        assert_eq!(resolve_request_id(&headers), "abc");

        let generated = resolve_request_id(&HeaderMap::new());
        assert!(generated.starts_with("req-"));
    }
}
