use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const BANNER_HIDE_MS: u32 = 5_000;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern compiles"))
}

pub fn validate_name(name: &str) -> bool {
    name.trim().chars().count() >= NAME_MIN_CHARS
}

pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn validate_message(message: &str) -> bool {
    message.trim().chars().count() >= MESSAGE_MIN_CHARS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    pub fn error_slot_id(self) -> &'static str {
        match self {
            Self::Name => "nameError",
            Self::Email => "emailError",
            Self::Message => "messageError",
        }
    }

    pub fn is_valid(self, value: &str) -> bool {
        match self {
            Self::Name => validate_name(value),
            Self::Email => validate_email(value),
            Self::Message => validate_message(value),
        }
    }

    pub fn live_error(self) -> &'static str {
        match self {
            Self::Name => "Name must be at least 2 characters",
            Self::Email => "Please enter a valid email address",
            Self::Message => "Message must be at least 10 characters",
        }
    }

    pub fn submit_error(self) -> &'static str {
        match self {
            Self::Name => "Please enter your name (at least 2 characters)",
            Self::Email => "Please enter a valid email address",
            Self::Message => "Please enter a message (at least 10 characters)",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Email => 1,
            Self::Message => 2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactPayload {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !field.is_valid(self.value(*field)))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    values: ContactPayload,
    errors: [Option<&'static str>; 3],
}

impl ContactForm {
    pub fn value(&self, field: Field) -> &str {
        self.values.value(field)
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors[field.slot()]
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    // An empty field has not been attempted yet and shows no error.
    pub fn on_input(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.errors[field.slot()] = if value.is_empty() || field.is_valid(&value) {
            None
        } else {
            Some(field.live_error())
        };

        match field {
            Field::Name => self.values.name = value,
            Field::Email => self.values.email = value,
            Field::Message => self.values.message = value,
        }
    }

    pub fn submit(&mut self) -> Result<ContactPayload, Vec<Field>> {
        let invalid = self.values.invalid_fields();
        if invalid.is_empty() {
            return Ok(self.values.clone());
        }

        for field in &invalid {
            self.errors[field.slot()] = Some(field.submit_error());
        }
        debug!(?invalid, "contact form blocked");
        Err(invalid)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Banner {
    #[default]
    Hidden,
    Sent,
    Failed,
}

impl Banner {
    pub fn text(self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::Sent => Some("Message sent successfully! I'll get back to you soon."),
            Self::Failed => Some("Error sending message. Please try again."),
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Hidden => "contact__message",
            Self::Sent => "contact__message success",
            Self::Failed => "contact__message error",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("could not encode the message: {0}")]
    Encode(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint rejected the message with status {0}")]
    Rejected(u16),
}

pub type DeliveryCallback = Box<dyn FnOnce(Result<(), DeliveryError>)>;

pub trait ContactSink {
    fn deliver(&self, payload: ContactPayload, done: DeliveryCallback);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedSink;

impl ContactSink for SimulatedSink {
    fn deliver(&self, payload: ContactPayload, done: DeliveryCallback) {
        info!(
            name = %payload.name,
            email = %payload.email,
            message_chars = payload.message.chars().count(),
            "contact form submitted"
        );
        done(Ok(()));
    }
}
