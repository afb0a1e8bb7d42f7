use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Storage,
};

use crate::{
    analytics::{AnalyticsEvent, Tracker},
    contact::{ContactPayload, ContactSink, DeliveryCallback, DeliveryError},
    events::{Effect, ObservedTarget, UiEvent},
    nav::{FocusPosition, FocusTarget},
    schedule::{Scheduler, Task},
    scroll::{SectionBox, ScrollSample},
    store::{KeyValueStore, StoreError},
    theme::Theme,
};

pub type Dispatch = Rc<dyn Fn(UiEvent) -> Vec<Effect>>;

const FOCUSABLE: &str = "a, button";

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Task) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

fn local_storage() -> Result<Storage, StoreError> {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StoreError::Unavailable)
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage()?.get_item(key).map_err(|err| StoreError::Read {
            key: key.to_string(),
            reason: js_reason(&err),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage()?.set_item(key, value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: js_reason(&err),
        })
    }
}

pub struct HttpSink {
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

async fn post_contact(endpoint: &str, payload: &ContactPayload) -> Result<(), DeliveryError> {
    let request = Request::post(endpoint)
        .json(payload)
        .map_err(|err| DeliveryError::Encode(err.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|err| DeliveryError::Transport(err.to_string()))?;

    if response.ok() {
        Ok(())
    } else {
        Err(DeliveryError::Rejected(response.status()))
    }
}

impl ContactSink for HttpSink {
    fn deliver(&self, payload: ContactPayload, done: DeliveryCallback) {
        let endpoint = self.endpoint.clone();
        spawn_local(async move {
            done(post_contact(&endpoint, &payload).await);
        });
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GtagTracker;

impl Tracker for GtagTracker {
    fn track(&self, event: &AnalyticsEvent) {
        let Some(win) = window() else {
            return;
        };
        let Ok(gtag) = Reflect::get(&win, &JsValue::from_str("gtag")) else {
            return;
        };
        let Some(gtag) = gtag.dyn_ref::<Function>() else {
            return;
        };

        let params = Object::new();
        let _ = Reflect::set(&params, &"event_category".into(), &event.category.into());
        let _ = Reflect::set(&params, &"event_label".into(), &event.label.into());
        let _ = gtag.call3(&JsValue::NULL, &"event".into(), &event.action.into(), &params);
    }
}

pub fn apply_theme(theme: Theme) {
    if let Some(document) = window().and_then(|w| w.document()) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn apply_theme_with_transition(theme: Theme) {
    if prefers_reduced_motion() {
        apply_theme(theme);
        return;
    }

    let Some(document) = window().and_then(|w| w.document()) else {
        apply_theme(theme);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        apply_theme(theme);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply_theme(theme);
        return;
    };

    let callback = Closure::once_into_js(move || apply_theme(theme));
    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme);
    }
}

fn html_elements(scope: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = scope.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn sample_scroll() -> Option<ScrollSample> {
    let win = window()?;
    let root = win.document()?.document_element()?;

    let sections = html_elements(&root, "section[id]")
        .into_iter()
        .map(|section| SectionBox {
            id: section.id(),
            top: f64::from(section.offset_top()),
            height: f64::from(section.offset_height()),
        })
        .collect();

    Some(ScrollSample {
        offset: win.scroll_y().unwrap_or(0.0),
        scroll_height: f64::from(root.scroll_height()),
        client_height: f64::from(root.client_height()),
        viewport_height: win
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0),
        sections,
    })
}

pub fn section_top(section_id: &str) -> Option<f64> {
    let element = window()?
        .document()?
        .get_element_by_id(section_id)?
        .dyn_into::<HtmlElement>()
        .ok()?;
    Some(f64::from(element.offset_top()))
}

pub fn focus_position(scope: &Element) -> FocusPosition {
    let items = html_elements(scope, FOCUSABLE);
    let active = window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element());
    let is_active = |item: Option<&HtmlElement>| match (item, active.as_ref()) {
        (Some(item), Some(active)) => active.is_same_node(Some(item)),
        _ => false,
    };

    FocusPosition {
        at_first: is_active(items.first()),
        at_last: is_active(items.last()),
    }
}

fn scroll_to(top: f64) {
    let Some(win) = window() else {
        return;
    };
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
}

fn move_focus(scope: &Element, target: FocusTarget) {
    let items = html_elements(scope, FOCUSABLE);
    let item = match target {
        FocusTarget::First => items.first(),
        FocusTarget::Last => items.last(),
    };
    if let Some(item) = item {
        let _ = item.focus();
    }
}

pub fn apply_effects(effects: &[Effect], event: &Event, focus_scope: Option<&Element>) {
    for effect in effects {
        match effect {
            Effect::ScrollTo { top } => scroll_to(*top),
            Effect::Focus(target) => {
                if let Some(scope) = focus_scope {
                    move_focus(scope, *target);
                }
            }
            Effect::PreventDefault => event.prevent_default(),
            Effect::Unobserve(_) => {}
        }
    }
}

pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

pub struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

pub fn observe(
    selector: &str,
    options: Option<ObserveOptions>,
    to_target: fn(&Element) -> Option<ObservedTarget>,
    dispatch: Dispatch,
) -> Option<Observer> {
    let document = window()?.document()?;

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let element = entry.target();
                let Some(target) = to_target(&element) else {
                    continue;
                };
                let effects = dispatch(UiEvent::Intersect(target));
                if effects
                    .iter()
                    .any(|effect| matches!(effect, Effect::Unobserve(_)))
                {
                    observer.unobserve(&element);
                }
            }
        },
    );

    let observer = match options {
        Some(options) => {
            let init = IntersectionObserverInit::new();
            init.set_threshold(&JsValue::from_f64(options.threshold));
            init.set_root_margin(options.root_margin);
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        }
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref()),
    }
    .ok()?;

    let nodes = document.query_selector_all(selector).ok()?;
    for index in 0..nodes.length() {
        if let Some(element) = nodes.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            observer.observe(&element);
        }
    }

    Some(Observer {
        observer,
        _callback: callback,
    })
}

pub fn section_target(element: &Element) -> Option<ObservedTarget> {
    let id = element.id();
    (!id.is_empty()).then_some(ObservedTarget::Section(id))
}

pub fn image_target(element: &Element) -> Option<ObservedTarget> {
    let id = element.id();
    (!id.is_empty()).then_some(ObservedTarget::Image(id))
}
