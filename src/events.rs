use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{contact::Field, nav::FocusPosition, nav::FocusTarget, scroll::ScrollSample};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Load,
    Scroll,
    Click,
    Input,
    Submit,
    KeyPress,
    Intersect,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickTarget {
    MenuToggle,
    MenuClose,
    NavLink { section: String, top: Option<f64> },
    ThemeToggle,
    Filter(String),
    BackToTop,
    ResumeDownload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab { shift: bool, focus: FocusPosition },
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedTarget {
    Section(String),
    Image(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Load,
    Scroll(ScrollSample),
    Click(ClickTarget),
    Input { field: Field, value: String },
    Submit,
    KeyPress(Key),
    Intersect(ObservedTarget),
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Load => EventKind::Load,
            Self::Scroll(_) => EventKind::Scroll,
            Self::Click(_) => EventKind::Click,
            Self::Input { .. } => EventKind::Input,
            Self::Submit => EventKind::Submit,
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::Intersect(_) => EventKind::Intersect,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ScrollTo { top: f64 },
    Focus(FocusTarget),
    PreventDefault,
    Unobserve(String),
}

type Handler = Rc<dyn Fn(&UiEvent, &mut Vec<Effect>)>;

struct Entry {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

#[must_use = "dropping a subscription unregisters its handler"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let removed = {
            let mut registry = registry.borrow_mut();
            registry
                .entries
                .iter()
                .position(|entry| entry.id == self.id)
                .map(|index| registry.entries.remove(index))
        };
        drop(removed);
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&UiEvent, &mut Vec<Effect>) + 'static,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            kind,
            handler: Rc::new(handler),
        });

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn dispatch(&self, event: &UiEvent) -> Vec<Effect> {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.handler.clone())
            .collect();

        let mut effects = Vec::new();
        for handler in handlers {
            handler(event, &mut effects);
        }
        effects
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.registry
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }
}
