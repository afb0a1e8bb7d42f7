use std::collections::{HashMap, HashSet};

use tracing::debug;

pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
pub const REVEAL_CLASS: &str = "fade-in";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    FirstTime,
    Again,
}

#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    visible: HashSet<String>,
}

impl RevealTracker {
    pub fn on_intersect(&mut self, section_id: &str) -> Reveal {
        if self.visible.insert(section_id.to_string()) {
            debug!(section = section_id, "section revealed");
            Reveal::FirstTime
        } else {
            Reveal::Again
        }
    }

    pub fn is_visible(&self, section_id: &str) -> bool {
        self.visible.contains(section_id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LazyImages {
    deferred: HashMap<String, String>,
    loaded: HashMap<String, String>,
}

impl LazyImages {
    pub fn defer(&mut self, image_id: impl Into<String>, source: impl Into<String>) {
        self.deferred.insert(image_id.into(), source.into());
    }

    // None means the image is unknown or already loaded.
    pub fn on_intersect(&mut self, image_id: &str) -> Option<&str> {
        let source = self.deferred.remove(image_id)?;
        debug!(image = image_id, "loading deferred image");
        self.loaded.insert(image_id.to_string(), source);
        self.loaded.get(image_id).map(String::as_str)
    }

    pub fn is_watching(&self, image_id: &str) -> bool {
        self.deferred.contains_key(image_id)
    }

    pub fn source(&self, image_id: &str) -> Option<&str> {
        self.loaded.get(image_id).map(String::as_str)
    }
}
