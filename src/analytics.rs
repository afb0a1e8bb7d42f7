#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub action: &'static str,
    pub category: &'static str,
    pub label: &'static str,
}

pub const RESUME_DOWNLOAD: AnalyticsEvent = AnalyticsEvent {
    action: "download",
    category: "Resume",
    label: "Resume Download",
};

pub trait Tracker {
    fn track(&self, event: &AnalyticsEvent);
}

#[cfg(test)]
pub(crate) use recording::RecordingTracker;
