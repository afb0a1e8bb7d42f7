pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;
pub const ACTIVE_SECTION_LEAD: f64 = 100.0;
pub const PARALLAX_FACTOR: f64 = 0.3;
pub const BACK_TO_TOP_THRESHOLD: f64 = 400.0;
pub const NAV_SCROLL_OFFSET: f64 = 80.0;
pub const SETTLE_DEBOUNCE_MS: u32 = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollSample {
    pub offset: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub viewport_height: f64,
    pub sections: Vec<SectionBox>,
}

impl ScrollSample {
    pub fn max_scroll(&self) -> f64 {
        self.scroll_height - self.client_height
    }
}

pub fn header_scrolled(offset: f64) -> bool {
    offset >= HEADER_SCROLL_THRESHOLD
}

pub fn progress_percent(sample: &ScrollSample) -> Option<f64> {
    let max_scroll = sample.max_scroll();
    if max_scroll <= 0.0 {
        return None;
    }

    Some((sample.offset / max_scroll * 100.0).clamp(0.0, 100.0))
}

pub fn active_section(offset: f64, sections: &[SectionBox]) -> Option<&str> {
    sections
        .iter()
        .find(|section| {
            let top = section.top - ACTIVE_SECTION_LEAD;
            offset > top && offset <= top + section.height
        })
        .map(|section| section.id.as_str())
}

pub fn parallax_offset(offset: f64, viewport_height: f64) -> Option<f64> {
    (offset < viewport_height).then(|| offset * PARALLAX_FACTOR)
}

pub fn back_to_top_visible(offset: f64) -> bool {
    offset > BACK_TO_TOP_THRESHOLD
}

pub fn nav_scroll_target(section_top: f64) -> f64 {
    section_top - NAV_SCROLL_OFFSET
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollView {
    pub header_scrolled: bool,
    pub progress: f64,
    pub active_section: Option<String>,
    pub parallax: f64,
    pub back_to_top: bool,
}

impl ScrollView {
    pub fn apply_immediate(&mut self, sample: &ScrollSample) {
        self.progress = progress_percent(sample).unwrap_or(0.0);
        if let Some(parallax) = parallax_offset(sample.offset, sample.viewport_height) {
            self.parallax = parallax;
        }
        self.back_to_top = back_to_top_visible(sample.offset);
    }

    pub fn apply_settled(&mut self, sample: &ScrollSample) {
        self.header_scrolled = header_scrolled(sample.offset);
        self.active_section = active_section(sample.offset, &sample.sections).map(str::to_string);
    }

    pub fn progress_style(&self) -> String {
        format!("width: {:.2}%;", self.progress)
    }

    pub fn parallax_style(&self) -> String {
        format!("transform: translateY({:.2}px);", self.parallax)
    }
}
