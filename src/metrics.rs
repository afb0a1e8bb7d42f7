use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use tracing::debug;

pub const COUNTER_TICK_MS: u32 = 30;
pub const COUNTER_STEPS: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Latch {
    #[default]
    Armed,
    Fired,
}

impl Latch {
    pub fn fire(&mut self) -> bool {
        match self {
            Self::Armed => {
                *self = Self::Fired;
                true
            }
            Self::Fired => false,
        }
    }

    pub fn has_fired(self) -> bool {
        self == Self::Fired
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillBar {
    pub name: String,
    pub percentage: u8,
}

impl SkillBar {
    pub fn new(name: impl Into<String>, percentage: u8) -> Self {
        Self {
            name: name.into(),
            percentage: percentage.min(100),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SkillBars {
    bars: Vec<SkillBar>,
    latch: Latch,
}

impl SkillBars {
    pub fn new(bars: Vec<SkillBar>) -> Self {
        Self {
            bars,
            latch: Latch::Armed,
        }
    }

    pub fn bars(&self) -> &[SkillBar] {
        &self.bars
    }

    pub fn fill(&mut self) -> bool {
        let fired = self.latch.fire();
        if fired {
            debug!(bars = self.bars.len(), "skill bars filled");
        }
        fired
    }

    pub fn is_filled(&self) -> bool {
        self.latch.has_fired()
    }

    pub fn width_style(&self, index: usize) -> String {
        let width = match self.bars.get(index) {
            Some(bar) if self.is_filled() => bar.percentage,
            _ => 0,
        };
        format!("width: {width}%;")
    }
}

fn first_number() -> &'static Regex {
    static FIRST_NUMBER: OnceLock<Regex> = OnceLock::new();
    FIRST_NUMBER.get_or_init(|| Regex::new(r"\d+").expect("static pattern compiles"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterLabel {
    template: String,
    target: u64,
    tick: u32,
}

impl CounterLabel {
    pub fn parse(text: impl Into<String>) -> Self {
        let template = text.into();
        let target = first_number()
            .find(&template)
            .and_then(|found| found.as_str().parse::<u64>().ok())
            .unwrap_or(0);

        Self {
            template,
            target,
            tick: 0,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_animated(&self) -> bool {
        self.target > 0
    }

    pub fn value(&self) -> u64 {
        let scaled = u128::from(self.target) * u128::from(self.tick) / u128::from(COUNTER_STEPS);
        u64::try_from(scaled).unwrap_or(self.target)
    }

    pub fn is_done(&self) -> bool {
        self.tick >= COUNTER_STEPS
    }

    pub fn advance(&mut self) -> bool {
        if self.is_animated() && !self.is_done() {
            self.tick += 1;
        }
        self.is_animated() && !self.is_done()
    }

    pub fn text(&self) -> String {
        if self.tick == 0 {
            return self.template.clone();
        }

        first_number()
            .replace(&self.template, NoExpand(&self.value().to_string()))
            .into_owned()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Counters {
    labels: Vec<CounterLabel>,
    latch: Latch,
}

impl Counters {
    pub fn new<I, T>(labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(CounterLabel::parse).collect(),
            latch: Latch::Armed,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn begin(&mut self) -> Vec<usize> {
        if !self.latch.fire() {
            return Vec::new();
        }

        let animated: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_animated())
            .map(|(index, _)| index)
            .collect();
        debug!(counters = animated.len(), "counters started");
        animated
    }

    pub fn tick(&mut self, index: usize) -> Option<u32> {
        let label = self.labels.get_mut(index)?;
        label.advance().then_some(COUNTER_TICK_MS)
    }

    pub fn text(&self, index: usize) -> Option<String> {
        self.labels.get(index).map(CounterLabel::text)
    }

    pub fn has_started(&self) -> bool {
        self.latch.has_fired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_fires_once() {
        let mut latch = Latch::default();
        assert!(latch.fire());
        assert!(!latch.fire());
        assert!(latch.has_fired());
    }

    #[test]
    fn skill_bars_fill_to_their_percentages_once() {
        let mut skills = SkillBars::new(vec![SkillBar::new("Rust", 85), SkillBar::new("CSS", 130)]);
        assert_eq!(skills.width_style(0), "width: 0%;");

        assert!(skills.fill());
        assert_eq!(skills.width_style(0), "width: 85%;");
        assert_eq!(skills.width_style(1), "width: 100%;");
        assert_eq!(skills.width_style(7), "width: 0%;");

        assert!(!skills.fill());
        assert!(skills.is_filled());
    }

    #[test]
    fn counter_parses_first_integer() {
        assert_eq!(CounterLabel::parse("120+ Projects").target(), 120);
        assert_eq!(CounterLabel::parse("Over 3 years, 40 clients").target(), 3);
        assert_eq!(CounterLabel::parse("Worldwide").target(), 0);
        assert!(!CounterLabel::parse("Worldwide").is_animated());
    }

    #[test]
    fn counter_interpolates_and_stops_exactly_at_target() {
        let mut label = CounterLabel::parse("120+ Projects");
        assert_eq!(label.text(), "120+ Projects");

        assert!(label.advance());
        assert_eq!(label.text(), "2+ Projects");

        let mut ticks = 1;
        while label.advance() {
            ticks += 1;
        }
        ticks += 1;

        assert_eq!(ticks, COUNTER_STEPS);
        assert_eq!(label.value(), 120);
        assert_eq!(label.text(), "120+ Projects");
        assert!(!label.advance());
        assert_eq!(label.value(), 120);
    }

    #[test]
    fn counter_with_huge_number_still_lands_on_target() {
        let mut label = CounterLabel::parse("18446744073709551615 visitors");
        assert_eq!(label.target(), u64::MAX);

        assert!(label.advance());
        assert!(label.advance());
        assert_eq!(label.value(), 737_869_762_948_382_064);
        assert_eq!(label.text(), "737869762948382064 visitors");

        while label.advance() {}
        assert_eq!(label.value(), u64::MAX);
        assert_eq!(label.text(), "18446744073709551615 visitors");
    }

    #[test]
    fn counters_begin_once_and_skip_unnumbered_labels() {
        let mut counters = Counters::new(["3+ Years", "Remote", "40 Clients"]);

        assert_eq!(counters.begin(), vec![0, 2]);
        assert!(counters.begin().is_empty());
        assert!(counters.has_started());

        assert_eq!(counters.tick(1), None);
        assert_eq!(counters.text(1).as_deref(), Some("Remote"));
        assert_eq!(counters.tick(2), Some(COUNTER_TICK_MS));
        assert_eq!(counters.tick(9), None);
    }
}
