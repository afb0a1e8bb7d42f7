pub const PHRASES: [&str; 4] = [
    "A Junior Web Developer",
    "Web Designer",
    "Problem Solver",
    "Creative Thinker",
];

pub const START_DELAY_MS: u32 = 1_000;
pub const TYPE_DELAY_MS: u32 = 200;
pub const DELETE_DELAY_MS: u32 = 100;
pub const HOLD_FULL_MS: u32 = 2_000;
pub const HOLD_EMPTY_MS: u32 = 500;

#[derive(Clone, Debug)]
pub struct TypingAnimator {
    phrases: Vec<Vec<char>>,
    index: usize,
    shown: usize,
    deleting: bool,
}

impl TypingAnimator {
    pub fn new<I, P>(phrases: I) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let phrases: Vec<Vec<char>> = phrases
            .into_iter()
            .map(|phrase| phrase.as_ref().chars().collect::<Vec<_>>())
            .filter(|phrase| !phrase.is_empty())
            .collect();

        (!phrases.is_empty()).then_some(Self {
            phrases,
            index: 0,
            shown: 0,
            deleting: false,
        })
    }

    pub fn text(&self) -> String {
        self.phrases[self.index][..self.shown].iter().collect()
    }

    pub fn phrase_index(&self) -> usize {
        self.index
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn step(&mut self) -> u32 {
        let length = self.phrases[self.index].len();

        let mut delay = if self.deleting {
            self.shown = self.shown.saturating_sub(1);
            DELETE_DELAY_MS
        } else {
            self.shown = (self.shown + 1).min(length);
            TYPE_DELAY_MS
        };

        if !self.deleting && self.shown == length {
            self.deleting = true;
            delay = HOLD_FULL_MS;
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.index = (self.index + 1) % self.phrases.len();
            delay = HOLD_EMPTY_MS;
        }

        delay
    }
}
