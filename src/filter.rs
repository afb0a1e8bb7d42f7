use tracing::debug;

pub const SHOW_ALL: &str = "all";
pub const ENTRANCE_ANIMATION: &str = "animation: fadeInUp 0.6s ease-out;";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardVisibility {
    pub shown: bool,
    pub animated: bool,
}

#[derive(Clone, Debug)]
pub struct ProjectFilter {
    active: String,
    categories: Vec<String>,
    cards: Vec<CardVisibility>,
}

impl ProjectFilter {
    pub fn new<I, T>(categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let cards = vec![
            CardVisibility {
                shown: true,
                animated: false,
            };
            categories.len()
        ];

        Self {
            active: SHOW_ALL.to_string(),
            categories,
            cards,
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_active(&self, filter: &str) -> bool {
        self.active == filter
    }

    pub fn select(&mut self, filter: &str) {
        self.active = filter.to_string();

        for (card, category) in self.cards.iter_mut().zip(&self.categories) {
            let shown = filter == SHOW_ALL || category == filter;
            card.shown = shown;
            card.animated = card.animated || shown;
        }

        debug!(
            filter,
            shown = self.cards.iter().filter(|card| card.shown).count(),
            "project filter applied"
        );
    }

    pub fn card(&self, index: usize) -> CardVisibility {
        self.cards.get(index).copied().unwrap_or_default()
    }
}
