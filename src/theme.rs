use tracing::{debug, warn};

use crate::store::{KeyValueStore, StoreError};

pub const THEME_KEY: &str = "selected-theme";
pub const ICON_KEY: &str = "selected-icon";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeIcon {
    #[default]
    Moon,
    Sun,
}

impl ThemeIcon {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Moon => "fa-moon",
            Self::Sun => "fa-sun",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fa-moon" => Some(Self::Moon),
            "fa-sun" => Some(Self::Sun),
            _ => None,
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::Moon,
            Theme::Dark => Self::Sun,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub theme: Theme,
    pub icon: ThemeIcon,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            icon: ThemeIcon::for_theme(theme),
        }
    }
}

pub struct ThemeManager<K> {
    store: K,
    current: ThemeState,
}

impl<K: KeyValueStore> ThemeManager<K> {
    pub fn new(store: K) -> Self {
        Self {
            store,
            current: ThemeState::default(),
        }
    }

    pub fn current(&self) -> ThemeState {
        self.current
    }

    pub fn restore(&mut self) -> Result<ThemeState, StoreError> {
        let stored_theme = self.store.get(THEME_KEY)?;
        let Some(theme) = stored_theme.as_deref().and_then(Theme::parse) else {
            if let Some(unknown) = stored_theme {
                warn!(value = %unknown, "ignoring unrecognised stored theme");
            }
            return Ok(self.current);
        };

        let icon = self
            .store
            .get(ICON_KEY)?
            .as_deref()
            .and_then(ThemeIcon::parse)
            .unwrap_or_else(|| ThemeIcon::for_theme(theme));

        self.current = ThemeState { theme, icon };
        debug!(theme = theme.as_str(), icon = icon.class_name(), "restored theme");
        Ok(self.current)
    }

    // The new theme is applied even when persisting fails.
    pub fn toggle(&mut self) -> Result<ThemeState, StoreError> {
        self.current = ThemeState::new(self.current.theme.toggled());
        debug!(theme = self.current.theme.as_str(), "theme toggled");

        self.store.set(THEME_KEY, self.current.theme.as_str())?;
        self.store.set(ICON_KEY, self.current.icon.class_name())?;
        Ok(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn stored(store: &MemoryStore, key: &str) -> Option<String> {
        store.get(key).expect("memory store reads succeed")
    }

    #[test]
    fn absent_keys_default_to_light_with_moon_icon() {
        let mut manager = ThemeManager::new(MemoryStore::new());

        let state = manager.restore().expect("restore succeeds");
        assert_eq!(state, ThemeState::new(Theme::Light));
        assert_eq!(state.icon, ThemeIcon::Moon);
    }

    #[test]
    fn restore_applies_stored_theme_and_icon() {
        let store = MemoryStore::with_entries([(THEME_KEY, "dark"), (ICON_KEY, "fa-sun")]);
        let mut manager = ThemeManager::new(store);

        let state = manager.restore().expect("restore succeeds");
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.icon, ThemeIcon::Sun);
    }

    #[test]
    fn restore_derives_missing_icon_and_ignores_garbage() {
        let store = MemoryStore::with_entries([(THEME_KEY, "dark")]);
        let mut manager = ThemeManager::new(store);
        assert_eq!(
            manager.restore().expect("restore succeeds").icon,
            ThemeIcon::Sun
        );

        let store = MemoryStore::with_entries([(THEME_KEY, "solarized")]);
        let mut manager = ThemeManager::new(store);
        assert_eq!(
            manager.restore().expect("restore succeeds"),
            ThemeState::default()
        );
    }

    #[test]
    fn toggling_twice_restores_the_original_state() {
        for start in [Theme::Light, Theme::Dark] {
            let store = MemoryStore::with_entries([(THEME_KEY, start.as_str())]);
            let mut manager = ThemeManager::new(store.clone());
            let original = manager.restore().expect("restore succeeds");

            for _ in 0..2 {
                let state = manager.toggle().expect("toggle persists");
                assert_eq!(stored(&store, THEME_KEY).as_deref(), Some(state.theme.as_str()));
                assert_eq!(
                    stored(&store, ICON_KEY).as_deref(),
                    Some(state.icon.class_name())
                );
            }

            assert_eq!(manager.current(), original);
        }
    }

    #[test]
    fn failed_persist_still_switches_theme() {
        let store = MemoryStore::new();
        store.reject_writes(true);
        let mut manager = ThemeManager::new(store.clone());

        assert!(manager.toggle().is_err());
        assert_eq!(manager.current().theme, Theme::Dark);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_label_names_the_next_theme() {
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark theme");
        assert!(Theme::Dark.pressed());
        assert!(!Theme::Light.pressed());
    }
}
