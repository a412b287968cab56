use std::{cell::Cell, fmt, str::FromStr};

use futures_signals::signal::{Mutable, Signal};

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    /// Label of the toggle button: names the theme a click switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Тёмная",
            Theme::Dark => "Светлая",
        }
    }

    pub fn enabled_message(&self) -> &'static str {
        match self {
            Theme::Light => "Светлая тема включена",
            Theme::Dark => "Тёмная тема включена",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "bi-sun",
            Theme::Dark => "bi-moon-stars",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// Where an explicit theme choice is kept between page loads.
pub trait ThemeStore {
    fn load(&self) -> Option<String>;
    fn save(&self, value: &str);
}

pub struct ThemeController<S> {
    store: S,
    theme: Mutable<Theme>,
    /// Set by a choice made on this page, even if the store dropped it.
    explicit: Cell<bool>,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Stored preference first, then the system color scheme.
    pub fn new(store: S, system_prefers_dark: bool) -> Self {
        let theme = match Self::stored(&store) {
            Some(theme) => theme,
            None => Theme::from_system(system_prefers_dark),
        };
        debug!("initial theme: {}", theme);

        Self {
            store,
            theme: Mutable::new(theme),
            explicit: Cell::new(false),
        }
    }

    fn stored(store: &S) -> Option<Theme> {
        let value = store.load()?;
        match value.parse() {
            Ok(theme) => Some(theme),
            Err(_) => {
                warn!("ignoring stored theme {:?}", value);
                None
            }
        }
    }

    pub fn current(&self) -> Theme {
        self.theme.get()
    }

    pub fn signal(&self) -> impl Signal<Item = Theme> + use<S> {
        self.theme.signal()
    }

    pub fn has_explicit_preference(&self) -> bool {
        self.explicit.get() || Self::stored(&self.store).is_some()
    }

    /// Explicit user choice. Persisted, and from now on wins over the system.
    pub fn set(&self, theme: Theme) {
        self.store.save(theme.as_str());
        self.explicit.set(true);
        self.theme.set(theme);
    }

    pub fn toggle(&self) -> Theme {
        let theme = self.current().toggled();
        self.set(theme);
        theme
    }

    /// Follows the system color scheme while the user has not chosen one.
    pub fn system_changed(&self, prefers_dark: bool) -> Option<Theme> {
        if self.has_explicit_preference() {
            return None;
        }

        let theme = Theme::from_system(prefers_dark);
        self.theme.set_neq(theme);
        Some(theme)
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        value: RefCell<Option<String>>,
        writes: Cell<usize>,
    }

    impl MemoryStore {
        fn with(value: &str) -> Self {
            Self {
                value: RefCell::new(Some(value.to_string())),
                writes: Cell::new(0),
            }
        }
    }

    impl ThemeStore for &MemoryStore {
        fn load(&self) -> Option<String> {
            self.value.borrow().clone()
        }

        fn save(&self, value: &str) {
            self.writes.set(self.writes.get() + 1);
            *self.value.borrow_mut() = Some(value.to_string());
        }
    }

    #[test]
    fn test_initial_theme_priority() {
        let store = MemoryStore::with("light");
        assert_eq!(ThemeController::new(&store, true).current(), Theme::Light);

        let store = MemoryStore::default();
        assert_eq!(ThemeController::new(&store, true).current(), Theme::Dark);
        assert_eq!(ThemeController::new(&store, false).current(), Theme::Light);
        assert_eq!(store.writes.get(), 0);

        let store = MemoryStore::with("sepia");
        assert_eq!(ThemeController::new(&store, true).current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_twice_restores_theme() {
        let store = MemoryStore::default();
        let controller = ThemeController::new(&store, false);

        assert_eq!(controller.toggle(), Theme::Dark);
        assert_eq!(store.writes.get(), 1);
        assert_eq!(controller.toggle(), Theme::Light);
        assert_eq!(store.writes.get(), 2);
        assert_eq!(store.value.borrow().as_deref(), Some("light"));
    }

    #[test]
    fn test_system_change_until_explicit_choice() {
        let store = MemoryStore::default();
        let controller = ThemeController::new(&store, false);

        assert_eq!(controller.system_changed(true), Some(Theme::Dark));
        assert_eq!(controller.current(), Theme::Dark);
        assert_eq!(store.writes.get(), 0);

        controller.toggle();
        assert_eq!(controller.current(), Theme::Light);

        assert_eq!(controller.system_changed(true), None);
        assert_eq!(controller.current(), Theme::Light);
    }

    /// Storage that is disabled or over quota.
    struct RejectingStore;

    impl ThemeStore for RejectingStore {
        fn load(&self) -> Option<String> {
            None
        }

        fn save(&self, _: &str) {}
    }

    #[test]
    fn test_explicit_choice_survives_failed_save() {
        let controller = ThemeController::new(RejectingStore, false);
        assert!(!controller.has_explicit_preference());

        assert_eq!(controller.toggle(), Theme::Dark);
        assert!(controller.has_explicit_preference());

        assert_eq!(controller.system_changed(false), None);
        assert_eq!(controller.current(), Theme::Dark);
    }

    #[test]
    fn test_theme_labels() {
        assert_eq!(Theme::Dark.toggle_label(), "Светлая");
        assert_eq!(Theme::Light.toggle_label(), "Тёмная");
        assert_eq!(Theme::Dark.enabled_message(), "Тёмная тема включена");
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    }
}
