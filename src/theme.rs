//! Light/dark theme preference.
//!
//! The stored preference wins, then the platform color scheme, then dark.
//! Every change (including the one resolved at load) is written back as the
//! literal string `light` or `dark` before the call returns. Write failures
//! are logged and swallowed; the theme itself always works.

use std::path::PathBuf;

use ratatui::style::Color;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
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

    fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

fn ambient_theme() -> Theme {
    match dark_light::detect() {
        Ok(dark_light::Mode::Light) => Theme::Light,
        _ => Theme::Dark,
    }
}

pub struct ThemeStore {
    path: PathBuf,
    theme: Theme,
}

impl ThemeStore {
    pub fn load(path: PathBuf) -> Self {
        Self::load_or(path, ambient_theme())
    }

    fn load_or(path: PathBuf, fallback: Theme) -> Self {
        let theme = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| Theme::parse(s.trim()))
            .unwrap_or(fallback);

        let store = Self { path, theme };
        store.persist();
        store
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled())
    }

    pub fn set_light(&mut self) {
        self.set(Theme::Light);
    }

    pub fn set_dark(&mut self) {
        self.set(Theme::Dark);
    }

    fn set(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        self.persist();
        theme
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, "Could not create theme directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, self.theme.as_str()) {
            warn!(error = %e, "Could not persist theme preference");
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }
}

/// Colors the view layer derives from the active theme on every render.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub dim: Color,
    pub highlight_fg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                foreground: Color::White,
                dim: Color::DarkGray,
                highlight_fg: Color::Black,
            },
            Theme::Light => Self {
                background: Color::White,
                foreground: Color::Black,
                dim: Color::Gray,
                highlight_fg: Color::White,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(store: &ThemeStore) -> String {
        std::fs::read_to_string(&store.path).unwrap()
    }

    #[test]
    fn test_stored_preference_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        std::fs::write(&path, "light").unwrap();

        let store = ThemeStore::load_or(path, Theme::Dark);
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::load_or(dir.path().join("theme"), Theme::Dark);
        assert_eq!(store.current(), Theme::Dark);
        // The resolved value is persisted immediately
        assert_eq!(stored(&store), "dark");
    }

    #[test]
    fn test_garbage_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        std::fs::write(&path, "solarized").unwrap();

        let store = ThemeStore::load_or(path, Theme::Dark);
        assert_eq!(store.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_before_returning() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ThemeStore::load_or(dir.path().join("theme"), Theme::Dark);

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(stored(&store), "light");

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(stored(&store), "dark");
    }

    #[test]
    fn test_explicit_setters() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ThemeStore::load_or(dir.path().join("theme"), Theme::Dark);

        store.set_light();
        assert_eq!(store.current(), Theme::Light);
        assert_eq!(stored(&store), "light");

        store.set_dark();
        assert_eq!(store.current(), Theme::Dark);
        assert_eq!(stored(&store), "dark");
    }
}
