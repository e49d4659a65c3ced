//! The display theme preference, persisted under the `modo` slot.

use crate::{
    Error,
    storage::{LocalStorage, THEME_KEY},
};

/// The display theme. Stored as `"claro"` or `"oscuro"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// The light theme, the default.
    #[default]
    Light,
    /// The dark theme.
    Dark,
}

impl Theme {
    /// The stored form of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "claro",
            Theme::Dark => "oscuro",
        }
    }

    /// The opposite theme.
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Load the stored theme. Anything other than `"oscuro"` (including an
/// absent slot) is the light theme.
pub fn load_theme(storage: &LocalStorage) -> Theme {
    match storage.load_preference(THEME_KEY).as_deref() {
        Some("oscuro") => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Persist `theme` into the `modo` slot.
///
/// # Errors
/// Returns an [Error::Storage] if the slot cannot be written.
pub fn save_theme(storage: &LocalStorage, theme: Theme) -> Result<(), Error> {
    storage.save_preference(THEME_KEY, theme.as_str())
}
