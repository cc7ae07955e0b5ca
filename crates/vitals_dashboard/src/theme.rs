//! Theme preference as an explicit value owned by the caller.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    /// `Light → Dark → System → Light`.
    pub fn toggle(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    pub fn resolve(self, system_is_dark: bool) -> Theme {
        match self {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::System if system_is_dark => Theme::Dark,
            ThemePreference::System => Theme::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Preference plus the platform's current appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub system_is_dark: bool,
}

impl ThemeState {
    pub fn toggle(&mut self) -> ThemePreference {
        self.preference = self.preference.toggle();
        self.preference
    }

    pub fn set_system_appearance(&mut self, dark: bool) {
        self.system_is_dark = dark;
    }

    pub fn theme(&self) -> Theme {
        self.preference.resolve(self.system_is_dark)
    }
}
