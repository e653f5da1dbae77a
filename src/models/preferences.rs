use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour scheme of the client UI
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Process-wide UI preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    /// When the preferences were last saved
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Preferences {
    /// Returns a copy with `theme` replaced and the timestamp bumped
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme,
            updated_at: Some(Utc::now()),
        }
    }
}
