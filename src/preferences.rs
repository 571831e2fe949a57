//! App settings stored as flat key-value pairs.
//!
//! Each setting occupies its own key in the same backend as the recipe
//! collection. Toggles are stored as the strings `"true"`/`"false"` and
//! anything other than `"false"` reads as enabled.
use std::{fmt, sync::Arc};

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::{KeyValueBackend, RecipeError, Result};

pub const TIMER_SOUND_KEY: &str = "timerSound";
pub const FLOATING_ENABLED_KEY: &str = "floatingEnabled";
pub const TIMER_ENABLED_KEY: &str = "timerEnabled";
pub const CHECKLIST_ENABLED_KEY: &str = "howToCookChecklistEnabled";
pub const MOOD_FOLDER_KEY: &str = "moodFolder";

/// Keys accepted by [`PreferenceStore::set`]
pub const PREFERENCE_KEYS: [&str; 5] = [
    TIMER_SOUND_KEY,
    FLOATING_ENABLED_KEY,
    TIMER_ENABLED_KEY,
    CHECKLIST_ENABLED_KEY,
    MOOD_FOLDER_KEY,
];

/// Cosmetic and feature settings of the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Sound played when a cooking timer ends
    pub timer_sound: String,
    /// Whether the floating action buttons are shown
    pub floating_enabled: bool,
    /// Whether the cooking timer is available
    pub timer_enabled: bool,
    /// Whether cooking steps render as a checklist
    pub how_to_cook_checklist_enabled: bool,
    /// Image pack used for mood icons
    pub mood_folder: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            timer_sound: "timer".to_string(),
            floating_enabled: true,
            timer_enabled: true,
            how_to_cook_checklist_enabled: true,
            mood_folder: "Emoji".to_string(),
        }
    }
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", TIMER_SOUND_KEY, self.timer_sound)?;
        writeln!(f, "{}: {}", FLOATING_ENABLED_KEY, self.floating_enabled)?;
        writeln!(f, "{}: {}", TIMER_ENABLED_KEY, self.timer_enabled)?;
        writeln!(
            f,
            "{}: {}",
            CHECKLIST_ENABLED_KEY, self.how_to_cook_checklist_enabled
        )?;
        write!(f, "{}: {}", MOOD_FOLDER_KEY, self.mood_folder)
    }
}

/// Reads and writes [`Preferences`] through a key-value backend
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Loads all settings; unset or unreadable keys fall back to defaults
    pub async fn load(&self) -> Preferences {
        let defaults = Preferences::default();
        Preferences {
            timer_sound: self
                .read(TIMER_SOUND_KEY)
                .await
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.timer_sound),
            floating_enabled: self.read_toggle(FLOATING_ENABLED_KEY).await,
            timer_enabled: self.read_toggle(TIMER_ENABLED_KEY).await,
            how_to_cook_checklist_enabled: self.read_toggle(CHECKLIST_ENABLED_KEY).await,
            mood_folder: self
                .read(MOOD_FOLDER_KEY)
                .await
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.mood_folder),
        }
    }

    /// Writes every setting
    pub async fn save(&self, preferences: &Preferences) -> Result<()> {
        let backend = &self.backend;
        backend
            .set(TIMER_SOUND_KEY, &preferences.timer_sound)
            .await?;
        backend
            .set(FLOATING_ENABLED_KEY, bool_str(preferences.floating_enabled))
            .await?;
        backend
            .set(TIMER_ENABLED_KEY, bool_str(preferences.timer_enabled))
            .await?;
        backend
            .set(
                CHECKLIST_ENABLED_KEY,
                bool_str(preferences.how_to_cook_checklist_enabled),
            )
            .await?;
        backend
            .set(MOOD_FOLDER_KEY, &preferences.mood_folder)
            .await?;
        info!("Preferences saved");
        Ok(())
    }

    /// Changes one setting by key, validating the value
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            TIMER_SOUND_KEY | MOOD_FOLDER_KEY => {
                if value.is_empty() {
                    return Err(RecipeError::ConfigError {
                        message: format!("Value for {} must not be empty", key),
                    });
                }
                self.backend.set(key, value).await?;
            }
            FLOATING_ENABLED_KEY | TIMER_ENABLED_KEY | CHECKLIST_ENABLED_KEY => {
                let enabled = parse_bool(value).ok_or_else(|| RecipeError::ConfigError {
                    message: format!("Value for {} must be true or false, got '{}'", key, value),
                })?;
                self.backend.set(key, bool_str(enabled)).await?;
            }
            _ => {
                return Err(RecipeError::ConfigError {
                    message: format!(
                        "Unknown setting '{}'. Known settings: {}",
                        key,
                        PREFERENCE_KEYS.join(", ")
                    ),
                })
            }
        }
        debug!("Setting {} changed to {}", key, value);
        Ok(())
    }

    /// Removes every stored setting so defaults apply again
    pub async fn reset(&self) -> Result<()> {
        for key in PREFERENCE_KEYS {
            self.backend.remove(key).await?;
        }
        info!("Preferences reset to defaults");
        Ok(())
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                error!("Error loading setting {}: {}", key, e);
                None
            }
        }
    }

    async fn read_toggle(&self, key: &str) -> bool {
        self.read(key).await.as_deref() != Some("false")
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
