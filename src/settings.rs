//! Experience settings
//!
//! Embedded in the page as a JSON block (`<script id="party-config">`),
//! or read from a file by the native binary. Any field may be omitted.

use serde::{Deserialize, Serialize};

use crate::audio::Mix;
use crate::consts::REDUCED_CONFETTI_COUNT;
use crate::content::Content;
use crate::error::SettingsError;
use crate::tuning::Tuning;

/// Settings/preferences for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub content: Content,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (fewer confetti particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mix = Mix::default();
        Self {
            tuning: Tuning::default(),
            content: Content::default(),

            master_volume: mix.master,
            music_volume: mix.music,
            sfx_volume: mix.sfx,
            muted: mix.muted,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse and validate a settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.tuning.check().map_err(SettingsError::Invalid)?;
        self.content.check().map_err(SettingsError::Invalid)?;
        for (name, volume) in [
            ("master_volume", self.master_volume),
            ("music_volume", self.music_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be within 0.0..=1.0, got {volume}"
                )));
            }
        }
        Ok(())
    }

    /// Tuning with accessibility preferences applied
    pub fn effective_tuning(&self) -> Tuning {
        let mut tuning = self.tuning;
        if self.reduced_motion {
            tuning.confetti_count = tuning.confetti_count.min(REDUCED_CONFETTI_COUNT);
        }
        tuning
    }

    /// Volume levels for the audio session
    pub fn mix(&self) -> Mix {
        Mix {
            master: self.master_volume,
            music: self.music_volume,
            sfx: self.sfx_volume,
            muted: self.muted,
        }
    }

    /// DOM id of the embedded config block
    const CONFIG_ELEMENT_ID: &'static str = "party-config";

    /// Load settings from the page's config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            log::info!("No #{} block, using default settings", Self::CONFIG_ELEMENT_ID);
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Native: optional file path, defaults on any failure
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from_path(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_nested_overrides() {
        let s = Settings::from_json(
            r#"{"muted": true, "tuning": {"reward_threshold": 3}, "content": {"recipient": "Ana"}}"#,
        )
        .unwrap();
        assert!(s.mix().muted);
        assert_eq!(s.tuning.reward_threshold, 3);
        assert_eq!(s.content.recipient, "Ana");
        assert_eq!(s.tuning.cut_threshold, Tuning::default().cut_threshold);
    }

    #[test]
    fn test_bad_json_is_json_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"tuning": {"balloon_spawn_ms": 0}}"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"music_volume": 1.5}"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"content": {"intro_messages": []}}"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"tuning": {"heart_drag_limit": -40}}"#),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_reduced_motion_caps_confetti() {
        let mut s = Settings::default();
        assert_eq!(s.effective_tuning().confetti_count, 50);
        s.reduced_motion = true;
        assert_eq!(s.effective_tuning().confetti_count, 10);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let path = std::path::Path::new("/nonexistent/party.json");
        assert!(matches!(
            Settings::load_from_path(path),
            Err(SettingsError::Io(_))
        ));
        assert_eq!(Settings::load(Some(path)), Settings::default());
    }
}
