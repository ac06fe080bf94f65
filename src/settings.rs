//! Host preferences
//!
//! Persisted separately from the run in LocalStorage. Only affects cosmetic
//! state: how many particles the engine keeps alive.

use serde::{Deserialize, Serialize};

use crate::sim::MAX_PARTICLES;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle ring capacity for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => MAX_PARTICLES / 4,
            QualityPreset::Medium => MAX_PARTICLES,
            QualityPreset::High => MAX_PARTICLES * 4,
        }
    }
}

/// Host preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle bursts on catches
    pub particles: bool,
    /// Reduced motion (halves particle count)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else if self.reduced_motion {
            self.quality.max_particles() / 2
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse stored settings, falling back to defaults on garbage
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring unreadable settings: {}", err);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "veggie_catch_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json_or_default(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_by_preset() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 64);
        assert_eq!(Settings::default().max_particles(), 256);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 1024);
    }

    #[test]
    fn test_particles_toggle_and_reduced_motion() {
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        assert_eq!(settings.max_particles(), 128);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_json_round_trip_and_fallback() {
        let settings = Settings::from_json_or_default(r#"{ "quality": "Low" }"#);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);

        assert_eq!(Settings::from_json_or_default("{oops"), Settings::default());
    }
}
