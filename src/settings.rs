//! Audio preferences
//!
//! Persisted separately from skin and score state in LocalStorage. The sim
//! never reads these; only the presentation layer does.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master mute for music and effects
    pub muted: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Music volume while a one-shot sound ducks it
    pub duck_volume: f32,
    /// Ramp time back to full music volume after ducking (ms)
    pub duck_restore_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            music_volume: 1.0,
            duck_volume: 0.25,
            duck_restore_ms: 400.0,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_dash_settings";

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Music volume the player actually hears
    pub fn effective_music_volume(&self, ducked: bool) -> f32 {
        if self.muted {
            0.0
        } else if ducked {
            self.duck_volume
        } else {
            self.music_volume
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences_music() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_music_volume(false), 1.0);
        assert_eq!(settings.effective_music_volume(true), 0.25);

        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_music_volume(false), 0.0);
        assert_eq!(settings.effective_music_volume(true), 0.0);

        assert!(!settings.toggle_mute());
        assert_eq!(settings.effective_music_volume(false), 1.0);
    }
}
