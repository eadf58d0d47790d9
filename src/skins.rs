//! Cosmetic skin catalog and score-based unlocks
//!
//! Skins are pure presentation plus one number the sim consumes: the bird
//! radius for the selected skin, read once at run start. Unlock evaluation
//! happens here, driven by the sim's `UnlockCheckRequested` events; the sim
//! itself knows nothing about thresholds.

use serde::{Deserialize, Serialize};

use crate::consts::BASE_BIRD_RADIUS;

/// Skins never shrink the bird below this radius
pub const MIN_BIRD_RADIUS: f32 = 10.0;

/// A catalog entry (code-defined; only unlock/selection state persists)
#[derive(Debug, Clone)]
pub struct SkinSpec {
    pub id: &'static str,
    pub name: &'static str,
    /// Score that permanently unlocks this skin; 0 = free
    pub unlock_score: u64,
    /// Multiplier on the reference bird radius
    pub scale: f32,
}

/// The built-in catalog
pub fn catalog() -> &'static [SkinSpec] {
    const CATALOG: &[SkinSpec] = &[
        SkinSpec {
            id: "default",
            name: "Renzil",
            unlock_score: 0,
            scale: 1.0,
        },
        SkinSpec {
            id: "shadow",
            name: "Alone",
            unlock_score: 50,
            scale: 1.21,
        },
        SkinSpec {
            id: "flame",
            name: "Mabala",
            unlock_score: 75,
            scale: 1.15,
        },
    ];
    CATALOG
}

fn spec_by_id(id: &str) -> Option<&'static SkinSpec> {
    catalog().iter().find(|s| s.id == id)
}

/// Persisted unlock/selection state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinCollection {
    pub unlocked: Vec<String>,
    pub selected: String,
}

impl Default for SkinCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinCollection {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_dash_skins";

    /// Fresh state: free skins unlocked, first skin selected
    pub fn new() -> Self {
        Self {
            unlocked: catalog()
                .iter()
                .filter(|s| s.unlock_score == 0)
                .map(|s| s.id.to_string())
                .collect(),
            selected: catalog()[0].id.to_string(),
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Select a skin; rejected while it is still locked
    pub fn select(&mut self, id: &str) -> bool {
        if spec_by_id(id).is_none() || !self.is_unlocked(id) {
            return false;
        }
        self.selected = id.to_string();
        true
    }

    /// Milestone evaluator: unlock everything the score now reaches.
    /// Returns the newly unlocked skin names, for the host to announce.
    pub fn check_unlocks(&mut self, score: u64) -> Vec<&'static str> {
        let mut newly = Vec::new();
        for skin in catalog() {
            if skin.unlock_score > 0 && score >= skin.unlock_score && !self.is_unlocked(skin.id) {
                self.unlocked.push(skin.id.to_string());
                log::info!("skin unlocked: {}", skin.name);
                newly.push(skin.name);
            }
        }
        newly
    }

    /// The one number the sim reads: the selected skin's bird radius
    pub fn bird_radius(&self) -> f32 {
        let scale = spec_by_id(&self.selected).map(|s| s.scale).unwrap_or(1.0);
        (BASE_BIRD_RADIUS * scale).round().max(MIN_BIRD_RADIUS)
    }

    /// Drop a selection that points at a locked or unknown skin
    pub fn sanitize(&mut self) {
        if !self.is_unlocked(&self.selected) || spec_by_id(&self.selected).is_none() {
            self.selected = catalog()[0].id.to_string();
        }
    }

    /// Load skin state from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(mut skins) = serde_json::from_str::<SkinCollection>(&json) {
                    skins.sanitize();
                    log::info!("Loaded {} unlocked skins", skins.unlocked.len());
                    return skins;
                }
            }
        }

        log::info!("No skin state found, starting fresh");
        Self::new()
    }

    /// Save skin state to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Skin state saved ({} unlocked)", self.unlocked.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
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
    fn test_fresh_state_has_free_skin_selected() {
        let skins = SkinCollection::new();
        assert!(skins.is_unlocked("default"));
        assert!(!skins.is_unlocked("shadow"));
        assert_eq!(skins.selected, "default");
    }

    #[test]
    fn test_cannot_select_locked_skin() {
        let mut skins = SkinCollection::new();
        assert!(!skins.select("shadow"));
        assert_eq!(skins.selected, "default");
        assert!(!skins.select("no-such-skin"));
    }

    #[test]
    fn test_unlock_thresholds() {
        let mut skins = SkinCollection::new();
        assert!(skins.check_unlocks(49).is_empty());

        let newly = skins.check_unlocks(50);
        assert_eq!(newly, vec!["Alone"]);
        assert!(skins.is_unlocked("shadow"));
        assert!(!skins.is_unlocked("flame"));

        // Already-unlocked skins never re-announce
        assert!(skins.check_unlocks(60).is_empty());

        let newly = skins.check_unlocks(80);
        assert_eq!(newly, vec!["Mabala"]);
    }

    #[test]
    fn test_unlock_then_select() {
        let mut skins = SkinCollection::new();
        skins.check_unlocks(100);
        assert!(skins.select("flame"));
        assert_eq!(skins.selected, "flame");
    }

    #[test]
    fn test_bird_radius_scales_with_skin() {
        let mut skins = SkinCollection::new();
        assert_eq!(skins.bird_radius(), 30.0);

        skins.check_unlocks(50);
        skins.select("shadow");
        // 30 * 1.21 rounds to 36
        assert_eq!(skins.bird_radius(), 36.0);
    }

    #[test]
    fn test_sanitize_resets_bogus_selection() {
        let mut skins = SkinCollection::new();
        skins.selected = "flame".to_string(); // locked
        skins.sanitize();
        assert_eq!(skins.selected, "default");
    }
}
