//! Best score persistence
//!
//! The sim only reports a final score at game over; comparing it against the
//! stored best and persisting the result is host-side, backed by
//! LocalStorage in the browser.

use serde::{Deserialize, Serialize};

/// Persisted best score
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_dash_highscore";

    pub fn new() -> Self {
        Self { score: 0 }
    }

    /// Would this run set a new best?
    pub fn beats(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished run; returns true when a new best was set
    pub fn maybe_update(&mut self, score: u64) -> bool {
        if self.beats(score) {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// The start-screen "Reset High Score" action
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score: {}", best.score);
                    return best;
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.score);
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
    fn test_maybe_update_only_improves() {
        let mut best = BestScore::new();
        assert!(best.maybe_update(5));
        assert_eq!(best.score, 5);

        // Ties and worse runs leave the record alone
        assert!(!best.maybe_update(5));
        assert!(!best.maybe_update(3));
        assert_eq!(best.score, 5);

        assert!(best.maybe_update(12));
        assert_eq!(best.score, 12);
    }

    #[test]
    fn test_zero_score_never_beats() {
        let best = BestScore::new();
        assert!(!best.beats(0));
    }

    #[test]
    fn test_reset() {
        let mut best = BestScore::new();
        best.maybe_update(40);
        best.reset();
        assert_eq!(best.score, 0);
    }
}
