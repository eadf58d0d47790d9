//! Flappy Dash - a side-scrolling gap-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-score persistence
//! - `skins`: Cosmetic skin catalog and score-based unlocks
//! - `settings`: Audio preferences

pub mod highscores;
pub mod settings;
pub mod sim;
pub mod skins;
pub mod tuning;

pub use highscores::BestScore;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical play field (portrait phone aspect, matches the canvas attributes)
    pub const FIELD_WIDTH: f32 = 360.0;
    pub const FIELD_HEIGHT: f32 = 640.0;
    /// Brick band height at the top and bottom field edges
    pub const WALL_HEIGHT: f32 = 100.0;

    /// Bird defaults
    pub const BIRD_X: f32 = 80.0;
    /// Reference radius for the default skin (per-skin scale applies on top)
    pub const BASE_BIRD_RADIUS: f32 = 30.0;
    pub const GRAVITY_BASE: f32 = 0.4;
    pub const FLAP_IMPULSE: f32 = -5.0;

    /// Pipe defaults
    pub const PIPE_BASE_SPEED: f32 = 2.0;
    pub const PIPE_WIDTH: f32 = 78.0;
    pub const PIPE_INTERVAL_MS: f64 = 1900.0;
    /// Passable gap range; on the default field this leaves a 110-160px barrier
    pub const GAP_MIN: f32 = 280.0;
    pub const GAP_MAX: f32 = 330.0;

    /// Pickup defaults
    pub const PICKUP_INTERVAL_MS: f64 = 4200.0;
    pub const PICKUP_SPAWN_PROB: f64 = 0.55;
    pub const MAX_ACTIVE_PICKUPS: usize = 6;
    pub const PICKUP_KIND_CAP: usize = 3;

    /// Effect durations (ms)
    pub const DURATION_INVINCIBLE_MS: f64 = 7000.0;
    pub const DURATION_SLOW_MS: f64 = 6000.0;
    pub const DURATION_SCORE_MULT_MS: f64 = 7000.0;
    pub const DURATION_FLOAT_MS: f64 = 7000.0;
    pub const DURATION_AUTO_MS: f64 = 6000.0;
    pub const PIPE_CLEAR_BLOCK_MS: f64 = 1200.0;

    /// Nominal tick cadence the per-tick movement constants are calibrated against
    pub const NOMINAL_TICK_MS: f64 = 1000.0 / 60.0;
}
