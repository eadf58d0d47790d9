//! Data-driven game balance
//!
//! Every knob the simulation reads lives in [`Tuning`]. A `Tuning` is handed
//! to [`crate::sim::GameState::new`] once and is immutable for the duration
//! of a run. A malformed tuning is a programmer error and is rejected up
//! front by [`Tuning::validate`] rather than tolerated mid-run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::state::PickupKind;

/// What collecting a pickup does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupBehavior {
    /// Pipe hits are survivable while active
    Invincible,
    /// Scroll speed drops to `slow_factor`
    Slow,
    /// Wipe all pipes and block new spawns for `pipe_clear_block_ms`
    ClearPipes,
    /// Pipe passes score double
    ScoreMult,
    /// Gravity drops to `float_gravity_factor`
    Float,
    /// Assisted gap-seeking flight
    AutoPilot,
    /// Flat score bonus, no timed effect
    Points,
}

/// One entry of the pickup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindSpec {
    pub kind: PickupKind,
    pub behavior: PickupBehavior,
    /// Sprite/hitbox size in px
    pub size: f32,
    /// Relative weight for the spawn draw
    pub weight: f32,
    /// Flat score granted on collect (Points behavior)
    pub score: u64,
    /// Max simultaneously active pickups of this kind
    pub max_active: usize,
}

impl KindSpec {
    fn new(kind: PickupKind, behavior: PickupBehavior, size: f32) -> Self {
        Self {
            kind,
            behavior,
            size,
            weight: 1.0,
            score: 0,
            max_active: PICKUP_KIND_CAP,
        }
    }
}

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("play field must have positive dimensions, got {width}x{height}")]
    BadField { width: f32, height: f32 },
    #[error("wall bands ({wall}px top and bottom) leave no open field on a {height}px field")]
    WallsTooTall { wall: f32, height: f32 },
    #[error("gap range {min}..{max} is inverted, non-positive, or exceeds the {inner}px open field")]
    BadGapRange { min: f32, max: f32, inner: f32 },
    #[error("pickup spawn probability {0} is outside [0, 1]")]
    BadSpawnProb(f64),
    #[error("{name} must be positive, got {value}")]
    BadDuration { name: &'static str, value: f64 },
    #[error("pipe speed and width must be positive")]
    BadPipeGeometry,
    #[error("pickup table is empty")]
    NoPickupKinds,
    #[error("pickup {kind:?} has non-positive size or weight")]
    BadKindSpec { kind: PickupKind },
}

/// Full game balance record, supplied at init
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Brick band height at the top and bottom edges (lethal on contact)
    pub wall_height: f32,

    // === Bird physics ===
    /// Fixed horizontal bird position
    pub bird_x: f32,
    pub gravity: f32,
    pub flap_impulse: f32,
    /// Gravity multiplier while the Float effect is active
    pub float_gravity_factor: f32,

    // === Pipes ===
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_interval_ms: f64,
    /// Passable gap is drawn uniformly from [gap_min, gap_max]
    pub gap_min: f32,
    pub gap_max: f32,

    // === Pickups ===
    pub pickup_interval_ms: f64,
    /// Acceptance probability once the spawn interval has elapsed
    pub pickup_spawn_prob: f64,
    /// Cap on simultaneously active pickups of all kinds
    pub max_active_pickups: usize,
    pub kinds: Vec<KindSpec>,
    /// Collect radius is bird radius + size * this factor
    pub pickup_hit_factor: f32,
    /// Inset from each gap edge when placing a pickup inside a pipe gap
    pub pickup_safety_margin: f32,

    // === Timed effects ===
    /// Scroll speed multiplier while Slow is active
    pub slow_factor: f32,
    /// Pipe score multiplier while ScoreMult is active
    pub score_multiplier: u64,
    pub duration_invincible_ms: f64,
    pub duration_slow_ms: f64,
    pub duration_score_mult_ms: f64,
    pub duration_float_ms: f64,
    pub duration_auto_ms: f64,
    /// Pipe spawn block window after a ClearPipes pickup
    pub pipe_clear_block_ms: f64,

    // === Auto-pilot ===
    /// Proportional gain from target distance to desired velocity
    pub auto_gain: f32,
    /// Exponential smoothing factor blending toward the desired velocity
    pub auto_blend: f32,
    /// Residual gravity fraction so assisted flight still feels like falling
    pub auto_gravity_factor: f32,
    pub auto_max_vy: f32,
    /// Inset from each gap edge when computing the target center.
    /// Deliberately independent of `auto_wall_margin`; unifying them would
    /// shift the steering target near short gaps.
    pub auto_gap_inset: f32,
    /// Added to the bird radius when clamping the target to the safe band
    pub auto_wall_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            wall_height: WALL_HEIGHT,

            bird_x: BIRD_X,
            gravity: GRAVITY_BASE,
            flap_impulse: FLAP_IMPULSE,
            float_gravity_factor: 0.45,

            pipe_speed: PIPE_BASE_SPEED,
            pipe_width: PIPE_WIDTH,
            pipe_interval_ms: PIPE_INTERVAL_MS,
            gap_min: GAP_MIN,
            gap_max: GAP_MAX,

            pickup_interval_ms: PICKUP_INTERVAL_MS,
            pickup_spawn_prob: PICKUP_SPAWN_PROB,
            max_active_pickups: MAX_ACTIVE_PICKUPS,
            kinds: vec![
                KindSpec::new(PickupKind::Shield, PickupBehavior::Invincible, 40.0),
                KindSpec::new(PickupKind::Chili, PickupBehavior::Slow, 34.0),
                KindSpec::new(PickupKind::Dynamite, PickupBehavior::ClearPipes, 44.0),
                KindSpec::new(PickupKind::Star, PickupBehavior::ScoreMult, 40.0),
                KindSpec::new(PickupKind::Feather, PickupBehavior::Float, 36.0),
                KindSpec::new(PickupKind::Auto, PickupBehavior::AutoPilot, 42.0),
                KindSpec {
                    score: 10,
                    ..KindSpec::new(PickupKind::Gold, PickupBehavior::Points, 46.0)
                },
            ],
            pickup_hit_factor: 0.45,
            pickup_safety_margin: 18.0,

            slow_factor: 0.55,
            score_multiplier: 2,
            duration_invincible_ms: DURATION_INVINCIBLE_MS,
            duration_slow_ms: DURATION_SLOW_MS,
            duration_score_mult_ms: DURATION_SCORE_MULT_MS,
            duration_float_ms: DURATION_FLOAT_MS,
            duration_auto_ms: DURATION_AUTO_MS,
            pipe_clear_block_ms: PIPE_CLEAR_BLOCK_MS,

            auto_gain: 0.018,
            auto_blend: 0.24,
            auto_gravity_factor: 0.06,
            auto_max_vy: 8.0,
            auto_gap_inset: 6.0,
            auto_wall_margin: 12.0,
        }
    }
}

impl Tuning {
    /// Top of the open field (bottom edge of the upper brick band)
    #[inline]
    pub fn inner_top(&self) -> f32 {
        self.wall_height
    }

    /// Bottom of the open field (top edge of the lower brick band)
    #[inline]
    pub fn inner_bottom(&self) -> f32 {
        self.field_height - self.wall_height
    }

    /// Height of the open field between the brick bands
    #[inline]
    pub fn inner_height(&self) -> f32 {
        self.field_height - 2.0 * self.wall_height
    }

    /// Spec entry for a pickup kind
    pub fn kind_spec(&self, kind: PickupKind) -> Option<&KindSpec> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    /// Reject malformed tunings up front
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::BadField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.wall_height < 0.0 || self.inner_height() <= 0.0 {
            return Err(TuningError::WallsTooTall {
                wall: self.wall_height,
                height: self.field_height,
            });
        }
        if self.gap_min <= 0.0 || self.gap_min > self.gap_max || self.gap_max > self.inner_height()
        {
            return Err(TuningError::BadGapRange {
                min: self.gap_min,
                max: self.gap_max,
                inner: self.inner_height(),
            });
        }
        if !(0.0..=1.0).contains(&self.pickup_spawn_prob) {
            return Err(TuningError::BadSpawnProb(self.pickup_spawn_prob));
        }
        if self.pipe_speed <= 0.0 || self.pipe_width <= 0.0 {
            return Err(TuningError::BadPipeGeometry);
        }
        for (name, value) in [
            ("pipe_interval_ms", self.pipe_interval_ms),
            ("pickup_interval_ms", self.pickup_interval_ms),
            ("duration_invincible_ms", self.duration_invincible_ms),
            ("duration_slow_ms", self.duration_slow_ms),
            ("duration_score_mult_ms", self.duration_score_mult_ms),
            ("duration_float_ms", self.duration_float_ms),
            ("duration_auto_ms", self.duration_auto_ms),
            ("pipe_clear_block_ms", self.pipe_clear_block_ms),
        ] {
            if value <= 0.0 {
                return Err(TuningError::BadDuration { name, value });
            }
        }
        if self.kinds.is_empty() {
            return Err(TuningError::NoPickupKinds);
        }
        for spec in &self.kinds {
            if spec.size <= 0.0 || spec.weight <= 0.0 {
                return Err(TuningError::BadKindSpec { kind: spec.kind });
            }
        }
        Ok(())
    }
}
