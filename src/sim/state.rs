//! Game state and core simulation types
//!
//! All state for one run lives in [`GameState`]. Nothing outside the sim
//! mutates it directly; hosts feed [`super::tick::TickInput`]s in and drain
//! [`GameEvent`]s out.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start input; no simulation work happens
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended on a fatal collision; waiting on the next start input
    GameOver,
}

/// The player's bird
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal position, fixed for the whole run
    pub x: f32,
    pub y: f32,
    /// Vertical velocity, px per tick (downward positive)
    pub vy: f32,
}

impl Bird {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Which field edge a pipe's barrier grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Bottom,
    Top,
}

/// A scrolling pipe: one barrier plus the passable gap between the barrier
/// and the opposite brick band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Passable gap height
    pub gap: f32,
    pub anchor: Anchor,
    /// Flips exactly once, when the trailing edge passes the bird
    pub scored: bool,
}

impl Pipe {
    /// Vertical span `(top, bottom)` of the solid barrier
    pub fn barrier_span(&self, tuning: &Tuning) -> (f32, f32) {
        match self.anchor {
            Anchor::Bottom => (tuning.inner_top() + self.gap, tuning.inner_bottom()),
            Anchor::Top => (tuning.inner_top(), tuning.inner_bottom() - self.gap),
        }
    }

    /// Vertical span `(top, bottom)` of the passable gap
    pub fn gap_span(&self, tuning: &Tuning) -> (f32, f32) {
        match self.anchor {
            Anchor::Bottom => (tuning.inner_top(), tuning.inner_top() + self.gap),
            Anchor::Top => (tuning.inner_bottom() - self.gap, tuning.inner_bottom()),
        }
    }
}

/// Pickup kinds, one per entry of the tuning table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Shield,
    Chili,
    Dynamite,
    Star,
    Feather,
    Auto,
    Gold,
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    /// Left edge; the hit/draw center is `x + size / 2`
    pub x: f32,
    /// Vertical center
    pub y: f32,
    pub size: f32,
    pub spawned_at: f64,
}

impl Pickup {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.size / 2.0, self.y)
    }
}

/// Timed effect kinds tracked by [`ActiveEffects`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Invincible,
    Slow,
    ScoreMult,
    Float,
    AutoPilot,
    /// Pipe spawning suppressed (set by Dynamite)
    PipeSpawnBlock,
}

/// Expiry timestamps (ms) per effect kind
///
/// Re-collecting an unexpired effect only pushes the expiry out; it is never
/// pulled in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub invincible_until: f64,
    pub slow_until: f64,
    pub score_mult_until: f64,
    pub float_until: f64,
    pub auto_until: f64,
    pub pipe_spawn_blocked_until: f64,
}

impl ActiveEffects {
    fn slot(&mut self, kind: EffectKind) -> &mut f64 {
        match kind {
            EffectKind::Invincible => &mut self.invincible_until,
            EffectKind::Slow => &mut self.slow_until,
            EffectKind::ScoreMult => &mut self.score_mult_until,
            EffectKind::Float => &mut self.float_until,
            EffectKind::AutoPilot => &mut self.auto_until,
            EffectKind::PipeSpawnBlock => &mut self.pipe_spawn_blocked_until,
        }
    }

    pub fn expiry(&self, kind: EffectKind) -> f64 {
        match kind {
            EffectKind::Invincible => self.invincible_until,
            EffectKind::Slow => self.slow_until,
            EffectKind::ScoreMult => self.score_mult_until,
            EffectKind::Float => self.float_until,
            EffectKind::AutoPilot => self.auto_until,
            EffectKind::PipeSpawnBlock => self.pipe_spawn_blocked_until,
        }
    }

    pub fn is_active(&self, kind: EffectKind, now: f64) -> bool {
        now < self.expiry(kind)
    }

    /// Extend `kind` to at least `now + duration`, returning the new expiry
    pub fn extend(&mut self, kind: EffectKind, now: f64, duration: f64) -> f64 {
        let slot = self.slot(kind);
        *slot = slot.max(now + duration);
        *slot
    }
}

/// Discrete per-tick events for the presentation layer
///
/// The core performs no I/O in response to these; sounds, popups, storage
/// writes, and unlock bookkeeping are all host reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    PickupCollected(PickupKind),
    PipesCleared,
    EffectStarted(EffectKind, f64),
    GameOver(u64),
    /// Score changed; the host should re-evaluate skin unlock milestones
    UnlockCheckRequested(u64),
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Immutable for the duration of a run
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub bird: Bird,
    /// From the selected skin, read once at run start
    pub bird_radius: f32,
    pub pipes: Vec<Pipe>,
    pub pickups: Vec<Pickup>,
    pub effects: ActiveEffects,
    /// Even spawns anchor bottom, odd spawns anchor top
    pub pipe_alternator: u32,
    pub last_pipe_time: f64,
    pub last_pickup_time: f64,
    /// Where assisted flight is steering, kept for the renderer
    pub auto_target_y: f32,
    /// Events since the last drain (not part of the persisted state)
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state in `NotStarted`; fails fast on a bad tuning
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let bird = Bird {
            x: tuning.bird_x,
            y: tuning.field_height / 2.0,
            vy: 0.0,
        };
        let auto_target_y = tuning.field_height / 2.0;
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::NotStarted,
            score: 0,
            bird,
            bird_radius: crate::consts::BASE_BIRD_RADIUS,
            pipes: Vec::new(),
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
            pipe_alternator: 0,
            last_pipe_time: 0.0,
            last_pickup_time: 0.0,
            auto_target_y,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset all run state and enter `Running`
    ///
    /// `bird_radius` comes from the selected skin; the sim only ever sees
    /// the number.
    pub fn start_run(&mut self, now: f64, bird_radius: f32) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.bird = Bird {
            x: self.tuning.bird_x,
            y: self.tuning.field_height / 2.0,
            vy: 0.0,
        };
        self.bird_radius = bird_radius.max(1.0);
        self.pipes.clear();
        self.pickups.clear();
        self.effects = ActiveEffects::default();
        self.pipe_alternator = 0;
        self.last_pipe_time = now;
        self.last_pickup_time = now;
        self.auto_target_y = self.tuning.field_height / 2.0;
        self.events.clear();
        log::info!("run started (seed {}, bird radius {})", self.seed, self.bird_radius);
    }

    /// Discrete upward impulse; rapid flaps simply reset the velocity.
    /// No-op unless a run is in progress.
    pub fn flap(&mut self) {
        if self.phase == GamePhase::Running {
            self.bird.vy = self.tuning.flap_impulse;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the tick's events to the host, clearing the queue
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events accumulated since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects() -> ActiveEffects {
        ActiveEffects::default()
    }

    #[test]
    fn test_effect_inactive_by_default() {
        let fx = effects();
        assert!(!fx.is_active(EffectKind::Invincible, 0.0));
        assert!(!fx.is_active(EffectKind::PipeSpawnBlock, 1e9));
    }

    #[test]
    fn test_extend_sets_and_expires() {
        let mut fx = effects();
        fx.extend(EffectKind::Slow, 1000.0, 6000.0);
        assert!(fx.is_active(EffectKind::Slow, 6999.0));
        assert!(!fx.is_active(EffectKind::Slow, 7000.0));
    }

    #[test]
    fn test_extend_never_shortens() {
        let mut fx = effects();
        let first = fx.extend(EffectKind::Invincible, 1000.0, 7000.0);
        // Re-pickup at a later now but with a shorter remaining window
        let second = fx.extend(EffectKind::Invincible, 1500.0, 1000.0);
        assert_eq!(first, second);
        assert_eq!(fx.invincible_until, 8000.0);
    }

    #[test]
    fn test_effects_are_independent() {
        let mut fx = effects();
        fx.extend(EffectKind::Invincible, 0.0, 7000.0);
        fx.extend(EffectKind::Float, 0.0, 7000.0);
        fx.extend(EffectKind::ScoreMult, 0.0, 7000.0);
        assert!(fx.is_active(EffectKind::Invincible, 100.0));
        assert!(fx.is_active(EffectKind::Float, 100.0));
        assert!(fx.is_active(EffectKind::ScoreMult, 100.0));
        assert!(!fx.is_active(EffectKind::Slow, 100.0));
    }

    #[test]
    fn test_pipe_spans_bottom_anchor() {
        let t = Tuning::default();
        let pipe = Pipe {
            x: 200.0,
            gap: 300.0,
            anchor: Anchor::Bottom,
            scored: false,
        };
        let (gap_top, gap_bottom) = pipe.gap_span(&t);
        let (bar_top, bar_bottom) = pipe.barrier_span(&t);
        assert_eq!(gap_top, t.inner_top());
        assert_eq!(gap_bottom - gap_top, 300.0);
        // Gap and barrier tile the open field exactly
        assert_eq!(gap_bottom, bar_top);
        assert_eq!(bar_bottom, t.inner_bottom());
    }

    #[test]
    fn test_pipe_spans_top_anchor() {
        let t = Tuning::default();
        let pipe = Pipe {
            x: 200.0,
            gap: 280.0,
            anchor: Anchor::Top,
            scored: false,
        };
        let (gap_top, gap_bottom) = pipe.gap_span(&t);
        let (bar_top, bar_bottom) = pipe.barrier_span(&t);
        assert_eq!(bar_top, t.inner_top());
        assert_eq!(gap_bottom, t.inner_bottom());
        assert_eq!(gap_bottom - gap_top, 280.0);
        assert_eq!(bar_bottom, gap_top);
    }

    #[test]
    fn test_new_rejects_bad_tuning() {
        let mut t = Tuning::default();
        t.wall_height = 400.0; // two 400px bands on a 640px field
        assert!(GameState::new(t, 1).is_err());
    }

    #[test]
    fn test_start_run_resets_everything() {
        let mut state = GameState::new(Tuning::default(), 7).expect("valid tuning");
        state.score = 42;
        state.pipes.push(Pipe {
            x: 100.0,
            gap: 300.0,
            anchor: Anchor::Top,
            scored: true,
        });
        state.effects.extend(EffectKind::Slow, 0.0, 6000.0);
        state.phase = GamePhase::GameOver;

        state.start_run(5000.0, 30.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.pipes.is_empty());
        assert!(state.pickups.is_empty());
        assert!(!state.effects.is_active(EffectKind::Slow, 5000.0));
        assert_eq!(state.last_pipe_time, 5000.0);
    }
}
