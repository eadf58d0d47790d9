//! Per-frame simulation tick
//!
//! The orchestrator: one call advances physics, spawning, scoring, and
//! collisions in a fixed order, fully committing the tick's effects before
//! returning. `now` is sampled once by the host and threaded through every
//! sub-operation, so all timer comparisons within a tick agree.

use crate::sim::state::{EffectKind, GameEvent, GamePhase, GameState, Pickup};
use crate::sim::{collision, physics, spawn};
use crate::tuning::PickupBehavior;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Start (or restart) a run, carrying the selected skin's bird radius.
    /// Ignored while a run is already in progress.
    pub start: Option<f32>,
    /// Flap impulse (tap/click/space); no-op unless running
    pub flap: bool,
}

/// Advance the game by one frame.
///
/// Outside `Running` this only honors the start input; no physics,
/// collision, or spawn work happens.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    if let Some(bird_radius) = input.start {
        if state.phase != GamePhase::Running {
            state.start_run(now, bird_radius);
        }
    }
    if state.phase != GamePhase::Running {
        return;
    }

    // Effect flags for this tick, all judged against the same `now`
    let invincible = state.effects.is_active(EffectKind::Invincible, now);
    let speed_mult = if state.effects.is_active(EffectKind::Slow, now) {
        state.tuning.slow_factor
    } else {
        1.0
    };
    let score_mult = if state.effects.is_active(EffectKind::ScoreMult, now) {
        state.tuning.score_multiplier
    } else {
        1
    };
    let gravity = if state.effects.is_active(EffectKind::Float, now) {
        state.tuning.gravity * state.tuning.float_gravity_factor
    } else {
        state.tuning.gravity
    };
    let auto_on = state.effects.is_active(EffectKind::AutoPilot, now);

    if input.flap {
        state.flap();
    }

    // Integrate the bird
    if auto_on {
        let target =
            physics::auto_target_y(&state.pipes, &state.bird, state.bird_radius, &state.tuning);
        state.auto_target_y = target;
        physics::steer_auto(&mut state.bird, target, gravity, &state.tuning);
    } else {
        state.bird.vy += gravity;
    }
    state.bird.y += state.bird.vy;

    // Brick bands are lethal no matter what effects are active
    if collision::bird_hits_walls(&state.bird, state.bird_radius, &state.tuning) {
        trigger_game_over(state);
        return;
    }

    spawn::maybe_spawn_pipe(state, now);

    // Scroll pipes, credit passes, drop off-screen ones
    let dx = state.tuning.pipe_speed * speed_mult;
    let bird_x = state.bird.x;
    let pipe_width = state.tuning.pipe_width;
    let mut passes = 0u32;
    for pipe in &mut state.pipes {
        pipe.x -= dx;
        if !pipe.scored && pipe.x + pipe_width < bird_x {
            pipe.scored = true;
            passes += 1;
        }
    }
    state.pipes.retain(|p| p.x + pipe_width >= -120.0);
    for _ in 0..passes {
        add_score(state, score_mult);
    }

    spawn::maybe_spawn_pickup(state, now);
    update_pickups(state, now, dx);

    // Pipe overlap is fatal unless shielded
    if !invincible {
        let hit = state
            .pipes
            .iter()
            .any(|p| collision::bird_hits_pipe(&state.bird, state.bird_radius, p, &state.tuning));
        if hit {
            trigger_game_over(state);
        }
    }
}

fn add_score(state: &mut GameState, amount: u64) {
    state.score += amount;
    state.push_event(GameEvent::ScoreChanged(state.score));
    state.push_event(GameEvent::UnlockCheckRequested(state.score));
}

/// Scroll pickups, collect overlaps, drop off-screen ones.
///
/// Exactly one destroy path fires per pickup: collected or scrolled out,
/// never both.
fn update_pickups(state: &mut GameState, now: f64, dx: f32) {
    let mut pickups = std::mem::take(&mut state.pickups);
    let mut kept = Vec::with_capacity(pickups.len());
    for mut pickup in pickups.drain(..) {
        pickup.x -= dx;
        if pickup.x + pickup.size < -80.0 {
            continue;
        }
        if collision::bird_hits_pickup(
            &state.bird,
            state.bird_radius,
            &pickup,
            state.tuning.pickup_hit_factor,
        ) {
            collect_pickup(state, &pickup, now);
        } else {
            kept.push(pickup);
        }
    }
    state.pickups = kept;
}

fn collect_pickup(state: &mut GameState, pickup: &Pickup, now: f64) {
    let Some(spec) = state.tuning.kind_spec(pickup.kind) else {
        log::warn!("collected pickup of unconfigured kind {:?}", pickup.kind);
        return;
    };
    let behavior = spec.behavior;
    let points = spec.score;
    state.push_event(GameEvent::PickupCollected(pickup.kind));

    match behavior {
        PickupBehavior::Invincible => {
            let d = state.tuning.duration_invincible_ms;
            start_effect(state, EffectKind::Invincible, now, d);
        }
        PickupBehavior::Slow => {
            let d = state.tuning.duration_slow_ms;
            start_effect(state, EffectKind::Slow, now, d);
        }
        PickupBehavior::ClearPipes => {
            state.pipes.clear();
            let d = state.tuning.pipe_clear_block_ms;
            start_effect(state, EffectKind::PipeSpawnBlock, now, d);
            state.push_event(GameEvent::PipesCleared);
        }
        PickupBehavior::ScoreMult => {
            let d = state.tuning.duration_score_mult_ms;
            start_effect(state, EffectKind::ScoreMult, now, d);
        }
        PickupBehavior::Float => {
            let d = state.tuning.duration_float_ms;
            start_effect(state, EffectKind::Float, now, d);
        }
        PickupBehavior::AutoPilot => {
            let d = state.tuning.duration_auto_ms;
            start_effect(state, EffectKind::AutoPilot, now, d);
            state.auto_target_y = state.tuning.field_height / 2.0;
        }
        PickupBehavior::Points => add_score(state, points),
    }
}

fn start_effect(state: &mut GameState, kind: EffectKind, now: f64, duration: f64) {
    let until = state.effects.extend(kind, now, duration);
    state.push_event(GameEvent::EffectStarted(kind, until));
}

fn trigger_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::GameOver(state.score));
    log::info!("game over at score {}", state.score);
}
