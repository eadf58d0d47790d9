//! Pipe generation and pickup spawning
//!
//! Both spawners draw from the run RNG owned by `GameState`, so a seed
//! fully determines the obstacle course and item stream.

use rand::Rng;

use crate::sim::state::{Anchor, GameState, Pickup, Pipe};
use crate::tuning::KindSpec;

/// Resample attempts before giving up on per-kind caps
const KIND_RESAMPLE_ATTEMPTS: usize = 8;

/// Spawn a pipe at the right boundary when the cadence allows.
///
/// Gated on both the spawn interval and the Dynamite block window. Anchors
/// alternate bottom/top each spawn; gap heights are uniform over the
/// configured range, rounded to whole pixels.
pub fn maybe_spawn_pipe(state: &mut GameState, now: f64) {
    if now - state.last_pipe_time <= state.tuning.pipe_interval_ms {
        return;
    }
    if now <= state.effects.pipe_spawn_blocked_until {
        return;
    }

    let gap = state
        .rng
        .random_range(state.tuning.gap_min..state.tuning.gap_max)
        .round();
    let anchor = if state.pipe_alternator % 2 == 0 {
        Anchor::Bottom
    } else {
        Anchor::Top
    };
    state.pipe_alternator += 1;
    state.pipes.push(Pipe {
        x: state.tuning.field_width,
        gap,
        anchor,
        scored: false,
    });
    state.last_pipe_time = now;
    log::debug!("pipe spawned (gap {gap}, {anchor:?})");
}

/// Weighted kind draw with bounded resampling against per-kind caps.
///
/// Returns an index into `kinds`. Up to [`KIND_RESAMPLE_ATTEMPTS`] weighted
/// draws look for a kind under its cap; after that a uniform draw wins
/// regardless of caps. Best effort, not a hard guarantee.
pub fn pick_pickup_kind<R: Rng + ?Sized>(
    rng: &mut R,
    kinds: &[KindSpec],
    active_counts: &[usize],
) -> usize {
    debug_assert_eq!(kinds.len(), active_counts.len());
    for _ in 0..KIND_RESAMPLE_ATTEMPTS {
        let idx = weighted_index(rng, kinds);
        if active_counts[idx] < kinds[idx].max_active {
            return idx;
        }
    }
    rng.random_range(0..kinds.len())
}

fn weighted_index<R: Rng + ?Sized>(rng: &mut R, kinds: &[KindSpec]) -> usize {
    let total: f32 = kinds.iter().map(|k| k.weight).sum();
    let mut roll = rng.random_range(0.0..total);
    for (idx, kind) in kinds.iter().enumerate() {
        if roll < kind.weight {
            return idx;
        }
        roll -= kind.weight;
    }
    kinds.len() - 1
}

/// Maybe spawn one pickup.
///
/// The spawn clock advances whenever the interval has elapsed, whether or
/// not a pickup results; the attempt is then dropped silently when the
/// field is saturated, the Dynamite block window is open, or the
/// probability roll rejects.
pub fn maybe_spawn_pickup(state: &mut GameState, now: f64) {
    if now - state.last_pickup_time <= state.tuning.pickup_interval_ms {
        return;
    }
    state.last_pickup_time = now;

    if state.pickups.len() >= state.tuning.max_active_pickups {
        return;
    }
    if now < state.effects.pipe_spawn_blocked_until {
        return;
    }
    if state.rng.random::<f64>() > state.tuning.pickup_spawn_prob {
        return;
    }

    let counts: Vec<usize> = state
        .tuning
        .kinds
        .iter()
        .map(|spec| state.pickups.iter().filter(|p| p.kind == spec.kind).count())
        .collect();
    let idx = pick_pickup_kind(&mut state.rng, &state.tuning.kinds, &counts);
    let kind = state.tuning.kinds[idx].kind;
    let size = state.tuning.kinds[idx].size;

    let (x, y) = place_pickup(state, size);
    let id = state.next_entity_id();
    state.pickups.push(Pickup {
        id,
        kind,
        x,
        y,
        size,
        spawned_at: now,
    });
    log::debug!("pickup spawned ({kind:?} at {x:.0},{y:.0})");
}

/// Choose a reachable spot for a pickup of the given size.
///
/// Prefers the first mid-screen pipe whose gap fits the pickup plus the
/// safety margin on each side, dropping it at that pipe's horizontal
/// center; otherwise spawns at the right boundary inside a generous central
/// band. Either way the result is clamped to the open field.
fn place_pickup(state: &mut GameState, size: f32) -> (f32, f32) {
    let t = &state.tuning;
    let margin = t.pickup_safety_margin;

    let mut candidate: Option<&Pipe> = None;
    for pipe in &state.pipes {
        if pipe.x > t.field_width * 0.2 && pipe.x < t.field_width * 0.95 {
            let (gap_top, gap_bottom) = pipe.gap_span(t);
            if gap_bottom - gap_top >= size + margin * 2.0 {
                candidate = Some(pipe);
                break;
            }
        }
    }

    if let Some(pipe) = candidate {
        let x = pipe.x + (t.pipe_width / 2.0).round();
        let (gap_top, gap_bottom) = pipe.gap_span(t);
        let y = state
            .rng
            .random_range(gap_top + margin..gap_bottom - margin);
        let y = y.min(t.inner_bottom() - 12.0).max(t.inner_top() + 12.0);
        (x, y)
    } else {
        let x = t.field_width + 30.0;
        let band = (t.inner_height() - 120.0).max(1.0);
        let y = state.rng.random_range(0.0..band) + t.inner_top() + 60.0;
        let y = y.min(t.inner_bottom() - margin).max(t.inner_top() + margin);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EffectKind, PickupKind};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state(tuning: Tuning, seed: u64) -> GameState {
        let mut state = GameState::new(tuning, seed).expect("valid tuning");
        state.start_run(0.0, 30.0);
        state
    }

    #[test]
    fn test_pipe_spawn_respects_interval() {
        let mut state = running_state(Tuning::default(), 1);
        maybe_spawn_pipe(&mut state, 1000.0);
        assert!(state.pipes.is_empty());
        maybe_spawn_pipe(&mut state, 1901.0);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.last_pipe_time, 1901.0);
    }

    #[test]
    fn test_pipe_spawn_blocked_window() {
        let mut state = running_state(Tuning::default(), 1);
        state.effects.extend(EffectKind::PipeSpawnBlock, 0.0, 5000.0);
        maybe_spawn_pipe(&mut state, 4000.0);
        assert!(state.pipes.is_empty());
        maybe_spawn_pipe(&mut state, 5001.0);
        assert_eq!(state.pipes.len(), 1);
    }

    #[test]
    fn test_pipe_anchors_alternate() {
        let mut state = running_state(Tuning::default(), 2);
        maybe_spawn_pipe(&mut state, 2000.0);
        maybe_spawn_pipe(&mut state, 4000.0);
        maybe_spawn_pipe(&mut state, 6000.0);
        let anchors: Vec<Anchor> = state.pipes.iter().map(|p| p.anchor).collect();
        assert_eq!(anchors, vec![Anchor::Bottom, Anchor::Top, Anchor::Bottom]);
    }

    #[test]
    fn test_pipe_gap_within_range() {
        let t = Tuning::default();
        let (gap_min, gap_max) = (t.gap_min, t.gap_max);
        let mut state = running_state(t, 3);
        for i in 1..=20 {
            maybe_spawn_pipe(&mut state, i as f64 * 2000.0);
        }
        assert_eq!(state.pipes.len(), 20);
        for pipe in &state.pipes {
            assert!(pipe.gap >= gap_min && pipe.gap <= gap_max);
            assert_eq!(pipe.gap, pipe.gap.round());
        }
    }

    #[test]
    fn test_kind_draw_avoids_capped_kinds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let t = Tuning::default();
        let mut kinds: Vec<KindSpec> = t.kinds.clone();
        // Make every kind but Gold vanishingly unlikely on the weighted draw
        for spec in kinds.iter_mut() {
            spec.weight = if spec.kind == PickupKind::Gold { 1.0 } else { 1e-9 };
        }
        // Gold capped out: the resample loop must land elsewhere or fall back
        let mut counts = vec![0usize; kinds.len()];
        let gold = kinds.iter().position(|k| k.kind == PickupKind::Gold).unwrap();
        counts[gold] = kinds[gold].max_active;
        for _ in 0..50 {
            let idx = pick_pickup_kind(&mut rng, &kinds, &counts);
            assert!(idx < kinds.len());
            // A non-fallback result must respect the cap
            if idx != gold {
                assert!(counts[idx] < kinds[idx].max_active);
            }
        }
    }

    #[test]
    fn test_kind_draw_fallback_when_all_capped() {
        let mut rng = Pcg32::seed_from_u64(7);
        let kinds = Tuning::default().kinds;
        let counts: Vec<usize> = kinds.iter().map(|k| k.max_active).collect();
        for _ in 0..20 {
            let idx = pick_pickup_kind(&mut rng, &kinds, &counts);
            assert!(idx < kinds.len());
        }
    }

    #[test]
    fn test_pickup_spawn_advances_clock_even_when_saturated() {
        let mut t = Tuning::default();
        t.pickup_spawn_prob = 1.0;
        let mut state = running_state(t, 4);
        for _ in 0..6 {
            let id = state.next_entity_id();
            state.pickups.push(Pickup {
                id,
                kind: PickupKind::Gold,
                x: 200.0,
                y: 300.0,
                size: 46.0,
                spawned_at: 0.0,
            });
        }
        maybe_spawn_pickup(&mut state, 5000.0);
        assert_eq!(state.pickups.len(), 6);
        assert_eq!(state.last_pickup_time, 5000.0);
    }

    #[test]
    fn test_pickup_placed_inside_gap_with_margin() {
        let mut t = Tuning::default();
        t.pickup_spawn_prob = 1.0;
        let margin = t.pickup_safety_margin;
        let mut state = running_state(t, 5);
        state.pipes.push(Pipe {
            x: 180.0,
            gap: 300.0,
            anchor: Anchor::Bottom,
            scored: false,
        });

        for round in 1..=10 {
            maybe_spawn_pickup(&mut state, round as f64 * 5000.0);
        }
        assert!(!state.pickups.is_empty());
        let (gap_top, gap_bottom) = state.pipes[0].gap_span(&state.tuning);
        for pickup in &state.pickups {
            assert_eq!(pickup.x, 180.0 + 39.0);
            assert!(pickup.y >= gap_top + margin);
            assert!(pickup.y <= gap_bottom - margin);
        }
    }

    #[test]
    fn test_pickup_midfield_placement_without_pipes() {
        let mut t = Tuning::default();
        t.pickup_spawn_prob = 1.0;
        let mut state = running_state(t, 6);
        maybe_spawn_pickup(&mut state, 5000.0);
        assert_eq!(state.pickups.len(), 1);
        let p = &state.pickups[0];
        assert_eq!(p.x, state.tuning.field_width + 30.0);
        assert!(p.y >= state.tuning.inner_top() + state.tuning.pickup_safety_margin);
        assert!(p.y <= state.tuning.inner_bottom() - state.tuning.pickup_safety_margin);
    }

    #[test]
    fn test_pickup_cap_never_exceeded() {
        let mut t = Tuning::default();
        t.pickup_spawn_prob = 1.0;
        let max = t.max_active_pickups;
        let mut state = running_state(t, 8);
        // Pickups spawned mid-field never scroll out in this window; keep
        // asking well past the cap
        for round in 1..=30 {
            maybe_spawn_pickup(&mut state, round as f64 * 5000.0);
            assert!(state.pickups.len() <= max);
        }
        assert_eq!(state.pickups.len(), max);
    }
}
