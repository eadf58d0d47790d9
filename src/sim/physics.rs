//! Bird physics: gravity integration and assisted flight
//!
//! Movement constants are calibrated per tick at the nominal 60 Hz cadence;
//! the host owns the frame clock and steps the sim once per frame.

use crate::sim::state::{Bird, Pipe};
use crate::tuning::Tuning;

/// Steering target for assisted flight.
///
/// Picks the nearest pipe whose span still lies ahead of or straddles the
/// bird and aims for its gap center, inset from each gap edge; with no such
/// pipe the target is the vertical field center. The result is always
/// clamped into the band the bird can occupy without clipping a brick wall.
pub fn auto_target_y(pipes: &[Pipe], bird: &Bird, bird_radius: f32, tuning: &Tuning) -> f32 {
    let mut target = tuning.field_height / 2.0;

    let mut nearest_x = f32::INFINITY;
    let mut next_pipe: Option<&Pipe> = None;
    for pipe in pipes {
        if pipe.x < nearest_x && pipe.x + tuning.pipe_width > bird.x {
            nearest_x = pipe.x;
            next_pipe = Some(pipe);
        }
    }

    if let Some(pipe) = next_pipe {
        let (span_top, span_bottom) = pipe.gap_span(tuning);
        let gap_top = span_top + tuning.auto_gap_inset;
        let gap_bottom = span_bottom - tuning.auto_gap_inset;
        target = ((gap_top + gap_bottom) / 2.0).round().min(gap_bottom).max(gap_top);
    }

    let margin = bird_radius + tuning.auto_wall_margin;
    let safe_top = tuning.inner_top() + margin;
    let safe_bottom = tuning.inner_bottom() - margin;
    target.min(safe_bottom).max(safe_top)
}

/// Blend the vertical velocity toward the steering target.
///
/// `desired_vy` is proportional to the signed distance to the target; the
/// residual gravity term keeps assisted flight feeling like a descent.
pub fn steer_auto(bird: &mut Bird, target_y: f32, gravity: f32, tuning: &Tuning) {
    let distance = target_y - bird.y;
    let desired_vy = distance * tuning.auto_gain;
    bird.vy += (desired_vy - bird.vy) * tuning.auto_blend;
    bird.vy += gravity * tuning.auto_gravity_factor;
    bird.vy = bird.vy.clamp(-tuning.auto_max_vy, tuning.auto_max_vy);
}
