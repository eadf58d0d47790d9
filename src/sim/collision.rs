//! Overlap predicates for the axis-aligned play field
//!
//! The bird is a circle; pipes and the brick bands are axis-aligned rects,
//! so the checks reduce to interval overlaps plus one squared-distance test
//! for pickups.

use crate::sim::state::{Bird, Pickup, Pipe};
use crate::tuning::Tuning;

/// Bird clipping the top or bottom brick band. Always fatal.
pub fn bird_hits_walls(bird: &Bird, radius: f32, tuning: &Tuning) -> bool {
    bird.y - radius < tuning.inner_top() || bird.y + radius > tuning.inner_bottom()
}

/// Bird overlapping a pipe's solid barrier
pub fn bird_hits_pipe(bird: &Bird, radius: f32, pipe: &Pipe, tuning: &Tuning) -> bool {
    let left = pipe.x;
    let right = pipe.x + tuning.pipe_width;
    if bird.x + radius <= left || bird.x - radius >= right {
        return false;
    }
    let (barrier_top, barrier_bottom) = pipe.barrier_span(tuning);
    bird.y + radius > barrier_top && bird.y - radius < barrier_bottom
}

/// Circular overlap between the bird and a pickup.
///
/// The collect radius is deliberately smaller than the sprite
/// (`size * hit_factor`) so grazing a corner doesn't count.
pub fn bird_hits_pickup(bird: &Bird, radius: f32, pickup: &Pickup, hit_factor: f32) -> bool {
    let hit_r = radius + pickup.size * hit_factor;
    bird.pos().distance_squared(pickup.center()) <= hit_r * hit_r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Anchor, PickupKind};

    fn bird_at(y: f32) -> Bird {
        Bird { x: 80.0, y, vy: 0.0 }
    }

    #[test]
    fn test_wall_hits() {
        let t = Tuning::default();
        // Open field spans [100, 540]
        assert!(bird_hits_walls(&bird_at(129.0), 30.0, &t));
        assert!(bird_hits_walls(&bird_at(511.0), 30.0, &t));
        assert!(!bird_hits_walls(&bird_at(320.0), 30.0, &t));
        // Exactly touching is not yet a hit
        assert!(!bird_hits_walls(&bird_at(130.0), 30.0, &t));
    }

    #[test]
    fn test_pipe_hit_in_barrier() {
        let t = Tuning::default();
        let pipe = Pipe {
            x: 50.0,
            gap: 300.0,
            anchor: Anchor::Bottom,
            scored: false,
        };
        // Barrier spans [400, 540]; bird inside both spans
        assert!(bird_hits_pipe(&bird_at(420.0), 30.0, &pipe, &t));
    }

    #[test]
    fn test_pipe_miss_through_gap() {
        let t = Tuning::default();
        let pipe = Pipe {
            x: 50.0,
            gap: 300.0,
            anchor: Anchor::Bottom,
            scored: false,
        };
        // Gap spans [100, 400]; bird fully inside it
        assert!(!bird_hits_pipe(&bird_at(250.0), 30.0, &pipe, &t));
    }

    #[test]
    fn test_pipe_miss_horizontal() {
        let t = Tuning::default();
        let pipe = Pipe {
            x: 200.0,
            gap: 300.0,
            anchor: Anchor::Top,
            scored: false,
        };
        // Pipe is well ahead of the bird
        assert!(!bird_hits_pipe(&bird_at(200.0), 30.0, &pipe, &t));
    }

    #[test]
    fn test_pickup_overlap_boundary() {
        let bird = bird_at(320.0);
        let pickup = Pickup {
            id: 1,
            kind: PickupKind::Gold,
            x: 80.0 - 23.0, // center exactly on the bird
            y: 320.0,
            size: 46.0,
            spawned_at: 0.0,
        };
        assert!(bird_hits_pickup(&bird, 30.0, &pickup, 0.45));

        // Centered just beyond the combined radius: 30 + 46*0.45 = 50.7
        let far = Pickup {
            y: 320.0 + 51.0,
            ..pickup.clone()
        };
        assert!(!bird_hits_pickup(&bird, 30.0, &far, 0.45));
    }
}
