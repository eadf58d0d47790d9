//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One synchronous advance per frame, `now` sampled once by the host
//! - Seeded RNG only
//! - No rendering, audio, or storage dependencies; outcomes surface as
//!   [`state::GameEvent`]s for the presentation layer

pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{
    ActiveEffects, Anchor, Bird, EffectKind, GameEvent, GamePhase, GameState, Pickup, PickupKind,
    Pipe,
};
pub use tick::{TickInput, tick};
