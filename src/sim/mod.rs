//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Contacts, aabb_overlap, detect};
pub use physics::{StepOutcome, drift_hazards, integrate_player};
pub use rect::Rect;
pub use spawn::Spawner;
pub use state::{
    Collectible, Facing, GameEvent, GamePhase, GameState, Hazard, ImpactCause, Player,
};
pub use tick::{TickInput, tick};
