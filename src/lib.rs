//! Space Escape - a gravity-and-thrust arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, session phases)
//! - `input`: Keyboard / tilt / touch normalization into one steering vector
//! - `game`: Fixed-step driver that owns the simulation and its boundaries
//! - `persistence`: Key-value storage boundary (memory, JSON file, LocalStorage)
//! - `highscores`: Best-score tracking on top of the storage boundary
//! - `renderer`: Read-only render boundary (Canvas 2D on the web)
//! - `audio`: Fire-and-forget sound cues
//! - `settings`: Data-driven game balance and presets

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::StoreError;
pub use game::Game;
pub use highscores::HighScore;
pub use settings::{BoundaryPolicy, HazardMotion, InputSource, Preset, Settings, SpawnCadence};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Clamp a value into the unit range [-1, 1]
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}

/// Convert a duration in milliseconds to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    ((ms as f32 / 1000.0) / consts::SIM_DT).round().max(1.0) as u32
}
