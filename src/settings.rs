//! Game settings and balance
//!
//! Every gameplay constant lives here so a session can be reproduced from a
//! seed plus a settings blob. Persisted as JSON (file on native, LocalStorage
//! on the web).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ms_to_ticks;

/// Device presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Large landscape canvas, keyboard steering
    #[default]
    Desktop,
    /// Small portrait screen, tilt steering
    Handheld,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Desktop => "Desktop",
            Preset::Handheld => "Handheld",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "pc" => Some(Preset::Desktop),
            "handheld" | "mobile" | "r1" => Some(Preset::Handheld),
            _ => None,
        }
    }
}

/// What happens when the craft reaches a playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum BoundaryPolicy {
    /// Walls are lethal: touching an edge starts the explosion
    #[default]
    Terminal,
    /// Clamp to the edge and bounce back, losing energy
    Elastic,
}

/// Edge of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Unit direction a hazard entering from this side travels in
    pub fn inward(&self) -> Vec2 {
        match self {
            Side::Left => Vec2::X,
            Side::Right => Vec2::NEG_X,
            Side::Top => Vec2::Y,
            Side::Bottom => Vec2::NEG_Y,
        }
    }
}

/// How hazards move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum HazardMotion {
    /// Placed at random inside the playfield and never move
    #[default]
    Static,
    /// Enter from `from`, drift across, and are recycled once past the far edge
    Scrolling { from: Side },
}

/// When the tick asks the spawner for an extra scrolling hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnCadence {
    /// Every `ticks` simulation ticks
    Interval { ticks: u32 },
    /// Independent draw each tick
    Chance { per_tick: f32 },
}

impl Default for SpawnCadence {
    fn default() -> Self {
        SpawnCadence::Interval { ticks: 90 }
    }
}

/// Which raw source drives the steering vector (keyboard always overlays)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputSource {
    #[default]
    Keyboard,
    Tilt,
    Touch,
}

/// Inclusive range used for randomized sizes and speeds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Same range with `min <= max` guaranteed
    pub fn ordered(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self::new(self.max, self.min)
        }
    }
}

/// Game settings/balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: Preset,

    // === Playfield ===
    pub playfield: Vec2,

    // === Craft ===
    pub player_size: Vec2,
    /// Top-left corner at spawn / reset
    pub player_spawn: Vec2,
    /// Constant downward acceleration (px/tick²)
    pub gravity: f32,
    /// Held-thrust acceleration, negative is up (px/tick²)
    pub thrust: f32,
    /// Horizontal acceleration per unit of steering (px/tick²)
    pub sensitivity: f32,
    /// Vertical acceleration per unit of steering (0 disables vertical steering)
    pub vertical_sensitivity: f32,
    /// Per-tick velocity multiplier, in (0, 1)
    pub damping: f32,
    pub boundary: BoundaryPolicy,
    /// Fraction of speed kept on an elastic bounce
    pub restitution: f32,
    /// Horizontal speed that counts as a facing change
    pub direction_threshold: f32,

    // === Hazards ===
    pub hazard_motion: HazardMotion,
    pub hazard_width: ValueRange,
    pub hazard_height: ValueRange,
    /// Drift speed for scrolling hazards (px/tick)
    pub hazard_speed: ValueRange,
    pub initial_hazards: usize,
    pub max_hazards: usize,
    pub spawn_cadence: SpawnCadence,

    // === Collectibles ===
    pub collectible_size: Vec2,
    pub initial_collectibles: usize,
    pub reward: u64,

    // === Session ===
    pub explosion_delay_ms: u32,
    pub high_score_key: String,

    // === Input ===
    pub input_source: InputSource,
    /// Tilt (degrees) that maps to full steering
    pub max_tilt_deg: f32,
    /// Exponential smoothing factor per tick, in (0, 1]
    pub tilt_smoothing: f32,
    /// Normalized steering below this snaps to zero
    pub tilt_deadzone: f32,
    /// Drag distance (px) before a touch move becomes an impulse
    pub touch_threshold_px: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: Preset::Desktop,

            playfield: Vec2::new(1024.0, 768.0),

            player_size: Vec2::new(30.0, 30.0),
            player_spawn: Vec2::new(1024.0 / 2.0 - 15.0, 768.0 / 2.0),
            gravity: 0.15,
            thrust: -0.5,
            sensitivity: 0.3,
            vertical_sensitivity: 0.0,
            damping: 0.98,
            boundary: BoundaryPolicy::Terminal,
            restitution: 0.5,
            direction_threshold: 0.1,

            hazard_motion: HazardMotion::Static,
            hazard_width: ValueRange::new(30.0, 80.0),
            hazard_height: ValueRange::new(30.0, 80.0),
            hazard_speed: ValueRange::new(1.0, 3.0),
            initial_hazards: 3,
            max_hazards: 6,
            spawn_cadence: SpawnCadence::default(),

            collectible_size: Vec2::new(20.0, 20.0),
            initial_collectibles: 5,
            reward: 100,

            explosion_delay_ms: 500,
            high_score_key: "rse:highScore".to_string(),

            input_source: InputSource::Keyboard,
            max_tilt_deg: 30.0,
            tilt_smoothing: 0.2,
            tilt_deadzone: 0.05,
            touch_threshold_px: 10.0,
        }
    }
}

impl Settings {
    /// Create settings from a device preset
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a device preset (updates geometry and input-dependent values)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;

        match preset {
            Preset::Desktop => {
                let d = Self::default();
                self.playfield = d.playfield;
                self.player_size = d.player_size;
                self.player_spawn = d.player_spawn;
                self.hazard_width = d.hazard_width;
                self.hazard_height = d.hazard_height;
                self.collectible_size = d.collectible_size;
                self.gravity = d.gravity;
                self.thrust = d.thrust;
                self.sensitivity = d.sensitivity;
                self.vertical_sensitivity = d.vertical_sensitivity;
                self.input_source = InputSource::Keyboard;
            }
            Preset::Handheld => {
                self.playfield = Vec2::new(240.0, 282.0);
                self.player_size = Vec2::new(20.0, 20.0);
                self.player_spawn = Vec2::new(110.0, 131.0);
                self.hazard_width = ValueRange::new(15.0, 40.0);
                self.hazard_height = ValueRange::new(15.0, 40.0);
                self.collectible_size = Vec2::new(15.0, 15.0);
                // Smaller screen, gentler forces
                self.gravity = 0.08;
                self.thrust = -0.3;
                self.sensitivity = 0.2;
                self.vertical_sensitivity = 0.2;
                self.input_source = InputSource::Tilt;
            }
        }
    }

    /// Ticks between impact and game over
    pub fn explosion_ticks(&self) -> u32 {
        ms_to_ticks(self.explosion_delay_ms)
    }

    /// Copy with out-of-range values repaired
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.playfield = s.playfield.max(Vec2::ONE);
        s.player_size = s.player_size.max(Vec2::ONE).min(s.playfield);
        s.collectible_size = s.collectible_size.max(Vec2::ONE);
        s.player_spawn = s
            .player_spawn
            .clamp(Vec2::ZERO, s.playfield - s.player_size);
        s.hazard_width = s.hazard_width.ordered();
        s.hazard_height = s.hazard_height.ordered();
        s.hazard_speed = s.hazard_speed.ordered();
        s.damping = s.damping.clamp(0.01, 0.999);
        s.restitution = s.restitution.clamp(0.0, 0.99);
        s.tilt_smoothing = s.tilt_smoothing.clamp(0.01, 1.0);
        s.max_tilt_deg = s.max_tilt_deg.max(1.0);
        s.direction_threshold = s.direction_threshold.abs();
        s.reward = s.reward.max(1);
        s.max_hazards = s.max_hazards.max(s.initial_hazards);
        if let SpawnCadence::Interval { ticks } = &mut s.spawn_cadence {
            *ticks = (*ticks).max(1);
        }
        if let SpawnCadence::Chance { per_tick } = &mut s.spawn_cadence {
            *per_tick = per_tick.clamp(0.0, 1.0);
        }
        s
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "space_escape_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using handheld defaults");
        Self::from_preset(Preset::Handheld)
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(StoreError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
