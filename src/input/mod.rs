//! Input normalization
//!
//! Event handlers write raw device state here at any time (last write wins);
//! the driver calls [`InputNormalizer::sample`] exactly once per tick to get
//! a [`TickInput`] with a steering vector clamped to [-1, 1] per axis.
//!
//! One source is primary (keyboard, tilt or touch, per settings); the
//! keyboard is always overlaid on top of it. If the tilt sensor turns out to
//! be unavailable the normalizer falls back to keyboard only.

pub mod keys;
pub mod tilt;
pub mod touch;

pub use keys::{Key, KeyState};
pub use tilt::TiltFilter;
pub use touch::TouchDrag;

use glam::Vec2;

use crate::clamp_unit;
use crate::settings::{InputSource, Settings};
use crate::sim::TickInput;

/// Pending one-shot actions since the last sample
#[derive(Debug, Clone, Copy, Default)]
struct Actions {
    start: bool,
    restart: bool,
    toggle_help: bool,
}

#[derive(Debug, Clone)]
pub struct InputNormalizer {
    source: InputSource,
    tilt_unavailable: bool,
    keys: KeyState,
    tilt: TiltFilter,
    touch: TouchDrag,
    actions: Actions,
}

impl InputNormalizer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            source: settings.input_source,
            tilt_unavailable: false,
            keys: KeyState::default(),
            tilt: TiltFilter::new(settings),
            touch: TouchDrag::new(settings.touch_threshold_px),
            actions: Actions::default(),
        }
    }

    /// Primary source actually in use
    pub fn active_source(&self) -> InputSource {
        match self.source {
            InputSource::Tilt if self.tilt_unavailable => InputSource::Keyboard,
            source => source,
        }
    }

    /// Sensor API missing or permission denied
    pub fn mark_tilt_unavailable(&mut self) {
        if !self.tilt_unavailable {
            if self.source == InputSource::Tilt {
                log::warn!("Tilt input unavailable, falling back to keyboard");
            }
            self.tilt_unavailable = true;
        }
    }

    // === Keyboard ===

    /// Key press by DOM key name. Auto-repeat presses don't fire actions.
    pub fn key_down(&mut self, code: &str, repeat: bool) {
        let Some(key) = Key::from_code(code) else {
            return;
        };
        self.keys.set(key, true);
        if repeat {
            return;
        }
        match key {
            Key::Space | Key::Enter => self.confirm(),
            Key::Restart => self.actions.restart = true,
            Key::Help => self.actions.toggle_help = true,
            _ => {}
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.keys.set(key, false);
        }
    }

    /// Release everything (window lost focus)
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.touch.end();
    }

    // === Pointer ===

    /// Click or tap: starts from the splash, restarts after game over
    pub fn confirm(&mut self) {
        self.actions.start = true;
        self.actions.restart = true;
    }

    pub fn toggle_help(&mut self) {
        self.actions.toggle_help = true;
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch.start(x, y);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.touch.move_to(x, y);
    }

    pub fn touch_end(&mut self) {
        self.touch.end();
    }

    // === Tilt ===

    /// Orientation reading in degrees
    pub fn tilt(&mut self, gamma: f32, beta: f32) {
        self.tilt.record(gamma, beta);
    }

    /// Capture the current tilt as neutral (session start, orientation change)
    pub fn calibrate(&mut self) {
        self.tilt.calibrate();
    }

    pub fn tilt_filter(&self) -> &TiltFilter {
        &self.tilt
    }

    /// Build this tick's input and clear one-shot actions
    pub fn sample(&mut self) -> TickInput {
        let primary = match self.active_source() {
            InputSource::Keyboard => Vec2::ZERO,
            InputSource::Tilt => self.tilt.step(),
            InputSource::Touch => self.touch.take_impulse(),
        };
        let combined = primary + self.keys.steering();
        let steering = Vec2::new(clamp_unit(combined.x), clamp_unit(combined.y));

        // An upward swipe is the touch equivalent of the thrust key
        let touch_thrust = self.active_source() == InputSource::Touch && primary.y < 0.0;

        let actions = std::mem::take(&mut self.actions);
        TickInput {
            steering,
            thrust: self.keys.thrust() || touch_thrust,
            start: actions.start,
            restart: actions.restart,
            toggle_help: actions.toggle_help,
        }
    }
}
