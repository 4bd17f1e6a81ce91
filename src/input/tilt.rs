//! Device tilt filter
//!
//! Raw orientation angles (gamma = left/right, beta = front/back, degrees)
//! are offset by a calibrated neutral pose, clamped to `±max_tilt`,
//! normalized, smoothed toward the target each tick, then dead-zoned.

use glam::Vec2;

use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct TiltFilter {
    max_tilt: f32,
    smoothing: f32,
    deadzone: f32,
    /// Zero reference in degrees
    neutral: Vec2,
    /// Latest reading (last write wins)
    raw: Option<Vec2>,
    /// Calibration requested before any reading arrived
    calibrate_on_next: bool,
    smoothed: Vec2,
}

impl TiltFilter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            max_tilt: settings.max_tilt_deg.max(1.0),
            smoothing: settings.tilt_smoothing.clamp(0.01, 1.0),
            deadzone: settings.tilt_deadzone.max(0.0),
            neutral: Vec2::ZERO,
            raw: None,
            calibrate_on_next: false,
            smoothed: Vec2::ZERO,
        }
    }

    /// Store a sensor reading; non-finite angles are dropped
    pub fn record(&mut self, gamma: f32, beta: f32) {
        if !gamma.is_finite() || !beta.is_finite() {
            return;
        }
        let reading = Vec2::new(gamma, beta);
        if self.calibrate_on_next {
            self.neutral = reading;
            self.calibrate_on_next = false;
        }
        self.raw = Some(reading);
    }

    /// Use the current pose as neutral. Without a reading yet, the next one
    /// becomes neutral.
    pub fn calibrate(&mut self) {
        match self.raw {
            Some(raw) => self.neutral = raw,
            None => self.calibrate_on_next = true,
        }
        self.smoothed = Vec2::ZERO;
    }

    pub fn neutral(&self) -> Vec2 {
        self.neutral
    }

    /// Normalized target before smoothing
    fn target(&self) -> Vec2 {
        match self.raw {
            Some(raw) => {
                let offset = (raw - self.neutral).clamp(Vec2::splat(-self.max_tilt), Vec2::splat(self.max_tilt));
                offset / self.max_tilt
            }
            None => Vec2::ZERO,
        }
    }

    /// Advance smoothing one tick and return the dead-zoned steering
    pub fn step(&mut self) -> Vec2 {
        let target = self.target();
        self.smoothed += (target - self.smoothed) * self.smoothing;
        let dz = |v: f32| if v.abs() < self.deadzone { 0.0 } else { v };
        Vec2::new(dz(self.smoothed.x), dz(self.smoothed.y))
    }
}
