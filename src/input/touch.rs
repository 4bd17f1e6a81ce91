//! Touch drag to steering impulses
//!
//! A finger drag only counts once it has moved past a pixel threshold from
//! its anchor; each such step adds one unit impulse in the drag direction and
//! re-anchors at the current point.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct TouchDrag {
    threshold: f32,
    anchor: Option<Vec2>,
    pending: Vec2,
}

impl TouchDrag {
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold: threshold_px.max(0.0),
            anchor: None,
            pending: Vec2::ZERO,
        }
    }

    pub fn start(&mut self, x: f32, y: f32) {
        self.anchor = Some(Vec2::new(x, y));
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        let Some(anchor) = self.anchor else {
            self.anchor = Some(point);
            return;
        };
        let delta = point - anchor;
        if delta.length() > self.threshold {
            self.pending += delta.normalize_or_zero();
            self.anchor = Some(point);
        }
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }

    /// Consume the accumulated impulse (clamped per axis)
    pub fn take_impulse(&mut self) -> Vec2 {
        let impulse = self.pending.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.pending = Vec2::ZERO;
        impulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_drag_is_ignored() {
        let mut t = TouchDrag::new(10.0);
        t.start(100.0, 100.0);
        t.move_to(105.0, 104.0);
        assert_eq!(t.take_impulse(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_past_threshold_gives_unit_impulse() {
        let mut t = TouchDrag::new(10.0);
        t.start(100.0, 100.0);
        t.move_to(130.0, 100.0);
        assert_eq!(t.take_impulse(), Vec2::new(1.0, 0.0));
        // consumed
        assert_eq!(t.take_impulse(), Vec2::ZERO);
    }

    #[test]
    fn test_reanchors_after_impulse() {
        let mut t = TouchDrag::new(10.0);
        t.start(0.0, 0.0);
        t.move_to(0.0, -20.0);
        t.move_to(0.0, -25.0); // only 5px from new anchor
        assert_eq!(t.take_impulse(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_move_without_start_anchors() {
        let mut t = TouchDrag::new(10.0);
        t.move_to(50.0, 50.0);
        assert_eq!(t.take_impulse(), Vec2::ZERO);
        // Anchored at the first move, so the next long drag registers
        t.move_to(50.0, 80.0);
        assert_eq!(t.take_impulse(), Vec2::new(0.0, 1.0));
        t.end();
        t.move_to(50.0, 200.0);
        assert_eq!(t.take_impulse(), Vec2::ZERO);
    }
}
