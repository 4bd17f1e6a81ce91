//! Collision detection between the craft and world entities
//!
//! Pure queries only; the tick decides what a contact means.

use super::rect::Rect;
use super::state::{Collectible, Hazard};

/// Contacts found for one player position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Collectibles overlapping the craft, in iteration order
    pub collected: Vec<u32>,
    /// First hazard overlapping the craft
    pub hazard: Option<u32>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty() && self.hazard.is_none()
    }
}

/// Strict AABB overlap test
///
/// `a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y`
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Find every collectible and the first hazard touching `player`
pub fn detect(player: &Rect, hazards: &[Hazard], collectibles: &[Collectible]) -> Contacts {
    Contacts {
        collected: collectibles
            .iter()
            .filter(|c| aabb_overlap(player, &c.rect()))
            .map(|c| c.id)
            .collect(),
        hazard: hazards
            .iter()
            .find(|h| aabb_overlap(player, &h.rect()))
            .map(|h| h.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn hazard(id: u32, x: f32, y: f32, w: f32, h: f32) -> Hazard {
        Hazard {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel: Vec2::ZERO,
            variant: 0,
        }
    }

    fn carrot(id: u32, x: f32, y: f32) -> Collectible {
        Collectible {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(15.0, 15.0),
            variant: 0,
        }
    }

    #[test]
    fn test_detect_hazard() {
        let player = Rect::new(Vec2::new(110.0, 131.0), Vec2::new(20.0, 20.0));
        let hazards = [hazard(1, 0.0, 0.0, 10.0, 10.0), hazard(2, 100.0, 120.0, 30.0, 30.0)];
        let contacts = detect(&player, &hazards, &[]);
        assert_eq!(contacts.hazard, Some(2));
        assert!(contacts.collected.is_empty());
    }

    #[test]
    fn test_detect_all_overlapping_collectibles() {
        let player = Rect::new(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0));
        let carrots = [carrot(1, 50.0, 50.0), carrot(2, 200.0, 200.0), carrot(3, 60.0, 60.0)];
        let contacts = detect(&player, &[], &carrots);
        assert_eq!(contacts.collected, vec![1, 3]);
        assert_eq!(contacts.hazard, None);
    }

    #[test]
    fn test_edge_contact_is_not_collision() {
        let player = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0));
        let contacts = detect(&player, &[hazard(1, 20.0, 0.0, 5.0, 5.0)], &[carrot(2, 0.0, 20.0)]);
        assert!(contacts.is_empty());
    }
}
