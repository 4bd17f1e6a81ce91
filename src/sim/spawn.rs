//! Entity factory
//!
//! Builds hazards and collectibles from settings and a seeded RNG. It decides
//! *what* and *where*; *when* is the tick's business (cadence lives there).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::{Rect, placement_range};
use super::state::{Collectible, Hazard};
use crate::settings::{HazardMotion, Settings, Side, ValueRange};

/// Placement retries before accepting a spot inside the keep-out zone
pub const KEEP_OUT_ATTEMPTS: usize = 8;

/// Number of cosmetic sprite variants
const VARIANTS: u8 = 4;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform draw from a range (degenerate ranges return `min`)
    fn sample(&mut self, range: ValueRange) -> f32 {
        let range = range.ordered();
        if range.max > range.min {
            self.rng.random_range(range.min..=range.max)
        } else {
            range.min
        }
    }

    /// Uniform draw in [0, max]
    fn along(&mut self, max: f32) -> f32 {
        self.sample(ValueRange::new(0.0, max))
    }

    /// Random top-left inside `field` for a rectangle of `size`
    fn place_inside(&mut self, field: Vec2, size: Vec2) -> Vec2 {
        let range = placement_range(field, size);
        Vec2::new(self.along(range.x), self.along(range.y))
    }

    /// Random top-left avoiding `keep_out` when possible
    fn place_avoiding(&mut self, field: Vec2, size: Vec2, keep_out: Option<&Rect>) -> Vec2 {
        let mut pos = self.place_inside(field, size);
        if let Some(zone) = keep_out {
            for _ in 1..KEEP_OUT_ATTEMPTS {
                if !Rect::new(pos, size).overlaps(zone) {
                    break;
                }
                pos = self.place_inside(field, size);
            }
        }
        pos
    }

    /// Per-tick probability draw
    pub fn roll(&mut self, probability: f32) -> bool {
        self.rng.random::<f32>() < probability
    }

    /// New hazard. Size is drawn per axis and clamped to the playfield.
    /// Static hazards land fully inside the field; scrolling ones start
    /// fully outside on their entry side with an inward drift.
    pub fn spawn_hazard(&mut self, settings: &Settings, id: u32, keep_out: Option<&Rect>) -> Hazard {
        let field = settings.playfield;
        let size = Vec2::new(
            self.sample(settings.hazard_width),
            self.sample(settings.hazard_height),
        )
        .clamp(Vec2::ONE.min(field), field);

        let (pos, vel) = match settings.hazard_motion {
            HazardMotion::Static => (self.place_avoiding(field, size, keep_out), Vec2::ZERO),
            HazardMotion::Scrolling { from } => {
                let range = placement_range(field, size);
                let pos = match from {
                    Side::Left => Vec2::new(-size.x, self.along(range.y)),
                    Side::Right => Vec2::new(field.x, self.along(range.y)),
                    Side::Top => Vec2::new(self.along(range.x), -size.y),
                    Side::Bottom => Vec2::new(self.along(range.x), field.y),
                };
                let speed = self.sample(settings.hazard_speed).max(0.1);
                (pos, from.inward() * speed)
            }
        };

        let variant = self.rng.random_range(0..VARIANTS);
        log::debug!("Spawn hazard {} at {:?} size {:?}", id, pos, size);
        Hazard {
            id,
            pos,
            size,
            vel,
            variant,
        }
    }

    /// New collectible fully inside the playfield
    pub fn spawn_collectible(
        &mut self,
        settings: &Settings,
        id: u32,
        keep_out: Option<&Rect>,
    ) -> Collectible {
        let field = settings.playfield;
        let size = settings.collectible_size.min(field);
        let pos = self.place_avoiding(field, size, keep_out);
        let variant = self.rng.random_range(0..VARIANTS);
        Collectible {
            id,
            pos,
            size,
            variant,
        }
    }
}
