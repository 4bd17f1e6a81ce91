//! Render boundary
//!
//! Renderers get a read-only [`Frame`] once per displayed frame, after the
//! driver has run its ticks, and never feed anything back into the sim.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::sim::{Collectible, GamePhase, GameState, Hazard, Player};

/// Borrowed view of everything a renderer may draw
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub playfield: Vec2,
    pub phase: GamePhase,
    pub player: &'a Player,
    pub hazards: &'a [Hazard],
    pub collectibles: &'a [Collectible],
    pub score: u64,
    pub high_score: u64,
    pub explosion_ticks: u32,
    pub help_visible: bool,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            playfield: state.settings.playfield,
            phase: state.phase,
            player: &state.player,
            hazards: &state.hazards,
            collectibles: &state.collectibles,
            score: state.score,
            high_score: state.high_score,
            explosion_ticks: state.explosion_ticks,
            help_visible: state.help_visible,
        }
    }

    /// Explosion to draw in place of the craft, if any
    pub fn explosion(&self) -> Option<ExplosionVisual> {
        match self.phase {
            GamePhase::Exploding => Some(explosion_visual(
                self.player.rect().center(),
                self.explosion_ticks,
            )),
            _ => None,
        }
    }
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Expanding, fading fireball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionVisual {
    pub center: Vec2,
    pub radius: f32,
    /// Green channel; red is always 255 and blue 0
    pub green: u8,
    pub alpha: f32,
}

impl ExplosionVisual {
    /// CSS color string
    pub fn css_color(&self) -> String {
        format!("rgba(255, {}, 0, {:.2})", self.green, self.alpha)
    }
}

pub fn explosion_visual(center: Vec2, ticks: u32) -> ExplosionVisual {
    let t = ticks as f32;
    ExplosionVisual {
        center,
        radius: 20.0 + t * 10.0,
        green: (100.0 + t * 30.0).min(255.0) as u8,
        alpha: (1.0 - t * 0.2).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_explosion_grows_and_fades() {
        let first = explosion_visual(Vec2::ZERO, 0);
        assert_eq!(first.radius, 20.0);
        assert_eq!(first.green, 100);
        assert_eq!(first.alpha, 1.0);

        let later = explosion_visual(Vec2::ZERO, 3);
        assert_eq!(later.radius, 50.0);
        assert_eq!(later.green, 190);
        assert!((later.alpha - 0.4).abs() < 1e-6);

        let gone = explosion_visual(Vec2::ZERO, 30);
        assert_eq!(gone.green, 255);
        assert_eq!(gone.alpha, 0.0);
    }

    #[test]
    fn test_frame_reflects_state() {
        let mut state = GameState::new(&Settings::default(), 4);
        state.score = 300;
        state.high_score = 900;
        let frame = Frame::capture(&state);
        assert_eq!(frame.phase, GamePhase::Splash);
        assert_eq!(frame.score, 300);
        assert_eq!(frame.high_score, 900);
        assert_eq!(frame.collectibles.len(), state.collectibles.len());
        assert!(frame.explosion().is_none());

        state.phase = GamePhase::Exploding;
        let frame = Frame::capture(&state);
        let boom = frame.explosion().unwrap();
        assert_eq!(boom.center, state.player.rect().center());
    }

    #[test]
    fn test_css_color() {
        let v = explosion_visual(Vec2::ZERO, 1);
        assert_eq!(v.css_color(), "rgba(255, 130, 0, 0.80)");
    }
}
