//! Demo autopilot
//!
//! Reads a [`GameState`] and produces the [`TickInput`] a cautious player
//! would: chase the nearest carrot, keep clear of the edges, and veer away
//! from hazards in the flight path. Used by the headless runner and the
//! attract mode; never by the simulation itself.

use glam::Vec2;

use super::rect::Rect;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::clamp_unit;

/// Ticks of straight-line motion used to predict where the craft is heading
const LOOKAHEAD_TICKS: f32 = 12.0;
/// Distance from an edge that counts as danger (px)
const EDGE_MARGIN: f32 = 24.0;
/// Top speed the autopilot aims for (px/tick)
const CRUISE_SPEED: f32 = 2.0;
/// Desired speed per pixel of distance to the target
const APPROACH_GAIN: f32 = 0.05;
/// Steering per unit of velocity error
const STEER_GAIN: f32 = 2.0;

/// Input for the next tick
pub fn steer(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Splash => TickInput {
            start: true,
            ..Default::default()
        },
        GamePhase::GameOver => TickInput {
            restart: true,
            ..Default::default()
        },
        GamePhase::Exploding => TickInput::default(),
        GamePhase::Playing => fly(state),
    }
}

fn fly(state: &GameState) -> TickInput {
    let player = &state.player;
    let here = player.rect().center();
    let max = (state.settings.playfield - player.size).max(Vec2::ZERO);

    // Chase the nearest carrot, otherwise hover mid-field
    let target = state
        .collectibles
        .iter()
        .map(|c| c.rect().center())
        .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)))
        .unwrap_or(state.settings.playfield * 0.5);

    let desired = ((target - here) * APPROACH_GAIN)
        .clamp(Vec2::splat(-CRUISE_SPEED), Vec2::splat(CRUISE_SPEED));
    let mut steering = (desired - player.vel) * STEER_GAIN;
    let mut climb = player.vel.y > desired.y;

    // Hazards in the flight path
    let ahead = Rect::new(player.pos + player.vel * LOOKAHEAD_TICKS, player.size)
        .inflate(player.size * 0.5);
    if let Some(hazard) = state.hazards.iter().find(|h| h.rect().overlaps(&ahead)) {
        let away = here - hazard.rect().center();
        steering.x = if away.x >= 0.0 { 1.0 } else { -1.0 };
        climb = away.y < 0.0;
    }

    // Edges win over everything else
    let predicted = player.pos + player.vel * LOOKAHEAD_TICKS;
    if predicted.x < EDGE_MARGIN {
        steering.x = 1.0;
    } else if predicted.x > max.x - EDGE_MARGIN {
        steering.x = -1.0;
    }
    if predicted.y > max.y - EDGE_MARGIN {
        climb = true;
        steering.y = -1.0;
    } else if predicted.y < EDGE_MARGIN {
        climb = false;
        steering.y = 1.0;
    }

    TickInput {
        steering: Vec2::new(clamp_unit(steering.x), clamp_unit(steering.y)),
        thrust: climb,
        ..Default::default()
    }
}
