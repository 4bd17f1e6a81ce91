//! Fixed timestep simulation tick
//!
//! One call advances the session by one step:
//! Splash → Playing → Exploding → GameOver → (reset) → Playing.

use glam::Vec2;

use super::collision::detect;
use super::physics::{drift_hazards, integrate_player};
use super::state::{GameEvent, GamePhase, GameState, ImpactCause};
use crate::settings::{HazardMotion, SpawnCadence};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Steering vector, each axis in [-1, 1]
    pub steering: Vec2,
    /// Thrust held
    pub thrust: bool,
    /// Leave the splash screen
    pub start: bool,
    /// Start over after game over
    pub restart: bool,
    /// Show/hide the help overlay
    pub toggle_help: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.toggle_help {
        state.help_visible = !state.help_visible;
        state.events.push(GameEvent::HelpToggled {
            visible: state.help_visible,
        });
    }

    match state.phase {
        GamePhase::Splash => {
            if input.start {
                state.phase = GamePhase::Playing;
                state.sessions += 1;
                state.events.push(GameEvent::Started);
                log::info!("Session {} started (seed {})", state.sessions, state.seed);
            }
        }

        GamePhase::Playing => step_playing(state, input),

        GamePhase::Exploding => step_exploding(state),

        GamePhase::GameOver => {
            if input.restart {
                state.reset();
                state.sessions += 1;
                state.events.push(GameEvent::Reset);
                log::info!("Session {} started after reset", state.sessions);
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // --- Player ---
    let outcome = integrate_player(&mut state.player, input, &state.settings);
    if let Some(facing) = outcome.turned {
        state.events.push(GameEvent::Swoosh { facing });
    }
    if outcome.bounced {
        state.events.push(GameEvent::Bounced);
    }

    // --- World ---
    if let HazardMotion::Scrolling { .. } = state.settings.hazard_motion {
        advance_scrolling_hazards(state);
    }

    if outcome.hit_wall {
        begin_explosion(state, ImpactCause::Wall);
        return;
    }

    // --- Collisions ---
    let contacts = detect(&state.player.rect(), &state.hazards, &state.collectibles);
    if contacts.is_empty() {
        return;
    }

    if !contacts.collected.is_empty() {
        state
            .collectibles
            .retain(|c| !contacts.collected.contains(&c.id));
        for id in contacts.collected {
            state.score = state.score.saturating_add(state.settings.reward);
            state.spawn_collectible();
            state.events.push(GameEvent::Collected {
                id,
                score: state.score,
            });
        }
    }

    if let Some(id) = contacts.hazard {
        begin_explosion(state, ImpactCause::Hazard { id });
    }
}

/// Move scrolling hazards, recycle the ones that left, and add new ones by cadence
fn advance_scrolling_hazards(state: &mut GameState) {
    drift_hazards(&mut state.hazards);

    let field = state.settings.playfield;
    let before = state.hazards.len();
    state.hazards.retain(|h| !h.has_exited(field));
    for _ in state.hazards.len()..before {
        state.spawn_hazard();
    }

    if state.hazards.len() < state.settings.max_hazards {
        let due = match state.settings.spawn_cadence {
            SpawnCadence::Interval { ticks } => state.time_ticks % u64::from(ticks.max(1)) == 0,
            SpawnCadence::Chance { per_tick } => state.spawner.roll(per_tick),
        };
        if due {
            state.spawn_hazard();
        }
    }
}

/// Enter Exploding. No-op unless currently Playing, so overlapping impacts
/// in the same or later ticks never schedule a second game over.
fn begin_explosion(state: &mut GameState, cause: ImpactCause) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Exploding;
    state.explosion_ticks = 0;
    state.game_over_in = Some(state.settings.explosion_ticks());
    state.player.vel = Vec2::ZERO;
    state.events.push(GameEvent::Impact { cause });
    log::info!("Impact ({:?}) at score {}", cause, state.score);
}

fn step_exploding(state: &mut GameState) {
    state.explosion_ticks += 1;
    let remaining = state.game_over_in.unwrap_or(0).saturating_sub(1);
    if remaining > 0 {
        state.game_over_in = Some(remaining);
        return;
    }

    state.game_over_in = None;
    state.phase = GamePhase::GameOver;
    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
    }
    state.events.push(GameEvent::GameOver {
        score: state.score,
        new_high_score,
    });
    log::info!(
        "Game over: score {} (best {})",
        state.score,
        state.high_score
    );
}
