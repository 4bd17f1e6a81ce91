//! Top-level driver
//!
//! Owns the simulation and everything at its edges: the input mailbox, the
//! high-score store and the audio sink. Platform code feeds it raw events
//! and wall-clock deltas; it runs fixed ticks, reacts to the events each
//! tick produces, and hands renderers a read-only frame.

use crate::audio::{AudioSink, NullAudio, cue_for};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::input::InputNormalizer;
use crate::persistence::KeyValueStore;
use crate::renderer::{Frame, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, autopilot, tick};

pub struct Game<S: KeyValueStore> {
    state: GameState,
    input: InputNormalizer,
    high_score: HighScore<S>,
    audio: Box<dyn AudioSink>,
    accumulator: f32,
    autopilot: bool,
    muted: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// New game on the splash screen. The stored best score is read once here.
    pub fn new(settings: &Settings, seed: u64, store: S) -> Self {
        let mut state = GameState::new(settings, seed);
        let high_score = HighScore::load(store, &state.settings.high_score_key);
        state.high_score = high_score.best();
        let input = InputNormalizer::new(&state.settings);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            input,
            high_score,
            audio: Box::new(NullAudio),
            accumulator: 0.0,
            autopilot: false,
            muted: false,
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Raw input mailbox; event handlers write here between ticks
    pub fn input_mut(&mut self) -> &mut InputNormalizer {
        &mut self.input
    }

    /// Let the demo autopilot fly (player input still toggles help)
    pub fn set_autopilot(&mut self, on: bool) {
        if on != self.autopilot {
            log::info!("Autopilot {}", if on { "engaged" } else { "off" });
        }
        self.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Flip the demo autopilot on or off
    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.autopilot);
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.audio.set_muted(self.muted);
        log::info!("Audio {}", if self.muted { "muted" } else { "on" });
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn store(&self) -> &S {
        self.high_score.store()
    }

    pub fn into_store(self) -> S {
        self.high_score.into_store()
    }

    /// Run exactly one fixed tick and return the events it produced
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut input = self.input.sample();
        if self.autopilot {
            input = TickInput {
                toggle_help: input.toggle_help,
                ..autopilot::steer(&self.state)
            };
        }
        tick(&mut self.state, &input);

        let events = self.state.drain_events();
        for event in &events {
            self.handle(event);
        }
        events
    }

    /// Advance by a wall-clock delta (seconds). Returns the ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&Frame::capture(&self.state));
    }

    fn handle(&mut self, event: &GameEvent) {
        if let Some(cue) = cue_for(event) {
            self.audio.play(cue);
        }
        match event {
            GameEvent::Started | GameEvent::Reset => self.input.calibrate(),
            GameEvent::GameOver { score, .. } => {
                self.high_score.record(*score);
                self.state.high_score = self.high_score.best();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::audio::SoundCue;
    use crate::persistence::MemoryStore;
    use crate::settings::{InputSource, Preset};
    use crate::sim::{GamePhase, Hazard};

    const KEY: &str = "rse:highScore";

    #[derive(Clone, Default)]
    struct Recorder {
        cues: Rc<RefCell<Vec<SoundCue>>>,
        muted: Rc<RefCell<bool>>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.cues.borrow_mut().push(cue);
        }

        fn set_muted(&mut self, muted: bool) {
            *self.muted.borrow_mut() = muted;
        }
    }

    fn handheld() -> Settings {
        Settings {
            initial_hazards: 0,
            initial_collectibles: 0,
            input_source: InputSource::Keyboard,
            ..Settings::from_preset(Preset::Handheld)
        }
    }

    /// Put a hazard on the craft and run until game over
    fn crash_with_score(game: &mut Game<MemoryStore>, score: u64) {
        game.state.score = score;
        let id = game.state.next_entity_id();
        let pos = game.state.player.pos;
        game.state.hazards.push(Hazard {
            id,
            pos,
            size: Vec2::splat(30.0),
            vel: Vec2::ZERO,
            variant: 0,
        });
        for _ in 0..=game.state.settings.explosion_ticks() {
            game.step();
        }
        assert_eq!(game.state.phase, GamePhase::GameOver);
    }

    fn start(game: &mut Game<MemoryStore>) {
        game.input_mut().confirm();
        game.step();
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_loads_stored_best() {
        let game = Game::new(&handheld(), 1, MemoryStore::with_entry(KEY, "500"));
        assert_eq!(game.high_score(), 500);
        assert_eq!(game.state().high_score, 500);
    }

    #[test]
    fn test_lower_score_keeps_persisted_best() {
        let mut game = Game::new(&handheld(), 1, MemoryStore::with_entry(KEY, "500"));
        start(&mut game);
        crash_with_score(&mut game, 300);
        assert_eq!(game.high_score(), 500);
        assert_eq!(game.store().get(KEY).unwrap().as_deref(), Some("500"));

        game.input_mut().confirm();
        game.step();
        crash_with_score(&mut game, 700);
        assert_eq!(game.high_score(), 700);
        assert_eq!(game.state().high_score, 700);
        assert_eq!(game.store().get(KEY).unwrap().as_deref(), Some("700"));
    }

    #[test]
    fn test_update_runs_fixed_ticks() {
        let mut game = Game::new(&handheld(), 2, MemoryStore::new());
        assert_eq!(game.update(SIM_DT * 0.5), 0);
        assert_eq!(game.update(SIM_DT * 0.5), 1);

        // Huge deltas are capped
        let mut capped = Game::new(&handheld(), 2, MemoryStore::new());
        let mut reference = Game::new(&handheld(), 2, MemoryStore::new());
        let ran = capped.update(5.0);
        assert_eq!(ran, reference.update(MAX_FRAME_DT));
        assert!(ran <= MAX_SUBSTEPS);

        let mut fresh = Game::new(&handheld(), 2, MemoryStore::new());
        assert_eq!(fresh.update(f32::NAN), 0);
        assert_eq!(fresh.update(-1.0), 0);
    }

    #[test]
    fn test_actions_consumed_by_first_tick() {
        let mut game = Game::new(&handheld(), 3, MemoryStore::new());
        game.input_mut().toggle_help();
        game.update(SIM_DT * 3.0);
        // Toggled once, not three times
        assert!(game.state().help_visible);
    }

    #[test]
    fn test_start_waits_for_a_tick() {
        let mut game = Game::new(&handheld(), 4, MemoryStore::new());
        game.input_mut().key_down(" ", false);
        assert_eq!(game.state().phase, GamePhase::Splash);
        assert_eq!(game.update(SIM_DT), 1);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_audio_cues_follow_events() {
        let recorder = Recorder::default();
        let mut game = Game::new(&handheld(), 5, MemoryStore::new())
            .with_audio(Box::new(recorder.clone()));
        start(&mut game);
        crash_with_score(&mut game, 0);

        let cues = recorder.cues.borrow();
        assert_eq!(cues.first(), Some(&SoundCue::Music));
        assert_eq!(
            cues.iter().filter(|c| **c == SoundCue::Explosion).count(),
            1
        );
    }

    #[test]
    fn test_toggle_mute_reaches_sink() {
        let recorder = Recorder::default();
        let mut game = Game::new(&handheld(), 8, MemoryStore::new())
            .with_audio(Box::new(recorder.clone()));
        assert!(!game.muted());
        game.toggle_mute();
        assert!(game.muted());
        assert!(*recorder.muted.borrow());
        game.toggle_mute();
        assert!(!*recorder.muted.borrow());
    }

    #[test]
    fn test_toggle_autopilot_flies_from_splash() {
        let mut game = Game::new(&handheld(), 9, MemoryStore::new());
        game.toggle_autopilot();
        assert!(game.autopilot());
        game.step();
        assert_eq!(game.state().phase, GamePhase::Playing);

        game.toggle_autopilot();
        assert!(!game.autopilot());
    }

    #[test]
    fn test_start_calibrates_tilt() {
        let settings = Settings {
            input_source: InputSource::Tilt,
            ..handheld()
        };
        let mut game = Game::new(&settings, 6, MemoryStore::new());
        game.input_mut().tilt(12.0, -4.0);
        start(&mut game);
        assert_eq!(game.input.tilt_filter().neutral(), Vec2::new(12.0, -4.0));
    }

    #[test]
    fn test_autopilot_plays_sessions() {
        let mut game = Game::new(&Settings::from_preset(Preset::Handheld), 7, MemoryStore::new());
        game.set_autopilot(true);
        let mut game_overs = 0;
        let mut best = 0;
        for _ in 0..20_000 {
            for event in game.step() {
                if let GameEvent::GameOver { score, .. } = event {
                    game_overs += 1;
                    best = best.max(score);
                }
            }
            if game_overs == 2 {
                break;
            }
        }
        assert!(game.state().sessions >= 1);
        assert_eq!(game.high_score(), best);
    }
}
