use space_escape::Game;
use space_escape::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use space_escape::settings::{Preset, Settings};
use space_escape::sim::{GameEvent, GamePhase, ImpactCause};

const KEY: &str = "rse:highScore";

/// Carrot as big as the field: the craft collects every tick while it falls
/// into the floor, so every session ends with a positive score.
fn falling_settings(reward: u64) -> Settings {
    let mut settings = Settings::from_preset(Preset::Handheld);
    settings.initial_hazards = 0;
    settings.initial_collectibles = 1;
    settings.collectible_size = settings.playfield;
    settings.reward = reward;
    settings
}

/// Confirm, then tick until the session ends. Returns the final score.
fn play_session<S: KeyValueStore>(game: &mut Game<S>) -> u64 {
    game.input_mut().confirm();
    for _ in 0..10_000 {
        for event in game.step() {
            if let GameEvent::GameOver { score, .. } = event {
                return score;
            }
        }
    }
    panic!("session never ended");
}

#[test]
fn test_falling_craft_hits_floor() {
    let mut game = Game::new(&falling_settings(100), 1, MemoryStore::new());
    game.input_mut().confirm();

    let mut impact = None;
    for _ in 0..10_000 {
        for event in game.step() {
            if let GameEvent::Impact { cause } = event {
                impact = Some(cause);
            }
        }
        if game.state().phase == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(impact, Some(ImpactCause::Wall));
    assert!(game.state().score > 0);
    assert_eq!(game.state().score % 100, 0);
}

#[test]
fn test_high_score_is_max_of_all_sessions() {
    let mut store = MemoryStore::with_entry(KEY, "250");
    let mut scores = Vec::new();

    for (i, reward) in [3, 40, 7].into_iter().enumerate() {
        let mut game = Game::new(&falling_settings(reward), i as u64, store);
        scores.push(play_session(&mut game));
        store = game.into_store();
    }

    let expected = scores.iter().copied().fold(250, u64::max);
    assert_eq!(store.get(KEY).unwrap(), Some(expected.to_string()));
}

#[test]
fn test_sessions_within_one_game() {
    let mut game = Game::new(&falling_settings(10), 9, MemoryStore::new());
    let mut best = 0;
    for _ in 0..3 {
        best = best.max(play_session(&mut game));
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.high_score(), best);
    }
    assert_eq!(game.state().sessions, 3);
    assert_eq!(game.store().get(KEY).unwrap(), Some(best.to_string()));
}

#[test]
fn test_best_survives_reopen() {
    let path = std::env::temp_dir().join(format!("space-escape-it-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let store = JsonFileStore::open(&path).unwrap();
    let mut game = Game::new(&falling_settings(100), 3, store);
    let score = play_session(&mut game);
    drop(game);

    let reopened = Game::new(&Settings::default(), 4, JsonFileStore::open(&path).unwrap());
    assert_eq!(reopened.high_score(), score);
    assert_eq!(reopened.state().high_score, score);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_same_seed_same_run() {
    let settings = Settings::from_preset(Preset::Handheld);
    let mut a = Game::new(&settings, 2024, MemoryStore::new());
    let mut b = Game::new(&settings, 2024, MemoryStore::new());
    a.set_autopilot(true);
    b.set_autopilot(true);

    for _ in 0..3_000 {
        assert_eq!(a.step(), b.step());
    }
    assert_eq!(a.state().player, b.state().player);
    assert_eq!(a.state().score, b.state().score);
}

#[test]
fn test_reset_restores_initial_layout_size() {
    let settings = Settings::from_preset(Preset::Handheld);
    let mut game = Game::new(&falling_settings(1), 5, MemoryStore::new());
    play_session(&mut game);

    game.input_mut().confirm();
    let events = game.step();
    assert!(events.contains(&GameEvent::Reset));
    let state = game.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.player.pos, settings.player_spawn);
    assert_eq!(state.collectibles.len(), 1);
    assert!(state.hazards.is_empty());
}
