//! Space Escape entry point
//!
//! Native: headless runner that lets the autopilot fly whole sessions and
//! prints a JSON summary. Web: wires DOM events into the driver and runs the
//! requestAnimationFrame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use space_escape::Game;
    use space_escape::audio::WebAudio;
    use space_escape::consts::SIM_DT;
    use space_escape::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
    use space_escape::renderer::CanvasRenderer;
    use space_escape::settings::Settings;

    type Shared = Rc<RefCell<App>>;

    /// Everything the frame loop needs
    struct App {
        game: Game<Box<dyn KeyValueStore>>,
        renderer: CanvasRenderer,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.game.update(dt);
            self.game.render(&mut self.renderer);
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("High score will not persist: {}", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Match the backing store to the displayed size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));
        (width.max(1), height.max(1))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Space Escape starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        fit_canvas(&canvas);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(&canvas).expect("Failed to create 2d renderer");
        let game = Game::new(&settings, seed, open_store()).with_audio(Box::new(WebAudio::new()));

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            last_time: 0.0,
        }));

        setup_keyboard(app.clone());
        setup_pointer(&canvas, app.clone());
        setup_tilt(app.clone());
        setup_resize(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Space Escape running!");
    }

    fn listen<F>(target: &web_sys::EventTarget, name: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Shared) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            listen(&window, "keydown", move |event: web_sys::Event| {
                let event: KeyboardEvent = event.unchecked_into();
                let key = event.key();
                // Keep arrows and space from scrolling the page
                if matches!(key.as_str(), " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight") {
                    event.prevent_default();
                }
                let mut a = app.borrow_mut();
                if !event.repeat() {
                    match key.as_str() {
                        "m" | "M" => a.game.toggle_mute(),
                        "p" | "P" => a.game.toggle_autopilot(),
                        _ => {}
                    }
                }
                a.game.input_mut().key_down(&key, event.repeat());
            });
        }

        {
            let app = app.clone();
            listen(&window, "keyup", move |event: web_sys::Event| {
                let event: KeyboardEvent = event.unchecked_into();
                app.borrow_mut().game.input_mut().key_up(&event.key());
            });
        }

        // Lost focus: drop held keys so the craft doesn't keep thrusting
        listen(&window, "blur", move |_event: web_sys::Event| {
            app.borrow_mut().game.input_mut().release_all();
        });
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: Shared) {
        {
            let app = app.clone();
            listen(canvas, "click", move |_event: web_sys::Event| {
                app.borrow_mut().game.input_mut().confirm();
            });
        }

        {
            let app = app.clone();
            listen(canvas, "touchstart", move |event: web_sys::Event| {
                event.prevent_default();
                let event: TouchEvent = event.unchecked_into();
                let mut a = app.borrow_mut();
                let input = a.game.input_mut();
                input.confirm();
                if let Some(touch) = event.touches().get(0) {
                    input.touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
        }

        {
            let app = app.clone();
            listen(canvas, "touchmove", move |event: web_sys::Event| {
                event.prevent_default();
                let event: TouchEvent = event.unchecked_into();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut()
                        .game
                        .input_mut()
                        .touch_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
        }

        listen(canvas, "touchend", move |_event: web_sys::Event| {
            app.borrow_mut().game.input_mut().touch_end();
        });
    }

    fn setup_tilt(app: Shared) {
        let window = web_sys::window().expect("no window");

        let supported = js_sys::Reflect::has(&window, &JsValue::from_str("DeviceOrientationEvent"))
            .unwrap_or(false);
        if !supported {
            app.borrow_mut().game.input_mut().mark_tilt_unavailable();
            return;
        }

        {
            let app = app.clone();
            listen(&window, "deviceorientation", move |event: web_sys::Event| {
                let event: DeviceOrientationEvent = event.unchecked_into();
                if let (Some(gamma), Some(beta)) = (event.gamma(), event.beta()) {
                    app.borrow_mut().game.input_mut().tilt(gamma as f32, beta as f32);
                }
            });
        }

        // New "flat" after rotating the device
        listen(&window, "orientationchange", move |_event: web_sys::Event| {
            app.borrow_mut().game.input_mut().calibrate();
        });
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Shared) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        listen(&window, "resize", move |_event: web_sys::Event| {
            let (w, h) = fit_canvas(&canvas);
            app.borrow_mut().renderer.resize(w, h);
        });
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Shared, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use serde::Serialize;

    use space_escape::Game;
    use space_escape::persistence::JsonFileStore;
    use space_escape::settings::{Preset, Settings};
    use space_escape::sim::{GameEvent, ImpactCause};

    #[derive(Parser, Debug)]
    #[command(name = "space-escape")]
    #[command(about = "Fly autopilot sessions of Space Escape headlessly and report the scores")]
    pub struct Cli {
        /// Settings JSON (defaults are used when omitted or unreadable)
        settings: Option<PathBuf>,
        /// Sessions to play
        #[arg(long, default_value_t = 1)]
        sessions: u32,
        /// RNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Device preset applied on top of the settings (desktop, handheld)
        #[arg(long)]
        preset: Option<String>,
        /// High-score store
        #[arg(long, default_value = "space-escape-scores.json")]
        store: PathBuf,
        /// Give up on a session after this many ticks
        #[arg(long, default_value_t = 36_000)]
        max_ticks: u64,
    }

    #[derive(Debug, Serialize)]
    struct SessionReport {
        session: u32,
        score: u64,
        ticks: u64,
        cause: Option<ImpactCause>,
        new_high_score: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        preset: &'static str,
        sessions: Vec<SessionReport>,
        /// Session still in flight when `max_ticks` ran out
        timed_out: bool,
        high_score_before: u64,
        high_score_after: u64,
    }

    pub fn run(cli: Cli) -> Result<()> {
        if cli.sessions == 0 {
            bail!("--sessions must be > 0");
        }

        let mut settings = match &cli.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        if let Some(name) = &cli.preset {
            let preset = Preset::from_str(name).with_context(|| format!("unknown preset '{name}'"))?;
            settings.apply_preset(preset);
        }

        let store = JsonFileStore::open(&cli.store)
            .with_context(|| format!("opening {}", cli.store.display()))?;
        log::info!("High scores in {}", store.path().display());
        let mut game = Game::new(&settings, cli.seed, store);
        game.set_autopilot(true);
        let high_score_before = game.high_score();

        let mut reports = Vec::new();
        let mut ticks = 0;
        let mut cause = None;
        while reports.len() < cli.sessions as usize && ticks < cli.max_ticks {
            ticks += 1;
            for event in game.step() {
                match event {
                    GameEvent::Impact { cause: c } => cause = Some(c),
                    GameEvent::GameOver {
                        score,
                        new_high_score,
                    } => {
                        reports.push(SessionReport {
                            session: game.state().sessions,
                            score,
                            ticks,
                            cause: cause.take(),
                            new_high_score,
                        });
                        log::info!("Session {} scored {}", reports.len(), score);
                        ticks = 0;
                    }
                    _ => {}
                }
            }
        }

        let timed_out = reports.len() < cli.sessions as usize;
        if timed_out {
            log::warn!("Session still running after {} ticks, stopping", cli.max_ticks);
        }

        let summary = RunSummary {
            seed: cli.seed,
            preset: settings.preset.as_str(),
            sessions: reports,
            timed_out,
            high_score_before,
            high_score_after: game.high_score(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Space Escape (native) starting...");
    headless::run(headless::Cli::parse())
}
