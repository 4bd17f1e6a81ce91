//! Canvas 2D renderer
//!
//! Sprites are loaded asynchronously by the browser; until an image reports
//! itself complete a flat placeholder is drawn instead.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Frame, Renderer};
use crate::sim::{Facing, GamePhase, Rect};

const ASSET_ROOT: &str = "assets/";

/// Placeholder colors
const SHIP_FALLBACK: &str = "#0ff";
const CARROT_FALLBACK: &str = "#ff8800";
const HAZARD_COLOR: &str = "#666";

struct Sprites {
    ship_left: HtmlImageElement,
    ship_right: HtmlImageElement,
    splash: HtmlImageElement,
    carrot: HtmlImageElement,
    background: HtmlImageElement,
    game_over: HtmlImageElement,
}

impl Sprites {
    fn load() -> Result<Self, String> {
        Ok(Self {
            ship_left: image("spaceship-left.png")?,
            ship_right: image("spaceship-right.png")?,
            splash: image("rabbit.png")?,
            carrot: image("carrot-1.png")?,
            background: image("background.jpg")?,
            game_over: image("spacecraft.gif")?,
        })
    }
}

fn image(name: &str) -> Result<HtmlImageElement, String> {
    let img = HtmlImageElement::new().map_err(|e| format!("{:?}", e))?;
    img.set_src(&format!("{}{}", ASSET_ROOT, name));
    Ok(img)
}

/// Decoded and safe to draw
fn ready(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    sprites: Sprites,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("{:?}", e))?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "not a 2d context".to_string())?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
            sprites: Sprites::load()?,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }

    fn fill(&self, color: &str, rect: &Rect) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(rect.pos.x),
            f64::from(rect.pos.y),
            f64::from(rect.size.x),
            f64::from(rect.size.y),
        );
    }

    /// Draw `img` into `rect`, or a flat `fallback` block while it loads
    fn sprite(&self, img: &HtmlImageElement, rect: &Rect, fallback: Option<&str>) {
        if ready(img) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                f64::from(rect.pos.x),
                f64::from(rect.pos.y),
                f64::from(rect.size.x),
                f64::from(rect.size.y),
            );
        } else if let Some(color) = fallback {
            self.fill(color, rect);
        }
    }

    fn text(&self, font: &str, align: &str, text: &str, x: f64, y: f64) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align);
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn shade(&self, w: f64, h: f64, alpha: f64) {
        self.ctx
            .set_fill_style_str(&format!("rgba(0,0,0,{})", alpha));
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_splash(&self, w: f64, h: f64) {
        self.shade(w, h, 0.7);
        let size = 300.0_f64.min(w * 0.6).min(h * 0.5);
        let art = Rect::new(
            glam::Vec2::new(((w - size) / 2.0) as f32, ((h - size) / 2.0 - size / 6.0) as f32),
            glam::Vec2::splat(size as f32),
        );
        self.sprite(&self.sprites.splash, &art, None);

        self.ctx.set_fill_style_str("#fff");
        let title = (w / 21.0).clamp(16.0, 48.0);
        self.text(
            &format!("bold {}px Arial", title.round()),
            "center",
            "Rabbit's Space Escape",
            w / 2.0,
            h / 2.0 + size * 0.66,
        );
        self.text(
            &format!("{}px Arial", (title / 2.0).round()),
            "center",
            "Click, tap or press Space to start",
            w / 2.0,
            h / 2.0 + size * 0.83,
        );
    }

    fn draw_hud(&self, frame: &Frame<'_>) {
        self.ctx.set_fill_style_str("#fff");
        let size = (frame.playfield.x as f64 / 42.0).clamp(10.0, 24.0);
        let font = format!("bold {}px Arial", size.round());
        self.text(&font, "left", &format!("Score: {}", frame.score), 20.0, 40.0);
        self.text(&font, "left", &format!("High: {}", frame.high_score), 20.0, 40.0 + size * 1.25);
    }

    fn draw_help(&self, w: f64, h: f64) {
        self.shade(w, h, 0.6);
        self.ctx.set_fill_style_str("#fff");
        let size = (w / 40.0).clamp(10.0, 22.0);
        let font = format!("{}px Arial", size.round());
        let lines = [
            "Arrows / WASD: steer",
            "Up, W or Space: thrust",
            "Tilt or swipe on handhelds",
            "Grab carrots, avoid rocks and walls",
            "M: mute, P: demo pilot",
            "H: close help",
        ];
        for (i, line) in lines.iter().enumerate() {
            self.text(&font, "center", line, w / 2.0, h / 3.0 + i as f64 * size * 1.6);
        }
    }

    fn draw_game_over(&self, frame: &Frame<'_>, w: f64, h: f64) {
        self.shade(w, h, 0.8);
        let size = 200.0_f64.min(w * 0.4).min(h * 0.35);
        let art = Rect::new(
            glam::Vec2::new(((w - size) / 2.0) as f32, ((h - size) / 2.0 - size * 0.4) as f32),
            glam::Vec2::splat(size as f32),
        );
        self.sprite(&self.sprites.game_over, &art, None);

        self.ctx.set_fill_style_str("#fff");
        let title = (w / 21.0).clamp(16.0, 48.0);
        self.text(
            &format!("bold {}px Arial", title.round()),
            "center",
            "Game Over!",
            w / 2.0,
            h / 2.0 + size * 0.5,
        );
        self.text(
            &format!("{}px Arial", (title * 0.66).round()),
            "center",
            &format!("Score: {}", frame.score),
            w / 2.0,
            h / 2.0 + size * 0.75,
        );
        self.text(
            &format!("{}px Arial", (title / 2.0).round()),
            "center",
            "Tap or press R to play again",
            w / 2.0,
            h / 2.0 + size,
        );
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        // Playfield units → canvas pixels
        let sx = self.width / f64::from(frame.playfield.x);
        let sy = self.height / f64::from(frame.playfield.y);
        let _ = self.ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0);
        let (w, h) = (f64::from(frame.playfield.x), f64::from(frame.playfield.y));
        let field = Rect::field(frame.playfield);

        if ready(&self.sprites.background) {
            self.sprite(&self.sprites.background, &field, None);
        } else {
            self.fill("#000", &field);
        }

        if frame.phase == GamePhase::Splash {
            self.draw_splash(w, h);
            if frame.help_visible {
                self.draw_help(w, h);
            }
            return;
        }

        for carrot in frame.collectibles {
            self.sprite(&self.sprites.carrot, &carrot.rect(), Some(CARROT_FALLBACK));
        }

        for hazard in frame.hazards {
            self.fill(HAZARD_COLOR, &hazard.rect());
        }

        match frame.explosion() {
            Some(boom) => {
                self.ctx.set_fill_style_str(&boom.css_color());
                self.ctx.begin_path();
                let _ = self.ctx.arc(
                    f64::from(boom.center.x),
                    f64::from(boom.center.y),
                    f64::from(boom.radius),
                    0.0,
                    TAU,
                );
                self.ctx.fill();
            }
            None if frame.phase != GamePhase::GameOver => {
                let ship = match frame.player.facing {
                    Facing::Left => &self.sprites.ship_left,
                    Facing::Right => &self.sprites.ship_right,
                };
                self.sprite(ship, &frame.player.rect(), Some(SHIP_FALLBACK));
            }
            None => {}
        }

        self.draw_hud(frame);

        if frame.phase == GamePhase::GameOver {
            self.draw_game_over(frame, w, h);
        }
        if frame.help_visible {
            self.draw_help(w, h);
        }
    }
}
