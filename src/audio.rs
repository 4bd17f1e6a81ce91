//! Sound cues
//!
//! The simulation never touches audio. The driver maps [`GameEvent`]s to
//! [`SoundCue`]s and hands them to an [`AudioSink`]; playback is
//! fire-and-forget and a sink must never block or fail the tick.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Background music, started with the first session
    Music,
    /// Craft changed direction
    Swoosh,
    /// Hazard or wall impact
    Explosion,
    /// Carrot collected
    Collect,
}

/// Cue for an event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::Started => Some(SoundCue::Music),
        GameEvent::Swoosh { .. } => Some(SoundCue::Swoosh),
        GameEvent::Impact { .. } => Some(SoundCue::Explosion),
        GameEvent::Collected { .. } => Some(SoundCue::Collect),
        _ => None,
    }
}

/// Anything that can play a cue
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Silence or restore all output
    fn set_muted(&mut self, _muted: bool) {}
}

/// Silent sink for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};

    const MUSIC_ELEMENT_ID: &str = "game-music";
    const SWOOSH_SRC: &str = "assets/swoosh.mp3";
    const EXPLOSION_SRC: &str = "assets/explosion.mp3";

    /// Browser audio: `<audio>` elements for music and recorded effects,
    /// a Web Audio oscillator chime for collection.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        swoosh: Option<HtmlAudioElement>,
        explosion: Option<HtmlAudioElement>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - collect chime disabled");
            }

            let music = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(MUSIC_ELEMENT_ID))
                .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok());
            match &music {
                Some(m) => m.set_loop(true),
                None => log::debug!("No #{} element, music disabled", MUSIC_ELEMENT_ID),
            }

            Self {
                ctx,
                music,
                swoosh: HtmlAudioElement::new_with_src(SWOOSH_SRC).ok(),
                explosion: HtmlAudioElement::new_with_src(EXPLOSION_SRC).ok(),
                volume: 0.8,
                muted: false,
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Start an element; a rejected play() promise (autoplay policy) is dropped
        fn start(element: &HtmlAudioElement, vol: f32, rewind: bool, label: &'static str) {
            element.set_volume(f64::from(vol));
            if rewind {
                element.set_current_time(0.0);
            }
            match element.play() {
                Ok(promise) => spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::debug!("{} blocked: {:?}", label, e);
                    }
                }),
                Err(e) => log::debug!("{} failed: {:?}", label, e),
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Rising three-note chime
        fn play_collect(ctx: &AudioContext, vol: f32) {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for (i, freq) in [660.0, 880.0, 1320.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            // Music keeps running muted so unmuting mid-session brings it back
            if cue == SoundCue::Music {
                if let Some(music) = &self.music {
                    Self::start(music, self.volume * 0.5, false, "Music");
                }
                return;
            }

            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            match cue {
                SoundCue::Music => {}
                SoundCue::Swoosh => {
                    if let Some(swoosh) = &self.swoosh {
                        Self::start(swoosh, vol, true, "Swoosh");
                    }
                }
                SoundCue::Explosion => {
                    if let Some(explosion) = &self.explosion {
                        Self::start(explosion, vol, true, "Explosion");
                    }
                }
                SoundCue::Collect => {
                    if let Some(ctx) = &self.ctx {
                        Self::play_collect(ctx, vol);
                    }
                }
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if let Some(music) = &self.music {
                music.set_muted(muted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Facing, ImpactCause};

    #[test]
    fn test_cue_mapping() {
        assert_eq!(cue_for(&GameEvent::Started), Some(SoundCue::Music));
        assert_eq!(
            cue_for(&GameEvent::Swoosh {
                facing: Facing::Left
            }),
            Some(SoundCue::Swoosh)
        );
        assert_eq!(
            cue_for(&GameEvent::Impact {
                cause: ImpactCause::Wall
            }),
            Some(SoundCue::Explosion)
        );
        assert_eq!(
            cue_for(&GameEvent::Collected { id: 1, score: 100 }),
            Some(SoundCue::Collect)
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(cue_for(&GameEvent::Reset), None);
        assert_eq!(cue_for(&GameEvent::Bounced), None);
        assert_eq!(
            cue_for(&GameEvent::GameOver {
                score: 0,
                new_high_score: false
            }),
            None
        );
    }
}
