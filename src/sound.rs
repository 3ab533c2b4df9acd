//! Squash sound effect.
//!
//! A short descending tone synthesized with Web Audio. Any failure (no audio
//! support, context creation refused, node errors) is logged and swallowed;
//! the game never depends on sound.

use wasm_bindgen::JsValue;
use web_sys::AudioContext;

/// Sink for the squash cue. Fire-and-forget.
pub trait SquashSound {
    fn play_squash(&mut self);
}

/// Sound sink that does nothing; used headless and when audio is unavailable.
#[derive(Default)]
pub struct Silent;

impl SquashSound for Silent {
    fn play_squash(&mut self) {}
}

const TONE_START_HZ: f32 = 800.0;
const TONE_END_HZ: f32 = 100.0;
const TONE_SECONDS: f64 = 0.1;
const GAIN_START: f32 = 0.3;
const GAIN_END: f32 = 0.01;

pub struct WebAudioSound {
    ctx: Option<AudioContext>,
}

impl WebAudioSound {
    pub fn new() -> Self {
        let ctx = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("audio disabled: {:?}", e);
                None
            }
        };
        Self { ctx }
    }

    fn try_play(ctx: &AudioContext) -> Result<(), JsValue> {
        // Browsers start contexts suspended until a user gesture; a click is one.
        let _ = ctx.resume();
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let t0 = ctx.current_time();
        let t1 = t0 + TONE_SECONDS;
        let freq = osc.frequency();
        freq.set_value_at_time(TONE_START_HZ, t0)?;
        freq.exponential_ramp_to_value_at_time(TONE_END_HZ, t1)?;
        let level = gain.gain();
        level.set_value_at_time(GAIN_START, t0)?;
        level.exponential_ramp_to_value_at_time(GAIN_END, t1)?;

        osc.start_with_when(t0)?;
        osc.stop_with_when(t1)?;
        Ok(())
    }
}

impl SquashSound for WebAudioSound {
    fn play_squash(&mut self) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        if let Err(e) = Self::try_play(ctx) {
            log::debug!("squash tone failed: {:?}", e);
        }
    }
}

impl Drop for WebAudioSound {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}
