//! Caterpillar Bond core crate.
//!
//! A caterpillar keeps turning up on the table; the character squashes it
//! when you click, and their bond deepens with every squash. Gameplay state
//! and timing live in native-testable modules (`game`, `session`, `dialogue`,
//! `timers`); the browser mount (canvas, overlays, Web Audio, real timers)
//! is driven from `start_game()` / `stop_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod dialogue;
pub mod game;
pub mod session;
pub mod sound;
pub mod timers;

mod table; // browser mount; only reachable through the JS entry points

pub use config::GameConfig;
pub use game::Game;
pub use session::{AnimationState, Caterpillar, FloatingText, SessionState};
pub use timers::{Event, ManualTimers, Repeat, TimerHandle, TimerHost};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Err only if a logger is already installed (e.g. a second start hook).
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entry points
// -----------------------------------------------------------------------------

/// Mount the table with default tuning. Replaces any running session.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    table::mount(GameConfig::default(), session_seed())
}

/// Mount with a JSON object overriding any subset of [`GameConfig`] fields.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config: GameConfig =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("bad config: {e}")))?;
    table::mount(config, session_seed())
}

/// Tear down the running session: every timer, listener and element goes.
#[wasm_bindgen]
pub fn stop_game() {
    table::unmount();
}

/// JSON snapshot of the running session, or `null` when nothing is mounted.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn session_snapshot() -> Result<JsValue, JsValue> {
    match table::snapshot() {
        Some(state) => serde_json::to_string(&state)
            .map(|s| JsValue::from_str(&s))
            .map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(JsValue::NULL),
    }
}

fn session_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => return u64::from_le_bytes(buf),
            Err(e) => log::warn!("entropy unavailable ({e}), seeding from clock"),
        }
    }
    performance_now().to_bits()
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
