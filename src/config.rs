//! Timing and tuning knobs for one session.
//!
//! All durations are wall-clock milliseconds. The defaults reproduce the
//! shipped feel of the toy; `start_game_with_config` (feature `serde_json`)
//! lets the host page override any subset of them.

/// Tuning for a single game session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    // --- Appearance ---
    pub first_spawn_ms: u32, // delay before the very first caterpillar
    pub respawn_ms: u32,     // delay before every later caterpillar
    pub appearance_dialogue_ms: u32,
    /// Safe spawn rectangle in percent of the play surface: (min, span).
    pub spawn_x: (f64, f64),
    pub spawn_y: (f64, f64),
    /// Drawing surface in pixels; percent positions and the body's pixel
    /// footprint meet here for hit testing.
    pub surface_px: (f64, f64),

    // --- Squash ---
    pub squash_dialogue_ms: u32,
    pub floating_text_ms: u32,
    pub clear_ms: u32,
    pub clear_slow_ms: u32,

    // --- Gauge ---
    pub satisfaction_step: u32,
    pub satisfaction_max: u32,
    pub decay_period_ms: u32,

    // --- Relationship ---
    pub squashes_per_level: u32,

    // --- Sprite animation ---
    pub idle_period_ms: u32,
    pub attack_period_ms: u32,
    pub slow_motion_period_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_spawn_ms: 500,
            respawn_ms: 2000,
            appearance_dialogue_ms: 3000,
            spawn_x: (20.0, 60.0),
            spawn_y: (55.0, 30.0),
            surface_px: (720.0, 540.0),
            squash_dialogue_ms: 2000,
            floating_text_ms: 1000,
            clear_ms: 300,
            clear_slow_ms: 600,
            satisfaction_step: 20,
            satisfaction_max: 100,
            decay_period_ms: 1000,
            squashes_per_level: 5,
            idle_period_ms: 200,
            attack_period_ms: 100,
            slow_motion_period_ms: 400,
        }
    }
}

impl GameConfig {
    /// Ticker period for the sprite driver. Slow motion overrides the
    /// per-state default.
    pub fn animation_period_ms(&self, attacking: bool, slow_motion: bool) -> u32 {
        if slow_motion {
            self.slow_motion_period_ms
        } else if attacking {
            self.attack_period_ms
        } else {
            self.idle_period_ms
        }
    }

    pub fn spawn_delay_ms(&self, total_squashes: u32) -> u32 {
        if total_squashes == 0 { self.first_spawn_ms } else { self.respawn_ms }
    }

    pub fn clear_delay_ms(&self, slow_motion: bool) -> u32 {
        if slow_motion { self.clear_slow_ms } else { self.clear_ms }
    }
}
