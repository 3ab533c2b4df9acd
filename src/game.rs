//! Session owner: the only code that mutates [`SessionState`].
//!
//! User input arrives through [`Game::squash`] / [`Game::click_at`]; every
//! timed behavior arrives as an [`Event`] from the [`TimerHost`]. After each
//! mutation the two self-arming loops are reconciled:
//!
//! - the appearance scheduler keeps exactly one spawn timer pending while no
//!   caterpillar is present and no squash is in progress;
//! - the sprite driver keeps exactly one interval whose period matches the
//!   current `(animation, slow_motion)` pair, re-armed whenever that pair
//!   changes.
//!
//! The decay interval runs from construction until [`Game::shutdown`].

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::dialogue::{appearance_line, squash_line};
use crate::session::{AnimationState, Caterpillar, FLOATING_HEART, SessionState};
use crate::sound::SquashSound;
use crate::timers::{Event, ManualTimers, Repeat, TimerHandle, TimerHost};

pub struct Game<T: TimerHost, S: SquashSound> {
    config: GameConfig,
    state: SessionState,
    timers: T,
    sound: S,
    rng: SmallRng,
    spawn_timer: Option<TimerHandle>,
    decay_timer: Option<TimerHandle>,
    // Armed sprite ticker and the (animation, slow_motion) pair it was armed for.
    anim_timer: Option<(TimerHandle, AnimationState, bool)>,
    shut_down: bool,
}

impl<T: TimerHost, S: SquashSound> Game<T, S> {
    /// Mount a session: arms the decay loop, the sprite ticker and the first
    /// spawn.
    pub fn new(config: GameConfig, timers: T, sound: S, seed: u64) -> Self {
        let mut game = Self {
            config,
            state: SessionState::new(),
            timers,
            sound,
            rng: SmallRng::seed_from_u64(seed),
            spawn_timer: None,
            decay_timer: None,
            anim_timer: None,
            shut_down: false,
        };
        game.decay_timer = game.timers.schedule(game.config.decay_period_ms, Repeat::Every, Event::DecayTick);
        game.reconcile();
        game
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn relationship_level(&self) -> u32 {
        self.state.relationship_level(self.config.squashes_per_level)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Route a pointer click in percent coordinates. Squashes only when the
    /// click lands on the caterpillar; returns whether it did.
    pub fn click_at(&mut self, x_pct: f64, y_pct: f64) -> bool {
        self.is_over_caterpillar(x_pct, y_pct) && self.squash()
    }

    /// Whether a pointer at `(x, y)` percent is over a clickable caterpillar.
    pub fn is_over_caterpillar(&self, x_pct: f64, y_pct: f64) -> bool {
        !self.state.is_squashing
            && self.state.caterpillar.is_some_and(|c| c.covers(x_pct, y_pct, self.config.surface_px))
    }

    /// Click on the caterpillar. Ignored (returns false) while a squash is in
    /// progress or when no caterpillar is present.
    pub fn squash(&mut self) -> bool {
        if self.shut_down || self.state.is_squashing {
            return false;
        }
        let Some(target) = self.state.caterpillar else {
            return false;
        };

        let was_slow = self.state.slow_motion;
        let level_before = self.relationship_level();
        let st = &mut self.state;
        st.slow_motion = true;
        st.animation = AnimationState::Attack;
        st.sprite_frame = 0;
        st.is_squashing = true;

        self.sound.play_squash();

        self.state.total_squashes += 1;
        self.state.add_satisfaction(self.config.satisfaction_step, self.config.satisfaction_max);

        let line = squash_line(level_before, &mut self.rng);
        self.state.say(line);
        self.schedule_once(self.config.squash_dialogue_ms, Event::HideDialogue);

        let id = self.state.push_floating_text(target.x, target.y, FLOATING_HEART);
        self.schedule_once(self.config.floating_text_ms, Event::ExpireFloatingText(id));

        self.schedule_once(self.config.clear_delay_ms(was_slow), Event::ClearCaterpillar);

        log::debug!(
            "squash #{} (level {}, satisfaction {})",
            self.state.total_squashes,
            self.relationship_level(),
            self.state.satisfaction
        );
        self.reconcile();
        true
    }

    /// Deliver a fired timer. Stale handles are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.shut_down {
            return;
        }
        if let Some(event) = self.timers.fired(handle) {
            if self.spawn_timer == Some(handle) {
                self.spawn_timer = None;
            }
            self.handle(event);
        }
    }

    fn handle(&mut self, event: Event) {
        self.apply(event);
        self.reconcile();
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::Spawn => self.spawn(),
            Event::HideDialogue => self.state.show_dialogue = false,
            Event::ExpireFloatingText(id) => {
                self.state.remove_floating_text(id);
            }
            Event::ClearCaterpillar => {
                self.state.caterpillar = None;
                self.state.is_squashing = false;
            }
            Event::DecayTick => self.state.decay_satisfaction(),
            Event::AnimationTick => self.state.advance_sprite(),
        }
    }

    /// Arm a one-shot. If the host refuses, the event is applied right away
    /// so nothing waits on a timer that will never fire.
    fn schedule_once(&mut self, delay_ms: u32, event: Event) {
        if self.timers.schedule(delay_ms, Repeat::Once, event).is_none() {
            log::warn!("timer for {event:?} not armed, applying now");
            self.apply(event);
        }
    }

    fn spawn(&mut self) {
        if self.state.caterpillar.is_some() || self.state.is_squashing {
            return;
        }
        let (x0, xw) = self.config.spawn_x;
        let (y0, yh) = self.config.spawn_y;
        let x = x0 + self.rng.random::<f64>() * xw;
        let y = y0 + self.rng.random::<f64>() * yh;
        self.state.caterpillar = Some(Caterpillar { x, y });

        let line = appearance_line(self.state.total_squashes, self.relationship_level());
        self.state.say(line);
        self.schedule_once(self.config.appearance_dialogue_ms, Event::HideDialogue);
        log::debug!("caterpillar at ({x:.1}%, {y:.1}%)");
    }

    fn reconcile(&mut self) {
        self.sync_spawn_timer();
        self.sync_animation_timer();
    }

    fn sync_spawn_timer(&mut self) {
        let wants_spawn = self.state.caterpillar.is_none() && !self.state.is_squashing;
        match (wants_spawn, self.spawn_timer) {
            (true, None) => {
                let delay = self.config.spawn_delay_ms(self.state.total_squashes);
                self.spawn_timer = self.timers.schedule(delay, Repeat::Once, Event::Spawn);
                if self.spawn_timer.is_none() {
                    // retried by the next reconcile (the decay tick at the latest)
                    log::warn!("spawn timer not armed");
                }
            }
            (false, Some(h)) => {
                self.timers.cancel(h);
                self.spawn_timer = None;
            }
            _ => {}
        }
    }

    fn sync_animation_timer(&mut self) {
        let (anim, slow) = (self.state.animation, self.state.slow_motion);
        if let Some((h, armed_anim, armed_slow)) = self.anim_timer {
            if armed_anim == anim && armed_slow == slow {
                return;
            }
            self.timers.cancel(h);
            self.anim_timer = None;
        }
        let period = self.config.animation_period_ms(anim == AnimationState::Attack, slow);
        self.anim_timer = self
            .timers
            .schedule(period, Repeat::Every, Event::AnimationTick)
            .map(|h| (h, anim, slow));
    }

    /// Tear down: cancel every outstanding timer. The session is inert
    /// afterwards.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        if let Some(h) = self.decay_timer.take() {
            self.timers.cancel(h);
        }
        if let Some((h, _, _)) = self.anim_timer.take() {
            self.timers.cancel(h);
        }
        self.spawn_timer = None;
        // One-shots (dialogue hide, floating text, clear, spawn) go with the rest.
        self.timers.cancel_all();
        self.shut_down = true;
        log::info!("session closed after {} squashes", self.state.total_squashes);
    }
}

impl<S: SquashSound> Game<ManualTimers, S> {
    /// Run the virtual clock forward, delivering every timer due on the way.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now_ms() + ms;
        while let Some(handle) = self.timers.next_due(until) {
            self.on_timer(handle);
        }
        self.timers.settle(until);
    }
}
