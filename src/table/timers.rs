//! Browser timer host backed by `setTimeout` / `setInterval`.
//!
//! Each armed timer owns the closure JS calls back into. A closure may be
//! cancelled or retired while it is the one executing (an animation tick
//! re-arming its own ticker, a one-shot firing), so retired closures are
//! parked in `spent` and only dropped at the start of the next delivery.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::timers::{Event, Repeat, TimerHandle, TimerHost};

struct Armed {
    id: i32,
    repeat: Repeat,
    event: Event,
    callback: Closure<dyn FnMut()>,
}

#[derive(Default)]
pub struct BrowserTimers {
    next_handle: u64,
    live: HashMap<TimerHandle, Armed>,
    spent: Vec<Closure<dyn FnMut()>>,
}

impl BrowserTimers {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(armed: &Armed) {
        if let Some(w) = window() {
            match armed.repeat {
                Repeat::Once => w.clear_timeout_with_handle(armed.id),
                Repeat::Every => w.clear_interval_with_handle(armed.id),
            }
        }
    }
}

impl TimerHost for BrowserTimers {
    fn schedule(&mut self, delay_ms: u32, repeat: Repeat, event: Event) -> Option<TimerHandle> {
        let win = window()?;
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let callback = Closure::wrap(Box::new(move || super::dispatch_timer(handle)) as Box<dyn FnMut()>);
        let f = callback.as_ref().unchecked_ref();
        let delay = delay_ms.min(i32::MAX as u32) as i32;
        let armed = match repeat {
            Repeat::Once => win.set_timeout_with_callback_and_timeout_and_arguments_0(f, delay),
            Repeat::Every => win.set_interval_with_callback_and_timeout_and_arguments_0(f, delay),
        };
        match armed {
            Ok(id) => {
                self.live.insert(handle, Armed { id, repeat, event, callback });
                Some(handle)
            }
            Err(e) => {
                log::warn!("could not arm {:?} timer: {:?}", event, e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(armed) = self.live.remove(&handle) {
            Self::clear(&armed);
            self.spent.push(armed.callback);
        }
    }

    fn fired(&mut self, handle: TimerHandle) -> Option<Event> {
        // Nothing parked here can be running: we are inside `handle`'s closure.
        self.spent.clear();
        let armed = self.live.get(&handle)?;
        let event = armed.event;
        if armed.repeat == Repeat::Once {
            if let Some(done) = self.live.remove(&handle) {
                self.spent.push(done.callback);
            }
        }
        Some(event)
    }

    fn cancel_all(&mut self) {
        for (_, armed) in self.live.drain() {
            Self::clear(&armed);
            self.spent.push(armed.callback);
        }
    }

    fn pending(&self) -> usize {
        self.live.len()
    }
}
