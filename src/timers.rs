//! Scoped timers.
//!
//! Every delayed or periodic callback is an [`Event`] handed to a
//! [`TimerHost`], which returns a [`TimerHandle`]. The host delivers the
//! handle back to the session owner when it is due; the owner asks the host
//! which event it stands for. Cancelling a handle guarantees its event is
//! never delivered, and `cancel_all` is the teardown path.
//!
//! [`ManualTimers`] is a virtual clock used by tests and headless drivers;
//! the browser host lives in `table::timers`.

/// Messages delivered to the session owner when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Spawn,
    HideDialogue,
    ExpireFloatingText(u64),
    ClearCaterpillar,
    DecayTick,
    AnimationTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Every,
}

pub trait TimerHost {
    /// Arm a timer. `None` means the host could not arm it; the caller treats
    /// that as never scheduled.
    fn schedule(&mut self, delay_ms: u32, repeat: Repeat, event: Event) -> Option<TimerHandle>;

    /// Disarm a timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Claim the event for a handle that just fired. One-shot timers are
    /// forgotten here; intervals stay armed. Returns `None` for cancelled
    /// handles.
    fn fired(&mut self, handle: TimerHandle) -> Option<Event>;

    fn cancel_all(&mut self);

    fn pending(&self) -> usize;
}

struct ManualEntry {
    handle: TimerHandle,
    due_ms: u64,
    period_ms: Option<u64>,
    event: Event,
}

/// Deterministic virtual clock. Timers fire in due order, ties broken by
/// arming order.
#[derive(Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_handle: u64,
    entries: Vec<ManualEntry>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time. Intervals are re-armed one period later.
    pub fn next_due(&mut self, until_ms: u64) -> Option<TimerHandle> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle))
            .map(|(i, _)| i)?;
        let entry = &mut self.entries[idx];
        self.now_ms = self.now_ms.max(entry.due_ms);
        if let Some(period) = entry.period_ms {
            entry.due_ms += period;
        }
        Some(entry.handle)
    }

    /// Move the clock forward without delivering anything.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Events still armed, in due order.
    pub fn armed(&self) -> Vec<(u64, Event)> {
        let mut v: Vec<_> = self.entries.iter().map(|e| (e.due_ms, e.handle, e.event)).collect();
        v.sort_by_key(|(due, h, _)| (*due, *h));
        v.into_iter().map(|(due, _, ev)| (due, ev)).collect()
    }
}

impl TimerHost for ManualTimers {
    fn schedule(&mut self, delay_ms: u32, repeat: Repeat, event: Event) -> Option<TimerHandle> {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        // A zero-period interval would never let the clock advance.
        let delay = u64::from(delay_ms.max(1));
        self.entries.push(ManualEntry {
            handle,
            due_ms: self.now_ms + delay,
            period_ms: (repeat == Repeat::Every).then_some(delay),
            event,
        });
        Some(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    fn fired(&mut self, handle: TimerHandle) -> Option<Event> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        if self.entries[idx].period_ms.is_some() {
            Some(self.entries[idx].event)
        } else {
            Some(self.entries.remove(idx).event)
        }
    }

    fn cancel_all(&mut self) {
        self.entries.clear();
    }

    fn pending(&self) -> usize {
        self.entries.len()
    }
}
