use std::time::{Duration, Instant};

/// Identifies one scheduled repeating interval.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host-provided repeating timer primitives used by the engine.
///
/// The engine cancels its current handle before every `schedule` call, so a
/// host only ever sees one live interval at a time.
pub trait TimerHost {
    /// Starts a repeating interval and returns its handle.
    fn schedule(&mut self, interval: Duration) -> TimerHandle;

    /// Stops the interval identified by `handle`. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct ActiveInterval {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
}

/// Wall-clock interval timer driven by the runtime loop.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    active: Option<ActiveInterval>,
    next_id: u64,
}

impl IntervalTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and re-arms the interval when a firing is due at `now`.
    ///
    /// At most one firing is reported per call; a loop that fell behind by
    /// several intervals resumes from `now` instead of bursting.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if now < active.next_due {
            return false;
        }

        let next_due = active.next_due + active.interval;
        active.next_due = if next_due <= now {
            now + active.interval
        } else {
            next_due
        };
        true
    }

    /// Returns how long until the next firing, or `None` when idle.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.active.map(|active| active.next_due.saturating_duration_since(now))
    }

    /// Returns the active interval length, if any.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|active| active.interval)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn schedule_at(&mut self, interval: Duration, now: Instant) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.active = Some(ActiveInterval {
            handle,
            interval,
            next_due: now + interval,
        });
        handle
    }
}

impl TimerHost for IntervalTimer {
    fn schedule(&mut self, interval: Duration) -> TimerHandle {
        self.schedule_at(interval, Instant::now())
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.active.is_some_and(|active| active.handle == handle) {
            self.active = None;
        }
    }
}

/// Deterministic timer host for tests.
///
/// Nothing fires on its own; callers step the engine directly and inspect
/// which interval is live.
#[derive(Debug, Default)]
pub struct ManualTimer {
    active: Option<(TimerHandle, Duration)>,
    next_id: u64,
    scheduled: usize,
    cancelled: usize,
    /// Number of handles that were live when `schedule` was called.
    overlapping: usize,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live interval length, if any.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|(_, interval)| interval)
    }

    /// Returns the live handle, if any.
    #[must_use]
    pub fn handle(&self) -> Option<TimerHandle> {
        self.active.map(|(handle, _)| handle)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.scheduled
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancelled
    }

    /// Returns how many times an interval was scheduled on top of a live one.
    #[must_use]
    pub fn overlap_count(&self) -> usize {
        self.overlapping
    }
}

impl TimerHost for ManualTimer {
    fn schedule(&mut self, interval: Duration) -> TimerHandle {
        if self.active.is_some() {
            self.overlapping += 1;
        }

        self.next_id += 1;
        self.scheduled += 1;
        let handle = TimerHandle(self.next_id);
        self.active = Some((handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.handle() == Some(handle) {
            self.active = None;
            self.cancelled += 1;
        }
    }
}
