use std::time::{Duration, Instant};

/// Single-shot, last-write-wins delay.
///
/// Every `touch` replaces the pending value and pushes the deadline out to
/// `now + delay`. The value is released by `fire` only once the deadline has
/// passed without another touch. Time is passed in by the caller so the run
/// loop timer and tests drive it the same way.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Takes effect from the next `touch`; an already pending deadline is kept.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn touch(&mut self, value: T, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.pending = Some(Pending { value, deadline });
        deadline
    }

    pub fn fire(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some(pending) if now >= pending.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
