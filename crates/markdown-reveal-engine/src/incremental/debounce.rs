use std::time::{Duration, Instant};

/// A single cancellable deadline.
///
/// Scheduling replaces any pending deadline, so at most one refresh is ever
/// waiting. The owner drives it by polling with the current time; nothing
/// runs on another thread.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the delay from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Clears and returns `true` if the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.deadline = None;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(150);

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);

        assert!(!debouncer.take_due(start + Duration::from_millis(100)));
        assert!(debouncer.take_due(start + DELAY));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_due(start + DELAY * 2));
    }

    #[test]
    fn rescheduling_pushes_deadline_back() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(100));

        assert!(!debouncer.is_due(start + DELAY));
        assert!(debouncer.is_due(start + Duration::from_millis(250)));
    }

    #[test]
    fn cancel_clears_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_due(start + DELAY * 10));
    }
}
