use std::time::{Duration, Instant};

/// Recommended source-side emission interval for drawing-progress - about
/// one animation frame.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(16);

/// Emission gate for live previews. The relay forwards everything it is
/// given, so producers bound the fan-out volume by emitting at most once
/// per interval.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn ready(&mut self) -> bool {
        self.ready_at(Instant::now())
    }

    /// True when at least one interval has passed since the last allowed
    /// emission. Takes the clock as an argument so callers own the timing.
    pub fn ready_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(PROGRESS_INTERVAL)
    }
}
