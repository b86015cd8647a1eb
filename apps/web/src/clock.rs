use std::time::Duration;

/// Turns `Date.now()` readings into the monotonic clock the map session runs
/// on. Time starts at the first frame and never runs backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    origin_ms: Option<f64>,
    last: Duration,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self {
            origin_ms: None,
            last: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, now_ms: f64) -> Duration {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let elapsed = Duration::from_secs_f64(((now_ms - origin) / 1000.0).max(0.0));
        self.last = self.last.max(elapsed);
        self.last
    }

    pub const fn now(&self) -> Duration {
        self.last
    }
}
