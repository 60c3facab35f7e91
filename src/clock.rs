use std::time::Instant;

/// Source of frame delta time
pub trait Clock {
    /// Seconds elapsed since the previous call
    fn delta(&mut self) -> f64;
}

/// Monotonic clock that starts on its first sample
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> f64 {
        let now = Instant::now();
        match self.last.replace(now) {
            Some(previous) => now.duration_since(previous).as_secs_f64(),
            None => 0.0,
        }
    }
}

/// Clock advanced by hand, for deterministic frame sequences
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    pending: f64,
}

#[cfg(test)]
impl ManualClock {
    pub fn advance(&mut self, seconds: f64) {
        self.pending += seconds;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn delta(&mut self) -> f64 {
        std::mem::take(&mut self.pending)
    }
}
