use std::time::Duration;

/// Cycle durations accumulated between two statistics snapshots.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    samples: u32,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
}

impl CycleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.samples += 1;
        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn avg(&self) -> Duration {
        if self.samples == 0 {
            Duration::ZERO
        } else {
            self.total / self.samples
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
