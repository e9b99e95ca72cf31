use std::time::Duration;

/// Configuration for a scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// RNG seed handed to systems through the tick context.
    pub seed: u64,
    /// `dt` of the first tick after a (re)start.
    pub nominal_frame: Duration,
    /// Wait between ticks. `None` yields the thread instead.
    pub min_tick_interval: Option<Duration>,
    /// Pause automatically after this many ticks of a run. `None` = unbounded.
    pub tick_budget: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            nominal_frame: Duration::from_secs(1) / 30,
            min_tick_interval: None,
            tick_budget: None,
        }
    }
}

impl SchedulerConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the nominal frame used as the first `dt` of a run.
    pub fn with_nominal_frame(mut self, frame: Duration) -> Self {
        self.nominal_frame = frame;
        self
    }

    /// Set the minimum interval between ticks.
    pub fn with_min_tick_interval(mut self, interval: Duration) -> Self {
        self.min_tick_interval = Some(interval);
        self
    }

    /// Pause the drive loop after `ticks` ticks.
    pub fn with_tick_budget(mut self, ticks: u64) -> Self {
        self.tick_budget = Some(ticks);
        self
    }
}
