use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use dw_core::World;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{TickSource, WallClock};
use crate::config::SchedulerConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::system::System;

/// Lifecycle state of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started.
    Stopped,
    /// The drive loop is ticking.
    Running,
    /// The drive loop has exited and may be resumed.
    Paused,
    /// Terminal. No further ticks.
    Cancelled,
}

impl SchedulerState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Cancelled,
            _ => Self::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Running => 1,
            Self::Paused => 2,
            Self::Cancelled => 3,
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Thread-safe handle for pausing or cancelling a running scheduler.
///
/// The drive loop blocks the thread that called `start`, so these calls are
/// made from elsewhere: another thread, or a system holding a clone.
#[derive(Debug, Clone, Default)]
pub struct SchedulerControl {
    state: Arc<AtomicU8>,
    ticks: Arc<AtomicU64>,
}

impl SchedulerControl {
    /// Current state.
    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Ticks run so far across all runs.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Move Running to Paused. The loop exits after the in-flight tick.
    /// Returns `false` if the scheduler was not running.
    pub fn pause(&self) -> bool {
        self.transition(SchedulerState::Running, SchedulerState::Paused)
    }

    /// Move to Cancelled from any state.
    pub fn cancel(&self) {
        self.state
            .store(SchedulerState::Cancelled.as_u8(), Ordering::SeqCst);
    }

    fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Drives registered systems over time.
///
/// `start` and `resume` block the calling thread in the drive loop until the
/// scheduler is paused or cancelled through its [`SchedulerControl`], a tick
/// budget runs out, or a system fails. Each iteration measures `dt` on the
/// tick source, runs every system in registration order, then waits the
/// minimum tick interval or yields.
pub struct Scheduler {
    world: World,
    config: SchedulerConfig,
    clock: Box<dyn TickSource>,
    rng: StdRng,
    systems: Vec<Box<dyn System>>,
    control: SchedulerControl,
    last_tick_at: Option<Duration>,
    initialized: bool,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .field("ticks", &self.ticks())
            .field("systems", &self.systems.len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Scheduler {
    /// Create a stopped scheduler over `world`, timed by the wall clock.
    pub fn new(world: World, config: SchedulerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            world,
            config,
            clock: Box::new(WallClock::new()),
            rng,
            systems: Vec::new(),
            control: SchedulerControl::default(),
            last_tick_at: None,
            initialized: false,
        }
    }

    /// Replace the tick source.
    pub fn with_tick_source(mut self, source: impl TickSource + 'static) -> Self {
        self.clock = Box::new(source);
        self
    }

    /// Register a system. Systems tick in registration order and names
    /// must be unique.
    pub fn add_system<S: System + 'static>(&mut self, mut system: S) -> SimResult<()> {
        if self.systems.iter().any(|s| s.name() == system.name()) {
            return Err(SimError::DuplicateSystem(system.name().to_string()));
        }
        if self.initialized {
            let mut ctx = SimContext {
                world: &mut self.world,
                rng: &mut self.rng,
                dt: 0.0,
                tick: 0,
            };
            system.init(&mut ctx)?;
        }
        debug!(system = system.name(), "registered system");
        self.systems.push(Box::new(system));
        Ok(())
    }

    /// A handle for pausing or cancelling from another thread.
    pub fn control(&self) -> SchedulerControl {
        self.control.clone()
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.control.state()
    }

    /// Start ticking. From Stopped or Paused this behaves like
    /// [`Scheduler::resume`]; if already Running it re-enters the loop.
    pub fn start(&mut self) -> SimResult<()> {
        match self.state() {
            SchedulerState::Cancelled => {
                warn!("refusing to start a cancelled scheduler");
                Err(SimError::Lifecycle)
            }
            SchedulerState::Running => self.drive(),
            SchedulerState::Stopped | SchedulerState::Paused => self.resume(),
        }
    }

    /// Resume ticking. The first tick sees one nominal frame as its `dt`.
    /// A no-op if already Running.
    pub fn resume(&mut self) -> SimResult<()> {
        let from = self.state();
        match from {
            SchedulerState::Cancelled => {
                warn!("refusing to resume a cancelled scheduler");
                Err(SimError::Lifecycle)
            }
            SchedulerState::Running => Ok(()),
            SchedulerState::Stopped | SchedulerState::Paused => {
                if !self.control.transition(from, SchedulerState::Running) {
                    // Cancelled by another thread in between.
                    return Err(SimError::Lifecycle);
                }
                info!(from = %from, "scheduler running");
                self.last_tick_at = None;
                self.drive()
            }
        }
    }

    /// Pause after the in-flight tick. Returns `false` if not running.
    pub fn pause(&self) -> bool {
        self.control.pause()
    }

    /// Cancel permanently.
    pub fn cancel(&self) {
        info!("scheduler cancelled");
        self.control.cancel();
    }

    /// Run exactly one tick with the given `dt` in seconds, regardless of
    /// Stopped/Paused state.
    pub fn step(&mut self, dt: f64) -> SimResult<()> {
        if self.state() == SchedulerState::Cancelled {
            return Err(SimError::Lifecycle);
        }
        self.init()?;
        self.tick_systems(dt)
    }

    fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                rng: &mut self.rng,
                dt: 0.0,
                tick: 0,
            };
            let result = system.init(&mut ctx);
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    fn drive(&mut self) -> SimResult<()> {
        if let Err(e) = self.init() {
            self.control.pause();
            return Err(e);
        }
        let mut run_ticks: u64 = 0;
        while self.state() == SchedulerState::Running {
            if self.budget_spent(run_ticks) {
                debug!(run_ticks, "tick budget reached");
                self.control.pause();
                break;
            }
            let now = self.clock.now();
            let dt = match self.last_tick_at {
                Some(previous) => now.saturating_sub(previous),
                None => self.config.nominal_frame,
            };
            self.last_tick_at = Some(now);

            if let Err(e) = self.tick_systems(dt.as_secs_f64()) {
                warn!(error = %e, tick = self.ticks(), "system failed, pausing scheduler");
                self.control.pause();
                return Err(e);
            }
            run_ticks += 1;

            if self.budget_spent(run_ticks) {
                debug!(run_ticks, "tick budget reached");
                self.control.pause();
                break;
            }
            match self.config.min_tick_interval {
                Some(interval) => self.clock.wait(interval),
                None => thread::yield_now(),
            }
        }
        info!(state = %self.state(), ticks = self.ticks(), "scheduler loop exited");
        Ok(())
    }

    fn budget_spent(&self, run_ticks: u64) -> bool {
        self.config.tick_budget.is_some_and(|budget| run_ticks >= budget)
    }

    fn tick_systems(&mut self, dt: f64) -> SimResult<()> {
        let tick = self.control.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                rng: &mut self.rng,
                dt,
                tick,
            };
            let result = system.tick(&mut ctx);
            self.systems[i] = system;
            result?;
        }
        Ok(())
    }

    /// The world being simulated.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world between runs.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.control.ticks()
    }

    /// The configuration this scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Extract the world, consuming the scheduler.
    pub fn into_world(self) -> World {
        self.world
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
