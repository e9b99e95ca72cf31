use crate::context::SimContext;
use crate::error::SimResult;

/// A subsystem driven once per tick by the [`Scheduler`](crate::Scheduler).
///
/// Systems run in registration order. Each receives a mutable context with
/// the world, the seeded RNG, and the elapsed time for this tick. Systems
/// that only care about some nodes skip the rest; there is no per-node hook.
pub trait System: std::fmt::Debug {
    /// Unique name for this system within a scheduler.
    fn name(&self) -> &str;

    /// Called once per tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Called once before the first tick. Optional setup hook.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Support downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Support downcasting to concrete types.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
