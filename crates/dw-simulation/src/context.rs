use dw_core::World;
use rand::rngs::StdRng;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The world being simulated.
    pub world: &'a mut World,
    /// Seeded generator shared by all systems.
    pub rng: &'a mut StdRng,
    /// Seconds elapsed since the previous tick.
    pub dt: f64,
    /// Number of the tick being run, starting at 1. Zero during `init`.
    pub tick: u64,
}

impl SimContext<'_> {
    /// Returns `true` while systems are being initialised.
    pub fn is_init(&self) -> bool {
        self.tick == 0
    }
}
