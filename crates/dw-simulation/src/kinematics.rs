use dw_core::{Mover, Vector};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;

/// Advance one mover by `dt` seconds.
///
/// Velocity is integrated first. If the new speed exceeds the mover's
/// limit it is clamped to exactly that limit and the acceleration is
/// zeroed, a hard terminal-velocity cutoff. Position then moves by the
/// average of the old and new velocities.
///
/// `max_acceleration` is not read here. It is the bound for whatever steers
/// the mover by setting `acceleration`, and integration applies the
/// acceleration it is given.
pub fn integrate_mover(mover: Mover, dt: f64) -> Mover {
    let mut velocity = mover.velocity + dt * mover.acceleration;
    let mut acceleration = mover.acceleration;
    if velocity.length() > mover.max_velocity {
        velocity = mover.max_velocity * velocity.unit();
        acceleration = Vector::ZERO;
    }
    let average = (mover.velocity + velocity) / 2.0;
    Mover {
        position: mover.position + dt * average,
        velocity,
        acceleration,
        ..mover
    }
}

/// Integrates every node carrying a [`Mover`] once per tick.
#[derive(Debug, Default)]
pub struct KinematicsSystem {
    moved_last_tick: usize,
}

impl KinematicsSystem {
    /// Create a kinematics system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of movers integrated on the most recent tick.
    pub fn moved_last_tick(&self) -> usize {
        self.moved_last_tick
    }
}

impl System for KinematicsSystem {
    fn name(&self) -> &str {
        "kinematics"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let dt = ctx.dt;
        let mut moved = 0;
        for node in ctx.world.nodes_mut() {
            if let Some(mover) = node.mover() {
                node.add_behaviour(integrate_mover(mover, dt));
                moved += 1;
            }
        }
        self.moved_last_tick = moved;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector, b: Vector) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn constant_acceleration_under_limit() {
        let mover = Mover::at(Vector::ZERO, 100.0, 10.0).with_acceleration(Vector::new(2.0, 0.0));
        let next = integrate_mover(mover, 0.5);
        assert!(close(next.velocity, Vector::new(1.0, 0.0)));
        // Average velocity 0.5 over 0.5 s.
        assert!(close(next.position, Vector::new(0.25, 0.0)));
        assert_eq!(next.acceleration, Vector::new(2.0, 0.0));
    }

    #[test]
    fn speed_clamped_and_acceleration_zeroed() {
        let mover = Mover::at(Vector::new(1.0, 1.0), 5.0, 10.0)
            .with_velocity(Vector::new(3.0, 4.0))
            .with_acceleration(Vector::new(3.0, 4.0));
        let next = integrate_mover(mover, 1.0);
        assert!((next.velocity.length() - 5.0).abs() < 1e-12);
        assert!(close(next.velocity, Vector::new(3.0, 4.0)));
        assert_eq!(next.acceleration, Vector::ZERO);
        assert!(close(next.position, Vector::new(4.0, 5.0)));
    }

    #[test]
    fn clamp_keeps_direction() {
        let mover = Mover::at(Vector::ZERO, 1.0, 1.0).with_acceleration(Vector::new(0.0, -10.0));
        let next = integrate_mover(mover, 1.0);
        assert!(close(next.velocity, Vector::new(0.0, -1.0)));
        assert!(close(next.position, Vector::new(0.0, -0.5)));
    }

    #[test]
    fn limits_are_preserved() {
        let mover = Mover::at(Vector::ZERO, 2.5, 0.75);
        let next = integrate_mover(mover, 0.1);
        assert!((next.max_velocity - 2.5).abs() < f64::EPSILON);
        assert!((next.max_acceleration - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn acceleration_above_limit_is_applied_as_given() {
        let mover = Mover::at(Vector::ZERO, 100.0, 1.0).with_acceleration(Vector::new(4.0, 0.0));
        let next = integrate_mover(mover, 1.0);
        assert!(close(next.velocity, Vector::new(4.0, 0.0)));
        assert_eq!(next.acceleration, Vector::new(4.0, 0.0));
    }
}
