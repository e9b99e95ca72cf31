//! Simulation engine for Darwinian.
//!
//! A [`Scheduler`] drives [`System`]s such as the [`KinematicsSystem`] over
//! a [`dw_core::World`] in real or virtual time. Path search runs beside it:
//! a [`Navigator`] searches an immutable grid snapshot, on the caller's
//! thread or on its own worker, and can be cancelled at any point.

/// Wall-clock and virtual tick sources.
pub mod clock;
/// Scheduler configuration.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Velocity and position integration for movers.
pub mod kinematics;
/// A* path search and its open-set queue.
pub mod navigation;
/// The tick scheduler and its control handle.
pub mod scheduler;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-exports of [`clock::TickSource`], [`clock::VirtualClock`], and [`clock::WallClock`].
pub use clock::{TickSource, VirtualClock, WallClock};
/// Re-export of [`config::SchedulerConfig`].
pub use config::SchedulerConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-export of [`kinematics::KinematicsSystem`].
pub use kinematics::KinematicsSystem;
/// Re-exports of the navigation types.
pub use navigation::{
    NavigationOutcome, NavigationResult, NavigationTask, Navigator, NavigatorState,
    PriorityOrderedQueue,
};
/// Re-exports of [`scheduler::Scheduler`], its control handle and state.
pub use scheduler::{Scheduler, SchedulerControl, SchedulerState};
/// Re-export of [`system::System`].
pub use system::System;
