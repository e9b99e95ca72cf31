//! Path search over the terrain grid.

/// A* navigator, its worker handle, and distance functions.
pub mod navigator;
/// Priority-ordered sequence used as the open set.
pub mod queue;

pub use navigator::{
    AdjacencyFn, DistanceFn, NavigationOutcome, NavigationResult, NavigationTask, Navigator,
    NavigatorState, chebyshev, euclidean, manhattan,
};
pub use queue::PriorityOrderedQueue;
