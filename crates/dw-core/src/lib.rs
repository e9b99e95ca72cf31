//! Core types for Darwinian: the terrain grid, entities and their behaviours,
//! and the world aggregate that ties them together.
//!
//! Everything here is plain data plus the algorithms that act on a single
//! grid. Time, scheduling and path search live in `dw-simulation`.

/// Behavioural facets attached to nodes.
pub mod behaviour;
/// Node identity and per-node behaviour storage.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Grid generation configuration and terrain weighting.
pub mod generation;
/// Integer grid points and floating-point vectors.
pub mod geometry;
/// The square terrain grid: generation, refinement and adjacency.
pub mod grid;
/// Random helpers over an explicitly passed generator.
pub mod random;
/// Terrain classification of a single cell.
pub mod terrain;
/// The world aggregate owning the grid and the node population.
pub mod world;

/// Re-export behaviour types.
pub use behaviour::{Behaviour, BehaviourType, Body, Mover, Oriented, Positioned};
/// Re-export entity types.
pub use entity::{Node, NodeId};
/// Re-export error types.
pub use error::{DwError, DwResult};
/// Re-export generation configuration types.
pub use generation::{FillMode, GenerationConfig, TerrainRatios, TerrainWeights};
/// Re-export geometry types.
pub use geometry::{Point, Vector};
/// Re-export the grid.
pub use grid::WorldGrid;
/// Re-export terrain types.
pub use terrain::{TerrainType, WorldCell};
/// Re-export the world aggregate.
pub use world::World;
