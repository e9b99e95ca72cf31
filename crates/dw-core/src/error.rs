use crate::entity::NodeId;

/// Alias for `Result<T, DwError>`.
pub type DwResult<T> = Result<T, DwError>;

/// Errors that can occur when building or manipulating a world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DwError {
    /// Malformed construction input: ASCII map dimensions, weights,
    /// probabilities, or grid sizes.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A numeric range whose lower bound is not below its upper bound.
    #[error("invalid range: lowest {lowest} must be below highest {highest}")]
    InvalidRange {
        /// The requested lower bound.
        lowest: i64,
        /// The requested upper bound.
        highest: i64,
    },

    /// The requested node does not exist in the world.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

impl DwError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
