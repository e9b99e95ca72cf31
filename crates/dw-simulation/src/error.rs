use dw_core::DwError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the scheduler, its systems, and navigation workers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// `start`, `resume` or `step` on a cancelled scheduler.
    #[error("cannot restart a cancelled scheduler")]
    Lifecycle,

    /// A second system was registered under an existing name.
    #[error("a system named '{0}' is already registered")]
    DuplicateSystem(String),

    /// A system failed during a tick.
    #[error("system error: {0}")]
    System(String),

    /// A navigation worker thread could not be started.
    #[error("navigation worker failed to start: {0}")]
    Worker(String),

    /// An error from the core data model.
    #[error(transparent)]
    Core(#[from] DwError),
}
