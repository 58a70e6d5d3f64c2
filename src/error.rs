//! Error types for the faun invocation core.

use thiserror::Error;

/// Result type for faun operations.
pub type FaunResult<T> = Result<T, FaunError>;

/// Errors surfaced by the invocation core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FaunError {
    /// An operation referenced a function name that is not in the registry.
    #[error("function '{0}' is not registered")]
    NotRegistered(String),

    /// Registration was attempted for a name that already exists.
    #[error("function '{0}' is already registered")]
    AlreadyRegistered(String),

    /// A caller-supplied value was rejected before execution.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The handler itself failed while executing.
    #[error("handler '{function}' failed: {message}")]
    Handler { function: String, message: String },

    /// The handler exceeded its configured execution budget.
    #[error("function '{function}' timed out after {timeout_ms}ms")]
    Timeout { function: String, timeout_ms: u64 },

    /// Result retrieval was attempted for a request id that was never issued.
    #[error("unknown request id: {0}")]
    UnknownRequest(String),
}

impl FaunError {
    /// Create a handler failure with function context.
    pub fn handler(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Whether a retry wrapper may re-attempt after this failure.
    ///
    /// Only execution-level failures are retryable; registry-level faults
    /// surface immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FaunError::Handler { .. } | FaunError::Timeout { .. })
    }
}
