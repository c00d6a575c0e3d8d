//! Error types for mock configuration and client execution.

use thiserror::Error;

use crate::mock::ExecutionShape;

/// Errors that can occur while configuring mocks or executing requests.
#[derive(Debug, Error)]
pub enum RestMockError {
    /// A payload could not be serialized to JSON, or a response body could
    /// not be parsed.
    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The client executed a shape that no response was bound to.
    #[error("no mock response bound for '{shape}'; bind one with the matching mock_* call first")]
    NoBinding {
        /// The execution shape that was invoked.
        shape: ExecutionShape,
    },

    /// A verb string passed to an `execute_as_*` call is not a known HTTP method.
    #[error("'{0}' is not a valid HTTP method")]
    InvalidMethod(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The request was cancelled through its cancellation token.
    #[error("request cancelled")]
    Cancelled,
}

/// Result type alias for restmock operations.
pub type Result<T> = core::result::Result<T, RestMockError>;
