//! Client-side error types for the GridOps dashboard.
//!
//! All failures are non-fatal to the process: handlers catch a
//! `GridOpsError` and write its message into the UI's error slot, leaving
//! prior successful state intact.

use thiserror::Error;

/// The unified error type for the GridOps client stack.
#[derive(Debug, Error)]
pub enum GridOpsError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The response body was not a valid envelope of the expected shape.
    #[error("failed to decode response: {reason}")]
    Decode { reason: String },

    /// The backend answered `ok: false`.
    ///
    /// `message` is the server-supplied error string, or the generic default
    /// when the envelope carried none.
    #[error("{message}")]
    Backend { message: String },

    /// The backend answered `ok: true` but the envelope had no `data`.
    #[error("missing response data")]
    MissingData,

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the GridOps crates.
pub type GridOpsResult<T> = Result<T, GridOpsError>;
