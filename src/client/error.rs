//! Error types for the health client.

use thiserror::Error;

/// Errors that can occur while fetching a health snapshot.
#[derive(Debug, Clone, Error)]
pub enum HealthError {
    /// The request never completed (connect failure, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status of 400 or above.
    #[error("server returned HTTP {0}")]
    Server(u16),

    /// The body was not valid health snapshot JSON.
    #[error("invalid health body: {0}")]
    Parse(String),
}
