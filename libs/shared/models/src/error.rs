use thiserror::Error;

/// Transport-level error taxonomy shared by every remote call.
///
/// The server is the final authority on authorization and validation; this
/// taxonomy only classifies its answers so callers can decide whether the
/// failure is recoverable (fix input, re-authenticate, retry manually).
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl ClientError {
    /// Map a non-success HTTP status and its server-provided message onto
    /// the taxonomy. The message is surfaced verbatim to the user.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => ClientError::Validation(message),
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
