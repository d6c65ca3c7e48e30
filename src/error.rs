// Transport error taxonomy
use thiserror::Error;

/// Failure of a backend call. Validation problems never show up here; they
/// stay in [`crate::validation::ValidationErrors`] and never reach the network.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing session token, or the backend answered 401.
    #[error("{0}")]
    Authentication(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Success status but the body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Connection, timeout or body read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Session(#[from] crate::session::SessionError),
}

impl ClientError {
    pub fn authentication(message: impl Into<String>) -> Self {
        ClientError::Authentication(message.into())
    }

    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        ClientError::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    /// HTTP status, when the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Authentication(_) => Some(401),
            ClientError::RequestFailed { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            ClientError::Decode(_) | ClientError::InvalidUrl(_) | ClientError::Session(_) => None,
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Authentication(_) => "AUTHENTICATION_ERROR",
            ClientError::RequestFailed { .. } => "REQUEST_FAILED",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Session(_) => "SESSION_ERROR",
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
