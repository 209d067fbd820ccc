// Client error types shared by the transport, resources, session and store
use thiserror::Error;

/// Every failure the synchronization layer can surface to a caller
#[derive(Debug, Error)]
pub enum ClientError {
    // Transport failures
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    // 401: the session has already been purged when this is returned
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Any other non-success status, message taken from the server when present
    #[error("{message}")]
    Api { status: u16, message: String },

    // Local failures raised before any network call
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status for errors that came back from the server
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors raised locally, before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated
                | ClientError::InvalidToken(_)
                | ClientError::NotFound(_)
                | ClientError::Unsupported(_)
                | ClientError::Config(_)
                | ClientError::Io(_)
        )
    }

    /// Stable error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Decode(_) => "MALFORMED_RESPONSE",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::InvalidToken(_) => "INVALID_TOKEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Unsupported(_) => "UNSUPPORTED",
            ClientError::Config(_) => "INVALID_CONFIG",
            ClientError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
