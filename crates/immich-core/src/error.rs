//! Error taxonomy for calls against the Immich API.

/// All errors produced by the Immich client layer.
#[derive(thiserror::Error, Debug)]
pub enum ImmichError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Immich returned HTTP {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImmichError {
    /// HTTP status code, if the remote API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ImmichError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The remote API explicitly rejected the credential.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ImmichError::Config(_) => "config",
            ImmichError::Transport { .. } => "transport",
            ImmichError::Status { .. } if self.is_auth_failure() => "auth",
            ImmichError::Status { .. } => "status",
            ImmichError::Decode { .. } | ImmichError::MalformedResponse { .. } => "malformed",
            ImmichError::InvalidArgument(_) => "invalid_argument",
            ImmichError::Io(_) => "io",
        }
    }
}

pub type ImmichResult<T> = Result<T, ImmichError>;
