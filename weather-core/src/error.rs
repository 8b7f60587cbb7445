use thiserror::Error;

/// Failure of a weather API call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The provider answered with a structured error; the message is meant for the user.
    #[error("{0}")]
    Provider(String),

    /// Network, status or parse failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(format!("invalid JSON: {err}"))
    }
}

/// Failure of the geolocation capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}
