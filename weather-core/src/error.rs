use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a weather lookup. The client never recovers locally.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// City name was empty after trimming; no request was sent.
    #[error("City name must not be empty")]
    EmptyCity,

    /// The HTTP client itself could not be set up, e.g. the TLS backend
    /// failed to initialise. No request was attempted.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// DNS, connection or body transfer failure.
    #[error("Weather service unreachable: {0}")]
    NetworkUnavailable(#[source] reqwest::Error),

    #[error("Weather request timed out after {0:?}")]
    Timeout(Duration),

    #[error("City '{city}' was not found by the weather service")]
    NotFound { city: String },

    #[error("Weather request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// 2xx response whose body does not have the expected shape.
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherError::NetworkUnavailable(_) | WeatherError::Timeout(_) => true,
            WeatherError::Http { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WeatherError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            WeatherError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
