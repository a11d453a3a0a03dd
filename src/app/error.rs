use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the news API rejects a request with HTTP 429.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Message shown when a failure carries no text of its own.
pub const FALLBACK_MESSAGE: &str = "An error occurred while fetching the news.";

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Auth(String),

    #[error("No user is currently signed in")]
    NotSignedIn,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl NewsError {
    pub fn is_rate_limited(&self) -> bool {
        match self {
            NewsError::RateLimited => true,
            NewsError::Api { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS.as_u16(),
            NewsError::Http(e) => e.status() == Some(StatusCode::TOO_MANY_REQUESTS),
            _ => false,
        }
    }

    /// Text suitable for an inline error line in the UI.
    pub fn user_message(&self) -> String {
        if self.is_rate_limited() {
            return RATE_LIMIT_MESSAGE.to_string();
        }

        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

// Request urls carry API keys in their query string
impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        NewsError::Http(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
