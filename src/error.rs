//! Failure taxonomy for backend requests.
//!
//! Every loader catches a [`FetchError`] locally and turns it into an
//! inline message for its own panel; nothing is propagated to siblings.

use thiserror::Error;

/// Backend message for a request made without a session.
pub const NOT_LOGGED_IN_MESSAGE: &str = "User not logged in";
/// Backend message for a rejected login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Login failed: invalid credentials";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("backend returned HTTP {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("response body is not valid JSON")]
    MalformedJson,

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("user not logged in")]
    NotLoggedIn,

    #[error("invalid credentials")]
    InvalidCredentials,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl FetchError {
    /// Build the error for a non-success HTTP status.
    ///
    /// Credential failures are only recognizable by the backend's literal
    /// message text, so the detail is matched before falling back to
    /// [`FetchError::Status`].
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match detail.as_deref().map(str::trim) {
            Some(NOT_LOGGED_IN_MESSAGE) => FetchError::NotLoggedIn,
            Some(INVALID_CREDENTIALS_MESSAGE) => FetchError::InvalidCredentials,
            _ => FetchError::Status { status, detail },
        }
    }

    /// True for failures where the server answered with well-formed JSON
    /// that did not match the expected envelope.
    pub fn is_unexpected_shape(&self) -> bool {
        matches!(self, FetchError::UnexpectedShape(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
