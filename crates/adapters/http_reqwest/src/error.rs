//! HTTP adapter error types.

use feederdash_domain::error::FeederError;

/// Errors specific to the reqwest adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request to feeder failed")]
    Request(#[from] reqwest::Error),

    /// The feeder answered with a non-2xx status.
    #[error("feeder answered HTTP {0}")]
    Status(u16),
}

impl HttpError {
    /// Convert into a [`FeederError`] for propagation across port boundaries.
    pub fn into_domain(self) -> FeederError {
        match self {
            Self::Status(code) => FeederError::Status(code),
            other => FeederError::Transport(Box::new(other)),
        }
    }
}

impl From<HttpError> for FeederError {
    fn from(err: HttpError) -> Self {
        err.into_domain()
    }
}
