//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`FeederError`]
//! when crossing a port boundary.

/// Boxed source error carried by the IO-flavoured variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every feeder interaction.
#[derive(Debug, thiserror::Error)]
pub enum FeederError {
    /// The request never produced a response (connection refused, timeout, …).
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// The device answered with a non-2xx HTTP status.
    #[error("device responded with HTTP {0}")]
    Status(u16),

    /// The response body was not the JSON shape we expect.
    #[error("failed to decode device response")]
    Decode(#[from] serde_json::Error),

    /// A form value failed local parsing; nothing was sent.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A captured photo could not be persisted locally.
    #[error("storage error")]
    Storage(#[source] BoxError),
}

impl FeederError {
    /// Whether this error was produced locally, before any request was sent.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Storage(_))
    }
}

/// Reasons a config form value can be rejected before sending.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An integer field holds text that does not parse as an integer.
    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger {
        /// Wire name of the offending field.
        field: &'static str,
        /// Raw text as entered.
        value: String,
    },
}
