/// Convenience result type used across sizegate.
pub type SizegateResult<T> = Result<T, SizegateError>;

/// Top-level error taxonomy used by tracker APIs.
///
/// Only configuration problems are ever surfaced. Notifications that are dropped by the gate
/// (off-screen or unchanged sizes) are not errors and never reach this type.
#[derive(thiserror::Error, Debug)]
pub enum SizegateError {
    /// Invalid region or tracker configuration, e.g. a malformed root margin.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The platform cannot provide one of the two required signal sources.
    #[error("unsupported platform: {0}")]
    Unsupported(String),

    /// Errors when serializing or deserializing configuration documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SizegateError {
    /// Build a [`SizegateError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`SizegateError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`SizegateError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that are caused by caller-provided configuration.
    ///
    /// Both variants are fatal at attach time; retrying with the same inputs cannot succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Unsupported(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
