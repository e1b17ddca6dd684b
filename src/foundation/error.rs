/// Result type used across the compositor's fallible APIs.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Errors surfaced by configuration, trace and serialization APIs.
///
/// Event handlers never return these: a window that vanishes mid-query is
/// logged and skipped.
#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    /// Invalid effect configuration: unknown names or out-of-range options.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid replay trace data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompositorError {
    /// Build a [`CompositorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CompositorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CompositorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CompositorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
