/// Convenience result type used across adforge.
pub type AdResult<T> = Result<T, AdError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// No stage retries internally and no stage returns a partial result: the first error aborts
/// the whole generation request.
#[derive(thiserror::Error, Debug)]
pub enum AdError {
    /// Empty or malformed required input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A forbidden token was found in a background prompt fragment.
    #[error("unsafe prompt: {0}")]
    UnsafePrompt(String),

    /// A non-fallback backend was selected for a stage that has no implementation for it.
    #[error("backend unsupported: stage '{stage}' has no '{backend}' implementation")]
    BackendUnsupported {
        /// Pipeline stage name (`segment`, `background`, ...).
        stage: &'static str,
        /// Requested backend name.
        backend: String,
    },

    /// A referenced font or input image does not exist.
    #[error("resource missing: {0}")]
    ResourceMissing(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdError {
    /// Build an [`AdError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`AdError::UnsafePrompt`] value.
    pub fn unsafe_prompt(msg: impl Into<String>) -> Self {
        Self::UnsafePrompt(msg.into())
    }

    /// Build an [`AdError::BackendUnsupported`] value.
    pub fn backend_unsupported(stage: &'static str, backend: impl Into<String>) -> Self {
        Self::BackendUnsupported {
            stage,
            backend: backend.into(),
        }
    }

    /// Build an [`AdError::ResourceMissing`] value.
    pub fn resource_missing(msg: impl Into<String>) -> Self {
        Self::ResourceMissing(msg.into())
    }

    /// Build an [`AdError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for AdError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
