/// Convenience result type used across mediakit.
pub type MediaResult<T> = Result<T, MediaError>;

/// Error taxonomy for decode, layout, render and export operations.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// Invalid caller-provided configuration or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A corrupt or unsupported asset could not be decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// A drawing surface could not be acquired for a render step.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// The caller cancelled a running batch.
    #[error("operation cancelled")]
    Cancelled,

    /// A decode/seek/render step exceeded its time budget.
    #[error("timed out: {0}")]
    TimedOut(String),

    /// No unique archive name could be found for an entry.
    #[error("name collision exhausted: {0}")]
    NameCollisionExhausted(String),

    /// Archive assembly failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// Filesystem or subprocess IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    /// Build a [`MediaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MediaError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MediaError::RenderSurfaceUnavailable`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::RenderSurfaceUnavailable(msg.into())
    }

    /// Build a [`MediaError::TimedOut`] value.
    pub fn timed_out(msg: impl Into<String>) -> Self {
        Self::TimedOut(msg.into())
    }

    /// Build a [`MediaError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }
}

impl From<zip::result::ZipError> for MediaError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
