/// Convenience result type used across gesso.
pub type GessoResult<T> = Result<T, GessoError>;

/// Top-level error taxonomy used by surface and device APIs.
///
/// Every error is signaled synchronously at the offending call and is fatal to
/// that operation only; the surface stays in its prior valid state.
#[derive(thiserror::Error, Debug)]
pub enum GessoError {
    /// Operation on a surface that has already been disposed.
    #[error("surface is disposed")]
    Disposed,

    /// GPU-path operation on an oversized (CPU-resident) surface.
    #[error("operation not supported for oversized surfaces: {0}")]
    Oversized(String),

    /// Surface construction with non-positive dimensions.
    #[error("invalid surface dimensions: {0}x{1}")]
    InvalidDimensions(i32, i32),

    /// The texture pool or device could not satisfy an allocation.
    #[error("texture allocation failed: {0}")]
    Exhausted(String),

    /// Malformed image input.
    #[error("image decode error: {0}")]
    Decode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GessoError {
    /// Build a [`GessoError::Oversized`] value naming the rejected operation.
    pub fn oversized(op: impl Into<String>) -> Self {
        Self::Oversized(op.into())
    }

    /// Build a [`GessoError::Exhausted`] value.
    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::Exhausted(msg.into())
    }

    /// Build a [`GessoError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
