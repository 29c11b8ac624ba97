/// Convenience result type used across sheetloop.
pub type SheetResult<T> = Result<T, SheetError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    /// Invalid caller-provided data or a call made in the wrong state.
    #[error("validation error: {0}")]
    Validation(String),

    /// The image source collaborator could not decode a sprite sheet.
    #[error("decode error: {0}")]
    Decode(String),

    /// Drawing a frame into a surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// The frame-encoding collaborator failed or produced no artifact.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration changes are locked while an export is in flight.
    #[error("busy: {0}")]
    Busy(String),

    /// An in-flight export observed its cancellation token.
    #[error("export cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// Build a [`SheetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SheetError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SheetError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SheetError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SheetError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
