use crate::numeral::NumeralError;

/// Convenience result type used across gongju.
pub type GongjuResult<T> = Result<T, GongjuError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum GongjuError {
    /// Invalid user-provided options or job data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A numeric amount could not be parsed for conversion.
    #[error("numeral error: {0}")]
    Numeral(#[from] NumeralError),

    /// Rasterization or compositing failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GongjuError {
    /// Build a [`GongjuError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GongjuError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GongjuError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
