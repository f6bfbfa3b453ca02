/// Convenience result type used across coursemap.
pub type CourseResult<T> = Result<T, CourseError>;

/// Error taxonomy for the outer surfaces of the engine.
///
/// Engine computations over parsed values never fail; malformed course data is filtered or
/// defaulted instead. These variants cover configuration, document reading and rendering.
#[derive(thiserror::Error, Debug)]
pub enum CourseError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input text that could not be read as a document at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors while turning a scene into pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CourseError {
    /// Build a [`CourseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CourseError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`CourseError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CourseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
