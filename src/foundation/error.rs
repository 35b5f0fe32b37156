/// Convenience result type used across the overlay engine.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by engine APIs.
///
/// "Object not visible" and "no telemetry sample" are never errors; they are normal skip
/// conditions reported through [`crate::RenderOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Scene data violates an invariant checked by [`crate::Scene::validate`].
    #[error("validation error: {0}")]
    Validation(String),

    /// A collaborator could not obtain or decode a resource (vector document, map tile, font).
    #[error("load error: {0}")]
    Load(String),

    /// A resource was decoded but drawing it failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build an [`OverlayError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
