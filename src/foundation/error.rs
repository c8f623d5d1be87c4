/// Convenience result type used across underlay.
pub type UnderlayResult<T> = Result<T, UnderlayError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum UnderlayError {
    /// Invalid user-provided layer or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A raster input could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal render invariant failed (buffer sizes, surface limits).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UnderlayError {
    /// Build a [`UnderlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UnderlayError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`UnderlayError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`UnderlayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error is a raster decode failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Outcome of handing an asynchronous result back to a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The result belonged to the current scene and was stored.
    Applied,
    /// The scene moved on before the result arrived; it was discarded.
    Stale,
}

/// Outcome of a layer mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// A matching layer was found and changed.
    Applied,
    /// No layer with the requested id exists; nothing changed.
    Noop,
}

impl Mutation {
    /// Whether the mutation changed anything.
    pub fn changed(self) -> bool {
        self == Self::Applied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
