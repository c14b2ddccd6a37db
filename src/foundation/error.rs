/// Convenience result type used across msem-thumb.
pub type MsemResult<T> = Result<T, MsemError>;

/// Top-level error taxonomy used by library APIs.
///
/// Only [`MsemError::CardNotFound`] is meant to be recovered from: batch callers skip the card
/// and continue. Everything else is an input or environment defect that ends the run.
#[derive(thiserror::Error, Debug)]
pub enum MsemError {
    /// A required path input was absent or empty.
    #[error("config error: {0}")]
    Config(String),

    /// Exact-match catalog lookup missed.
    #[error("[{name}] not found in cards.xml")]
    CardNotFound {
        /// Card name exactly as requested.
        name: String,
    },

    /// Malformed catalog or thumbnail configuration content.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when deserializing configuration documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies, IO or the network.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MsemError {
    /// Build a [`MsemError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MsemError::CardNotFound`] value.
    pub fn card_not_found(name: impl Into<String>) -> Self {
        Self::CardNotFound { name: name.into() }
    }

    /// Build a [`MsemError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MsemError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for a catalog lookup miss.
    pub fn is_card_not_found(&self) -> bool {
        matches!(self, Self::CardNotFound { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
