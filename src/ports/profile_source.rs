//! Profile source port: Trait for the places a subject profile can come from.
//!
//! Following the platform contract, sources are tried in a fixed priority
//! order. Each adapter only knows how to read its own input.

use crate::domain::{DataSource, ProfileDraft, ValidationError};

/// Errors that can occur while reading a profile source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source is not present in this run (nothing configured, no input).
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The source is present but lacks required fields.
    #[error("Source incomplete: missing {0}")]
    Incomplete(String),

    /// The source is present but cannot be parsed. Treated like an
    /// unavailable source during resolution.
    #[error("Malformed source data: {0}")]
    Malformed(String),

    /// The source holds values that fail validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Whether resolution should move on to the next source.
    #[must_use]
    pub fn is_fall_through(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Incomplete(_) | Self::Malformed(_)
        )
    }
}

/// Trait for profile input sources.
pub trait ProfileSource {
    /// Tag reported when this source supplies the profile.
    fn kind(&self) -> DataSource;

    /// Read a complete profile draft.
    ///
    /// # Errors
    /// Returns `Unavailable`, `Incomplete` or `Malformed` when resolution
    /// should fall through to the next source; any other error aborts
    /// resolution.
    fn load(&self) -> Result<ProfileDraft, SourceError>;
}
