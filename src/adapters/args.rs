//! Argument adapters: profile sources backed by plain arguments.
//!
//! - `ArgsSource`: positional command-line arguments
//! - `EnvArgsSource`: the argument string from the environment
//! - `DemoSource`: fixed demo values, always available
//!
//! Arguments follow `genotype1 genotype2 genotype3 [age] [gender]`.

use crate::domain::{DataSource, ProfileDraft, ValidationError};
use crate::ports::{ProfileSource, SourceError};

/// Demo genotypes used when no input is supplied at all.
pub const DEMO_GENOTYPES: [&str; 3] = ["AA", "CC", "TT"];

/// Build a draft from positional values.
///
/// No values means the source is absent. Some but not all genotypes is a
/// caller mistake and is reported as a missing field rather than skipped.
fn draft_from_values<S: AsRef<str>>(values: &[S], what: &str) -> Result<ProfileDraft, SourceError> {
    if values.is_empty() {
        return Err(SourceError::Unavailable(format!("no {what}")));
    }
    let draft = ProfileDraft::from_positional(values)?;
    if let Some(locus) = draft.missing_loci().first() {
        return Err(ValidationError::MissingField(locus.id().to_string()).into());
    }
    Ok(draft)
}

/// Positional command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgsSource {
    args: Vec<String>,
}

impl ArgsSource {
    #[must_use]
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl ProfileSource for ArgsSource {
    fn kind(&self) -> DataSource {
        DataSource::Args
    }

    fn load(&self) -> Result<ProfileDraft, SourceError> {
        tracing::info!("Received {} args", self.args.len());
        draft_from_values(&self.args, "positional arguments")
    }
}

/// Whitespace-separated argument string from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvArgsSource {
    raw: Option<String>,
}

impl EnvArgsSource {
    #[must_use]
    pub fn new(raw: Option<String>) -> Self {
        Self { raw }
    }
}

impl ProfileSource for EnvArgsSource {
    fn kind(&self) -> DataSource {
        DataSource::EnvArgs
    }

    fn load(&self) -> Result<ProfileDraft, SourceError> {
        let values: Vec<&str> = self
            .raw
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();
        draft_from_values(&values, "environment arguments")
    }
}

/// Fixed demo profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl ProfileSource for DemoSource {
    fn kind(&self) -> DataSource {
        DataSource::Demo
    }

    fn load(&self) -> Result<ProfileDraft, SourceError> {
        Ok(ProfileDraft::from_positional(&DEMO_GENOTYPES)?)
    }
}
