//! # PrivateGenome
//!
//! Genotype risk scoring for confidential-computing tasks.
//!
//! This crate provides:
//! - Resolution of one subject profile from the task's input sources
//! - Genotype encoding and a linear polygenic risk score
//! - Text or JSON result artifacts plus the `computed.json` manifest
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Genotype, SubjectProfile, RiskAssessment)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (iExec platform, CLI arguments, linear model)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Task configuration from the environment

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::{DataSource, RiskAssessment, RiskLevel, SubjectProfile};

/// Result type for PrivateGenome operations
pub type Result<T> = std::result::Result<T, GenomeRiskError>;

/// Main error type for PrivateGenome
#[derive(Debug, thiserror::Error)]
pub enum GenomeRiskError {
    #[error(transparent)]
    Genotype(#[from] domain::GenotypeError),

    #[error("Invalid input: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Input source error: {0}")]
    Source(ports::SourceError),

    #[error(transparent)]
    Model(#[from] adapters::ModelError),

    #[error("Output error: {0}")]
    Output(#[from] ports::OutputError),
}

impl From<domain::ProfileError> for GenomeRiskError {
    fn from(err: domain::ProfileError) -> Self {
        match err {
            domain::ProfileError::Validation(e) => Self::Validation(e),
            domain::ProfileError::Genotype(e) => Self::Genotype(e),
        }
    }
}

impl From<ports::SourceError> for GenomeRiskError {
    fn from(err: ports::SourceError) -> Self {
        match err {
            ports::SourceError::Invalid(e) => Self::Validation(e),
            other => Self::Source(other),
        }
    }
}

impl GenomeRiskError {
    /// Short message for the manifest `error-message` field.
    ///
    /// Never includes genotype values: the manifest is public task metadata.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Genotype(domain::GenotypeError::Invalid { locus, .. }) => {
                format!("Invalid genotype for {locus}")
            }
            Self::Validation(e) => format!("Invalid input: {e}"),
            Self::Source(_) => "Input data could not be read".to_string(),
            Self::Model(adapters::ModelError::Unavailable { .. }) => {
                "Risk model not found".to_string()
            }
            Self::Model(_) => "Risk model is invalid".to_string(),
            Self::Output(_) => "Result could not be written".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenotypeError, Locus, ProfileError, ValidationError};
    use crate::ports::SourceError;

    #[test]
    fn test_source_validation_unwraps() {
        let err: GenomeRiskError =
            SourceError::Invalid(ValidationError::MissingField("rs7412".into())).into();
        assert!(matches!(err, GenomeRiskError::Validation(ValidationError::MissingField(_))));
    }

    #[test]
    fn test_user_message_hides_genotype_value() {
        let err: GenomeRiskError = ProfileError::Genotype(GenotypeError::Invalid {
            locus: Locus::Rs7412,
            value: "XY".into(),
        })
        .into();
        assert_eq!(err.user_message(), "Invalid genotype for rs7412");
        // The detailed message keeps the value for the result artifact.
        assert!(err.to_string().contains("XY"));
    }

    #[test]
    fn test_user_message_model_unavailable() {
        let err: GenomeRiskError = adapters::ModelError::Unavailable {
            path: "/app/model.json".into(),
            reason: "No such file".into(),
        }
        .into();
        assert_eq!(err.user_message(), "Risk model not found");
    }
}
