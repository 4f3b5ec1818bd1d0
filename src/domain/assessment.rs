//! Risk assessment result types.
//!
//! Represents the output of the genotype risk scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::profile::SubjectProfile;

/// Risk level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant genetic indicators",
            Self::Medium => "Medium risk - Follow-up screening recommended",
            Self::High => "High risk - Professional consultation advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low Risk"),
            Self::Medium => write!(f, "Medium Risk"),
            Self::High => write!(f, "High Risk"),
        }
    }
}

/// Which input source supplied the profile. Reported for audit purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// DataProtector dataset delivered by the platform
    ProtectedData,
    /// Positional command-line arguments
    Args,
    /// Argument string from the environment
    EnvArgs,
    /// Built-in demo values
    Demo,
}

impl DataSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProtectedData => "protected_data",
            Self::Args => "args",
            Self::EnvArgs => "env_args",
            Self::Demo => "demo",
        }
    }

    /// Whether the profile came from platform-protected storage.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::ProtectedData)
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score breakdown produced by a risk model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Weighted sum of the encoded genotypes
    pub base: f64,
    pub age_multiplier: f64,
    pub gender_multiplier: f64,
    /// `base * age_multiplier * gender_multiplier`
    pub score: f64,
    /// Normalized probability in [0, 1]
    pub probability: f64,
    pub level: RiskLevel,
}

/// Complete assessment record including metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub profile: SubjectProfile,
    pub source: DataSource,
    pub score: RiskScore,
    /// Per-locus interpretation, keyed by rsID
    pub risk_factors: BTreeMap<String, String>,
    pub recommendations: Vec<String>,
    /// Confidence in the analysis (0.0 to 1.0)
    pub confidence: f64,
    /// Name of the model that produced the score
    pub model: String,
    /// SHA-256 of the model parameter file, when one was loaded
    pub model_fingerprint: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RiskAssessment {
    #[must_use]
    pub fn level(&self) -> RiskLevel {
        self.score.level
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.score.probability
    }
}
