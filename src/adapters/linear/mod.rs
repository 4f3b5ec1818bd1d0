//! Linear adapter: Implementation of RiskModel as a weighted sum.
//!
//! The score is a weighted sum of the three encoded genotypes, scaled by an
//! age multiplier and a gender multiplier:
//!
//! ```text
//! base        = w1*e1 + w2*e2 + w3*e3
//! score       = base * age_multiplier * gender_multiplier
//! probability = clamp(score / normalizer, 0, 1)
//! ```
//!
//! Default parameters are built in. An operator may ship a JSON parameter
//! file instead; it is validated on load and its SHA-256 fingerprint is
//! reported with every result.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Gender, RiskLevel, RiskScore, SubjectProfile};
use crate::ports::RiskModel;

/// Name reported for the built-in parameters.
pub const DEFAULT_MODEL_NAME: &str = "linear-prs-v1";

/// Upper bound on the parameter file size.
const MAX_MODEL_BYTES: u64 = 64 * 1024;

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found at {path:?}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("Malformed model file: {0}")]
    Malformed(String),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),
}

/// Age multiplier applied strictly above `above` years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub above: u8,
    pub multiplier: f64,
}

/// Parameters of the linear policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    /// Weights for (rs1801133, rs7412, rs429358)
    pub weights: [f64; 3],
    /// Sorted by `above`, ascending
    pub age_bands: Vec<AgeBand>,
    pub female_multiplier: f64,
    /// Scores above this are Medium risk
    pub medium_threshold: f64,
    /// Scores above this are High risk
    pub high_threshold: f64,
    /// Divisor mapping the score to a probability
    pub normalizer: f64,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            weights: [0.3, 0.4, 0.3],
            age_bands: vec![
                AgeBand {
                    above: 40,
                    multiplier: 1.15,
                },
                AgeBand {
                    above: 50,
                    multiplier: 1.3,
                },
            ],
            female_multiplier: 1.1,
            medium_threshold: 0.8,
            high_threshold: 1.2,
            normalizer: 2.5,
        }
    }
}

impl LinearModel {
    /// Check the invariants the scoring relies on.
    ///
    /// Non-negative weights keep the score monotonically non-decreasing in
    /// each encoded genotype.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidParameters` describing the first violation.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid =
            |msg: String| -> Result<(), ModelError> { Err(ModelError::InvalidParameters(msg)) };

        if self.name.trim().is_empty() {
            return invalid("name must not be empty".into());
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return invalid(format!("weights must be finite and >= 0, got {w}"));
        }
        for pair in self.age_bands.windows(2) {
            if pair[0].above >= pair[1].above {
                return invalid("age_bands must be strictly ascending".into());
            }
        }
        if let Some(b) = self
            .age_bands
            .iter()
            .find(|b| !b.multiplier.is_finite() || b.multiplier < 1.0)
        {
            return invalid(format!("age multiplier must be >= 1.0, got {}", b.multiplier));
        }
        if !self.female_multiplier.is_finite() || self.female_multiplier < 1.0 {
            return invalid(format!(
                "female_multiplier must be >= 1.0, got {}",
                self.female_multiplier
            ));
        }
        if !(0.0 <= self.medium_threshold && self.medium_threshold < self.high_threshold)
            || !self.high_threshold.is_finite()
        {
            return invalid(format!(
                "thresholds must satisfy 0 <= medium < high, got {} / {}",
                self.medium_threshold, self.high_threshold
            ));
        }
        if !self.normalizer.is_finite() || self.normalizer <= 0.0 {
            return invalid(format!("normalizer must be > 0, got {}", self.normalizer));
        }
        Ok(())
    }

    /// Multiplier for the given age; unknown age counts as no adjustment.
    #[must_use]
    pub fn age_multiplier(&self, age: Option<u8>) -> f64 {
        let Some(age) = age else {
            return 1.0;
        };
        self.age_bands
            .iter()
            .rev()
            .find(|band| age > band.above)
            .map_or(1.0, |band| band.multiplier)
    }

    #[must_use]
    pub fn gender_multiplier(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Female => self.female_multiplier,
            Gender::Male | Gender::Unknown => 1.0,
        }
    }

    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score > self.high_threshold {
            RiskLevel::High
        } else if score > self.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Score encoded genotypes `(e1, e2, e3)` for the given demographics.
    #[must_use]
    pub fn evaluate(&self, codes: [u8; 3], age: Option<u8>, gender: Gender) -> RiskScore {
        let base: f64 = self
            .weights
            .iter()
            .zip(codes.iter())
            .map(|(w, e)| w * f64::from(*e))
            .sum();
        let age_multiplier = self.age_multiplier(age);
        let gender_multiplier = self.gender_multiplier(gender);
        let score = base * age_multiplier * gender_multiplier;

        RiskScore {
            base,
            age_multiplier,
            gender_multiplier,
            score,
            probability: (score / self.normalizer).clamp(0.0, 1.0),
            level: self.classify(score),
        }
    }
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Linear risk model adapter.
#[derive(Debug, Clone)]
pub struct LinearRiskModel {
    model: LinearModel,
    fingerprint: Option<String>,
}

impl Default for LinearRiskModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRiskModel {
    /// Create an adapter with the built-in parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: LinearModel::default(),
            fingerprint: None,
        }
    }

    /// Create an adapter from explicit parameters.
    ///
    /// # Errors
    /// Returns error if the parameters are invalid.
    pub fn with_model(model: LinearModel) -> Result<Self, ModelError> {
        model.validate()?;
        Ok(Self {
            model,
            fingerprint: None,
        })
    }

    /// Load parameters from a JSON file.
    ///
    /// A configured file that is missing or unreadable is an error; the
    /// built-in parameters are never substituted silently.
    ///
    /// # Errors
    /// Returns `Unavailable` if the file cannot be read, `Malformed` if it is
    /// not a valid parameter document, `InvalidParameters` if validation fails.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let unavailable = |reason: String| ModelError::Unavailable {
            path: path.to_path_buf(),
            reason,
        };

        let meta = std::fs::metadata(path).map_err(|e| unavailable(e.to_string()))?;
        if !meta.is_file() {
            return Err(unavailable("not a regular file".into()));
        }
        if meta.len() > MAX_MODEL_BYTES {
            return Err(ModelError::Malformed(format!(
                "model file is {} bytes, max {MAX_MODEL_BYTES}",
                meta.len()
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| unavailable(e.to_string()))?;
        let model: LinearModel =
            serde_json::from_slice(&bytes).map_err(|e| ModelError::Malformed(e.to_string()))?;
        model.validate()?;

        let fingerprint = sha256_hex_bytes(&bytes);
        tracing::info!(
            "Loaded model {:?} from {:?} (sha256={})",
            model.name,
            path,
            fingerprint
        );

        Ok(Self {
            model,
            fingerprint: Some(fingerprint),
        })
    }

    #[must_use]
    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl RiskModel for LinearRiskModel {
    fn name(&self) -> &str {
        &self.model.name
    }

    fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    fn score(&self, profile: &SubjectProfile) -> RiskScore {
        self.model
            .evaluate(profile.genotypes.codes(), profile.age, profile.gender)
    }
}
