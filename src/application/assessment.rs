//! Assessment service: Orchestrates scoring of a resolved profile.
//!
//! This service coordinates:
//! - Risk scoring through the injected model
//! - Interpretation (risk factors, recommendations, confidence)
//! - Result metadata (source, model, timestamp)

use crate::domain::{insights, DataSource, RiskAssessment, SubjectProfile};
use crate::ports::RiskModel;

/// Service for scoring subject profiles.
pub struct AssessmentService<M>
where
    M: RiskModel,
{
    model: M,
}

impl<M> AssessmentService<M>
where
    M: RiskModel,
{
    /// Create a new assessment service.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Score a profile and build the full assessment.
    #[must_use]
    pub fn assess(&self, profile: SubjectProfile, source: DataSource) -> RiskAssessment {
        tracing::info!("Scoring profile from {source} with model {}", self.model.name());
        tracing::debug!("Encoded genotypes: {:?}", profile.genotypes.codes());

        let score = self.model.score(&profile);
        tracing::debug!(
            "base={:.4}, age_multiplier={:.2}, gender_multiplier={:.2}, score={:.4}",
            score.base,
            score.age_multiplier,
            score.gender_multiplier,
            score.score
        );

        let risk_factors = insights::risk_factors(&profile.genotypes);
        let recommendations = insights::recommendations(score.level, &profile);
        let confidence = insights::confidence(profile.age);

        tracing::info!(
            "Assessment complete: risk={}, probability={:.4}, confidence={:.2}",
            score.level,
            score.probability,
            confidence
        );

        RiskAssessment {
            profile,
            source,
            score,
            risk_factors,
            recommendations,
            confidence,
            model: self.model.name().to_string(),
            model_fingerprint: self.model.fingerprint().map(str::to_string),
            created_at: chrono::Utc::now(),
        }
    }
}
