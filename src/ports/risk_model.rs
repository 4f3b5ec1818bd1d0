//! Risk model port: Trait for the risk scoring policy.
//!
//! This trait abstracts the scoring policy from the application logic.

use crate::domain::{RiskScore, SubjectProfile};

/// Trait for risk models.
///
/// Implementations must be pure: the same profile always yields the same
/// score, with `probability` inside [0, 1].
pub trait RiskModel {
    /// Short model name reported alongside the result.
    fn name(&self) -> &str;

    /// SHA-256 fingerprint of the loaded parameters, if they came from a file.
    fn fingerprint(&self) -> Option<&str>;

    /// Score an encoded profile.
    fn score(&self, profile: &SubjectProfile) -> RiskScore;
}
