//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and implement strict validation.

mod assessment;
mod genotype;
pub mod insights;
mod profile;

pub use assessment::{DataSource, RiskAssessment, RiskLevel, RiskScore};
pub use genotype::{encode, valid_genotypes, Genotype, GenotypeError, GenotypePanel, Locus};
pub use profile::{Gender, ProfileDraft, ProfileError, SubjectProfile, ValidationError, MAX_AGE};
