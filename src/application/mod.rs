//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the scoring task end to end.

mod assessment;
mod pipeline;
pub mod report;
mod resolver;

pub use assessment::AssessmentService;
pub use pipeline::{failure_manifest, RiskPipeline};
pub use resolver::InputResolver;
