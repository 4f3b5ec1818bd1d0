//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (platform inputs, the
//! scoring policy, the output directory).

mod output;
mod profile_source;
mod risk_model;

pub use output::{Manifest, OutputError, OutputStore};
pub use profile_source::{ProfileSource, SourceError};
pub use risk_model::RiskModel;
