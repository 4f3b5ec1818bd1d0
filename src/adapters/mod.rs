//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with the outside world:
//! - `iexec`: the platform dataset, output directory and task secrets
//! - `args`: command-line, environment and demo profile sources
//! - `linear`: the weighted-sum risk model
//! - `sanitize`: secret filtering for logs

pub mod args;
pub mod iexec;
pub mod linear;
pub mod sanitize;

// Re-export model error for lib.rs
pub use linear::ModelError;
