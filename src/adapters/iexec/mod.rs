//! iExec adapters: the task environment of a confidential-computing worker.
//!
//! - `dataset`: the DataProtector dataset as a profile source
//! - `output`: the task output directory and the `computed.json` manifest
//! - `secrets`: developer/requester secrets, reported redacted only
//!
//! The worker runtime, attestation and dataset decryption happen outside
//! this process; these adapters only consume what the worker provides.

mod dataset;
mod output;
pub mod secrets;

pub use dataset::{draft_from_document, get_value, IexecDatasetSource};
pub use output::{IexecOutput, ManifestGuard, MANIFEST_FILE};
pub use secrets::TaskSecrets;
