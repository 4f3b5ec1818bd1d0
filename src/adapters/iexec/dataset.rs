//! Protected dataset source.
//!
//! The DataProtector dataset is delivered by the worker as a file inside the
//! task input directory. Values are addressed by dotted path, the way the
//! platform deserializer's `getValue` does. Three layouts are understood:
//!
//! - nested: `{"genome": {"rs1801133": "AA", ...}, "age": 42}`
//! - flat: `{"rs1801133": "AA", "rs7412": "CC", ...}`
//! - mock: `{"genomicData": "{\"rs1801133\": \"AA\", ...}"}`

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{DataSource, Locus, ProfileDraft};
use crate::ports::{ProfileSource, SourceError};

/// Upper bound on the dataset file size.
const MAX_DATASET_BYTES: u64 = 1024 * 1024;

/// Field holding a JSON-encoded document in the mock layout.
const MOCK_DOCUMENT_FIELD: &str = "genomicData";

/// Resolve a dotted path (`genome.rs7412`) inside a JSON document.
#[must_use]
pub fn get_value<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |node, key| node.as_object()?.get(key))
}

/// Read a scalar as a string; numbers are accepted for numeric fields.
/// Blank strings count as absent, like `null`.
fn scalar_string(value: &Value, path: &str) -> Result<Option<String>, SourceError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(SourceError::Malformed(format!(
            "{path}: expected a string, got {other}"
        ))),
    }
}

fn lookup_first(docs: &[Value], paths: &[String]) -> Result<Option<String>, SourceError> {
    for doc in docs {
        for path in paths {
            if let Some(v) = get_value(doc, path) {
                if let Some(s) = scalar_string(v, path)? {
                    return Ok(Some(s));
                }
            }
        }
    }
    Ok(None)
}

/// Extract a draft from a parsed dataset document.
///
/// # Errors
/// Returns `Incomplete` naming the missing loci, or `Malformed` for values
/// of the wrong type.
pub fn draft_from_document(doc: &Value) -> Result<ProfileDraft, SourceError> {
    let mut docs = vec![doc.clone()];
    if let Some(Value::String(embedded)) = get_value(doc, MOCK_DOCUMENT_FIELD) {
        match serde_json::from_str::<Value>(embedded) {
            Ok(inner) => docs.push(inner),
            Err(_) => tracing::warn!("{MOCK_DOCUMENT_FIELD} is not JSON, ignoring"),
        }
    }

    let mut draft = ProfileDraft::default();
    for locus in Locus::ALL {
        let paths = [format!("genome.{}", locus.id()), locus.id().to_string()];
        draft.genotypes[locus.index()] = lookup_first(&docs, &paths)?;
    }
    draft.age = lookup_first(&docs, &["age".into(), "genome.age".into()])?;
    draft.gender = lookup_first(&docs, &["gender".into(), "genome.gender".into()])?;

    let missing = draft.missing_loci();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(Locus::id).collect();
        return Err(SourceError::Incomplete(names.join(", ")));
    }
    Ok(draft)
}

/// Profile source reading the protected dataset file.
#[derive(Debug, Clone)]
pub struct IexecDatasetSource {
    path: Option<PathBuf>,
}

impl IexecDatasetSource {
    /// `path` is `None` when no dataset was attached to the task.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn read_document(path: &Path) -> Result<Value, SourceError> {
        let meta = std::fs::metadata(path)
            .map_err(|e| SourceError::Unavailable(format!("{path:?}: {e}")))?;
        if meta.len() > MAX_DATASET_BYTES {
            return Err(SourceError::Malformed(format!(
                "dataset is {} bytes, max {MAX_DATASET_BYTES}",
                meta.len()
            )));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| SourceError::Unavailable(format!("{path:?}: {e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

impl ProfileSource for IexecDatasetSource {
    fn kind(&self) -> DataSource {
        DataSource::ProtectedData
    }

    fn load(&self) -> Result<ProfileDraft, SourceError> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| SourceError::Unavailable("no protected dataset attached".into()))?;

        tracing::info!("Reading protected dataset");
        let doc = Self::read_document(path)?;
        let draft = draft_from_document(&doc)?;
        tracing::debug!("Protected genotypes: {:?}", draft.genotypes);
        Ok(draft)
    }
}
