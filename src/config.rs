//! Run configuration read from the task environment.
//!
//! The iExec worker describes each task through environment variables. They
//! are read once at startup into [`RunConfig`]; nothing else in the crate
//! touches the process environment except the secret reader.

use std::path::PathBuf;

/// Output directory for result files and `computed.json`.
pub const OUTPUT_DIR_ENV: &str = "IEXEC_OUT";
/// Input directory holding the dataset and input files.
pub const INPUT_DIR_ENV: &str = "IEXEC_IN";
/// File name of the protected dataset inside the input directory.
pub const DATASET_FILENAME_ENV: &str = "IEXEC_DATASET_FILENAME";
/// Number of additional input files.
pub const INPUT_FILES_NUMBER_ENV: &str = "IEXEC_INPUT_FILES_NUMBER";
/// Prefix of the per-file name variables (`IEXEC_INPUT_FILE_NAME_1`, ...).
pub const INPUT_FILE_NAME_PREFIX: &str = "IEXEC_INPUT_FILE_NAME_";
/// Argument string used when no positional arguments were given.
pub const ARGS_ENV: &str = "IEXEC_ARGS";

/// Optional model parameter file.
pub const MODEL_PATH_ENV: &str = "PRIVATEGENOME_MODEL_PATH";
/// `text` or `json`.
pub const OUTPUT_FORMAT_ENV: &str = "PRIVATEGENOME_OUTPUT_FORMAT";
/// `stdout` or `file`.
pub const LOG_MODE_ENV: &str = "PRIVATEGENOME_LOG_MODE";
pub const LOG_FILE_ENV: &str = "PRIVATEGENOME_LOG_FILE";

const DEFAULT_OUTPUT_DIR: &str = "/iexec_out";
const DEFAULT_INPUT_DIR: &str = "/iexec_in";

/// Upper bound on `IEXEC_INPUT_FILES_NUMBER`.
const MAX_INPUT_FILES: usize = 64;

/// Format of the result artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable `result.txt`
    #[default]
    Text,
    /// Structured `result.json`
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Text => "result.txt",
            Self::Json => "result.json",
        }
    }
}

/// Task configuration provided by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub input_dir: PathBuf,
    /// Full path of the protected dataset, if one was attached
    pub dataset_file: Option<PathBuf>,
    /// Additional input files as `(index, name)`, index starting at 1
    pub input_files: Vec<(usize, String)>,
    /// Raw argument string from the environment
    pub env_args: Option<String>,
}

impl RunConfig {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Only the output directory. Logs nothing, so it is safe to call
    /// before the subscriber is installed.
    #[must_use]
    pub fn output_dir_from_env() -> PathBuf {
        Self::output_dir_from_lookup(|key| std::env::var(key).ok())
    }

    fn output_dir_from_lookup<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(OUTPUT_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from)
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let output_dir = Self::output_dir_from_lookup(&lookup);
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let input_dir = non_empty(INPUT_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR), PathBuf::from);

        let dataset_file = non_empty(DATASET_FILENAME_ENV).map(|name| input_dir.join(name.trim()));

        let count = non_empty(INPUT_FILES_NUMBER_ENV)
            .and_then(|v| match v.trim().parse::<usize>() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {INPUT_FILES_NUMBER_ENV}={v:?}");
                    None
                }
            })
            .unwrap_or(0);
        if count > MAX_INPUT_FILES {
            tracing::warn!("{INPUT_FILES_NUMBER_ENV}={count} exceeds {MAX_INPUT_FILES}, truncating");
        }
        let input_files = (1..=count.min(MAX_INPUT_FILES))
            .filter_map(|i| {
                non_empty(&format!("{INPUT_FILE_NAME_PREFIX}{i}")).map(|name| (i, name))
            })
            .collect();

        Self {
            output_dir,
            input_dir,
            dataset_file,
            input_files,
            env_args: non_empty(ARGS_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RunConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RunConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.output_dir, PathBuf::from("/iexec_out"));
        assert_eq!(cfg.input_dir, PathBuf::from("/iexec_in"));
        assert!(cfg.dataset_file.is_none());
        assert!(cfg.input_files.is_empty());
        assert!(cfg.env_args.is_none());
    }

    #[test]
    fn test_platform_variables() {
        let cfg = config(&[
            ("IEXEC_OUT", "/out"),
            ("IEXEC_IN", "/in"),
            ("IEXEC_DATASET_FILENAME", "genome.json"),
            ("IEXEC_INPUT_FILES_NUMBER", "2"),
            ("IEXEC_INPUT_FILE_NAME_1", "a.csv"),
            ("IEXEC_INPUT_FILE_NAME_2", "b.csv"),
            ("IEXEC_ARGS", "AA CC TT"),
        ]);
        assert_eq!(cfg.output_dir, PathBuf::from("/out"));
        assert_eq!(cfg.dataset_file, Some(PathBuf::from("/in/genome.json")));
        assert_eq!(
            cfg.input_files,
            vec![(1, "a.csv".to_string()), (2, "b.csv".to_string())]
        );
        assert_eq!(cfg.env_args.as_deref(), Some("AA CC TT"));
    }

    #[test]
    fn test_blank_and_invalid_values_are_ignored() {
        let cfg = config(&[
            ("IEXEC_DATASET_FILENAME", "  "),
            ("IEXEC_INPUT_FILES_NUMBER", "many"),
            ("IEXEC_ARGS", ""),
        ]);
        assert!(cfg.dataset_file.is_none());
        assert!(cfg.input_files.is_empty());
        assert!(cfg.env_args.is_none());
    }

    #[test]
    fn test_missing_input_file_names_are_skipped() {
        let cfg = config(&[
            ("IEXEC_INPUT_FILES_NUMBER", "3"),
            ("IEXEC_INPUT_FILE_NAME_2", "only.csv"),
        ]);
        assert_eq!(cfg.input_files, vec![(2, "only.csv".to_string())]);
    }

    #[test]
    fn test_output_dir_alone_matches_full_config() {
        let lookup = |k: &str| (k == OUTPUT_DIR_ENV).then(|| "/task/out".to_string());
        assert_eq!(RunConfig::output_dir_from_lookup(lookup), PathBuf::from("/task/out"));
        assert_eq!(RunConfig::from_lookup(lookup).output_dir, PathBuf::from("/task/out"));
        assert_eq!(RunConfig::output_dir_from_lookup(|_| None), PathBuf::from("/iexec_out"));
    }

    #[test]
    fn test_output_format_file_names() {
        assert_eq!(OutputFormat::Text.file_name(), "result.txt");
        assert_eq!(OutputFormat::Json.file_name(), "result.json");
    }
}
