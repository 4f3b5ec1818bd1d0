//! Task output directory adapter.
//!
//! The worker collects everything under `IEXEC_OUT` and reads
//! `computed.json` to find the deterministic output. A task that exits
//! without that manifest is reported as failed by the platform, so
//! [`ManifestGuard`] makes sure one is written on every exit path.

use std::path::{Path, PathBuf};

use crate::ports::{Manifest, OutputError, OutputStore};

/// Manifest file name expected by the worker.
pub const MANIFEST_FILE: &str = "computed.json";

/// Message used when the process unwinds before committing a manifest.
const UNCOMMITTED_MESSAGE: &str = "Application error occurred";

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_file(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf, OutputError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|e| io_error(&path, e))?;
    Ok(path)
}

fn write_manifest_file(dir: &Path, manifest: &Manifest) -> Result<PathBuf, OutputError> {
    let bytes = serde_json::to_vec(manifest)?;
    write_file(dir, MANIFEST_FILE, &bytes)
}

/// Output store writing into the task output directory.
#[derive(Debug, Clone)]
pub struct IexecOutput {
    dir: PathBuf,
}

impl IexecOutput {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Copy additional input files to `inputFile_<i>` in the output directory,
    /// `i` being the platform index of each `(i, name)` pair.
    ///
    /// Failures are logged and skipped. Returns the paths that were written.
    pub fn copy_input_files(&self, input_dir: &Path, files: &[(usize, String)]) -> Vec<PathBuf> {
        tracing::info!("Received {} input files", files.len());
        let mut copied = Vec::new();

        for (index, name) in files {
            // Names come from the environment; never follow them outside the input dir.
            let Some(file_name) = Path::new(name).file_name() else {
                tracing::warn!("Skipping input file {index}: invalid name");
                continue;
            };
            let source = input_dir.join(file_name);
            let target = self.dir.join(format!("inputFile_{index}"));

            if let Err(e) = std::fs::create_dir_all(&self.dir) {
                tracing::warn!("Cannot create output dir {:?}: {e}", self.dir);
                break;
            }
            match std::fs::copy(&source, &target) {
                Ok(_) => {
                    tracing::info!("Copied input file {index}");
                    copied.push(target);
                }
                Err(e) => tracing::warn!("Failed to copy input file {index}: {e}"),
            }
        }

        copied
    }
}

impl OutputStore for IexecOutput {
    fn output_dir(&self) -> &Path {
        &self.dir
    }

    fn write_result(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, OutputError> {
        let path = write_file(&self.dir, file_name, contents)?;
        tracing::debug!("Wrote {} bytes to {:?}", contents.len(), path);
        Ok(path)
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<(), OutputError> {
        write_manifest_file(&self.dir, manifest)?;
        Ok(())
    }
}

/// RAII guard guaranteeing that `computed.json` exists when the process ends.
///
/// Create it before any other work. [`ManifestGuard::commit`] writes the
/// final manifest; if the guard is dropped uncommitted (early return or
/// panic unwinding), it writes an error manifest pointing at the output
/// directory.
#[derive(Debug)]
pub struct ManifestGuard {
    dir: PathBuf,
    committed: bool,
}

impl ManifestGuard {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            committed: false,
        }
    }

    /// Write the final manifest through `store` and disarm the guard.
    ///
    /// # Errors
    /// Returns error if the manifest cannot be written; the guard then stays
    /// armed and retries with the fallback manifest on drop.
    pub fn commit<S: OutputStore>(mut self, store: &S, manifest: &Manifest) -> Result<(), OutputError> {
        store.write_manifest(manifest)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if std::thread::panicking() {
            tracing::error!("Panic before manifest was committed, writing error manifest");
        } else {
            tracing::warn!("Manifest not committed, writing error manifest");
        }
        let fallback = Manifest::failure(self.dir.clone(), UNCOMMITTED_MESSAGE);
        if let Err(e) = write_manifest_file(&self.dir, &fallback) {
            tracing::error!("Failed to write fallback manifest: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn read_manifest(dir: &Path) -> Manifest {
        let bytes = std::fs::read(dir.join(MANIFEST_FILE)).expect("manifest exists");
        serde_json::from_slice(&bytes).expect("manifest json")
    }

    #[test]
    fn test_write_result_creates_directory() {
        let dir = tempdir().expect("tempdir");
        let out = IexecOutput::new(dir.path().join("nested/out"));
        let path = out.write_result("result.txt", b"hello").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello");
        assert_eq!(path, out.output_dir().join("result.txt"));
    }

    #[test]
    fn test_write_manifest() {
        let dir = tempdir().expect("tempdir");
        let out = IexecOutput::new(dir.path());
        let manifest = Manifest::success(dir.path().join("result.txt"));
        out.write_manifest(&manifest).expect("write");
        assert_eq!(read_manifest(dir.path()), manifest);
    }

    #[test]
    fn test_guard_commit_writes_final_manifest() {
        let dir = tempdir().expect("tempdir");
        let guard = ManifestGuard::new(dir.path());
        let manifest = Manifest::success(dir.path().join("result.json"));
        guard
            .commit(&IexecOutput::new(dir.path()), &manifest)
            .expect("commit");
        assert_eq!(read_manifest(dir.path()), manifest);
    }

    #[test]
    fn test_guard_drop_writes_error_manifest() {
        let dir = tempdir().expect("tempdir");
        {
            let _guard = ManifestGuard::new(dir.path());
        }
        let manifest = read_manifest(dir.path());
        assert!(manifest.is_error());
        assert_eq!(manifest.deterministic_output_path, dir.path());
    }

    #[test]
    fn test_guard_survives_panic() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().to_path_buf();
        let result = std::panic::catch_unwind(move || {
            let _guard = ManifestGuard::new(path);
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(read_manifest(dir.path()).is_error());
    }

    #[test]
    fn test_copy_input_files() {
        let input = tempdir().expect("input");
        let output = tempdir().expect("output");
        std::fs::write(input.path().join("a.csv"), b"a").expect("write");

        let out = IexecOutput::new(output.path());
        let copied = out.copy_input_files(
            input.path(),
            &[(1, "a.csv".to_string()), (2, "missing.csv".to_string())],
        );
        assert_eq!(copied, vec![output.path().join("inputFile_1")]);
        assert_eq!(
            std::fs::read(output.path().join("inputFile_1")).expect("read"),
            b"a"
        );
    }

    #[test]
    fn test_copy_input_files_keeps_platform_index() {
        let input = tempdir().expect("input");
        let output = tempdir().expect("output");
        std::fs::write(input.path().join("b.csv"), b"b").expect("write");

        let out = IexecOutput::new(output.path());
        let copied = out.copy_input_files(input.path(), &[(2, "b.csv".to_string())]);
        assert_eq!(copied, vec![output.path().join("inputFile_2")]);
        assert!(!output.path().join("inputFile_1").exists());
    }

    #[test]
    fn test_copy_input_files_stays_in_input_dir() {
        let input = tempdir().expect("input");
        let output = tempdir().expect("output");
        std::fs::write(input.path().join("secret"), b"x").expect("write");

        let out = IexecOutput::new(output.path());
        let copied = out.copy_input_files(input.path(), &[(1, "../../secret".to_string())]);
        // Only the basename is used, which resolves inside the input dir.
        assert_eq!(copied.len(), 1);
        let copied = out.copy_input_files(input.path(), &[(1, "..".to_string())]);
        assert!(copied.is_empty());
    }
}
