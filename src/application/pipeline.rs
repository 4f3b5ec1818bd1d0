//! End-to-end task pipeline: resolve, score, render, write.
//!
//! Every run ends with a [`Manifest`]. Failures become an error report in
//! the result file plus an `error-message` in the manifest; they never
//! escape as `Err`.

use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::ports::{Manifest, OutputError, OutputStore, RiskModel};
use crate::GenomeRiskError;

use super::assessment::AssessmentService;
use super::report;
use super::resolver::InputResolver;

/// Write the failure report for `err` and build the matching manifest.
///
/// Used for failures inside the pipeline and for setup failures (argument
/// parsing, model loading) that happen before a pipeline exists.
pub fn failure_manifest<O: OutputStore>(
    output: &O,
    format: OutputFormat,
    err: &GenomeRiskError,
) -> Manifest {
    tracing::error!("Analysis failed: {err}");

    let fallback = output.output_dir().join(format.file_name());
    let written = report::render_error(format, err)
        .map_err(OutputError::from)
        .and_then(|bytes| output.write_result(format.file_name(), &bytes));
    let path = match written {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to write error report: {e}");
            fallback
        }
    };

    Manifest::failure(path, err.user_message())
}

/// The scoring task wired to its ports.
pub struct RiskPipeline<M, O>
where
    M: RiskModel,
    O: OutputStore,
{
    resolver: InputResolver,
    service: AssessmentService<M>,
    output: O,
    format: OutputFormat,
}

impl<M, O> RiskPipeline<M, O>
where
    M: RiskModel,
    O: OutputStore,
{
    pub fn new(
        resolver: InputResolver,
        service: AssessmentService<M>,
        output: O,
        format: OutputFormat,
    ) -> Self {
        Self {
            resolver,
            service,
            output,
            format,
        }
    }

    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Run the task. Never fails: errors are turned into an error result.
    #[must_use]
    pub fn run(&self) -> Manifest {
        match self.try_run() {
            Ok(path) => {
                tracing::info!("Result written to {path:?}");
                Manifest::success(path)
            }
            Err(e) => failure_manifest(&self.output, self.format, &e),
        }
    }

    fn try_run(&self) -> Result<PathBuf, GenomeRiskError> {
        let (profile, source) = self.resolver.resolve()?;
        let assessment = self.service.assess(profile, source);
        let bytes = report::render(self.format, &assessment).map_err(OutputError::from)?;
        Ok(self.output.write_result(self.format.file_name(), &bytes)?)
    }
}
