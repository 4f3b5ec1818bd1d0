//! PrivateGenome: genotype risk scoring task
//!
//! Main entry point run by the iExec worker inside the enclave.

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use privategenome::adapters::iexec::secrets::TaskSecrets;
use privategenome::adapters::iexec::{IexecOutput, ManifestGuard};
use privategenome::adapters::linear::LinearRiskModel;
use privategenome::adapters::sanitize::SanitizingMakeWriter;
use privategenome::application::{failure_manifest, AssessmentService, InputResolver, RiskPipeline};
use privategenome::config::{
    OutputFormat, RunConfig, LOG_FILE_ENV, LOG_MODE_ENV, MODEL_PATH_ENV, OUTPUT_FORMAT_ENV,
};
use privategenome::domain::ValidationError;
use privategenome::GenomeRiskError;

const DEFAULT_LOG_FILE: &str = "/iexec_out/privategenome.log";

#[derive(Debug, Parser)]
#[command(name = "privategenome", version)]
#[command(about = "Score genotype risk from protected data, arguments or demo values")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Result format
    #[arg(long, value_enum, env = OUTPUT_FORMAT_ENV, default_value = "text")]
    format: OutputFormat,

    /// JSON file with linear model parameters
    #[arg(long, env = MODEL_PATH_ENV)]
    model: Option<PathBuf>,

    /// genotype1 genotype2 genotype3 [age] [gender]
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

/// Format to use when the command line itself could not be parsed.
fn fallback_format() -> OutputFormat {
    std::env::var(OUTPUT_FORMAT_ENV)
        .ok()
        .and_then(|v| OutputFormat::from_str(&v, true).ok())
        .unwrap_or_default()
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // stdout is forwarded to the requester by the worker; `file` keeps logs in the output dir.
    let log_mode = std::env::var(LOG_MODE_ENV).unwrap_or_else(|_| "stdout".to_string());

    let (writer, guard) = if log_mode == "file" {
        let log_file = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let output_dir = RunConfig::output_dir_from_env();
    // Armed before anything can fail, including logging setup.
    let manifest_guard = ManifestGuard::new(&output_dir);
    let output = IexecOutput::new(&output_dir);

    let _log_guard = init_logging()?;
    tracing::info!("Starting PrivateGenome risk scorer...");
    let config = RunConfig::from_env();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Not a task run; exit() skips destructors so no manifest is written.
            e.exit();
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            let err = GenomeRiskError::Validation(ValidationError::Arguments(message.to_string()));
            let manifest = failure_manifest(&output, fallback_format(), &err);
            manifest_guard.commit(&output, &manifest)?;
            return Ok(());
        }
    };

    TaskSecrets::from_env().log_redacted();
    output.copy_input_files(&config.input_dir, &config.input_files);

    let model = match &cli.model {
        Some(path) => LinearRiskModel::load(path),
        None => Ok(LinearRiskModel::new()),
    };
    let model = match model {
        Ok(model) => model,
        Err(e) => {
            let manifest = failure_manifest(&output, cli.format, &e.into());
            manifest_guard.commit(&output, &manifest)?;
            return Ok(());
        }
    };

    let resolver = InputResolver::platform(&config, cli.args);
    let pipeline = RiskPipeline::new(resolver, AssessmentService::new(model), output, cli.format);
    let manifest = pipeline.run();
    manifest_guard.commit(pipeline.output(), &manifest)?;

    tracing::info!("PrivateGenome task complete.");
    Ok(())
}
