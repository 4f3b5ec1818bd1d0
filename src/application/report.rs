//! Result rendering: text and JSON artifacts for assessments and failures.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::adapters::ModelError;
use crate::config::OutputFormat;
use crate::domain::{
    valid_genotypes, DataSource, Gender, GenotypeError, Locus, RiskAssessment, RiskLevel,
};
use crate::GenomeRiskError;

const DISCLAIMER: &str = "DISCLAIMER: For research purposes only.\n\
                          Consult healthcare professionals for medical advice.";

const FAILED_RISK_CLASS: &str = "Analysis Failed";
const UNKNOWN: &str = "unknown";

fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::ProtectedData => "Protected Data",
        DataSource::Args => "Args",
        DataSource::EnvArgs => "Env Args",
        DataSource::Demo => "Demo",
    }
}

fn framework(source: DataSource) -> &'static str {
    if source.is_protected() {
        "iExec DataProtector"
    } else {
        "Development"
    }
}

/// Human-readable report for an assessment.
struct TextReport<'a>(&'a RiskAssessment);

impl std::fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let assessment = self.0;
        let profile = &assessment.profile;
        let score = &assessment.score;

        writeln!(f, "GENOME RISK ASSESSMENT")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Data Source: {}", source_label(assessment.source))?;
        writeln!(f, "Framework: {}", framework(assessment.source))?;
        writeln!(f)?;
        writeln!(f, "Risk Classification: {}", score.level)?;
        writeln!(f, "Risk Probability: {:.4}", score.probability)?;
        writeln!(f, "Confidence: {:.2}", assessment.confidence)?;
        writeln!(f, "{}", score.level.description())?;
        writeln!(f)?;
        writeln!(f, "Score:")?;
        writeln!(f, "- Base: {:.4}", score.base)?;
        writeln!(f, "- Age multiplier: {:.2}", score.age_multiplier)?;
        writeln!(f, "- Gender multiplier: {:.2}", score.gender_multiplier)?;
        writeln!(f, "- Score: {:.4}", score.score)?;
        writeln!(f)?;
        writeln!(f, "Subject:")?;
        match profile.age {
            Some(age) => writeln!(f, "- Age: {age}")?,
            None => writeln!(f, "- Age: not provided")?,
        }
        writeln!(f, "- Gender: {}", profile.gender)?;
        writeln!(f)?;
        writeln!(f, "Genomic Markers:")?;
        for g in profile.genotypes.iter() {
            writeln!(f, "- {} ({}): {} -> {}", g.locus, g.locus.gene(), g.value, g.code)?;
        }
        writeln!(f)?;
        writeln!(f, "Risk Factors:")?;
        for (locus, factor) in &assessment.risk_factors {
            writeln!(f, "- {locus}: {factor}")?;
        }
        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        for rec in &assessment.recommendations {
            writeln!(f, "- {rec}")?;
        }
        writeln!(f)?;
        match &assessment.model_fingerprint {
            Some(fp) => writeln!(f, "Model: {} (sha256 {fp})", assessment.model)?,
            None => writeln!(f, "Model: {} (built-in)", assessment.model)?,
        }
        writeln!(f, "Generated: {}", assessment.created_at.to_rfc3339())?;
        writeln!(f)?;
        writeln!(f, "{DISCLAIMER}")
    }
}

/// Render a human-readable report.
#[must_use]
pub fn render_text(assessment: &RiskAssessment) -> String {
    TextReport(assessment).to_string()
}

#[derive(Debug, Serialize)]
struct ScoreSection {
    base: f64,
    age_multiplier: f64,
    gender_multiplier: f64,
    score: f64,
}

#[derive(Debug, Serialize)]
struct ModelSection<'a> {
    name: &'a str,
    fingerprint: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ResultDocument<'a> {
    risk_class: RiskLevel,
    risk_probability: f64,
    age: Option<u8>,
    gender: Gender,
    snps: BTreeMap<&'static str, &'a str>,
    risk_factors: &'a BTreeMap<String, String>,
    recommendations: &'a [String],
    confidence: f64,
    timestamp: String,
    data_source: DataSource,
    score: ScoreSection,
    model: ModelSection<'a>,
}

/// Render the structured JSON result.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_json(assessment: &RiskAssessment) -> Result<String, serde_json::Error> {
    let profile = &assessment.profile;
    let score = &assessment.score;
    let doc = ResultDocument {
        risk_class: score.level,
        risk_probability: score.probability,
        age: profile.age,
        gender: profile.gender,
        snps: profile
            .genotypes
            .iter()
            .map(|g| (g.locus.id(), g.value.as_str()))
            .collect(),
        risk_factors: &assessment.risk_factors,
        recommendations: &assessment.recommendations,
        confidence: assessment.confidence,
        timestamp: assessment.created_at.to_rfc3339(),
        data_source: assessment.source,
        score: ScoreSection {
            base: score.base,
            age_multiplier: score.age_multiplier,
            gender_multiplier: score.gender_multiplier,
            score: score.score,
        },
        model: ModelSection {
            name: &assessment.model,
            fingerprint: assessment.model_fingerprint.as_deref(),
        },
    };
    serde_json::to_string_pretty(&doc)
}

/// Render an assessment in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render(format: OutputFormat, assessment: &RiskAssessment) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(assessment).into_bytes()),
        OutputFormat::Json => render_json(assessment).map(String::into_bytes),
    }
}

/// Human-readable failure report, worded by error category.
struct ErrorReport<'a>(&'a GenomeRiskError);

impl std::fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            GenomeRiskError::Genotype(GenotypeError::Invalid { locus, value }) => {
                writeln!(f, "INVALID GENOTYPE INPUT")?;
                writeln!(f, "======================")?;
                writeln!(f, "Invalid genotype for {locus} ({}): {value:?}", locus.gene())?;
                writeln!(f, "Valid genotypes: {}", valid_genotypes().join(", "))
            }
            GenomeRiskError::Validation(e) => {
                writeln!(f, "INVALID INPUT")?;
                writeln!(f, "=============")?;
                writeln!(f, "{e}")?;
                writeln!(f)?;
                writeln!(f, "Usage: genotype1 genotype2 genotype3 [age] [gender]")?;
                let loci: Vec<&str> = Locus::ALL.iter().map(Locus::id).collect();
                writeln!(f, "Loci: {}", loci.join(", "))
            }
            GenomeRiskError::Model(ModelError::Unavailable { path, reason }) => {
                writeln!(f, "RISK MODEL NOT FOUND")?;
                writeln!(f, "====================")?;
                writeln!(f, "Model file missing: {}", path.display())?;
                writeln!(f, "Reason: {reason}")
            }
            GenomeRiskError::Model(e) => {
                writeln!(f, "RISK MODEL ERROR")?;
                writeln!(f, "================")?;
                writeln!(f, "{e}")
            }
            other => {
                writeln!(f, "APPLICATION ERROR")?;
                writeln!(f, "=================")?;
                writeln!(f, "Error: {other}")?;
                writeln!(f)?;
                writeln!(f, "Please check the logs for more details.")
            }
        }
    }
}

/// Render a human-readable failure report.
#[must_use]
pub fn render_error_text(err: &GenomeRiskError) -> String {
    ErrorReport(err).to_string()
}

#[derive(Debug, Serialize)]
struct ErrorDocument {
    error: String,
    risk_class: &'static str,
    risk_probability: f64,
    age: u8,
    gender: Gender,
    snps: BTreeMap<&'static str, &'static str>,
    recommendations: Vec<&'static str>,
    timestamp: String,
}

/// Render the structured JSON failure document.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_error_json(err: &GenomeRiskError) -> Result<String, serde_json::Error> {
    let doc = ErrorDocument {
        error: err.to_string(),
        risk_class: FAILED_RISK_CLASS,
        risk_probability: 0.0,
        age: 0,
        gender: Gender::Unknown,
        snps: Locus::ALL.iter().map(|l| (l.id(), UNKNOWN)).collect(),
        recommendations: vec!["Please try again with valid genetic data"],
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    serde_json::to_string_pretty(&doc)
}

/// Render a failure report in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render_error(format: OutputFormat, err: &GenomeRiskError) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_error_text(err).into_bytes()),
        OutputFormat::Json => render_error_json(err).map(String::into_bytes),
    }
}
