//! Input resolution: pick the profile from the highest-priority source.

use crate::adapters::args::{ArgsSource, DemoSource, EnvArgsSource};
use crate::adapters::iexec::IexecDatasetSource;
use crate::config::RunConfig;
use crate::domain::{DataSource, SubjectProfile};
use crate::ports::{ProfileSource, SourceError};
use crate::GenomeRiskError;

/// Tries each source in order; the first one that yields a draft wins.
pub struct InputResolver {
    sources: Vec<Box<dyn ProfileSource>>,
}

impl InputResolver {
    /// Create a resolver over sources in priority order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ProfileSource>>) -> Self {
        Self { sources }
    }

    /// The platform order: protected dataset, CLI arguments, `IEXEC_ARGS`, demo.
    #[must_use]
    pub fn platform(config: &RunConfig, cli_args: Vec<String>) -> Self {
        Self::new(vec![
            Box::new(IexecDatasetSource::new(config.dataset_file.clone())),
            Box::new(ArgsSource::new(cli_args)),
            Box::new(EnvArgsSource::new(config.env_args.clone())),
            Box::new(DemoSource),
        ])
    }

    /// Resolve and validate the subject profile.
    ///
    /// # Errors
    /// Returns the first non-fall-through source error, or the validation
    /// error of the winning draft. Fails with `Unavailable` if every source
    /// fell through.
    pub fn resolve(&self) -> Result<(SubjectProfile, DataSource), GenomeRiskError> {
        for source in &self.sources {
            let kind = source.kind();
            match source.load() {
                Ok(draft) => {
                    tracing::info!("Using profile from {kind}");
                    let profile = draft.build()?;
                    return Ok((profile, kind));
                }
                Err(e @ SourceError::Unavailable(_)) => {
                    tracing::debug!("Skipping {kind}: {e}");
                }
                Err(e) if e.is_fall_through() => {
                    tracing::warn!("Skipping {kind}: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(SourceError::Unavailable("no input source supplied a profile".into()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProfileDraft, ValidationError};

    struct Fixed(DataSource, fn() -> Result<ProfileDraft, SourceError>);

    impl ProfileSource for Fixed {
        fn kind(&self) -> DataSource {
            self.0
        }

        fn load(&self) -> Result<ProfileDraft, SourceError> {
            (self.1)()
        }
    }

    fn args(values: &[&str]) -> Box<dyn ProfileSource> {
        Box::new(ArgsSource::new(values.iter().map(|v| (*v).to_string()).collect()))
    }

    #[test]
    fn test_first_available_source_wins() {
        let resolver = InputResolver::new(vec![
            Box::new(Fixed(DataSource::ProtectedData, || {
                Err(SourceError::Unavailable("none".into()))
            })),
            args(&["GG", "TT", "GG"]),
            Box::new(DemoSource),
        ]);
        let (profile, source) = resolver.resolve().expect("resolved");
        assert_eq!(source, DataSource::Args);
        assert_eq!(profile.genotypes.codes(), [2, 2, 2]);
    }

    #[test]
    fn test_incomplete_and_malformed_fall_through() {
        let resolver = InputResolver::new(vec![
            Box::new(Fixed(DataSource::ProtectedData, || {
                Err(SourceError::Incomplete("rs7412".into()))
            })),
            Box::new(Fixed(DataSource::ProtectedData, || {
                Err(SourceError::Malformed("not json".into()))
            })),
            Box::new(EnvArgsSource::new(None)),
            Box::new(DemoSource),
        ]);
        let (profile, source) = resolver.resolve().expect("resolved");
        assert_eq!(source, DataSource::Demo);
        assert_eq!(profile.genotypes.codes(), [0, 0, 2]);
    }

    #[test]
    fn test_partial_args_abort_resolution() {
        let resolver = InputResolver::new(vec![args(&["AA"]), Box::new(DemoSource)]);
        let err = resolver.resolve().unwrap_err();
        assert!(matches!(
            err,
            GenomeRiskError::Validation(ValidationError::MissingField(ref f)) if f == "rs7412"
        ));
    }

    #[test]
    fn test_invalid_genotype_is_not_skipped() {
        let resolver = InputResolver::new(vec![args(&["XX", "CC", "TT"]), Box::new(DemoSource)]);
        assert!(matches!(resolver.resolve().unwrap_err(), GenomeRiskError::Genotype(_)));
    }

    #[test]
    fn test_no_sources() {
        let err = InputResolver::new(Vec::new()).resolve().unwrap_err();
        assert!(matches!(err, GenomeRiskError::Source(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_platform_order_prefers_cli_over_env() {
        let config = RunConfig::from_lookup(|k| (k == "IEXEC_ARGS").then(|| "GG GG GG".to_string()));
        let resolver = InputResolver::platform(&config, vec!["AA".into(), "CT".into(), "TT".into()]);
        let (_, source) = resolver.resolve().expect("resolved");
        assert_eq!(source, DataSource::Args);

        let resolver = InputResolver::platform(&config, Vec::new());
        let (profile, source) = resolver.resolve().expect("resolved");
        assert_eq!(source, DataSource::EnvArgs);
        assert_eq!(profile.genotypes.codes(), [2, 2, 2]);
    }
}
