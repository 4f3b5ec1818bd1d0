//! Subject profile types.
//!
//! A profile is assembled from raw string fields (a [`ProfileDraft`]) supplied
//! by whichever input source won resolution, then validated once.

use serde::{Deserialize, Serialize};

use super::genotype::{GenotypeError, GenotypePanel, Locus};

/// Maximum plausible age in years.
pub const MAX_AGE: u8 = 120;

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Age {0} out of range [0, {MAX_AGE}]")]
    AgeOutOfRange(i64),

    #[error("Invalid age format: {0:?}")]
    InvalidAge(String),

    #[error("Invalid gender: {0:?} (expected male, female or unknown)")]
    UnknownGender(String),

    #[error("Too many arguments: expected at most 5, got {0}")]
    TooManyArguments(usize),

    #[error("Invalid arguments: {0}")]
    Arguments(String),
}

/// Declared gender of the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl std::str::FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "unknown" | "u" | "" => Ok(Self::Unknown),
            _ => Err(ValidationError::UnknownGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

fn parse_age(raw: &str) -> Result<u8, ValidationError> {
    let age: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAge(raw.to_string()))?;
    if !(0..=i64::from(MAX_AGE)).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    // Range checked above.
    Ok(age as u8)
}

/// Raw, unvalidated profile fields as supplied by an input source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Genotype strings indexed by [`Locus::index`]
    pub genotypes: [Option<String>; 3],
    pub age: Option<String>,
    pub gender: Option<String>,
}

impl ProfileDraft {
    /// Draft from positional values: `genotype1 genotype2 genotype3 [age] [gender]`.
    ///
    /// # Errors
    /// Returns `TooManyArguments` for more than five values.
    pub fn from_positional<S: AsRef<str>>(values: &[S]) -> Result<Self, ValidationError> {
        if values.len() > 5 {
            return Err(ValidationError::TooManyArguments(values.len()));
        }
        let get = |i: usize| values.get(i).map(|v| v.as_ref().to_string());
        Ok(Self {
            genotypes: [get(0), get(1), get(2)],
            age: get(3),
            gender: get(4),
        })
    }

    #[must_use]
    pub fn with_genotype(mut self, locus: Locus, value: impl Into<String>) -> Self {
        self.genotypes[locus.index()] = Some(value.into());
        self
    }

    /// Loci with no (or a blank) value.
    #[must_use]
    pub fn missing_loci(&self) -> Vec<Locus> {
        Locus::ALL
            .into_iter()
            .filter(|l| {
                self.genotypes[l.index()]
                    .as_deref()
                    .map_or(true, |v| v.trim().is_empty())
            })
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_loci().is_empty()
    }

    /// Validate and encode the draft into a profile.
    ///
    /// # Errors
    /// Returns a validation error for missing genotypes, a malformed or
    /// out-of-range age, or an unrecognized gender; an invalid genotype is
    /// reported as a genotype error.
    pub fn build(&self) -> Result<SubjectProfile, ProfileError> {
        if let Some(locus) = self.missing_loci().first() {
            return Err(ValidationError::MissingField(locus.id().to_string()).into());
        }

        let age = match self.age.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_age(raw)?),
        };
        let gender = match self.gender.as_deref() {
            None => Gender::Unknown,
            Some(raw) => raw.parse()?,
        };

        let raw = |l: Locus| self.genotypes[l.index()].as_deref().unwrap_or_default();
        let genotypes = GenotypePanel::encode([
            raw(Locus::Rs1801133),
            raw(Locus::Rs7412),
            raw(Locus::Rs429358),
        ])?;

        Ok(SubjectProfile {
            age,
            gender,
            genotypes,
        })
    }
}

/// Error raised while building a profile from a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Genotype(#[from] GenotypeError),
}

/// A validated subject profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    /// Age in years, when supplied
    pub age: Option<u8>,
    pub gender: Gender,
    pub genotypes: GenotypePanel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(values: &[&str]) -> ProfileDraft {
        ProfileDraft::from_positional(values).expect("at most 5 values")
    }

    #[test]
    fn test_build_full_profile() {
        let profile = draft(&["GG", "tt", "GG", "55", "Female"])
            .build()
            .expect("valid profile");
        assert_eq!(profile.age, Some(55));
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.genotypes.codes(), [2, 2, 2]);
    }

    #[test]
    fn test_age_and_gender_are_optional() {
        let profile = draft(&["AA", "CC", "TT"]).build().expect("valid profile");
        assert_eq!(profile.age, None);
        assert_eq!(profile.gender, Gender::Unknown);
    }

    #[test]
    fn test_missing_field_is_named() {
        let err = draft(&["AA"]).build().unwrap_err();
        assert_eq!(
            err,
            ProfileError::Validation(ValidationError::MissingField("rs7412".into()))
        );

        let blank = ProfileDraft::default()
            .with_genotype(Locus::Rs1801133, "AA")
            .with_genotype(Locus::Rs7412, "CC")
            .with_genotype(Locus::Rs429358, "  ");
        assert!(blank.build().unwrap_err().to_string().contains("rs429358"));
    }

    #[test]
    fn test_age_validation() {
        assert_eq!(
            draft(&["AA", "CC", "TT", "121"]).build().unwrap_err(),
            ProfileError::Validation(ValidationError::AgeOutOfRange(121))
        );
        assert_eq!(
            draft(&["AA", "CC", "TT", "-1"]).build().unwrap_err(),
            ProfileError::Validation(ValidationError::AgeOutOfRange(-1))
        );
        assert!(matches!(
            draft(&["AA", "CC", "TT", "forty"]).build().unwrap_err(),
            ProfileError::Validation(ValidationError::InvalidAge(_))
        ));
        assert_eq!(
            draft(&["AA", "CC", "TT", "0"]).build().expect("age 0").age,
            Some(0)
        );
        assert_eq!(
            draft(&["AA", "CC", "TT", "120"]).build().expect("age 120").age,
            Some(120)
        );
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("M".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("".parse::<Gender>(), Ok(Gender::Unknown));
        assert!(matches!(
            "other".parse::<Gender>(),
            Err(ValidationError::UnknownGender(_))
        ));
    }

    #[test]
    fn test_invalid_genotype_surfaces_as_genotype_error() {
        let err = draft(&["AA", "XX", "TT"]).build().unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Genotype(GenotypeError::Invalid {
                locus: Locus::Rs7412,
                ..
            })
        ));
    }

    #[test]
    fn test_too_many_positional_values() {
        let err = ProfileDraft::from_positional(&["AA", "CC", "TT", "30", "male", "x"]).unwrap_err();
        assert_eq!(err, ValidationError::TooManyArguments(6));
    }
}
