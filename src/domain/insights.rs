//! Interpretation of a scored profile: per-locus risk factors,
//! recommendations and confidence.

use std::collections::BTreeMap;

use super::assessment::RiskLevel;
use super::genotype::{GenotypePanel, Locus};
use super::profile::{Gender, SubjectProfile};

const BASE_CONFIDENCE: f64 = 0.85;
const MAX_CONFIDENCE: f64 = 0.95;

/// Describe the contribution of each locus.
#[must_use]
pub fn risk_factors(panel: &GenotypePanel) -> BTreeMap<String, String> {
    let mut factors = BTreeMap::new();

    let mthfr = panel.get(Locus::Rs1801133);
    let text = if mthfr.is_homozygous_for('G') {
        "High impact: Homozygous for MTHFR variant"
    } else if mthfr.has_alleles('A', 'G') {
        "Moderate impact: Heterozygous for MTHFR variant"
    } else {
        "Low impact: Normal MTHFR variant"
    };
    factors.insert(Locus::Rs1801133.id().to_string(), text.to_string());

    let text = if panel.get(Locus::Rs7412).has_alleles('C', 'T') {
        "Moderate impact: APOE variant present"
    } else {
        "Standard: Common APOE variant"
    };
    factors.insert(Locus::Rs7412.id().to_string(), text.to_string());

    let apoe4 = panel.get(Locus::Rs429358);
    let text = if apoe4.is_homozygous_for('C') {
        "High impact: APOE4 allele associated"
    } else if apoe4.has_alleles('C', 'T') {
        "Moderate impact: Mixed APOE genotype"
    } else {
        "Protective: APOE3 associated genotype"
    };
    factors.insert(Locus::Rs429358.id().to_string(), text.to_string());

    factors
}

/// Personalized recommendations for the given level and profile.
#[must_use]
pub fn recommendations(level: RiskLevel, profile: &SubjectProfile) -> Vec<String> {
    let mut out: Vec<&str> = vec![
        "Maintain regular exercise (150+ minutes moderate activity weekly)",
        "Follow a Mediterranean-style diet rich in omega-3 fatty acids",
    ];

    match level {
        RiskLevel::High => out.extend([
            "Consider genetic counseling consultation",
            "Discuss results with healthcare provider",
            "Monitor cardiovascular biomarkers regularly",
            "Consider preventive medications if appropriate",
        ]),
        RiskLevel::Medium => out.extend([
            "Annual health screenings recommended",
            "Monitor blood pressure and cholesterol",
            "Maintain healthy weight (BMI 18.5-24.9)",
        ]),
        RiskLevel::Low => {}
    }

    let mthfr = profile.genotypes.get(Locus::Rs1801133);
    if mthfr.is_homozygous_for('G') || mthfr.has_alleles('A', 'G') {
        out.push("Consider folate/B12 supplementation (consult physician)");
    }

    if profile.genotypes.get(Locus::Rs429358).is_homozygous_for('C') {
        out.extend([
            "Emphasize brain-healthy lifestyle choices",
            "Consider cognitive assessment if age > 50",
        ]);
    }

    if profile.age.is_some_and(|age| age > 50) {
        out.extend([
            "Annual comprehensive health screenings",
            "Consider specialized cardiac evaluation",
        ]);
    }

    if profile.gender == Gender::Female {
        out.push("Discuss hormone-related risk factors with physician");
    }

    out.into_iter().map(String::from).collect()
}

/// Confidence in the analysis given how well the age is covered.
#[must_use]
pub fn confidence(age: Option<u8>) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if age.is_some_and(|a| (30..=70).contains(&a)) {
        confidence += 0.10;
    }
    confidence.min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileDraft;

    fn profile(values: &[&str]) -> SubjectProfile {
        ProfileDraft::from_positional(values)
            .expect("draft")
            .build()
            .expect("valid profile")
    }

    #[test]
    fn test_risk_factors_high_impact() {
        let p = profile(&["GG", "TT", "CC"]);
        let factors = risk_factors(&p.genotypes);
        assert_eq!(factors.len(), 3);
        assert!(factors["rs1801133"].starts_with("High impact"));
        assert!(factors["rs7412"].starts_with("Standard"));
        assert!(factors["rs429358"].starts_with("High impact"));
    }

    #[test]
    fn test_risk_factors_ignore_allele_order() {
        let a = risk_factors(&profile(&["AG", "TC", "CT"]).genotypes);
        let b = risk_factors(&profile(&["GA", "CT", "TC"]).genotypes);
        assert_eq!(a, b);
        assert!(a["rs7412"].starts_with("Moderate"));
        assert!(a["rs429358"].starts_with("Moderate"));
    }

    #[test]
    fn test_recommendations_by_level() {
        let p = profile(&["AA", "TT", "TT", "30", "male"]);
        let low = recommendations(RiskLevel::Low, &p);
        assert_eq!(low.len(), 2);

        let high = recommendations(RiskLevel::High, &p);
        assert!(high.iter().any(|r| r.contains("genetic counseling")));
    }

    #[test]
    fn test_recommendations_by_profile() {
        let p = profile(&["GA", "CC", "CC", "60", "f"]);
        let recs = recommendations(RiskLevel::Medium, &p);
        assert!(recs.iter().any(|r| r.contains("folate")));
        assert!(recs.iter().any(|r| r.contains("brain-healthy")));
        assert!(recs.iter().any(|r| r.contains("cardiac evaluation")));
        assert!(recs.iter().any(|r| r.contains("hormone")));
    }

    #[test]
    fn test_confidence() {
        assert!((confidence(None) - 0.85).abs() < 1e-12);
        assert!((confidence(Some(29)) - 0.85).abs() < 1e-12);
        assert!((confidence(Some(30)) - 0.95).abs() < 1e-12);
        assert!((confidence(Some(70)) - 0.95).abs() < 1e-12);
        assert!((confidence(Some(71)) - 0.85).abs() < 1e-12);
    }
}
