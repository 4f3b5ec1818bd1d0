//! Genotype types and the static encoding table.
//!
//! Three SNP loci are analyzed. Each genotype is a two-letter string over
//! {A, C, G, T}; allele order does not matter (`AG` and `GA` are the same
//! genotype). All loci share one encoding table.

use serde::{Deserialize, Serialize};

/// Genotype encoding table: homozygous-reference = 0, heterozygous = 1,
/// homozygous-variant = 2.
const ENCODING_TABLE: [(&str, u8); 14] = [
    ("AA", 0),
    ("AG", 1),
    ("GA", 1),
    ("GG", 2),
    ("CC", 0),
    ("CT", 1),
    ("TC", 1),
    ("TT", 2),
    ("AC", 1),
    ("CA", 1),
    ("GT", 1),
    ("TG", 1),
    ("AT", 1),
    ("TA", 1),
];

/// Error type for genotype lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenotypeError {
    #[error("Invalid genotype for {locus}: {value:?}")]
    Invalid { locus: Locus, value: String },
}

/// The analyzed SNP loci, in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Locus {
    /// MTHFR, folate metabolism
    #[serde(rename = "rs1801133")]
    Rs1801133,
    /// APOE
    #[serde(rename = "rs7412")]
    Rs7412,
    /// APOE, e4 marker
    #[serde(rename = "rs429358")]
    Rs429358,
}

impl Locus {
    /// All loci in feature order (e1, e2, e3).
    pub const ALL: [Locus; 3] = [Locus::Rs1801133, Locus::Rs7412, Locus::Rs429358];

    /// The rsID, also used as field name in every input and output format.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Rs1801133 => "rs1801133",
            Self::Rs7412 => "rs7412",
            Self::Rs429358 => "rs429358",
        }
    }

    /// Gene the locus belongs to.
    #[must_use]
    pub fn gene(&self) -> &'static str {
        match self {
            Self::Rs1801133 => "MTHFR",
            Self::Rs7412 | Self::Rs429358 => "APOE",
        }
    }

    /// Position in the feature vector.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Rs1801133 => 0,
            Self::Rs7412 => 1,
            Self::Rs429358 => 2,
        }
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// All genotypes accepted by [`encode`], in table order.
#[must_use]
pub fn valid_genotypes() -> Vec<&'static str> {
    ENCODING_TABLE.iter().map(|(g, _)| *g).collect()
}

fn lookup(normalized: &str) -> Option<u8> {
    ENCODING_TABLE
        .iter()
        .find(|(g, _)| *g == normalized)
        .map(|(_, code)| *code)
}

/// Encode a raw genotype string for the given locus.
///
/// The value is trimmed and upper-cased before lookup. Nothing else is
/// normalized: combinations missing from the table are rejected.
///
/// # Errors
/// Returns `GenotypeError::Invalid` echoing the locus and the raw value.
pub fn encode(locus: Locus, raw: &str) -> Result<Genotype, GenotypeError> {
    let normalized = raw.trim().to_ascii_uppercase();
    match lookup(&normalized) {
        Some(code) => Ok(Genotype {
            locus,
            value: normalized,
            code,
        }),
        None => Err(GenotypeError::Invalid {
            locus,
            value: raw.to_string(),
        }),
    }
}

/// A normalized, encoded genotype at one locus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype {
    pub locus: Locus,
    /// Normalized (trimmed, upper-case) genotype string
    pub value: String,
    /// Encoded value in {0, 1, 2}
    pub code: u8,
}

impl Genotype {
    #[must_use]
    pub fn is_heterozygous(&self) -> bool {
        self.code == 1
    }

    /// Encoded as 0 or 2: both alleles are the same base.
    #[must_use]
    pub fn is_homozygous(&self) -> bool {
        self.code != 1
    }

    /// Both alleles equal the given base.
    #[must_use]
    pub fn is_homozygous_for(&self, base: char) -> bool {
        self.value.chars().all(|c| c == base)
    }

    /// Carries exactly the two given alleles, in either order.
    #[must_use]
    pub fn has_alleles(&self, a: char, b: char) -> bool {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(x), Some(y)) => (x == a && y == b) || (x == b && y == a),
            _ => false,
        }
    }
}

/// The three encoded genotypes of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypePanel {
    genotypes: [Genotype; 3],
}

impl GenotypePanel {
    /// Encode three raw genotype strings in locus order.
    ///
    /// # Errors
    /// Returns the first invalid genotype encountered.
    pub fn encode(raw: [&str; 3]) -> Result<Self, GenotypeError> {
        Ok(Self {
            genotypes: [
                encode(Locus::Rs1801133, raw[0])?,
                encode(Locus::Rs7412, raw[1])?,
                encode(Locus::Rs429358, raw[2])?,
            ],
        })
    }

    #[must_use]
    pub fn get(&self, locus: Locus) -> &Genotype {
        &self.genotypes[locus.index()]
    }

    /// Encoded feature vector (e1, e2, e3).
    #[must_use]
    pub fn codes(&self) -> [u8; 3] {
        [
            self.genotypes[0].code,
            self.genotypes[1].code,
            self.genotypes[2].code,
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genotype> {
        self.genotypes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_encodes_deterministically() {
        for (genotype, expected) in ENCODING_TABLE {
            let first = encode(Locus::Rs7412, genotype).expect("table entry");
            let second = encode(Locus::Rs7412, genotype).expect("table entry");
            assert_eq!(first.code, expected);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_allele_order_is_irrelevant() {
        for (genotype, _) in ENCODING_TABLE {
            let reversed: String = genotype.chars().rev().collect();
            let a = encode(Locus::Rs1801133, genotype).expect("valid");
            let b = encode(Locus::Rs1801133, &reversed).expect("reversed valid");
            assert_eq!(a.code, b.code, "{genotype} vs {reversed}");
        }
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let g = encode(Locus::Rs429358, "  tc ").expect("valid");
        assert_eq!(g.value, "TC");
        assert_eq!(g.code, 1);
    }

    #[test]
    fn test_rejects_values_outside_table() {
        for raw in ["", "A", "AAA", "XY", "NN", "A-", "ag1", "CG", "GC"] {
            let err = encode(Locus::Rs7412, raw).unwrap_err();
            assert_eq!(
                err,
                GenotypeError::Invalid {
                    locus: Locus::Rs7412,
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn test_error_names_locus_and_value() {
        let err = encode(Locus::Rs429358, "zz").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rs429358"));
        assert!(msg.contains("zz"));
    }

    #[test]
    fn test_panel_codes_follow_locus_order() {
        let panel = GenotypePanel::encode(["GG", "CT", "aa"]).expect("valid panel");
        assert_eq!(panel.codes(), [2, 1, 0]);
        assert_eq!(panel.get(Locus::Rs429358).value, "AA");
    }

    #[test]
    fn test_allele_helpers() {
        let g = encode(Locus::Rs7412, "TC").expect("valid");
        assert!(g.is_heterozygous());
        assert!(g.has_alleles('C', 'T'));
        assert!(!g.is_homozygous_for('C'));

        let cc = encode(Locus::Rs429358, "cc").expect("valid");
        assert!(cc.is_homozygous_for('C'));
    }

    #[test]
    fn test_zygosity_follows_code() {
        for raw in ["AA", "GG", "CC", "TT"] {
            let g = encode(Locus::Rs1801133, raw).expect("valid");
            assert!(g.is_homozygous(), "{raw}");
            assert!(!g.is_heterozygous(), "{raw}");
        }
        for raw in ["AG", "CT", "AC", "TA"] {
            let g = encode(Locus::Rs1801133, raw).expect("valid");
            assert!(g.is_heterozygous(), "{raw}");
            assert!(!g.is_homozygous(), "{raw}");
        }
    }
}
