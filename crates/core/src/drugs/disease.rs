//! Curated disease to brand-name lookup.

use std::collections::BTreeMap;

/// Hand-maintained mapping used by the by-disease endpoint.
const DEFAULT_CATALOG: &[(&str, &[&str])] = &[
    (
        "alzheimers",
        &["ARICEPT", "NAMENDA", "NAMZARIC", "LEQEMBI"],
    ),
    (
        "asthma",
        &["ADVAIR DISKUS", "SYMBICORT", "BREO ELLIPTA", "SPIRIVA", "DUPIXENT"],
    ),
    (
        "autoimmune",
        &["HUMIRA", "ENBREL", "STELARA", "XELJANZ", "OTEZLA", "RINVOQ"],
    ),
    (
        "cancer",
        &["IBRANCE", "IMBRUVICA", "REVLIMID", "KEYTRUDA", "XTANDI", "TAGRISSO"],
    ),
    (
        "cardiovascular",
        &["ELIQUIS", "XARELTO", "ENTRESTO", "BRILINTA", "PRADAXA"],
    ),
    (
        "cholesterol",
        &["LIPITOR", "CRESTOR", "ZETIA", "REPATHA", "PRALUENT"],
    ),
    (
        "diabetes",
        &["JANUVIA", "JARDIANCE", "FARXIGA", "OZEMPIC", "TRULICITY", "MOUNJARO"],
    ),
    (
        "hiv",
        &["BIKTARVY", "GENVOYA", "DESCOVY", "TRIUMEQ", "DOVATO"],
    ),
];

/// Immutable disease → brand names mapping.
///
/// Lookups are case-insensitive on the disease name.
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    entries: BTreeMap<String, Vec<String>>,
}

impl DiseaseCatalog {
    /// Creates a catalog from `(disease, brand names)` pairs.
    pub fn new<I, D, B>(entries: I) -> Self
    where
        I: IntoIterator<Item = (D, Vec<B>)>,
        D: AsRef<str>,
        B: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(disease, brands)| {
                (
                    normalize(disease.as_ref()),
                    brands.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Brand names associated with `disease`, empty when the disease is unknown.
    pub fn brand_names(&self, disease: &str) -> &[String] {
        self.entries
            .get(&normalize(disease))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Known disease names in alphabetical order.
    pub fn diseases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_CATALOG
                .iter()
                .map(|(disease, brands)| (*disease, brands.to_vec())),
        )
    }
}

fn normalize(disease: &str) -> String {
    disease.trim().to_lowercase()
}
