//! Normalisation of CSV records into import rows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::csv::CsvRecord;

/// Date layouts seen in the source datasets, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%Y%m%d"];

/// One CSV row, normalised for the bulk loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub app_no: String,
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub app_type: Option<String>,
    pub product: Option<ProductRow>,
    pub patent: Option<PatentRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub product_no: String,
    pub strength: Option<String>,
    pub route: Option<String>,
    pub approval_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentRow {
    /// Empty when the patent is not tied to a product.
    pub product_no: String,
    pub patent_number: String,
    pub patent_expiry_date: Option<String>,
    pub days_until_expiry: Option<i64>,
}

impl ImportRow {
    /// Builds an import row from a CSV record.
    ///
    /// Returns None when the record has no application number.
    pub fn from_record(record: &CsvRecord) -> Option<Self> {
        let app_no = record.get("app_no")?.to_string();
        let owned = |column: &str| record.get(column).map(str::to_string);
        let product_no = owned("product_no");

        let product = product_no.clone().map(|product_no| ProductRow {
            product_no,
            strength: owned("strength"),
            route: owned("route"),
            approval_date: record.get("approval_date").map(normalize_date),
        });

        let patent = owned("patent_number").map(|patent_number| PatentRow {
            product_no: product_no.unwrap_or_default(),
            patent_number,
            patent_expiry_date: record.get("patent_expiry_date").map(normalize_date),
            days_until_expiry: parse_days(record.get("days_until_expiry")),
        });

        Some(Self {
            app_no,
            brand_name: owned("brand_name"),
            generic_name: owned("generic_name"),
            app_type: owned("app_type"),
            product,
            patent,
        })
    }
}

/// Parses a days-until-expiry value.
///
/// Accepts plain integers and plain decimals; decimals are truncated toward
/// zero. Exponent notation, trailing text and blanks yield None rather than zero.
pub fn parse_days(value: Option<&str>) -> Option<i64> {
    let value = value?.trim();
    if let Ok(days) = value.parse::<i64>() {
        return Some(days);
    }
    let (whole, fraction) = value.split_once('.')?;
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse::<i64>().ok()
}

/// Rewrites a recognised date as ISO `YYYY-MM-DD`; other values pass through unchanged.
pub fn normalize_date(value: &str) -> String {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Counts reported by a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows handed to the loader.
    pub rows_read: usize,
    /// Rows that referenced a drug, product or patent respectively.
    pub drugs_processed: usize,
    pub products_processed: usize,
    pub patents_processed: usize,
    /// Rows that were actually written (absent before this import).
    pub drugs_inserted: usize,
    pub products_inserted: usize,
    pub patents_inserted: usize,
    /// Rows without an application number.
    pub rows_skipped: usize,
    /// Rows whose drug could not be found after insertion.
    pub anomalies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> CsvRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_full_row() {
        let row = ImportRow::from_record(&record(&[
            ("app_no", "N202155"),
            ("brand_name", "ELIQUIS"),
            ("generic_name", "apixaban"),
            ("app_type", "N"),
            ("product_no", "001"),
            ("strength", "2.5MG"),
            ("route", "TABLET;ORAL"),
            ("approval_date", "Dec 28, 2012"),
            ("patent_number", "6967208"),
            ("patent_expiry_date", "11/21/2026"),
            ("days_until_expiry", "401"),
        ]))
        .unwrap();

        assert_eq!(row.app_no, "N202155");
        let product = row.product.unwrap();
        assert_eq!(product.product_no, "001");
        assert_eq!(product.approval_date.as_deref(), Some("2012-12-28"));
        let patent = row.patent.unwrap();
        assert_eq!(patent.product_no, "001");
        assert_eq!(patent.patent_expiry_date.as_deref(), Some("2026-11-21"));
        assert_eq!(patent.days_until_expiry, Some(401));
    }

    #[test]
    fn test_missing_app_no_is_rejected() {
        assert!(ImportRow::from_record(&record(&[("app_no", ""), ("brand_name", "X")])).is_none());
    }

    #[test]
    fn test_patent_without_product() {
        let row = ImportRow::from_record(&record(&[
            ("app_no", "N1"),
            ("patent_number", "1234567"),
        ]))
        .unwrap();

        assert!(row.product.is_none());
        assert_eq!(row.patent.unwrap().product_no, "");
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days(Some("42")), Some(42));
        assert_eq!(parse_days(Some(" -7 ")), Some(-7));
        assert_eq!(parse_days(Some("12.9")), Some(12));
        assert_eq!(parse_days(Some("-0.5")), Some(0));
        assert_eq!(parse_days(Some("1e3")), None);
        assert_eq!(parse_days(Some("12abc")), None);
        assert_eq!(parse_days(Some("12.5x")), None);
        assert_eq!(parse_days(Some("")), None);
        assert_eq!(parse_days(Some("n/a")), None);
        assert_eq!(parse_days(Some("NaN")), None);
        assert_eq!(parse_days(None), None);
    }

    #[test]
    fn test_unrecognised_date_passes_through() {
        assert_eq!(normalize_date("sometime in 2030"), "sometime in 2030");
        assert_eq!(normalize_date("2030-01-02"), "2030-01-02");
    }
}
