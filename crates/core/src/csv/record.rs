use std::collections::BTreeMap;

use serde::Serialize;

/// A single CSV data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsvRecord {
    fields: BTreeMap<String, String>,
}

impl CsvRecord {
    /// Builds a record by zipping header names with field values.
    ///
    /// Missing trailing values become empty strings; values beyond the
    /// header width are dropped. A repeated header name keeps the value of
    /// its first column.
    pub fn from_fields(headers: &[String], values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let mut fields = BTreeMap::new();
        for header in headers {
            let value = values.next().unwrap_or_default();
            fields.entry(header.clone()).or_insert(value);
        }
        Self { fields }
    }

    /// Returns the value for `column`, or None when the column is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the raw value for `column`, including empty strings.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Number of columns in this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CsvRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
