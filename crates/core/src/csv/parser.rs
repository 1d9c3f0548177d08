use std::{collections::BTreeSet, path::Path};

use super::{CsvError, CsvRecord, Result};

/// Reads a CSV file fully into memory and parses it into records.
///
/// The first non-empty line is the header. Any read failure aborts the
/// whole ingestion.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<CsvRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_content(&content))
}

/// Parses CSV text into records keyed by the header row.
///
/// Lines are split on `\n` with a trailing `\r` removed. Blank lines are
/// skipped. Content without a header yields no records.
pub fn parse_content(content: &str) -> Vec<CsvRecord> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_fields(header_line);
    warn_duplicate_headers(&headers);

    lines
        .map(|line| CsvRecord::from_fields(&headers, split_fields(line)))
        .collect()
}

fn warn_duplicate_headers(headers: &[String]) {
    let mut seen = BTreeSet::new();
    for header in headers {
        if !seen.insert(header.as_str()) {
            tracing::warn!(column = %header, "Duplicate CSV header; keeping the first column");
        }
    }
}

/// Splits a single line into cleaned field values.
///
/// Every `"` toggles the quoted state; commas inside quotes are literal.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(clean_field(&current));

    fields
}

/// Strips surrounding whitespace and one pair of wrapping quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_string()
}
