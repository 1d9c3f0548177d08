//! The `import` command: CSV dataset into SQLite.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use patentcliff_core::csv::read_csv_file;
use patentcliff_core::drugs::{ImportRow, ImportSummary};
use patentcliff_core::storage::ImportRepository;

/// Reads `path` and loads every usable row through `repo` in one transaction.
///
/// Rows without an application number are skipped and counted. A read
/// failure aborts before anything is written.
pub async fn import_dataset(repo: &dyn ImportRepository, path: &Path) -> Result<ImportSummary> {
    info!(path = %path.display(), "Importing dataset");

    let records = read_csv_file(path)?;
    let total = records.len();
    let rows: Vec<ImportRow> = records.iter().filter_map(ImportRow::from_record).collect();
    let skipped = total - rows.len();

    let summary = repo
        .import_rows(rows, skipped)
        .await
        .with_context(|| format!("import of {} rolled back", path.display()))?;

    info!(
        rows_read = summary.rows_read,
        rows_skipped = summary.rows_skipped,
        drugs = summary.drugs_processed,
        products = summary.products_processed,
        patents = summary.patents_processed,
        drugs_inserted = summary.drugs_inserted,
        products_inserted = summary.products_inserted,
        patents_inserted = summary.patents_inserted,
        anomalies = summary.anomalies,
        "Import complete"
    );

    Ok(summary)
}
