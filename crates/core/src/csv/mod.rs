//! CSV ingestion.
//!
//! A deliberately small tokenizer for the reference datasets the importer
//! consumes: the whole file is read into memory, split into lines and each
//! line split into fields with quote-aware comma handling.

mod error;
mod parser;
mod record;

pub use error::{CsvError, Result};
pub use parser::{parse_content, read_csv_file, split_fields};
pub use record::CsvRecord;
