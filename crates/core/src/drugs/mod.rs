//! Drug, product and patent domain types.

mod disease;
mod import;
mod status;
mod types;

pub use disease::DiseaseCatalog;
pub use import::{normalize_date, parse_days, ImportRow, ImportSummary, PatentRow, ProductRow};
pub use status::{is_expired, status_label};
pub use types::{Drug, DrugDetail, DrugSummary, ExpiringPatent, Patent, PatentStatus, Product};
