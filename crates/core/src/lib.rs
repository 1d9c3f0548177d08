//! Functional core for the Patent Cliff API.
//!
//! Everything in this crate is pure data and pure functions, except for the
//! CSV file read in [`csv::read_csv_file`]. Storage backends and HTTP live in
//! the `patentcliff` binary crate; authentication plumbing lives in
//! `patentcliff_auth`.

pub mod auth;
pub mod csv;
pub mod drugs;
pub mod serde;
pub mod storage;
