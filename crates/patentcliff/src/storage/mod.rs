//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `patentcliff_core::storage`. SQLite is the only backend.

pub mod sqlite;

pub use sqlite::SqliteRepository;
