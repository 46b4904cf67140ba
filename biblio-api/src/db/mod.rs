//! Database access for biblio-api
//!
//! Runtime-bound sqlx queries over the shared SQLite schema. Schema
//! creation itself lives in `biblio_common::db`; the modules here hold
//! the per-table operations.

pub mod articles;
pub mod references;
