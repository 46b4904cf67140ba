//! # Biblio Common Library
//!
//! Shared code for the Biblio services including:
//! - Article and reference record types
//! - API request/response types
//! - Configuration loading
//! - Database initialization
//! - Date parsing and formatting utilities

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
