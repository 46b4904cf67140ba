//! API module for shared HTTP API functionality
//!
//! Provides the request/response types used by both the Biblio backend
//! and its clients.
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Shared types
//! - Pure functions (no HTTP framework dependencies)

pub mod types;

pub use types::{
    Article, ArticleDraft, ArticlePage, ArticleWithReferences, ErrorBody, ErrorEnvelope,
    Reference, ReferenceDraft, SortOrder, Violation,
};
