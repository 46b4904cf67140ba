//! Biblio UI support library
//!
//! The backend-facing half of the article browser: a typed HTTP client
//! for the Biblio API plus the list controller that owns filter, sort,
//! and page state. Rendering is left to the embedding application; this
//! crate only decides what to fetch and what the current table contents
//! are.

pub mod client;
pub mod controller;

pub use client::{ArticleClient, ClientError};
pub use controller::{FetchTicket, ListController, SortColumn};
