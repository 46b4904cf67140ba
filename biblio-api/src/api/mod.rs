//! HTTP API handlers for biblio-api
//!
//! One module per resource; each module exposes its handlers plus a
//! `*_routes()` builder merged into the application router.

pub mod articles;
pub mod health;
pub mod references;

pub use articles::article_routes;
pub use health::health_routes;
pub use references::reference_routes;
