//! HTTP surface over the Chowgadhiya engine.
//!
//! ```text
//! GET /health                      liveness and version
//! GET /chowgadhiya[?at=<RFC3339>]  Evaluation JSON for now, or for `at`
//! ```

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
