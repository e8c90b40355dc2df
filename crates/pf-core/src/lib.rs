//! pf-core: stable foundation for prodflow.
//!
//! Contains:
//! - ids (stable compact IDs for graph/catalog objects)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
