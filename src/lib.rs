//! Feature-Sliced Design import guard.
//!
//! [`guard::LayerImportGuard`] is the pure core: given a file path and its
//! imports it reports layer violations and computes the canonical import
//! order. [`scan`] drives it over a project tree.

pub mod cli;
pub mod config;
pub mod extract;
pub mod guard;
pub mod layer;
pub mod order;
pub mod rules;
pub mod scan;
pub mod specifier;

pub use guard::{ImportViolation, LayerImportGuard};
pub use layer::Layer;
pub use specifier::Import;
