//! Core primitives for the Rivet value-representation layer.
//!
//! This crate provides:
//! - Symbol interning with identity comparison (attribute names)
//! - NA sentinels and element-level NA checks for every element kind
//! - The `TypeRank` coercion lattice
//! - The error taxonomy shared by the attribute and cast subsystems
//! - The continuable-warning sink used by the cast pipeline

pub mod diag;
pub mod error;
pub mod intern;
pub mod kind;
pub mod na;

// Re-export commonly used items
pub use diag::{Diagnostics, NullSink, RuntimeWarning, WarningSink};
pub use error::{RuntimeError, RuntimeResult};
pub use intern::{intern, Symbol};
pub use kind::TypeRank;
pub use na::RComplex;
