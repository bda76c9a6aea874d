//! Rivet value model: attribute storage and value coercion.
//!
//! This crate provides:
//! - Vectors with tagged element storage and a completeness flag
//! - Shape-based attribute maps (structurally shared layouts, slot-indexed
//!   storage) with a process-wide transition graph
//! - Per-call-site adaptive attribute access caches
//! - Fixed-attribute accessors (names/dim/dimnames/row.names/class) with
//!   their cross-field invariants
//! - The attribute copy engine for operation results
//! - The cast pipeline: one entry point per target kind, with exact
//!   NA/overflow/warning semantics and attribute preservation

pub mod attributes;
pub mod cast;
pub mod deparse;
pub mod sharing;
pub mod vector;

// Re-export commonly used items
pub use attributes::cache::AttributeAccessSite;
pub use attributes::fixed::{get_attribute, has_attribute, remove_attribute, set_attribute};
pub use attributes::map::AttributeMap;
pub use attributes::shape::{shape_registry, Shape, ShapeId, ShapeRegistry};
pub use cast::{cast, CastContext, CastFlags};
pub use sharing::{ReferenceCountSharing, SharingModel};
pub use vector::{make_vector, RValue, RVector, VectorData};
