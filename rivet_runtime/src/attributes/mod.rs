//! Attribute storage: shape-shared layouts, adaptive access caches, fixed
//! attribute accessors, and the result-attribute copy engine.

pub mod cache;
pub mod copy;
pub mod fixed;
pub mod map;
pub mod shape;
