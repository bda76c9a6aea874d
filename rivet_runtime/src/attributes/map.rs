//! Per-container attribute storage: a shape pointer plus a flat value array.
//!
//! The shape assigns each attribute name a slot; the map stores just the slot
//! values. Containers with the same attribute history share the shape, so the
//! per-container cost is one pointer and a small inline vector.

use super::shape::{shape_registry, Shape, ShapeId};
use crate::vector::RValue;
use rivet_core::intern::Symbol;
use smallvec::SmallVec;
use std::sync::Arc;

/// Inline capacity covering the common case (names, dim, dimnames, class).
const INLINE_ATTRS: usize = 4;

/// Attribute storage for one container.
#[derive(Clone, Debug)]
pub struct AttributeMap {
    shape: Arc<Shape>,
    values: SmallVec<[RValue; INLINE_ATTRS]>,
}

impl AttributeMap {
    /// Empty map on the shared empty shape.
    pub fn new() -> Self {
        Self {
            shape: shape_registry().empty_shape(),
            values: SmallVec::new(),
        }
    }

    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    #[inline]
    pub fn shape_id(&self) -> ShapeId {
        self.shape.id()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &Symbol) -> Option<&RValue> {
        let slot = self.shape.lookup(name)?;
        self.values.get(slot as usize)
    }

    /// Value at a known slot. Used by access caches that have already
    /// verified the shape.
    #[inline]
    pub fn get_slot(&self, slot: u16) -> Option<&RValue> {
        self.values.get(slot as usize)
    }

    /// Overwrite a known slot. The caller must have verified the shape.
    #[inline]
    pub fn set_slot(&mut self, slot: u16, value: RValue) {
        self.values[slot as usize] = value;
    }

    /// Install or overwrite an attribute, returning its slot.
    ///
    /// An already-bound name is overwritten in place without a shape change;
    /// a new name transitions the shape and appends the value.
    pub fn set(&mut self, name: &Symbol, value: RValue) -> u16 {
        if let Some(slot) = self.shape.lookup(name) {
            self.values[slot as usize] = value;
            return slot;
        }
        let slot = self.values.len() as u16;
        self.shape = shape_registry().transition(&self.shape, name.clone());
        self.values.push(value);
        slot
    }

    /// Remove an attribute, returning its previous value.
    ///
    /// Surviving attributes keep their insertion order; slots above the
    /// removed one shift down together with the shape change.
    pub fn remove(&mut self, name: &Symbol) -> Option<RValue> {
        let slot = self.shape.lookup(name)?;
        // lookup succeeded, so the removal transition exists
        self.shape = shape_registry().transition_remove(&self.shape, name)?;
        Some(self.values.remove(slot as usize))
    }

    /// Iterate (name, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &RValue)> {
        self.shape
            .binding_names()
            .into_iter()
            .zip(self.values.iter())
    }
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self::new()
    }
}
