//! Value sharing model.
//!
//! The copy engine and the cast pipeline must know whether a value handle is
//! observed by more than one owner: a temporary may be mutated in place, a
//! shared value must be copied first, and installing a value as an attribute
//! makes it shared. This trait is the seam to the memory-management strategy;
//! the default implementation reads handle reference counts.

use crate::vector::RValue;
use std::sync::Arc;

/// How the surrounding system tracks value ownership.
pub trait SharingModel {
    /// Whether the value is observed by more than one owner.
    fn is_shared(&self, value: &RValue) -> bool;

    /// Whether the value may be mutated in place.
    #[inline]
    fn is_temporary(&self, value: &RValue) -> bool {
        !self.is_shared(value)
    }

    /// Note that the value is about to gain another owner (e.g. attribute
    /// installation).
    fn mark_shared(&self, value: &RValue);
}

/// Sharing judged by the handle's reference count.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceCountSharing;

impl SharingModel for ReferenceCountSharing {
    #[inline]
    fn is_shared(&self, value: &RValue) -> bool {
        Arc::strong_count(value) > 1
    }

    /// Sharing is implicit in the count; cloning the handle is the marking.
    #[inline]
    fn mark_shared(&self, _value: &RValue) {}
}
