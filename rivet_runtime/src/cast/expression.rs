//! Coercion to expression.
//!
//! Mirrors the list coercion: one element value per source element, list
//! elements carried over directly.

use super::list::boxed_elements;
use crate::vector::RVector;

pub(crate) fn cast_expression(source: &RVector) -> RVector {
    RVector::expression_vector(boxed_elements(source))
}
