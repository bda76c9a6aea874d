//! Coercion to list.
//!
//! Each atomic element becomes a length-1 vector of its own kind, NA
//! included; expression elements carry over as-is. Total, never warns.

use crate::vector::{RValue, RVector, VectorData};
use std::sync::Arc;

pub(crate) fn cast_list(source: &RVector) -> RVector {
    let items: Vec<RValue> = match source.data() {
        VectorData::List(items) => items.clone(),
        VectorData::Expression(items) => items.clone(),
        _ => boxed_elements(source),
    };
    RVector::list_vector(items)
}

/// One scalar vector per element, preserving kind and NA-ness.
pub(crate) fn boxed_elements(source: &RVector) -> Vec<RValue> {
    match source.data() {
        VectorData::Raw(v) => v
            .iter()
            .map(|x| Arc::new(RVector::raw_vector(vec![*x])) as RValue)
            .collect(),
        VectorData::Logical(v) => v
            .iter()
            .map(|x| Arc::new(RVector::logical_vector(vec![*x])) as RValue)
            .collect(),
        VectorData::Int(v) => v
            .iter()
            .map(|x| Arc::new(RVector::int_vector(vec![*x])) as RValue)
            .collect(),
        VectorData::Double(v) => v
            .iter()
            .map(|x| Arc::new(RVector::double_vector(vec![*x])) as RValue)
            .collect(),
        VectorData::Complex(v) => v
            .iter()
            .map(|x| Arc::new(RVector::complex_vector(vec![*x])) as RValue)
            .collect(),
        VectorData::Character(v) => v
            .iter()
            .map(|x| Arc::new(RVector::character_vector(vec![x.clone()])) as RValue)
            .collect(),
        VectorData::List(items) | VectorData::Expression(items) => items.clone(),
    }
}
