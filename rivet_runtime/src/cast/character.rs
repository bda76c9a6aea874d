//! Coercion to character.
//!
//! Atomic elements use the fixed scalar renderings; list and expression
//! elements that are not length-1 atomics go through the deparse seam.
//! Character coercion is total: it never fails, and only string conversion
//! of NA-free sources can introduce NA (it cannot, so no warnings either).

use super::CastContext;
use crate::deparse::{
    complex_to_string, double_to_string, int_to_string, logical_to_string, raw_to_string,
};
use crate::vector::{CharElem, RValue, RVector, VectorData};
use rivet_core::error::RuntimeResult;

use super::conv::render_string;

pub(crate) fn cast_character(
    source: &RVector,
    ctx: &mut CastContext<'_>,
) -> RuntimeResult<RVector> {
    let out: Vec<CharElem> = match source.data() {
        VectorData::Character(v) => v.clone(),
        VectorData::Raw(v) => v
            .iter()
            .map(|x| render_string(Some(raw_to_string(*x))))
            .collect(),
        VectorData::Logical(v) => v.iter().map(|x| render_string(logical_to_string(*x))).collect(),
        VectorData::Int(v) => v.iter().map(|x| render_string(int_to_string(*x))).collect(),
        VectorData::Double(v) => v
            .iter()
            .map(|x| render_string(double_to_string(*x)))
            .collect(),
        VectorData::Complex(v) => v
            .iter()
            .map(|x| render_string(complex_to_string(*x)))
            .collect(),
        VectorData::List(items) | VectorData::Expression(items) => {
            items.iter().map(|e| element_string(e, ctx)).collect()
        }
    };
    Ok(RVector::character_vector(out))
}

/// Render one list element: a length-1 atomic prints as its bare scalar,
/// everything else deparsed.
fn element_string(element: &RValue, ctx: &CastContext<'_>) -> CharElem {
    if element.len() == 1 && element.kind().is_atomic() {
        let text = match element.data() {
            VectorData::Raw(v) => Some(raw_to_string(v[0])),
            VectorData::Logical(v) => logical_to_string(v[0]),
            VectorData::Int(v) => int_to_string(v[0]),
            VectorData::Double(v) => double_to_string(v[0]),
            VectorData::Complex(v) => complex_to_string(v[0]),
            VectorData::Character(v) => return v[0].clone(),
            VectorData::List(_) | VectorData::Expression(_) => None,
        };
        return render_string(text.or(Some("NA".to_string())));
    }
    render_string(Some(ctx.deparser.deparse(element)))
}
