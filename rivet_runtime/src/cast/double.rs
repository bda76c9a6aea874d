//! Coercion to double.

use super::conv::{self, WarnFlags};
use super::{list_element_scalar, CastContext};
use crate::vector::{RVector, VectorData};
use rivet_core::error::{RuntimeError, RuntimeResult};
use rivet_core::na::DOUBLE_NA;

pub(crate) fn cast_double(source: &RVector, ctx: &mut CastContext<'_>) -> RuntimeResult<RVector> {
    let mut flags = WarnFlags::new();
    let out: Vec<f64> = match source.data() {
        VectorData::Double(v) => v.clone(),
        VectorData::Raw(v) => v.iter().map(|x| *x as f64).collect(),
        VectorData::Logical(v) => v.iter().map(|x| conv::logical_to_double(*x)).collect(),
        VectorData::Int(v) => v.iter().map(|x| conv::int_to_double(*x)).collect(),
        VectorData::Complex(v) => v
            .iter()
            .map(|x| conv::complex_to_double(*x, &mut flags))
            .collect(),
        VectorData::Character(v) => v
            .iter()
            .map(|x| conv::string_to_double(x, &mut flags))
            .collect(),
        VectorData::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(match list_element_scalar(element, "double")? {
                    Some(scalar) => conv::scalar_to_double(scalar, &mut flags),
                    None => DOUBLE_NA,
                });
            }
            out
        }
        VectorData::Expression(_) => {
            return Err(RuntimeError::CannotCoerce {
                from: "expression",
                to: "double",
            })
        }
    };
    flags.flush(ctx.diagnostics);
    Ok(RVector::double_vector(out))
}
