//! Coercion to integer.

use super::conv::{self, WarnFlags};
use super::{list_element_scalar, CastContext};
use crate::vector::{RVector, VectorData};
use rivet_core::error::{RuntimeError, RuntimeResult};

pub(crate) fn cast_integer(
    source: &RVector,
    ctx: &mut CastContext<'_>,
) -> RuntimeResult<RVector> {
    let mut flags = WarnFlags::new();
    let out: Vec<i32> = match source.data() {
        VectorData::Int(v) => v.clone(),
        VectorData::Raw(v) => v.iter().map(|x| *x as i32).collect(),
        VectorData::Logical(v) => v.iter().map(|x| conv::logical_to_int(*x)).collect(),
        VectorData::Double(v) => v
            .iter()
            .map(|x| conv::double_to_int(*x, &mut flags))
            .collect(),
        VectorData::Complex(v) => v
            .iter()
            .map(|x| conv::complex_to_int(*x, &mut flags))
            .collect(),
        VectorData::Character(v) => v
            .iter()
            .map(|x| conv::string_to_int(x, &mut flags))
            .collect(),
        VectorData::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(match list_element_scalar(element, "integer")? {
                    Some(scalar) => conv::scalar_to_int(scalar, &mut flags),
                    None => rivet_core::na::INT_NA,
                });
            }
            out
        }
        VectorData::Expression(_) => {
            return Err(RuntimeError::CannotCoerce {
                from: "expression",
                to: "integer",
            })
        }
    };
    flags.flush(ctx.diagnostics);
    Ok(RVector::int_vector(out))
}
