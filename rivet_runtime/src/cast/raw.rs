//! Coercion to raw.
//!
//! Raw has no NA, so every unrepresentable element collapses to zero with
//! the out-of-range warning instead of a sentinel.

use super::conv::{self, WarnFlags};
use super::{list_element_scalar, CastContext};
use crate::vector::{RVector, VectorData};
use rivet_core::error::{RuntimeError, RuntimeResult};

pub(crate) fn cast_raw(source: &RVector, ctx: &mut CastContext<'_>) -> RuntimeResult<RVector> {
    let mut flags = WarnFlags::new();
    let out: Vec<u8> = match source.data() {
        VectorData::Raw(v) => v.clone(),
        VectorData::Logical(v) => v
            .iter()
            .map(|x| conv::logical_to_raw(*x, &mut flags))
            .collect(),
        VectorData::Int(v) => v.iter().map(|x| conv::int_to_raw(*x, &mut flags)).collect(),
        VectorData::Double(v) => v
            .iter()
            .map(|x| conv::double_to_raw(*x, &mut flags))
            .collect(),
        VectorData::Complex(v) => v
            .iter()
            .map(|x| conv::complex_to_raw(*x, &mut flags))
            .collect(),
        VectorData::Character(v) => v
            .iter()
            .map(|x| conv::string_to_raw(x, &mut flags))
            .collect(),
        VectorData::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(match list_element_scalar(element, "raw")? {
                    Some(scalar) => conv::scalar_to_raw(scalar, &mut flags),
                    None => {
                        flags.out_of_range = true;
                        0
                    }
                });
            }
            out
        }
        VectorData::Expression(_) => {
            return Err(RuntimeError::CannotCoerce {
                from: "expression",
                to: "raw",
            })
        }
    };
    flags.flush(ctx.diagnostics);
    Ok(RVector::raw_vector(out))
}
