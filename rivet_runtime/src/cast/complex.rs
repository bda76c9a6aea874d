//! Coercion to complex.

use super::conv::{self, WarnFlags};
use super::{list_element_scalar, CastContext};
use crate::vector::{RVector, VectorData};
use rivet_core::error::{RuntimeError, RuntimeResult};
use rivet_core::na::RComplex;

pub(crate) fn cast_complex(
    source: &RVector,
    ctx: &mut CastContext<'_>,
) -> RuntimeResult<RVector> {
    let mut flags = WarnFlags::new();
    let out: Vec<RComplex> = match source.data() {
        VectorData::Complex(v) => v.clone(),
        VectorData::Raw(v) => v.iter().map(|x| RComplex::new(*x as f64, 0.0)).collect(),
        VectorData::Logical(v) => v.iter().map(|x| conv::logical_to_complex(*x)).collect(),
        VectorData::Int(v) => v.iter().map(|x| conv::int_to_complex(*x)).collect(),
        VectorData::Double(v) => v.iter().map(|x| conv::double_to_complex(*x)).collect(),
        VectorData::Character(v) => v
            .iter()
            .map(|x| conv::string_to_complex(x, &mut flags))
            .collect(),
        VectorData::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(match list_element_scalar(element, "complex")? {
                    Some(scalar) => conv::scalar_to_complex(scalar, &mut flags),
                    None => RComplex::NA,
                });
            }
            out
        }
        VectorData::Expression(_) => {
            return Err(RuntimeError::CannotCoerce {
                from: "expression",
                to: "complex",
            })
        }
    };
    flags.flush(ctx.diagnostics);
    Ok(RVector::complex_vector(out))
}
