//! Coercion to logical.

use super::conv;
use super::{list_element_scalar, CastContext};
use crate::vector::{RVector, VectorData};
use rivet_core::error::{RuntimeError, RuntimeResult};
use rivet_core::na::{LOGICAL_FALSE, LOGICAL_NA, LOGICAL_TRUE};

/// Logical is the one target that never warns: even unparseable strings
/// become NA silently.
pub(crate) fn cast_logical(
    source: &RVector,
    _ctx: &mut CastContext<'_>,
) -> RuntimeResult<RVector> {
    let out: Vec<i8> = match source.data() {
        VectorData::Logical(v) => v.clone(),
        VectorData::Raw(v) => v
            .iter()
            .map(|x| if *x == 0 { LOGICAL_FALSE } else { LOGICAL_TRUE })
            .collect(),
        VectorData::Int(v) => v.iter().map(|x| conv::int_to_logical(*x)).collect(),
        VectorData::Double(v) => v.iter().map(|x| conv::double_to_logical(*x)).collect(),
        VectorData::Complex(v) => v.iter().map(|x| conv::complex_to_logical(*x)).collect(),
        // String-to-logical failures are silent NAs, never warnings
        VectorData::Character(v) => v.iter().map(conv::string_to_logical).collect(),
        VectorData::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(match list_element_scalar(element, "logical")? {
                    Some(scalar) => conv::scalar_to_logical(scalar),
                    None => LOGICAL_NA,
                });
            }
            out
        }
        VectorData::Expression(_) => {
            return Err(RuntimeError::CannotCoerce {
                from: "expression",
                to: "logical",
            })
        }
    };
    Ok(RVector::logical_vector(out))
}
