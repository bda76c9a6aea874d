//! Attribute propagation from operands to operation results.
//!
//! Element-wise binary operations produce a fresh result vector whose
//! attributes derive from the two operands under recycling rules:
//! - equal lengths: the left operand wins per attribute, the right fills in
//!   what the left lacks
//! - unequal lengths: only the longer operand's structural attributes
//!   (names, dim, dimnames) survive; with `copy_all` the shorter's regular
//!   attributes are copied first so the longer's overwrite them
//!
//! Structural attributes go through the validating fixed accessors, so a
//! malformed combination surfaces as an error instead of a corrupt result.
//! Every installed value is announced to the sharing model first, since the
//! result aliases the operand's attribute values rather than copying them.

use super::fixed;
use crate::sharing::SharingModel;
use crate::vector::{RValue, RVector};
use rivet_core::error::RuntimeResult;
use rivet_core::intern::Symbol;

/// Copy attributes from both operands onto `result`.
///
/// `left_len` and `right_len` are the operand lengths before recycling;
/// `copy_all` extends propagation beyond names/dim/dimnames to every
/// attribute.
pub fn copy_attributes(
    result: &mut RVector,
    left: &RVector,
    left_len: usize,
    right: &RVector,
    right_len: usize,
    copy_all: bool,
    sharing: &dyn SharingModel,
) -> RuntimeResult<()> {
    // Fast exit: no metadata anywhere
    if !left.has_attributes() && !right.has_attributes() {
        return Ok(());
    }

    if left_len == right_len {
        copy_equal_lengths(result, left, right, copy_all, sharing)
    } else if left_len > right_len {
        copy_unequal_lengths(result, left, right, copy_all, sharing)
    } else {
        copy_unequal_lengths(result, right, left, copy_all, sharing)
    }
}

fn copy_equal_lengths(
    result: &mut RVector,
    left: &RVector,
    right: &RVector,
    copy_all: bool,
    sharing: &dyn SharingModel,
) -> RuntimeResult<()> {
    if copy_all {
        // Right first so left's regular attributes win on collision
        copy_reg_attributes(result, right, sharing);
        copy_reg_attributes(result, left, sharing);
    }

    let dims = fixed::get_dim(left).or_else(|| fixed::get_dim(right));
    match dims {
        None => {
            // Neither operand is an array; scrub any stale structure and
            // take the first names available.
            fixed::set_dim(result, None)?;
            let names = fixed::get_names(left).or_else(|| fixed::get_names(right));
            if let Some(names) = names {
                sharing.mark_shared(&names);
                fixed::set_names(result, Some(names))?;
            }
        }
        Some(dims) => {
            fixed::set_dim(result, Some(&dims))?;
            let dimnames = fixed::get_dimnames(left).or_else(|| fixed::get_dimnames(right));
            if let Some(dimnames) = dimnames {
                sharing.mark_shared(&dimnames);
                fixed::set_dimnames(result, Some(dimnames))?;
            }
        }
    }
    Ok(())
}

/// `longer` dominates: only its structure survives.
fn copy_unequal_lengths(
    result: &mut RVector,
    longer: &RVector,
    shorter: &RVector,
    copy_all: bool,
    sharing: &dyn SharingModel,
) -> RuntimeResult<()> {
    if copy_all {
        copy_reg_attributes(result, shorter, sharing);
        copy_reg_attributes(result, longer, sharing);
    }

    match fixed::get_dim(longer) {
        Some(dims) => {
            fixed::set_dim(result, Some(&dims))?;
            if let Some(dimnames) = fixed::get_dimnames(longer) {
                sharing.mark_shared(&dimnames);
                fixed::set_dimnames(result, Some(dimnames))?;
            }
        }
        None => {
            if let Some(names) = fixed::get_names(longer) {
                sharing.mark_shared(&names);
                fixed::set_names(result, Some(names))?;
            }
        }
    }
    Ok(())
}

/// Copy every attribute except the structural three (names, dim, dimnames).
pub fn copy_reg_attributes(result: &mut RVector, source: &RVector, sharing: &dyn SharingModel) {
    let Some(map) = source.attributes() else {
        return;
    };
    let entries: Vec<(Symbol, RValue)> = map
        .iter()
        .filter(|(name, _)| {
            name != fixed::sym_names() && name != fixed::sym_dim() && name != fixed::sym_dimnames()
        })
        .map(|(name, value)| (name, RValue::clone(value)))
        .collect();
    for (name, value) in entries {
        sharing.mark_shared(&value);
        result.ensure_attributes().set(&name, value);
    }
}

// =============================================================================
// Tests
// =============================================================================
