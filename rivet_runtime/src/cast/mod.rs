//! The cast pipeline: one entry point per target kind.
//!
//! [`cast`] dispatches on the target kind, converts element storage through
//! the scalar rules in [`conv`], and optionally carries attributes over per
//! [`CastFlags`]. A cast to the value's own kind is the identity and returns
//! the same handle.
//!
//! Warnings are latched per call and flushed once, whatever the element
//! count. Fatal errors (illegal kind pairs, oversized list elements) leave
//! no partial result.

pub(crate) mod conv;

mod character;
mod complex;
mod double;
mod expression;
mod integer;
mod list;
mod logical;
mod raw;

use crate::attributes::{copy, fixed};
use crate::deparse::Deparser;
use crate::sharing::SharingModel;
use crate::vector::{RValue, RVector, VectorData};
use conv::Scalar;
use rivet_core::diag::WarningSink;
use rivet_core::error::{RuntimeError, RuntimeResult};
use rivet_core::kind::TypeRank;
use std::sync::Arc;

bitflags::bitflags! {
    /// What a cast carries over from the source container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CastFlags: u8 {
        const PRESERVE_NAMES = 1 << 0;
        const PRESERVE_DIMENSIONS = 1 << 1;
        const PRESERVE_ATTRIBUTES = 1 << 2;
    }
}

impl CastFlags {
    /// Carry everything.
    pub const fn all_attributes() -> Self {
        Self::PRESERVE_NAMES
            .union(Self::PRESERVE_DIMENSIONS)
            .union(Self::PRESERVE_ATTRIBUTES)
    }
}

/// Collaborators a cast needs: the warning sink, the deparse seam for
/// rendering non-scalar list elements, and the sharing model for attribute
/// carryover.
pub struct CastContext<'a> {
    pub diagnostics: &'a mut dyn WarningSink,
    pub deparser: &'a dyn Deparser,
    pub sharing: &'a dyn SharingModel,
}

/// Convert a value to the target kind.
pub fn cast(
    value: &RValue,
    target: TypeRank,
    flags: CastFlags,
    ctx: &mut CastContext<'_>,
) -> RuntimeResult<RValue> {
    if value.kind() == target {
        return Ok(Arc::clone(value));
    }

    let mut result = match target {
        TypeRank::Raw => raw::cast_raw(value, ctx)?,
        TypeRank::Logical => logical::cast_logical(value, ctx)?,
        TypeRank::Integer => integer::cast_integer(value, ctx)?,
        TypeRank::Double => double::cast_double(value, ctx)?,
        TypeRank::Complex => complex::cast_complex(value, ctx)?,
        TypeRank::Character => character::cast_character(value, ctx)?,
        TypeRank::List => list::cast_list(value),
        TypeRank::Expression => expression::cast_expression(value),
    };

    preserve_attributes(&mut result, value, flags, ctx.sharing)?;
    Ok(Arc::new(result))
}

/// Carry attributes from the source onto a freshly built result, per flags.
///
/// Names go first so a later rank-1 dim install migrates them; regular
/// attributes go last and never include the structural three.
fn preserve_attributes(
    result: &mut RVector,
    source: &RVector,
    flags: CastFlags,
    sharing: &dyn SharingModel,
) -> RuntimeResult<()> {
    if !source.has_attributes() && source.internal_names().is_none() {
        return Ok(());
    }

    if flags.contains(CastFlags::PRESERVE_NAMES) {
        if let Some(names) = fixed::get_names(source) {
            sharing.mark_shared(&names);
            fixed::set_names(result, Some(names))?;
        }
    }
    if flags.contains(CastFlags::PRESERVE_DIMENSIONS) {
        if let Some(dims) = fixed::get_dim(source) {
            fixed::set_dim(result, Some(&dims))?;
            if let Some(dimnames) = fixed::get_dimnames(source) {
                sharing.mark_shared(&dimnames);
                fixed::set_dimnames(result, Some(dimnames))?;
            }
        }
    }
    if flags.contains(CastFlags::PRESERVE_ATTRIBUTES) {
        copy::copy_reg_attributes(result, source, sharing);
    }
    Ok(())
}

/// Reduce a list element to a scalar for atomic coercion.
///
/// Zero-length and nested list values convert to NA at the target; a
/// length-1 atomic yields its element; anything longer is fatal.
pub(crate) fn list_element_scalar(
    element: &RValue,
    to: &'static str,
) -> RuntimeResult<Option<Scalar>> {
    match element.data() {
        VectorData::List(_) | VectorData::Expression(_) => Ok(None),
        data if data.is_empty() => Ok(None),
        data if data.len() > 1 => Err(RuntimeError::ListCoercion { to }),
        VectorData::Raw(v) => Ok(Some(Scalar::Raw(v[0]))),
        VectorData::Logical(v) => Ok(Some(Scalar::Logical(v[0]))),
        VectorData::Int(v) => Ok(Some(Scalar::Int(v[0]))),
        VectorData::Double(v) => Ok(Some(Scalar::Double(v[0]))),
        VectorData::Complex(v) => Ok(Some(Scalar::Complex(v[0]))),
        VectorData::Character(v) => Ok(Some(Scalar::Character(v[0].clone()))),
    }
}
