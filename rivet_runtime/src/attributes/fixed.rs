//! Fixed attribute accessors: names, dim, dimnames, row.names, class.
//!
//! The five fixed attributes live in the ordinary shape-backed map but carry
//! cross-field invariants the generic path cannot enforce:
//! - `names` must be a character vector of the container's length; on a
//!   one-dimensional array it is stored as `dimnames[[1]]` instead
//! - `dim` extents must be non-negative and non-NA and multiply to the
//!   container length; installing dim invalidates dimnames
//! - `dimnames` requires dim, must be a list of the array's rank, and each
//!   non-null element must match its extent
//! - `row.names` supports the compact two-element encoding of 1..n
//! - `class` must be a character vector, and "factor" is only valid on an
//!   integer representation
//!
//! All mutation is validate-first: a rejected install leaves the container
//! untouched. Removing the last attribute discards the map entirely.

use crate::vector::{RValue, RVector, VectorData, DIMNAMES_ELEMENT_NAME_PREFIX};
use rivet_core::error::{RuntimeError, RuntimeResult};
use rivet_core::intern::{intern, Symbol};
use rivet_core::kind::TypeRank;
use rivet_core::na::{is_na_int, INT_NA};
use std::sync::{Arc, OnceLock};

// =============================================================================
// Well-Known Symbols
// =============================================================================

macro_rules! well_known {
    ($fn_name:ident, $text:expr) => {
        pub fn $fn_name() -> &'static Symbol {
            static SYM: OnceLock<Symbol> = OnceLock::new();
            SYM.get_or_init(|| intern($text))
        }
    };
}

well_known!(sym_names, "names");
well_known!(sym_dim, "dim");
well_known!(sym_dimnames, "dimnames");
well_known!(sym_row_names, "row.names");
well_known!(sym_class, "class");

/// True for the five attribute names with dedicated routing and validation.
pub fn is_fixed_name(name: &Symbol) -> bool {
    name == sym_names()
        || name == sym_dim()
        || name == sym_dimnames()
        || name == sym_row_names()
        || name == sym_class()
}

// =============================================================================
// Generic Entry Points
// =============================================================================

/// Install an attribute by name, routing the fixed names through their
/// validating accessors. `None` removes.
pub fn set_attribute(
    vector: &mut RVector,
    name: &Symbol,
    value: Option<RValue>,
) -> RuntimeResult<()> {
    if name == sym_names() {
        set_names(vector, value)
    } else if name == sym_dim() {
        let dims = match &value {
            Some(v) => Some(int_extents(v)?),
            None => None,
        };
        set_dim(vector, dims.as_deref())
    } else if name == sym_dimnames() {
        set_dimnames(vector, value)
    } else if name == sym_row_names() {
        set_row_names(vector, value);
        Ok(())
    } else if name == sym_class() {
        set_class(vector, value)
    } else {
        match value {
            Some(value) => {
                vector.ensure_attributes().set(name, value);
            }
            None => {
                remove_plain(vector, name);
            }
        }
        Ok(())
    }
}

/// Read an attribute by name, routing the fixed names through their
/// accessors (so 1-D name shadowing and row.names expansion apply).
pub fn get_attribute(vector: &RVector, name: &Symbol) -> Option<RValue> {
    if name == sym_names() {
        get_names(vector)
    } else if name == sym_row_names() {
        get_row_names(vector)
    } else {
        vector.attributes()?.get(name).cloned()
    }
}

/// Presence check under the same routing as `get_attribute`, so shadowed
/// 1-D names count as present.
pub fn has_attribute(vector: &RVector, name: &Symbol) -> bool {
    get_attribute(vector, name).is_some()
}

/// Remove an attribute by name, returning the previous value.
pub fn remove_attribute(vector: &mut RVector, name: &Symbol) -> Option<RValue> {
    if name == sym_names() {
        let previous = get_names(vector);
        // Infallible: removal performs no validation
        let _ = set_names(vector, None);
        previous
    } else if name == sym_dim() {
        let previous = get_dim_value(vector);
        let _ = set_dim(vector, None);
        previous
    } else {
        remove_plain(vector, name)
    }
}

fn remove_plain(vector: &mut RVector, name: &Symbol) -> Option<RValue> {
    let removed = vector.attributes_mut()?.remove(name);
    vector.drop_attributes_if_empty();
    removed
}

// =============================================================================
// names
// =============================================================================

/// Install or remove the `names` attribute.
///
/// On a one-dimensional array the names are stored as the sole dimnames
/// element instead of as a `names` attribute.
pub fn set_names(vector: &mut RVector, names: Option<RValue>) -> RuntimeResult<()> {
    let Some(names) = names else {
        if rank(vector) == Some(1) {
            remove_plain(vector, sym_dimnames());
        }
        remove_plain(vector, sym_names());
        vector.set_internal_names(None);
        return Ok(());
    };

    if names.kind() != TypeRank::Character {
        return Err(RuntimeError::CannotCoerce {
            from: names.kind().name(),
            to: "character",
        });
    }
    if names.len() != vector.len() {
        return Err(RuntimeError::AttributeLengthMismatch {
            attribute: "names",
            attribute_len: names.len(),
            vector_len: vector.len(),
        });
    }

    if rank(vector) == Some(1) {
        let dimnames = Arc::new(RVector::list_vector(vec![names]));
        return set_dimnames(vector, Some(dimnames));
    }

    vector
        .ensure_attributes()
        .set(sym_names(), Arc::clone(&names));
    vector.set_internal_names(Some(names));
    Ok(())
}

/// Read the `names` attribute; on a one-dimensional array the first dimnames
/// element shadows it.
pub fn get_names(vector: &RVector) -> Option<RValue> {
    if let Some(names) = vector.internal_names() {
        return Some(Arc::clone(names));
    }
    if rank(vector) == Some(1) {
        let dimnames = vector.attributes()?.get(sym_dimnames())?;
        let element = dimnames.as_list()?.first()?;
        if element.kind() == TypeRank::Character && !element.is_empty() {
            return Some(Arc::clone(element));
        }
    }
    None
}

// =============================================================================
// dim
// =============================================================================

/// Install or remove the `dim` attribute.
///
/// Validation happens before any mutation. Installing dim removes any
/// existing dimnames; on a rank-1 install, existing names migrate into the
/// new dimnames.
pub fn set_dim(vector: &mut RVector, dims: Option<&[i32]>) -> RuntimeResult<()> {
    let Some(dims) = dims else {
        remove_plain(vector, sym_dimnames());
        remove_plain(vector, sym_dim());
        return Ok(());
    };

    let mut product: usize = 1;
    for &extent in dims {
        if extent < 0 || is_na_int(extent) {
            return Err(RuntimeError::InvalidDimValue { value: extent });
        }
        product = product.saturating_mul(extent as usize);
    }
    if product != vector.len() {
        return Err(RuntimeError::DimsDontMatchLength {
            product,
            length: vector.len(),
        });
    }

    remove_plain(vector, sym_dimnames());
    let migrating_names = if dims.len() == 1 {
        get_names(vector)
    } else {
        None
    };
    if migrating_names.is_some() || vector.internal_names().is_some() {
        remove_plain(vector, sym_names());
        vector.set_internal_names(None);
    }

    let dim_value = Arc::new(RVector::int_vector(dims.to_vec()));
    vector.ensure_attributes().set(sym_dim(), dim_value);

    if let Some(names) = migrating_names {
        let dimnames = Arc::new(RVector::list_vector(vec![names]));
        set_dimnames(vector, Some(dimnames))?;
    }
    Ok(())
}

/// The stored dim attribute value, if any.
pub fn get_dim_value(vector: &RVector) -> Option<RValue> {
    vector.attributes()?.get(sym_dim()).cloned()
}

/// The dim extents, if any.
pub fn get_dim(vector: &RVector) -> Option<Vec<i32>> {
    let value = get_dim_value(vector)?;
    value.as_ints().map(|d| d.to_vec())
}

/// Number of dimensions, if the container is an array.
fn rank(vector: &RVector) -> Option<usize> {
    let map = vector.attributes()?;
    let dim = map.get(sym_dim())?;
    Some(dim.len())
}

// =============================================================================
// dimnames
// =============================================================================

/// Install or remove the `dimnames` attribute.
///
/// Requires dim; the value must be a list of the array's rank, and each
/// non-null element must match its extent. The installed list carries the
/// element-name-prefix marker.
pub fn set_dimnames(vector: &mut RVector, dimnames: Option<RValue>) -> RuntimeResult<()> {
    let Some(mut dimnames) = dimnames else {
        remove_plain(vector, sym_dimnames());
        return Ok(());
    };

    let Some(dims) = get_dim(vector) else {
        return Err(RuntimeError::DimNamesNonArray);
    };
    if dimnames.kind() != TypeRank::List {
        return Err(RuntimeError::DimNamesNotList);
    }
    if dimnames.len() != dims.len() {
        return Err(RuntimeError::DimNamesDontMatchDims {
            dimnames_len: dimnames.len(),
            dims_len: dims.len(),
        });
    }
    // rank check above guarantees the list view exists
    let elements = dimnames.as_list().unwrap_or(&[]);
    for (i, (element, &extent)) in elements.iter().zip(dims.iter()).enumerate() {
        if element.is_empty() {
            continue;
        }
        if element.len() != extent as usize {
            return Err(RuntimeError::DimNamesDontMatchExtent { index: i + 1 });
        }
    }

    if dimnames.element_name_prefix().is_none() {
        Arc::make_mut(&mut dimnames).set_element_name_prefix(Some(DIMNAMES_ELEMENT_NAME_PREFIX));
    }
    vector.ensure_attributes().set(sym_dimnames(), dimnames);
    Ok(())
}

pub fn get_dimnames(vector: &RVector) -> Option<RValue> {
    vector.attributes()?.get(sym_dimnames()).cloned()
}

// =============================================================================
// row.names
// =============================================================================

/// Install or remove the `row.names` attribute. Stored as given; the compact
/// two-element encoding is expanded on read.
pub fn set_row_names(vector: &mut RVector, row_names: Option<RValue>) {
    match row_names {
        Some(value) => {
            vector.ensure_attributes().set(sym_row_names(), value);
        }
        None => {
            remove_plain(vector, sym_row_names());
        }
    }
}

/// Read `row.names`, expanding the compact encoding.
pub fn get_row_names(vector: &RVector) -> Option<RValue> {
    let stored = vector.attributes()?.get(sym_row_names())?;
    Some(expand_row_names(stored))
}

/// Expand the compact row-names encoding `c(NA_integer_, -n)` (or `n`) into
/// the materialized sequence 1..=n. Any other value passes through.
pub fn expand_row_names(row_names: &RValue) -> RValue {
    if let Some(ints) = row_names.as_ints() {
        if ints.len() == 2 && is_na_int(ints[0]) && !is_na_int(ints[1]) {
            let n = ints[1].unsigned_abs() as i32;
            return Arc::new(RVector::int_vector((1..=n).collect()));
        }
    }
    Arc::clone(row_names)
}

/// The compact encoding for row names 1..=n.
pub fn compact_row_names(n: i32) -> RValue {
    Arc::new(RVector::int_vector(vec![INT_NA, -n]))
}

// =============================================================================
// class
// =============================================================================

/// Install or remove the `class` attribute.
///
/// The value must be a character vector; an empty one removes the attribute.
/// The "factor" class is only valid on an integer representation.
pub fn set_class(vector: &mut RVector, class: Option<RValue>) -> RuntimeResult<()> {
    let Some(class) = class else {
        remove_plain(vector, sym_class());
        return Ok(());
    };

    if class.kind() != TypeRank::Character {
        return Err(RuntimeError::CannotCoerce {
            from: class.kind().name(),
            to: "character",
        });
    }
    if class.is_empty() {
        remove_plain(vector, sym_class());
        return Ok(());
    }

    let is_factor = class
        .as_strings()
        .is_some_and(|items| items.iter().any(|s| s.as_deref() == Some("factor")));
    if is_factor && vector.kind() != TypeRank::Integer {
        return Err(RuntimeError::AddingInvalidClass {
            class: "factor".to_string(),
        });
    }

    vector.ensure_attributes().set(sym_class(), class);
    Ok(())
}

pub fn get_class(vector: &RVector) -> Option<RValue> {
    vector.attributes()?.get(sym_class()).cloned()
}

// =============================================================================
// Helpers
// =============================================================================

/// Extents from an attribute value that must be an integer vector.
fn int_extents(value: &RValue) -> RuntimeResult<Vec<i32>> {
    match value.data() {
        VectorData::Int(dims) => Ok(dims.clone()),
        _ => Err(RuntimeError::CannotCoerce {
            from: value.kind().name(),
            to: "integer",
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
