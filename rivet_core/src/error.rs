//! Error taxonomy for the value model.
//!
//! Two fatal categories share one enum:
//! - validation errors: malformed attribute values, invalid class/factor
//!   combinations, non-coercible type pairs, malformed list elements during
//!   recursive coercion. Fatal to the current operation only; the container
//!   is left in its prior state.
//! - internal invariant failures: shape/cache bookkeeping that should be
//!   unreachable.
//!
//! Continuable precision warnings live in [`crate::diag`], not here.

use std::fmt;

/// Errors raised by attribute installation and the cast pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An attribute whose length must match the container length did not.
    AttributeLengthMismatch {
        attribute: &'static str,
        attribute_len: usize,
        vector_len: usize,
    },

    /// A dimension extent was negative or NA.
    InvalidDimValue { value: i32 },

    /// The product of the dim extents does not equal the container length.
    DimsDontMatchLength { product: usize, length: usize },

    /// dimnames set on a container with no dim attribute.
    DimNamesNonArray,

    /// dimnames value is not a list.
    DimNamesNotList,

    /// dimnames list length differs from the number of dimensions.
    DimNamesDontMatchDims { dimnames_len: usize, dims_len: usize },

    /// A dimnames element length differs from its extent (1-based index).
    DimNamesDontMatchExtent { index: usize },

    /// Class vector invalid for this container (e.g. "factor" on a
    /// non-integer representation).
    AddingInvalidClass { class: String },

    /// Illegal (source, target) cast combination.
    CannotCoerce {
        from: &'static str,
        to: &'static str,
    },

    /// A list element of length > 1 encountered during recursive coercion.
    ListCoercion { to: &'static str },

    /// Should-not-happen bookkeeping failure in the shape/cache machinery.
    InternalInvariant { message: String },
}

impl RuntimeError {
    /// Whether this is an intended-unreachable internal failure rather than
    /// a user-input validation error.
    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, RuntimeError::InternalInvariant { .. })
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeLengthMismatch {
                attribute,
                attribute_len,
                vector_len,
            } => write!(
                f,
                "'{}' attribute [{}] must be the same length as the vector [{}]",
                attribute, attribute_len, vector_len
            ),
            Self::InvalidDimValue { value } => {
                write!(f, "the dims contain invalid value [{}]", value)
            }
            Self::DimsDontMatchLength { product, length } => write!(
                f,
                "dims [product {}] do not match the length of object [{}]",
                product, length
            ),
            Self::DimNamesNonArray => write!(f, "'dimnames' applied to non-array"),
            Self::DimNamesNotList => write!(f, "'dimnames' must be a list"),
            Self::DimNamesDontMatchDims {
                dimnames_len,
                dims_len,
            } => write!(
                f,
                "length of 'dimnames' [{}] must match that of 'dims' [{}]",
                dimnames_len, dims_len
            ),
            Self::DimNamesDontMatchExtent { index } => write!(
                f,
                "length of 'dimnames' [{}] not equal to array extent",
                index
            ),
            Self::AddingInvalidClass { class } => {
                write!(f, "adding class \"{}\" to an invalid object", class)
            }
            Self::CannotCoerce { from, to } => {
                write!(f, "cannot coerce type '{}' to vector of type '{}'", from, to)
            }
            Self::ListCoercion { to } => {
                write!(f, "(list) object cannot be coerced to type '{}'", to)
            }
            Self::InternalInvariant { message } => {
                write!(f, "internal invariant violated: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for value-model operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
