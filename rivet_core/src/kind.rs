//! The coercion lattice over element kinds.
//!
//! `TypeRank` is a total order: coercion upward (toward `Expression`) never
//! errors and at most warns; downward coercion happens only through the
//! explicit truncating casts in the cast pipeline.

/// Element kinds, ordered by coercion rank.
///
/// The derived `Ord` is the lattice: `Raw < Logical < Integer < Double <
/// Complex < Character < List < Expression`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRank {
    Raw,
    Logical,
    Integer,
    Double,
    Complex,
    Character,
    List,
    Expression,
}

impl TypeRank {
    /// The user-visible type name, as it appears in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            TypeRank::Raw => "raw",
            TypeRank::Logical => "logical",
            TypeRank::Integer => "integer",
            TypeRank::Double => "double",
            TypeRank::Complex => "complex",
            TypeRank::Character => "character",
            TypeRank::List => "list",
            TypeRank::Expression => "expression",
        }
    }

    /// Whether this kind stores scalar elements (everything below `List`).
    #[inline]
    pub const fn is_atomic(self) -> bool {
        !matches!(self, TypeRank::List | TypeRank::Expression)
    }

    /// Whether this kind is numeric in the widening sense.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeRank::Logical | TypeRank::Integer | TypeRank::Double | TypeRank::Complex
        )
    }
}

/// The join of two kinds in the lattice: the smallest kind both coerce to
/// without loss.
#[inline]
pub fn unify(a: TypeRank, b: TypeRank) -> TypeRank {
    a.max(b)
}
