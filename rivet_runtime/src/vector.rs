//! Vector containers with tagged element storage.
//!
//! An `RVector` owns:
//! - tagged element storage (`VectorData`), one variant per `TypeRank`
//! - a completeness flag ("no element is NA"), letting downstream code elide
//!   NA checks
//! - at most one `AttributeMap`, created lazily on first attribute write and
//!   discarded (not left empty) when the last entry is removed
//! - a denormalized mirror of the `names` attribute for fast reads
//! - an element-name-prefix marker used by dimnames lists downstream
//!
//! Attribute values are shared handles (`RValue = Arc<RVector>`). Containers
//! are single-execution-context values: mutation goes through `&mut` and
//! enforcement of non-mutation of shared values belongs to the external
//! sharing subsystem.

use crate::attributes::fixed;
use crate::attributes::map::AttributeMap;
use rivet_core::error::RuntimeResult;
use rivet_core::kind::TypeRank;
use rivet_core::na::{
    is_na_double, is_na_int, is_na_logical, RComplex, DOUBLE_NA, INT_NA, LOGICAL_NA,
};
use std::sync::Arc;

/// Shared handle to a vector; the currency of attribute values and list
/// elements.
pub type RValue = Arc<RVector>;

/// A character element; `None` is character NA.
pub type CharElem = Option<Arc<str>>;

/// Marker installed on dimnames lists, consumed by downstream accessors.
pub const DIMNAMES_ELEMENT_NAME_PREFIX: &str = "dimnames.";

// =============================================================================
// Element Storage
// =============================================================================

/// Tagged element storage, one variant per element kind.
#[derive(Clone, Debug)]
pub enum VectorData {
    Raw(Vec<u8>),
    Logical(Vec<i8>),
    Int(Vec<i32>),
    Double(Vec<f64>),
    Complex(Vec<RComplex>),
    Character(Vec<CharElem>),
    List(Vec<RValue>),
    Expression(Vec<RValue>),
}

impl VectorData {
    /// The kind tag for this storage.
    #[inline]
    pub fn kind(&self) -> TypeRank {
        match self {
            Self::Raw(_) => TypeRank::Raw,
            Self::Logical(_) => TypeRank::Logical,
            Self::Int(_) => TypeRank::Integer,
            Self::Double(_) => TypeRank::Double,
            Self::Complex(_) => TypeRank::Complex,
            Self::Character(_) => TypeRank::Character,
            Self::List(_) => TypeRank::List,
            Self::Expression(_) => TypeRank::Expression,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(v) => v.len(),
            Self::Logical(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Complex(v) => v.len(),
            Self::Character(v) => v.len(),
            Self::List(v) => v.len(),
            Self::Expression(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// NA-filled storage of the given kind and length (raw is zero-filled;
    /// list kinds are filled with empty vectors).
    pub fn na_filled(kind: TypeRank, len: usize) -> Self {
        match kind {
            TypeRank::Raw => Self::Raw(vec![0; len]),
            TypeRank::Logical => Self::Logical(vec![LOGICAL_NA; len]),
            TypeRank::Integer => Self::Int(vec![INT_NA; len]),
            TypeRank::Double => Self::Double(vec![DOUBLE_NA; len]),
            TypeRank::Complex => Self::Complex(vec![RComplex::NA; len]),
            TypeRank::Character => Self::Character(vec![None; len]),
            TypeRank::List => {
                Self::List((0..len).map(|_| Arc::new(RVector::null())).collect())
            }
            TypeRank::Expression => {
                Self::Expression((0..len).map(|_| Arc::new(RVector::null())).collect())
            }
        }
    }
}

// =============================================================================
// Vector
// =============================================================================

/// A container value: elements plus attribute metadata.
#[derive(Clone, Debug)]
pub struct RVector {
    data: VectorData,
    /// True means "no element is NA". Always exact for cast results.
    complete: bool,
    /// Denormalized mirror of the `names` attribute.
    names: Option<RValue>,
    /// Lazily created attribute storage; `None` means "no attributes".
    attributes: Option<Box<AttributeMap>>,
    /// Set on lists installed as dimnames.
    element_name_prefix: Option<&'static str>,
}

impl RVector {
    /// Create a vector from storage with a caller-supplied completeness flag.
    ///
    /// The flag must be conservative: `true` requires that no element is NA.
    pub fn new(data: VectorData, complete: bool) -> Self {
        Self {
            data,
            complete,
            names: None,
            attributes: None,
            element_name_prefix: None,
        }
    }

    /// Zero-length logical vector; stands in for an absent value in list
    /// elements.
    pub fn null() -> Self {
        Self::new(VectorData::Logical(Vec::new()), true)
    }

    // -------------------------------------------------------------------------
    // Typed constructors
    // -------------------------------------------------------------------------

    pub fn raw_vector(data: Vec<u8>) -> Self {
        // Raw has no NA, so it is always complete.
        Self::new(VectorData::Raw(data), true)
    }

    pub fn logical_vector(data: Vec<i8>) -> Self {
        let complete = !data.iter().any(|v| is_na_logical(*v));
        Self::new(VectorData::Logical(data), complete)
    }

    pub fn int_vector(data: Vec<i32>) -> Self {
        let complete = !data.iter().any(|v| is_na_int(*v));
        Self::new(VectorData::Int(data), complete)
    }

    pub fn double_vector(data: Vec<f64>) -> Self {
        let complete = !data.iter().any(|v| is_na_double(*v));
        Self::new(VectorData::Double(data), complete)
    }

    pub fn complex_vector(data: Vec<RComplex>) -> Self {
        let complete = !data.iter().any(|v| v.is_na());
        Self::new(VectorData::Complex(data), complete)
    }

    pub fn character_vector(data: Vec<CharElem>) -> Self {
        let complete = !data.iter().any(|v| v.is_none());
        Self::new(VectorData::Character(data), complete)
    }

    /// Character vector from string slices, no NA elements.
    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        Self::character_vector(items.iter().map(|s| Some(Arc::from(s.as_ref()))).collect())
    }

    pub fn list_vector(items: Vec<RValue>) -> Self {
        Self::new(VectorData::List(items), true)
    }

    pub fn expression_vector(items: Vec<RValue>) -> Self {
        Self::new(VectorData::Expression(items), true)
    }

    pub fn int_scalar(value: i32) -> Self {
        Self::int_vector(vec![value])
    }

    pub fn double_scalar(value: f64) -> Self {
        Self::double_vector(vec![value])
    }

    pub fn string_scalar(value: &str) -> Self {
        Self::strings(&[value])
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn kind(&self) -> TypeRank {
        self.data.kind()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The completeness flag: true means no element is NA.
    #[inline]
    pub fn complete(&self) -> bool {
        self.complete
    }

    #[inline]
    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    #[inline]
    pub fn data(&self) -> &VectorData {
        &self.data
    }

    /// Mutable element storage. The caller is responsible for keeping the
    /// completeness flag conservative afterwards.
    #[inline]
    pub fn data_mut(&mut self) -> &mut VectorData {
        &mut self.data
    }

    // -------------------------------------------------------------------------
    // Typed views
    // -------------------------------------------------------------------------

    pub fn as_raw(&self) -> Option<&[u8]> {
        match &self.data {
            VectorData::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_logicals(&self) -> Option<&[i8]> {
        match &self.data {
            VectorData::Logical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i32]> {
        match &self.data {
            VectorData::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[f64]> {
        match &self.data {
            VectorData::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_complexes(&self) -> Option<&[RComplex]> {
        match &self.data {
            VectorData::Complex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[CharElem]> {
        match &self.data {
            VectorData::Character(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RValue]> {
        match &self.data {
            VectorData::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&[RValue]> {
        match &self.data {
            VectorData::Expression(v) => Some(v),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Attribute storage
    // -------------------------------------------------------------------------

    #[inline]
    pub fn attributes(&self) -> Option<&AttributeMap> {
        self.attributes.as_deref()
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> Option<&mut AttributeMap> {
        self.attributes.as_deref_mut()
    }

    /// Get or lazily create the attribute map.
    pub fn ensure_attributes(&mut self) -> &mut AttributeMap {
        self.attributes
            .get_or_insert_with(|| Box::new(AttributeMap::new()))
            .as_mut()
    }

    /// Removing the last entry must yield "no attributes", not an empty map.
    pub fn drop_attributes_if_empty(&mut self) {
        if self.attributes.as_ref().is_some_and(|m| m.is_empty()) {
            self.attributes = None;
        }
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    // -------------------------------------------------------------------------
    // Denormalized fields
    // -------------------------------------------------------------------------

    /// Fast-read mirror of the `names` attribute.
    #[inline]
    pub fn internal_names(&self) -> Option<&RValue> {
        self.names.as_ref()
    }

    #[inline]
    pub fn set_internal_names(&mut self, names: Option<RValue>) {
        self.names = names;
    }

    #[inline]
    pub fn element_name_prefix(&self) -> Option<&'static str> {
        self.element_name_prefix
    }

    #[inline]
    pub fn set_element_name_prefix(&mut self, prefix: Option<&'static str>) {
        self.element_name_prefix = prefix;
    }
}

// =============================================================================
// Container Factory
// =============================================================================

/// Create an NA-filled vector of the given kind and length (raw: zero-filled
/// and complete).
pub fn make_vector(kind: TypeRank, len: usize) -> RVector {
    let complete = matches!(kind, TypeRank::Raw | TypeRank::List | TypeRank::Expression);
    RVector::new(VectorData::na_filled(kind, len), complete)
}

/// Create a vector and install name/dim hints through the fixed-attribute
/// accessors, propagating their validation errors.
pub fn make_vector_with(
    kind: TypeRank,
    len: usize,
    name_hint: Option<RValue>,
    dim_hint: Option<&[i32]>,
) -> RuntimeResult<RVector> {
    let mut vector = make_vector(kind, len);
    if let Some(names) = name_hint {
        fixed::set_names(&mut vector, Some(names))?;
    }
    if let Some(dims) = dim_hint {
        fixed::set_dim(&mut vector, Some(dims))?;
    }
    Ok(vector)
}
