//! Element formatting and the deparse seam.
//!
//! Character coercion needs a textual rendering for every element kind. The
//! scalar renderings are fixed and live here; rendering a non-scalar value
//! embedded in a list is the language front end's business, reached through
//! the [`Deparser`] trait.

use crate::vector::{RValue, VectorData};
use rivet_core::na::{is_na_double, is_na_int, is_na_logical, RComplex, LOGICAL_FALSE};

/// Renders an arbitrary value to source-like text.
pub trait Deparser {
    fn deparse(&self, value: &RValue) -> String;
}

/// Fallback deparser: comma-joined element renderings wrapped in `c(...)`
/// for non-scalars.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDeparser;

impl Deparser for DefaultDeparser {
    fn deparse(&self, value: &RValue) -> String {
        let parts: Vec<String> = match value.data() {
            VectorData::Raw(items) => items.iter().map(|v| raw_to_string(*v)).collect(),
            VectorData::Logical(items) => items
                .iter()
                .map(|v| logical_to_string(*v).unwrap_or_else(|| "NA".to_string()))
                .collect(),
            VectorData::Int(items) => items
                .iter()
                .map(|v| int_to_string(*v).unwrap_or_else(|| "NA".to_string()))
                .collect(),
            VectorData::Double(items) => items
                .iter()
                .map(|v| double_to_string(*v).unwrap_or_else(|| "NA".to_string()))
                .collect(),
            VectorData::Complex(items) => items
                .iter()
                .map(|v| complex_to_string(*v).unwrap_or_else(|| "NA".to_string()))
                .collect(),
            VectorData::Character(items) => items
                .iter()
                .map(|v| match v {
                    Some(s) => format!("\"{}\"", s),
                    None => "NA".to_string(),
                })
                .collect(),
            VectorData::List(items) | VectorData::Expression(items) => {
                items.iter().map(|v| self.deparse(v)).collect()
            }
        };
        if parts.len() == 1 {
            parts.into_iter().next().unwrap_or_default()
        } else {
            format!("c({})", parts.join(", "))
        }
    }
}

// =============================================================================
// Scalar Renderings
// =============================================================================

/// "TRUE"/"FALSE"; None for NA.
pub fn logical_to_string(value: i8) -> Option<String> {
    if is_na_logical(value) {
        return None;
    }
    Some(if value == LOGICAL_FALSE { "FALSE" } else { "TRUE" }.to_string())
}

/// Decimal rendering; None for NA.
pub fn int_to_string(value: i32) -> Option<String> {
    if is_na_int(value) {
        return None;
    }
    Some(value.to_string())
}

/// Shortest-roundtrip rendering with "NaN"/"Inf"/"-Inf"; None for NA.
pub fn double_to_string(value: f64) -> Option<String> {
    if is_na_double(value) {
        return None;
    }
    if value.is_nan() {
        return Some("NaN".to_string());
    }
    if value.is_infinite() {
        return Some(if value > 0.0 { "Inf" } else { "-Inf" }.to_string());
    }
    Some(format!("{}", value))
}

/// "a+bi" / "a-bi"; None for NA.
pub fn complex_to_string(value: RComplex) -> Option<String> {
    if value.is_na() {
        return None;
    }
    let re = double_to_string(value.re).unwrap_or_else(|| "NaN".to_string());
    let im = double_to_string(value.im.abs()).unwrap_or_else(|| "NaN".to_string());
    let sign = if value.im.is_sign_negative() { '-' } else { '+' };
    Some(format!("{}{}{}i", re, sign, im))
}

/// Two lowercase hex digits. Raw has no NA.
pub fn raw_to_string(value: u8) -> String {
    format!("{:02x}", value)
}
