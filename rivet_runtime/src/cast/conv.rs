//! Scalar conversion rules.
//!
//! Every element-level conversion between kinds lives here, parameterized by
//! a [`WarnFlags`] accumulator so each warning kind fires at most once per
//! cast call regardless of how many elements trip it.
//!
//! The load-bearing rules:
//! - NA converts to the target's NA silently; warnings mark conversions that
//!   *introduce* NA (or truncate to raw zero), not ones that carry it over
//! - double to integer saturates through `as`, then the sentinel check
//!   catches both overflow directions
//! - string parsing trims, accepts the literal tokens (TRUE/FALSE, Inf,
//!   NaN, NA) and hex prefixes, and rejects everything else as NA
//! - string to logical never warns

use rivet_core::diag::{RuntimeWarning, WarningSink};
use rivet_core::na::{
    is_na_double, is_na_or_nan, RComplex, DOUBLE_NA, INT_NA, LOGICAL_FALSE, LOGICAL_NA,
    LOGICAL_TRUE,
};
use std::sync::Arc;

use crate::vector::CharElem;

// =============================================================================
// Warning Accumulator
// =============================================================================

/// Per-call warning latches, flushed once at the end of a cast.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct WarnFlags {
    pub na: bool,
    pub na_int_range: bool,
    pub imaginary: bool,
    pub out_of_range: bool,
}

impl WarnFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit each latched warning exactly once, in a fixed order.
    pub fn flush(&self, sink: &mut dyn WarningSink) {
        if self.imaginary {
            sink.warn(RuntimeWarning::ImaginaryPartsDiscarded);
        }
        if self.na {
            sink.warn(RuntimeWarning::NaIntroduced);
        }
        if self.na_int_range {
            sink.warn(RuntimeWarning::NaIntroducedIntRange);
        }
        if self.out_of_range {
            sink.warn(RuntimeWarning::OutOfRangeRaw);
        }
    }
}

// =============================================================================
// Numeric Conversions
// =============================================================================

#[inline]
pub(crate) fn logical_to_int(value: i8) -> i32 {
    if value == LOGICAL_NA {
        INT_NA
    } else {
        value as i32
    }
}

#[inline]
pub(crate) fn logical_to_double(value: i8) -> f64 {
    if value == LOGICAL_NA {
        DOUBLE_NA
    } else {
        value as f64
    }
}

#[inline]
pub(crate) fn int_to_logical(value: i32) -> i8 {
    if value == INT_NA {
        LOGICAL_NA
    } else if value == 0 {
        LOGICAL_FALSE
    } else {
        LOGICAL_TRUE
    }
}

#[inline]
pub(crate) fn int_to_double(value: i32) -> f64 {
    if value == INT_NA {
        DOUBLE_NA
    } else {
        value as f64
    }
}

#[inline]
pub(crate) fn double_to_logical(value: f64) -> i8 {
    if is_na_or_nan(value) {
        LOGICAL_NA
    } else if value == 0.0 {
        LOGICAL_FALSE
    } else {
        LOGICAL_TRUE
    }
}

/// Truncating double-to-integer conversion.
///
/// NA and NaN pass through to integer NA silently; values outside the
/// integer range become NA with the range warning. `as` saturates, so the
/// low side lands exactly on the NA sentinel and only the high side needs
/// an explicit comparison.
#[inline]
pub(crate) fn double_to_int(value: f64, flags: &mut WarnFlags) -> i32 {
    if is_na_or_nan(value) {
        return INT_NA;
    }
    let truncated = value as i32;
    if truncated == i32::MIN || value > i32::MAX as f64 {
        flags.na_int_range = true;
        return INT_NA;
    }
    truncated
}

#[inline]
pub(crate) fn complex_to_double(value: RComplex, flags: &mut WarnFlags) -> f64 {
    if value.is_na() {
        return DOUBLE_NA;
    }
    if value.im != 0.0 {
        flags.imaginary = true;
    }
    value.re
}

#[inline]
pub(crate) fn complex_to_int(value: RComplex, flags: &mut WarnFlags) -> i32 {
    if value.is_na() {
        return INT_NA;
    }
    if value.im != 0.0 {
        flags.imaginary = true;
    }
    double_to_int(value.re, flags)
}

#[inline]
pub(crate) fn complex_to_logical(value: RComplex) -> i8 {
    if value.is_na() {
        LOGICAL_NA
    } else if value.re == 0.0 && value.im == 0.0 {
        LOGICAL_FALSE
    } else {
        LOGICAL_TRUE
    }
}

// =============================================================================
// Raw Conversions
// =============================================================================

#[inline]
pub(crate) fn int_to_raw(value: i32, flags: &mut WarnFlags) -> u8 {
    if value == INT_NA || !(0..=255).contains(&value) {
        flags.out_of_range = true;
        return 0;
    }
    value as u8
}

#[inline]
pub(crate) fn double_to_raw(value: f64, flags: &mut WarnFlags) -> u8 {
    if is_na_or_nan(value) || !value.is_finite() || !(0.0..256.0).contains(&value) {
        flags.out_of_range = true;
        return 0;
    }
    value as u8
}

#[inline]
pub(crate) fn logical_to_raw(value: i8, flags: &mut WarnFlags) -> u8 {
    if value == LOGICAL_NA {
        flags.out_of_range = true;
        return 0;
    }
    value as u8
}

#[inline]
pub(crate) fn complex_to_raw(value: RComplex, flags: &mut WarnFlags) -> u8 {
    if value.is_na() {
        flags.out_of_range = true;
        return 0;
    }
    if value.im != 0.0 {
        flags.imaginary = true;
    }
    double_to_raw(value.re, flags)
}

// =============================================================================
// String Parsing
// =============================================================================

/// Whether a trimmed string is one of the NA literals.
#[inline]
fn is_na_token(s: &str) -> bool {
    matches!(s, "NA" | "NA_real_" | "NA_integer_" | "NA_character_")
}

/// Parse a trimmed numeric string without warning side effects.
///
/// Handles the Inf/NaN tokens and 0x hex; anything containing letters
/// outside those forms is rejected even though Rust's float parser would
/// accept words like "inf".
fn parse_double_token(s: &str) -> Option<f64> {
    match s {
        "Inf" | "+Inf" => return Some(f64::INFINITY),
        "-Inf" => return Some(f64::NEG_INFINITY),
        "NaN" | "+NaN" | "-NaN" => return Some(f64::NAN),
        _ => {}
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let magnitude = u64::from_str_radix(hex, 16).ok()? as f64;
        return Some(if s.starts_with('-') { -magnitude } else { magnitude });
    }

    // Reject alphabetic content the stdlib parser would accept ("inf",
    // "nan"); exponent markers are the only letters a plain literal may hold.
    if unsigned.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// String to double: NA and empty convert silently, parse failure warns.
pub(crate) fn string_to_double(value: &CharElem, flags: &mut WarnFlags) -> f64 {
    let Some(s) = value else {
        return DOUBLE_NA;
    };
    let s = s.trim();
    if is_na_token(s) {
        return DOUBLE_NA;
    }
    match parse_double_token(s) {
        Some(parsed) => parsed,
        None => {
            flags.na = true;
            DOUBLE_NA
        }
    }
}

/// String to integer: the double parse followed by integer truncation, so
/// both the parse warning and the range warning can apply.
pub(crate) fn string_to_int(value: &CharElem, flags: &mut WarnFlags) -> i32 {
    let parsed = string_to_double(value, flags);
    double_to_int(parsed, flags)
}

/// String to logical: the literal TRUE/FALSE spellings; everything else is
/// NA without any warning.
pub(crate) fn string_to_logical(value: &CharElem) -> i8 {
    let Some(s) = value else {
        return LOGICAL_NA;
    };
    match s.trim() {
        "TRUE" | "T" | "true" | "True" => LOGICAL_TRUE,
        "FALSE" | "F" | "false" | "False" => LOGICAL_FALSE,
        _ => LOGICAL_NA,
    }
}

/// String to complex: "a+bi" / "a-bi" / "bi" / plain real.
pub(crate) fn string_to_complex(value: &CharElem, flags: &mut WarnFlags) -> RComplex {
    let Some(s) = value else {
        return RComplex::NA;
    };
    let s = s.trim();
    if is_na_token(s) {
        return RComplex::NA;
    }
    match parse_complex_token(s) {
        Some(parsed) => parsed,
        None => {
            flags.na = true;
            RComplex::NA
        }
    }
}

fn parse_complex_token(s: &str) -> Option<RComplex> {
    let Some(body) = s.strip_suffix('i') else {
        // No imaginary suffix: a plain real literal
        return parse_double_token(s).map(|re| RComplex::new(re, 0.0));
    };

    // Split at the last sign that is not leading and not an exponent sign
    let bytes = body.as_bytes();
    let split = body
        .char_indices()
        .rev()
        .find(|&(i, c)| {
            (c == '+' || c == '-')
                && i > 0
                && !matches!(bytes[i - 1], b'e' | b'E')
        })
        .map(|(i, _)| i);

    match split {
        Some(i) => {
            let re = parse_double_token(body[..i].trim())?;
            let im_text = body[i..].trim();
            let im = match im_text {
                "+" => 1.0,
                "-" => -1.0,
                _ => parse_double_token(im_text)?,
            };
            Some(RComplex::new(re, im))
        }
        // Pure imaginary: "2i", "-1.5i"
        None => parse_double_token(body).map(|im| RComplex::new(0.0, im)),
    }
}

/// String to raw.
///
/// A string of exactly two hex digits is read as the canonical raw
/// rendering, making the character round trip lossless; anything else takes
/// the numeric path, with parse failure warning both NA and out-of-range.
pub(crate) fn string_to_raw(value: &CharElem, flags: &mut WarnFlags) -> u8 {
    if let Some(s) = value {
        let s = s.trim();
        if s.len() == 2 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            if let Ok(parsed) = u8::from_str_radix(s, 16) {
                return parsed;
            }
        }
    }
    let parsed = string_to_double(value, flags);
    if is_na_double(parsed) && value.is_some() {
        // Parse failure (already latched na); the raw result is still zero
        flags.out_of_range = true;
        return 0;
    }
    double_to_raw(parsed, flags)
}

// =============================================================================
// String Rendering
// =============================================================================

/// Scalar element rendering for character coercion; None is character NA.
pub(crate) fn render_string(text: Option<String>) -> CharElem {
    text.map(|s| Arc::from(s.as_str()))
}

// =============================================================================
// Boxed Scalars
// =============================================================================

/// A single element pulled out of a length-1 list member.
#[derive(Debug, Clone)]
pub(crate) enum Scalar {
    Raw(u8),
    Logical(i8),
    Int(i32),
    Double(f64),
    Complex(RComplex),
    Character(CharElem),
}

pub(crate) fn scalar_to_int(scalar: Scalar, flags: &mut WarnFlags) -> i32 {
    match scalar {
        Scalar::Raw(v) => v as i32,
        Scalar::Logical(v) => logical_to_int(v),
        Scalar::Int(v) => v,
        Scalar::Double(v) => double_to_int(v, flags),
        Scalar::Complex(v) => complex_to_int(v, flags),
        Scalar::Character(v) => string_to_int(&v, flags),
    }
}

pub(crate) fn scalar_to_double(scalar: Scalar, flags: &mut WarnFlags) -> f64 {
    match scalar {
        Scalar::Raw(v) => v as f64,
        Scalar::Logical(v) => logical_to_double(v),
        Scalar::Int(v) => int_to_double(v),
        Scalar::Double(v) => v,
        Scalar::Complex(v) => complex_to_double(v, flags),
        Scalar::Character(v) => string_to_double(&v, flags),
    }
}

pub(crate) fn scalar_to_logical(scalar: Scalar) -> i8 {
    match scalar {
        Scalar::Raw(v) => {
            if v == 0 {
                LOGICAL_FALSE
            } else {
                LOGICAL_TRUE
            }
        }
        Scalar::Logical(v) => v,
        Scalar::Int(v) => int_to_logical(v),
        Scalar::Double(v) => double_to_logical(v),
        Scalar::Complex(v) => complex_to_logical(v),
        Scalar::Character(v) => string_to_logical(&v),
    }
}

pub(crate) fn scalar_to_complex(scalar: Scalar, flags: &mut WarnFlags) -> RComplex {
    match scalar {
        Scalar::Raw(v) => RComplex::new(v as f64, 0.0),
        Scalar::Logical(v) => logical_to_complex(v),
        Scalar::Int(v) => int_to_complex(v),
        Scalar::Double(v) => double_to_complex(v),
        Scalar::Complex(v) => v,
        Scalar::Character(v) => string_to_complex(&v, flags),
    }
}

pub(crate) fn scalar_to_raw(scalar: Scalar, flags: &mut WarnFlags) -> u8 {
    match scalar {
        Scalar::Raw(v) => v,
        Scalar::Logical(v) => logical_to_raw(v, flags),
        Scalar::Int(v) => int_to_raw(v, flags),
        Scalar::Double(v) => double_to_raw(v, flags),
        Scalar::Complex(v) => complex_to_raw(v, flags),
        Scalar::Character(v) => string_to_raw(&v, flags),
    }
}

// =============================================================================
// Complex Widening
// =============================================================================

#[inline]
pub(crate) fn logical_to_complex(value: i8) -> RComplex {
    if value == LOGICAL_NA {
        RComplex::NA
    } else {
        RComplex::new(value as f64, 0.0)
    }
}

#[inline]
pub(crate) fn int_to_complex(value: i32) -> RComplex {
    if value == INT_NA {
        RComplex::NA
    } else {
        RComplex::new(value as f64, 0.0)
    }
}

#[inline]
pub(crate) fn double_to_complex(value: f64) -> RComplex {
    if is_na_double(value) {
        RComplex::NA
    } else {
        RComplex::new(value, 0.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_core::na::is_na_int;

    fn elem(s: &str) -> CharElem {
        Some(Arc::from(s))
    }

    // -------------------------------------------------------------------------
    // double -> int
    // -------------------------------------------------------------------------

    #[test]
    fn test_double_to_int_truncates_toward_zero() {
        let mut flags = WarnFlags::new();
        assert_eq!(double_to_int(2.9, &mut flags), 2);
        assert_eq!(double_to_int(-2.9, &mut flags), -2);
        assert!(!flags.na_int_range);
    }

    #[test]
    fn test_double_to_int_nan_silent() {
        let mut flags = WarnFlags::new();
        assert!(is_na_int(double_to_int(f64::NAN, &mut flags)));
        assert!(is_na_int(double_to_int(DOUBLE_NA, &mut flags)));
        assert!(!flags.na_int_range);
        assert!(!flags.na);
    }

    #[test]
    fn test_double_to_int_overflow_both_sides() {
        let mut flags = WarnFlags::new();
        assert!(is_na_int(double_to_int(2.2e9, &mut flags)));
        assert!(flags.na_int_range);

        let mut flags = WarnFlags::new();
        assert!(is_na_int(double_to_int(-2.2e9, &mut flags)));
        assert!(flags.na_int_range);

        let mut flags = WarnFlags::new();
        assert!(is_na_int(double_to_int(f64::INFINITY, &mut flags)));
        assert!(flags.na_int_range);
    }

    #[test]
    fn test_double_to_int_boundaries() {
        let mut flags = WarnFlags::new();
        assert_eq!(double_to_int(i32::MAX as f64, &mut flags), i32::MAX);
        assert!(!flags.na_int_range);
        // MIN itself is the NA sentinel, so it overflows
        assert!(is_na_int(double_to_int(i32::MIN as f64, &mut flags)));
        assert!(flags.na_int_range);
    }

    // -------------------------------------------------------------------------
    // complex
    // -------------------------------------------------------------------------

    #[test]
    fn test_complex_to_double_discards_imaginary() {
        let mut flags = WarnFlags::new();
        assert_eq!(complex_to_double(RComplex::new(3.0, 0.0), &mut flags), 3.0);
        assert!(!flags.imaginary);
        assert_eq!(complex_to_double(RComplex::new(3.0, 1.0), &mut flags), 3.0);
        assert!(flags.imaginary);
    }

    #[test]
    fn test_complex_na_silent() {
        let mut flags = WarnFlags::new();
        assert!(is_na_double(complex_to_double(RComplex::NA, &mut flags)));
        assert!(!flags.imaginary);
        assert!(!flags.na);
    }

    // -------------------------------------------------------------------------
    // raw
    // -------------------------------------------------------------------------

    #[test]
    fn test_int_to_raw_range() {
        let mut flags = WarnFlags::new();
        assert_eq!(int_to_raw(0, &mut flags), 0);
        assert_eq!(int_to_raw(255, &mut flags), 255);
        assert!(!flags.out_of_range);
        assert_eq!(int_to_raw(256, &mut flags), 0);
        assert!(flags.out_of_range);
        let mut flags = WarnFlags::new();
        assert_eq!(int_to_raw(-1, &mut flags), 0);
        assert!(flags.out_of_range);
        let mut flags = WarnFlags::new();
        assert_eq!(int_to_raw(INT_NA, &mut flags), 0);
        assert!(flags.out_of_range);
    }

    #[test]
    fn test_double_to_raw_truncates() {
        let mut flags = WarnFlags::new();
        assert_eq!(double_to_raw(10.7, &mut flags), 10);
        assert!(!flags.out_of_range);
        assert_eq!(double_to_raw(f64::INFINITY, &mut flags), 0);
        assert!(flags.out_of_range);
    }

    // -------------------------------------------------------------------------
    // string parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_string_to_double_plain() {
        let mut flags = WarnFlags::new();
        assert_eq!(string_to_double(&elem("1.5"), &mut flags), 1.5);
        assert_eq!(string_to_double(&elem("  -2e3 "), &mut flags), -2000.0);
        assert!(!flags.na);
    }

    #[test]
    fn test_string_to_double_tokens_silent() {
        let mut flags = WarnFlags::new();
        assert_eq!(string_to_double(&elem("Inf"), &mut flags), f64::INFINITY);
        assert_eq!(string_to_double(&elem("-Inf"), &mut flags), f64::NEG_INFINITY);
        assert!(string_to_double(&elem("NaN"), &mut flags).is_nan());
        assert!(is_na_double(string_to_double(&elem("NA"), &mut flags)));
        assert!(is_na_double(string_to_double(&elem("NA_real_"), &mut flags)));
        assert!(is_na_double(string_to_double(&None, &mut flags)));
        assert!(!flags.na);
    }

    #[test]
    fn test_string_to_double_hex() {
        let mut flags = WarnFlags::new();
        assert_eq!(string_to_double(&elem("0xff"), &mut flags), 255.0);
        assert_eq!(string_to_double(&elem("0X10"), &mut flags), 16.0);
        assert_eq!(string_to_double(&elem("-0x10"), &mut flags), -16.0);
        assert!(!flags.na);
    }

    #[test]
    fn test_string_to_double_rejects_words() {
        for text in ["hello", "inf", "nan", "infinity", "1.5x", ""] {
            let mut flags = WarnFlags::new();
            assert!(
                is_na_double(string_to_double(&elem(text), &mut flags)),
                "{:?} should fail",
                text
            );
            assert!(flags.na, "{:?} should warn", text);
        }
    }

    #[test]
    fn test_string_to_int_range_warning() {
        let mut flags = WarnFlags::new();
        assert_eq!(string_to_int(&elem("42"), &mut flags), 42);
        assert!(!flags.na && !flags.na_int_range);

        let mut flags = WarnFlags::new();
        assert!(is_na_int(string_to_int(&elem("3e10"), &mut flags)));
        assert!(!flags.na);
        assert!(flags.na_int_range);
    }

    #[test]
    fn test_string_to_logical_never_warns() {
        assert_eq!(string_to_logical(&elem("TRUE")), LOGICAL_TRUE);
        assert_eq!(string_to_logical(&elem("T")), LOGICAL_TRUE);
        assert_eq!(string_to_logical(&elem("false")), LOGICAL_FALSE);
        assert_eq!(string_to_logical(&elem("banana")), LOGICAL_NA);
        assert_eq!(string_to_logical(&None), LOGICAL_NA);
    }

    #[test]
    fn test_string_to_complex_forms() {
        let mut flags = WarnFlags::new();
        assert_eq!(
            string_to_complex(&elem("1+2i"), &mut flags),
            RComplex::new(1.0, 2.0)
        );
        assert_eq!(
            string_to_complex(&elem("1.5-0.5i"), &mut flags),
            RComplex::new(1.5, -0.5)
        );
        assert_eq!(
            string_to_complex(&elem("2i"), &mut flags),
            RComplex::new(0.0, 2.0)
        );
        assert_eq!(
            string_to_complex(&elem("3"), &mut flags),
            RComplex::new(3.0, 0.0)
        );
        assert_eq!(
            string_to_complex(&elem("1e2+1e-1i"), &mut flags),
            RComplex::new(100.0, 0.1)
        );
        assert!(!flags.na);

        assert!(string_to_complex(&elem("wat"), &mut flags).is_na());
        assert!(flags.na);
    }

    #[test]
    fn test_string_to_raw_hex_roundtrip() {
        let mut flags = WarnFlags::new();
        assert_eq!(string_to_raw(&elem("0a"), &mut flags), 0x0a);
        assert_eq!(string_to_raw(&elem("ff"), &mut flags), 0xff);
        assert_eq!(string_to_raw(&elem("10"), &mut flags), 0x10);
        assert!(!flags.na && !flags.out_of_range);
    }

    #[test]
    fn test_string_to_raw_numeric_and_failure() {
        let mut flags = WarnFlags::new();
        // Three digits is not the canonical rendering, so numeric parse
        assert_eq!(string_to_raw(&elem("200"), &mut flags), 200);
        assert!(!flags.out_of_range);

        let mut flags = WarnFlags::new();
        assert_eq!(string_to_raw(&elem("300"), &mut flags), 0);
        assert!(flags.out_of_range);

        let mut flags = WarnFlags::new();
        assert_eq!(string_to_raw(&elem("banana"), &mut flags), 0);
        assert!(flags.na);
        assert!(flags.out_of_range);
    }
}
