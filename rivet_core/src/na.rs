//! NA sentinels and element-level checks.
//!
//! Every element kind except raw has a missing-value sentinel:
//! - integer NA is `i32::MIN`
//! - logical is a byte: 0 = false, 1 = true, -1 = NA
//! - double NA is a quiet NaN with a specific payload, distinguishable from
//!   an ordinary NaN only by bit pattern
//! - complex NA has NA in either part
//! - character NA is represented structurally (`Option::None`) and printed
//!   as the token `"NA"`
//!
//! Raw has no NA; lossy conversions into raw produce zero plus a warning.

/// Integer NA sentinel.
pub const INT_NA: i32 = i32::MIN;

/// Logical truth values. Logical is a byte, not a bool, because it is
/// three-valued.
pub const LOGICAL_FALSE: i8 = 0;
pub const LOGICAL_TRUE: i8 = 1;
pub const LOGICAL_NA: i8 = -1;

/// Bit pattern of the double NA payload.
const DOUBLE_NA_BITS: u64 = 0x7ff0_0000_0000_07a2;

/// Double NA sentinel. A NaN, but not *the* NaN: `is_na_double`
/// distinguishes it from arithmetic NaN by bit pattern.
pub const DOUBLE_NA: f64 = f64::from_bits(DOUBLE_NA_BITS);

/// The canonical printed token for character NA.
pub const STRING_NA_TOKEN: &str = "NA";

/// Check integer NA.
#[inline]
pub fn is_na_int(value: i32) -> bool {
    value == INT_NA
}

/// Check logical NA.
#[inline]
pub fn is_na_logical(value: i8) -> bool {
    value == LOGICAL_NA
}

/// Check for the double NA payload specifically (not arithmetic NaN).
#[inline]
pub fn is_na_double(value: f64) -> bool {
    value.to_bits() == DOUBLE_NA_BITS
}

/// Check for NA or any NaN. NA is itself a NaN, so a plain NaN test covers
/// both; conversions that must not warn for pre-existing non-values use this.
#[inline]
pub fn is_na_or_nan(value: f64) -> bool {
    value.is_nan()
}

/// Check that a double is a finite, non-NA number.
#[inline]
pub fn is_complete_double(value: f64) -> bool {
    !is_na_or_nan(value) && !value.is_infinite()
}

// =============================================================================
// Complex
// =============================================================================

/// A complex element. NA when either part carries the NA payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RComplex {
    pub re: f64,
    pub im: f64,
}

impl RComplex {
    /// Complex NA sentinel.
    pub const NA: RComplex = RComplex {
        re: DOUBLE_NA,
        im: DOUBLE_NA,
    };

    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Real number viewed as complex.
    #[inline]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// NA check: either part carrying the NA payload makes the whole
    /// element missing.
    #[inline]
    pub fn is_na(self) -> bool {
        is_na_double(self.re) || is_na_double(self.im)
    }

    /// NA-or-NaN check over both parts.
    #[inline]
    pub fn is_na_or_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}
