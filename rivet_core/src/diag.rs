//! Continuable precision warnings.
//!
//! Lossy conversions never corrupt silently: every one yields a documented
//! sentinel (NA, raw zero, truncated value) and, where the rules say so, a
//! warning recorded against an ambient sink. The sink is passed explicitly
//! into every cast call; there is no global warning state.

use std::fmt;

/// Warnings emitted by the cast pipeline. Each is recorded at most once per
/// cast call, however many elements triggered it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeWarning {
    /// A value became NA during coercion (parse failure, etc.).
    NaIntroduced,
    /// A double outside the integer range became NA.
    NaIntroducedIntRange,
    /// A nonzero imaginary part was dropped.
    ImaginaryPartsDiscarded,
    /// A value outside [0, 255] (or non-finite) became raw zero.
    OutOfRangeRaw,
}

impl RuntimeWarning {
    /// The user-visible warning message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NaIntroduced => "NAs introduced by coercion",
            Self::NaIntroducedIntRange => "NAs introduced by coercion to integer range",
            Self::ImaginaryPartsDiscarded => "imaginary parts discarded in coercion",
            Self::OutOfRangeRaw => "out-of-range values treated as 0 in coercion to raw",
        }
    }
}

impl fmt::Display for RuntimeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Destination for continuable warnings.
///
/// The reporting subsystem proper is an external collaborator; this trait is
/// the seam it plugs into.
pub trait WarningSink {
    fn warn(&mut self, warning: RuntimeWarning);
}

/// A sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WarningSink for NullSink {
    #[inline]
    fn warn(&mut self, _warning: RuntimeWarning) {}
}

/// A collecting sink: records warnings in order for later inspection.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<RuntimeWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded warnings, in emission order.
    #[inline]
    pub fn warnings(&self) -> &[RuntimeWarning] {
        &self.warnings
    }

    /// Number of occurrences of one warning kind.
    pub fn count(&self, warning: RuntimeWarning) -> usize {
        self.warnings.iter().filter(|w| **w == warning).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drain the recorded warnings.
    pub fn take(&mut self) -> Vec<RuntimeWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}

impl WarningSink for Diagnostics {
    #[inline]
    fn warn(&mut self, warning: RuntimeWarning) {
        self.warnings.push(warning);
    }
}
