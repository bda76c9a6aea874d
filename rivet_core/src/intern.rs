//! Symbol interning for attribute names.
//!
//! Attribute lookup is on the hottest path of the value model, so names are
//! interned once per process and compared by pointer identity afterwards.
//! Two `Symbol`s are equal if and only if they came from the same table
//! entry, which makes equality (and hashing) independent of string length.
//!
//! The table is process-wide and read-mostly: many execution contexts may
//! intern the same name concurrently, so it is backed by a sharded
//! concurrent map.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An interned, immutable string.
///
/// Equality and hashing are by identity: the interner guarantees that equal
/// contents always yield the same underlying allocation, so pointer
/// comparison is sound and O(1).
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Get the string contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable address used for identity comparison and hashing.
    #[inline]
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const u8 as usize
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide intern table.
static INTERN_TABLE: OnceLock<DashMap<Box<str>, Symbol, FxBuildHasher>> = OnceLock::new();

#[inline]
fn table() -> &'static DashMap<Box<str>, Symbol, FxBuildHasher> {
    INTERN_TABLE.get_or_init(|| DashMap::with_hasher(FxBuildHasher::default()))
}

/// Intern a string, returning the canonical `Symbol` for its contents.
pub fn intern(s: &str) -> Symbol {
    // Fast path: already interned.
    if let Some(existing) = table().get(s) {
        return existing.value().clone();
    }
    let entry = table()
        .entry(Box::from(s))
        .or_insert_with(|| Symbol(Arc::from(s)));
    entry.value().clone()
}
