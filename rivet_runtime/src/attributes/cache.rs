//! Adaptive per-call-site attribute access caches.
//!
//! Each site that repeatedly accesses one attribute name owns an
//! `AttributeAccessSite`. The site caches shape-to-slot mappings so hot
//! lookups skip the shape-chain walk entirely.
//!
//! # Tier machine
//!
//! ```text
//! Empty -> Monomorphic -> Polymorphic(4) -> BoundedScan(10..64) -> Generic
//! ```
//!
//! Transitions are degrade-only: a site never moves back toward a cheaper
//! tier, and Generic is sticky. Monomorphic caches one (shape, slot) pair;
//! Polymorphic up to four; BoundedScan does uncached lookups while the
//! attribute count stays within a growable limit; Generic always takes the
//! full lookup path.
//!
//! Cached entries stay valid forever: shapes are immutable, so a (shape,
//! slot) pair can go stale only in the sense of no longer matching, never in
//! the sense of pointing at the wrong slot.
//!
//! Sites created for one of the fixed attribute names (names, dim, dimnames,
//! row.names, class) delegate every operation to the validating fixed
//! accessors instead of the tier machine: those names carry cross-field
//! invariants and read-side transforms that a raw slot access would bypass.

use super::fixed;
use super::shape::ShapeId;
use crate::vector::{RValue, RVector};
use rivet_core::error::RuntimeResult;
use rivet_core::intern::Symbol;

/// Maximum entries in a polymorphic cache.
pub const POLY_CACHE_SIZE: usize = 4;

/// Initial attribute-count limit for the bounded-scan tier.
pub const DEFAULT_SCAN_LIMIT: u16 = 10;

/// Ceiling for the bounded-scan limit; beyond this the site goes generic.
pub const MAX_SCAN_LIMIT: u16 = 64;

// =============================================================================
// Tier State
// =============================================================================

/// Single cached (shape, slot) pair.
#[derive(Debug, Clone, Copy)]
pub struct MonoEntry {
    pub shape: ShapeId,
    pub slot: u16,
}

impl MonoEntry {
    /// Check the cache against an observed shape.
    #[inline(always)]
    pub fn check(&self, shape: ShapeId) -> Option<u16> {
        if self.shape == shape {
            Some(self.slot)
        } else {
            None
        }
    }
}

/// Up to four cached (shape, slot) pairs.
#[derive(Debug, Clone, Copy)]
pub struct PolyEntries {
    entries: [(ShapeId, u16); POLY_CACHE_SIZE],
    count: u8,
}

impl PolyEntries {
    /// Start from a displaced monomorphic entry plus the shape that missed.
    fn from_pair(first: MonoEntry, second: MonoEntry) -> Self {
        let mut entries = [(ShapeId::EMPTY, 0u16); POLY_CACHE_SIZE];
        entries[0] = (first.shape, first.slot);
        entries[1] = (second.shape, second.slot);
        Self { entries, count: 2 }
    }

    /// Look up a shape in the cache.
    #[inline(always)]
    pub fn lookup(&self, shape: ShapeId) -> Option<u16> {
        // Unrolled for the hot path
        let count = self.count as usize;
        if count > 0 && self.entries[0].0 == shape {
            return Some(self.entries[0].1);
        }
        if count > 1 && self.entries[1].0 == shape {
            return Some(self.entries[1].1);
        }
        if count > 2 && self.entries[2].0 == shape {
            return Some(self.entries[2].1);
        }
        if count > 3 && self.entries[3].0 == shape {
            return Some(self.entries[3].1);
        }
        None
    }

    /// Add a new entry, returning false if the cache is full.
    fn add(&mut self, shape: ShapeId, slot: u16) -> bool {
        if self.count as usize >= POLY_CACHE_SIZE {
            return false;
        }
        self.entries[self.count as usize] = (shape, slot);
        self.count += 1;
        true
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count as usize
    }
}

/// Cache tier of one access site.
#[derive(Debug, Clone, Copy)]
pub enum CacheTier {
    /// Nothing observed yet.
    Empty,
    /// One shape cached.
    Monomorphic(MonoEntry),
    /// Up to four shapes cached.
    Polymorphic(PolyEntries),
    /// No caching; full lookups while maps stay under `limit` attributes.
    BoundedScan { limit: u16 },
    /// Full lookups, unconditionally. Sticky.
    Generic,
}

/// Lifetime counters for one site.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteStats {
    pub hits: u64,
    pub misses: u64,
    pub downgrades: u32,
}

impl SiteStats {
    #[inline(always)]
    fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    #[inline(always)]
    fn record_miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    /// Hit rate as a fraction of lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// =============================================================================
// Access Site
// =============================================================================

/// Adaptive cache for one attribute name at one access site.
#[derive(Debug)]
pub struct AttributeAccessSite {
    name: Symbol,
    /// Fixed names bypass the cache tiers entirely.
    fixed: bool,
    tier: CacheTier,
    stats: SiteStats,
}

impl AttributeAccessSite {
    /// New site for the given attribute name, starting empty.
    pub fn new(name: Symbol) -> Self {
        let fixed = fixed::is_fixed_name(&name);
        Self {
            name,
            fixed,
            tier: CacheTier::Empty,
            stats: SiteStats::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    #[inline]
    pub fn tier(&self) -> &CacheTier {
        &self.tier
    }

    #[inline]
    pub fn stats(&self) -> &SiteStats {
        &self.stats
    }

    /// Read the attribute through the cache.
    ///
    /// Fixed names take the accessor path so 1-D name shadowing and
    /// row.names expansion apply.
    pub fn get(&mut self, vector: &RVector) -> Option<RValue> {
        if self.fixed {
            self.stats.record_miss();
            return fixed::get_attribute(vector, &self.name);
        }
        let map = vector.attributes()?;
        let shape = map.shape_id();

        match &mut self.tier {
            CacheTier::Empty => {
                let slot = map.shape().lookup(&self.name);
                if let Some(slot) = slot {
                    self.tier = CacheTier::Monomorphic(MonoEntry { shape, slot });
                    self.stats.record_miss();
                    return map.get_slot(slot).cloned();
                }
                self.stats.record_miss();
                None
            }
            CacheTier::Monomorphic(entry) => {
                if let Some(slot) = entry.check(shape) {
                    self.stats.record_hit();
                    return map.get_slot(slot).cloned();
                }
                self.stats.record_miss();
                let slot = map.shape().lookup(&self.name)?;
                // Displace to polymorphic with both shapes
                let old = *entry;
                self.tier =
                    CacheTier::Polymorphic(PolyEntries::from_pair(old, MonoEntry { shape, slot }));
                self.stats.downgrades += 1;
                map.get_slot(slot).cloned()
            }
            CacheTier::Polymorphic(entries) => {
                if let Some(slot) = entries.lookup(shape) {
                    self.stats.record_hit();
                    return map.get_slot(slot).cloned();
                }
                self.stats.record_miss();
                let slot = map.shape().lookup(&self.name)?;
                if !entries.add(shape, slot) {
                    self.tier = CacheTier::BoundedScan {
                        limit: DEFAULT_SCAN_LIMIT,
                    };
                    self.stats.downgrades += 1;
                }
                map.get_slot(slot).cloned()
            }
            CacheTier::BoundedScan { limit } => {
                let count = map.len() as u16;
                if count > *limit {
                    // Grow the limit; past the ceiling the site goes generic.
                    let mut grown = *limit;
                    while grown < count && grown < MAX_SCAN_LIMIT {
                        grown = (grown * 2).min(MAX_SCAN_LIMIT);
                    }
                    if count > grown {
                        self.tier = CacheTier::Generic;
                    } else {
                        *limit = grown;
                    }
                    self.stats.downgrades += 1;
                }
                self.stats.record_miss();
                map.get(&self.name).cloned()
            }
            CacheTier::Generic => {
                self.stats.record_miss();
                map.get(&self.name).cloned()
            }
        }
    }

    /// Write the attribute through the cache.
    ///
    /// Fixed names go through their validating accessors so a rejected
    /// install leaves the container untouched. For regular names the fast
    /// path covers only the already-bound case, where the write is an
    /// in-place slot store and the shape does not change; everything else
    /// takes the generic install path.
    pub fn set(&mut self, vector: &mut RVector, value: RValue) -> RuntimeResult<()> {
        if self.fixed {
            self.stats.record_miss();
            return fixed::set_attribute(vector, &self.name, Some(value));
        }
        if let Some(map) = vector.attributes_mut() {
            let shape = map.shape_id();
            let cached = match &self.tier {
                CacheTier::Monomorphic(entry) => entry.check(shape),
                CacheTier::Polymorphic(entries) => entries.lookup(shape),
                _ => None,
            };
            if let Some(slot) = cached {
                self.stats.record_hit();
                map.set_slot(slot, value);
                return Ok(());
            }
        }
        self.stats.record_miss();
        let name = self.name.clone();
        vector.ensure_attributes().set(&name, value);
        Ok(())
    }

    /// Remove the attribute. Always an uncached path; stale cached entries
    /// keyed on pre-removal shapes simply stop matching. Fixed names route
    /// through the accessors so their removal cascades apply.
    pub fn remove(&mut self, vector: &mut RVector) -> Option<RValue> {
        self.stats.record_miss();
        if self.fixed {
            let name = self.name.clone();
            return fixed::remove_attribute(vector, &name);
        }
        let removed = vector.attributes_mut()?.remove(&self.name);
        vector.drop_attributes_if_empty();
        removed
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::RVector;
    use rivet_core::intern::intern;
    use std::sync::Arc;

    fn value(n: i32) -> RValue {
        Arc::new(RVector::int_scalar(n))
    }

    /// Vector whose attribute map was built by inserting the given names in
    /// order, with distinct payloads.
    fn vector_with_attrs(names: &[&str]) -> RVector {
        let mut v = RVector::int_vector(vec![0]);
        let map = v.ensure_attributes();
        for (i, name) in names.iter().enumerate() {
            map.set(&intern(name), value(i as i32));
        }
        v
    }

    fn payload(v: &Option<RValue>) -> i32 {
        v.as_ref().unwrap().as_ints().unwrap()[0]
    }

    // -------------------------------------------------------------------------
    // Tier Progression
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_primes_monomorphic() {
        let mut site = AttributeAccessSite::new(intern("units"));
        assert!(matches!(site.tier(), CacheTier::Empty));

        let v = vector_with_attrs(&["units"]);
        assert_eq!(payload(&site.get(&v)), 0);
        assert!(matches!(site.tier(), CacheTier::Monomorphic(_)));
    }

    #[test]
    fn test_monomorphic_hit() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let v = vector_with_attrs(&["units"]);
        site.get(&v);
        let hits_before = site.stats().hits;
        assert_eq!(payload(&site.get(&v)), 0);
        assert_eq!(site.stats().hits, hits_before + 1);
        assert!(matches!(site.tier(), CacheTier::Monomorphic(_)));
    }

    #[test]
    fn test_monomorphic_degrades_to_polymorphic() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let a = vector_with_attrs(&["units"]);
        let b = vector_with_attrs(&["origin", "units"]);

        site.get(&a);
        assert_eq!(payload(&site.get(&b)), 1);
        assert!(matches!(site.tier(), CacheTier::Polymorphic(_)));

        // Both shapes now hit
        let hits_before = site.stats().hits;
        site.get(&a);
        site.get(&b);
        assert_eq!(site.stats().hits, hits_before + 2);
    }

    #[test]
    fn test_polymorphic_degrades_to_bounded_scan() {
        let mut site = AttributeAccessSite::new(intern("target"));
        // Five distinct shapes all binding "target"
        let prefixes: [&[&str]; 5] = [
            &["target"],
            &["a", "target"],
            &["a", "b", "target"],
            &["a", "b", "c", "target"],
            &["a", "b", "c", "d", "target"],
        ];
        for (i, names) in prefixes.iter().enumerate() {
            let v = vector_with_attrs(names);
            assert_eq!(payload(&site.get(&v)), names.len() as i32 - 1, "shape {}", i);
        }
        assert!(matches!(site.tier(), CacheTier::BoundedScan { .. }));
    }

    #[test]
    fn test_bounded_scan_grows_limit() {
        let mut site = AttributeAccessSite::new(intern("x"));
        site.tier = CacheTier::BoundedScan {
            limit: DEFAULT_SCAN_LIMIT,
        };

        // 16 attributes exceeds the default limit of 10
        let names: Vec<String> = (0..15).map(|i| format!("a{}", i)).collect();
        let mut all: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        all.push("x");
        let v = vector_with_attrs(&all);

        assert_eq!(payload(&site.get(&v)), 15);
        match site.tier() {
            CacheTier::BoundedScan { limit } => assert!(*limit >= 16),
            other => panic!("unexpected tier {:?}", other),
        }
    }

    #[test]
    fn test_bounded_scan_goes_generic_past_ceiling() {
        let mut site = AttributeAccessSite::new(intern("x"));
        site.tier = CacheTier::BoundedScan {
            limit: DEFAULT_SCAN_LIMIT,
        };

        let names: Vec<String> = (0..70).map(|i| format!("a{}", i)).collect();
        let mut all: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        all.push("x");
        let v = vector_with_attrs(&all);

        assert_eq!(payload(&site.get(&v)), 70);
        assert!(matches!(site.tier(), CacheTier::Generic));

        // Generic is sticky: a small map does not re-promote the site
        let small = vector_with_attrs(&["x"]);
        assert_eq!(payload(&site.get(&small)), 0);
        assert!(matches!(site.tier(), CacheTier::Generic));
    }

    // -------------------------------------------------------------------------
    // Misses and Absent Attributes
    // -------------------------------------------------------------------------

    #[test]
    fn test_absent_attribute_does_not_prime() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let v = vector_with_attrs(&["origin"]);
        assert!(site.get(&v).is_none());
        assert!(matches!(site.tier(), CacheTier::Empty));
    }

    #[test]
    fn test_no_attribute_map_at_all() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let v = RVector::int_vector(vec![1]);
        assert!(site.get(&v).is_none());
        assert!(matches!(site.tier(), CacheTier::Empty));
    }

    #[test]
    fn test_monomorphic_survives_absent_miss() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let with = vector_with_attrs(&["units"]);
        let without = vector_with_attrs(&["origin"]);

        site.get(&with);
        assert!(site.get(&without).is_none());
        // Absent lookups are handled generically without displacing the cache
        assert!(matches!(site.tier(), CacheTier::Monomorphic(_)));
        assert_eq!(payload(&site.get(&with)), 0);
    }

    // -------------------------------------------------------------------------
    // Cached Writes and Removal
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_fast_path_in_place() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let mut v = vector_with_attrs(&["units"]);
        site.get(&v);
        let shape_before = v.attributes().unwrap().shape_id();

        site.set(&mut v, value(42)).unwrap();
        assert_eq!(v.attributes().unwrap().shape_id(), shape_before);
        assert_eq!(payload(&site.get(&v)), 42);
    }

    #[test]
    fn test_set_generic_installs_new_binding() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let mut v = RVector::int_vector(vec![1]);
        site.set(&mut v, value(7)).unwrap();
        assert_eq!(payload(&site.get(&v)), 7);
    }

    #[test]
    fn test_remove_through_site() {
        let mut site = AttributeAccessSite::new(intern("units"));
        let mut v = vector_with_attrs(&["units"]);
        site.get(&v);

        let removed = site.remove(&mut v).unwrap();
        assert_eq!(removed.as_ints(), Some(&[0][..]));
        // Last attribute gone means no attribute map at all
        assert!(!v.has_attributes());
        assert!(site.get(&v).is_none());
    }

    #[test]
    fn test_stale_entry_still_correct_for_old_shape() {
        let mut site = AttributeAccessSite::new(intern("a"));
        let v1 = vector_with_attrs(&["a", "b"]);
        site.get(&v1);

        // A different container reaches the same shape; cache still applies.
        let v2 = vector_with_attrs(&["a", "b"]);
        assert_eq!(
            v1.attributes().unwrap().shape_id(),
            v2.attributes().unwrap().shape_id()
        );
        assert_eq!(payload(&site.get(&v2)), 0);
        assert!(site.stats().hits >= 1);
    }

    // -------------------------------------------------------------------------
    // Fixed Attribute Routing
    // -------------------------------------------------------------------------

    fn chars(items: &[&str]) -> RValue {
        Arc::new(RVector::strings(items))
    }

    #[test]
    fn test_fixed_name_site_bypasses_tiers() {
        let mut site = AttributeAccessSite::new(intern("class"));
        let mut v = RVector::int_vector(vec![1]);
        fixed::set_class(&mut v, Some(chars(&["a"]))).unwrap();

        assert!(site.get(&v).is_some());
        assert!(matches!(site.tier(), CacheTier::Empty));
    }

    #[test]
    fn test_site_dim_write_is_validated() {
        let mut site = AttributeAccessSite::new(intern("dim"));
        let mut v = RVector::int_vector(vec![1, 2, 3, 4, 5, 6]);

        let err = site
            .set(&mut v, Arc::new(RVector::int_vector(vec![2, 4])))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dims [product 8] do not match the length of object [6]"
        );
        assert!(fixed::get_dim(&v).is_none());

        site.set(&mut v, Arc::new(RVector::int_vector(vec![2, 3])))
            .unwrap();
        assert_eq!(fixed::get_dim(&v), Some(vec![2, 3]));
    }

    #[test]
    fn test_site_names_write_keeps_mirror_fresh() {
        let mut site = AttributeAccessSite::new(intern("names"));
        let mut v = RVector::int_vector(vec![1, 2]);
        fixed::set_names(&mut v, Some(chars(&["a", "b"]))).unwrap();

        site.set(&mut v, chars(&["x", "y"])).unwrap();
        let names = fixed::get_names(&v).unwrap();
        assert_eq!(names.as_strings().unwrap()[0].as_deref(), Some("x"));

        let through_site = site.get(&v).unwrap();
        assert_eq!(through_site.as_strings().unwrap()[1].as_deref(), Some("y"));
    }

    #[test]
    fn test_site_remove_dim_cascades_dimnames() {
        let mut site = AttributeAccessSite::new(intern("dim"));
        let mut v = RVector::int_vector(vec![1, 2, 3, 4]);
        fixed::set_dim(&mut v, Some(&[2, 2])).unwrap();
        let dn = Arc::new(RVector::list_vector(vec![
            chars(&["r1", "r2"]),
            chars(&["c1", "c2"]),
        ]));
        fixed::set_dimnames(&mut v, Some(dn)).unwrap();

        let removed = site.remove(&mut v).unwrap();
        assert_eq!(removed.as_ints(), Some(&[2, 2][..]));
        assert!(fixed::get_dimnames(&v).is_none());
    }

    #[test]
    fn test_site_get_expands_row_names() {
        let mut site = AttributeAccessSite::new(intern("row.names"));
        let mut v = RVector::int_vector(vec![1, 2, 3]);
        fixed::set_row_names(&mut v, Some(fixed::compact_row_names(3)));

        let expanded = site.get(&v).unwrap();
        assert_eq!(expanded.as_ints(), Some(&[1, 2, 3][..]));
    }
}
