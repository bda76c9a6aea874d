//! Shape system for attribute layout sharing.
//!
//! Containers with the same sequence of attribute additions share a Shape. A
//! Shape describes which attribute names are present and which slot each one
//! occupies, so the per-container state is just the shape pointer plus a flat
//! value array.
//!
//! # Architecture
//!
//! Shapes form a transition tree rooted at the empty shape:
//!
//! ```text
//!     EmptyShape
//!         |
//!     +---+--------+
//!     |            |
//!  "names"      "dim"
//!     |            |
//!  Shape1       Shape2
//!     |
//!  "dim"
//!     |
//!  Shape3 (has names and dim)
//! ```
//!
//! Adding an attribute walks or extends the tree; the same addition sequence
//! always reaches the same shape instance, so shape identity doubles as a
//! layout key for the access caches.
//!
//! ## Removal Transitions
//!
//! Removing an attribute leaves the surviving names in their original
//! insertion order. The resulting shape is rebuilt from the empty shape and
//! memoized in the registry keyed by (source shape id, removed name), so
//! repeated removals are as cheap as additions.

use dashmap::DashMap;
use rivet_core::intern::Symbol;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

// =============================================================================
// Shape ID
// =============================================================================

/// Unique identifier for a Shape.
///
/// Used for fast comparison and cache keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ShapeId(pub u32);

impl ShapeId {
    /// The empty shape ID (no attributes).
    pub const EMPTY: Self = Self(0);

    /// Check if this is the empty shape.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// =============================================================================
// Binding
// =============================================================================

/// The attribute added by one shape transition: its interned name and the
/// slot it occupies in the container's value array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: Symbol,
    pub slot: u16,
}

impl Binding {
    #[inline]
    pub fn new(name: Symbol, slot: u16) -> Self {
        Self { name, slot }
    }
}

// =============================================================================
// Shape
// =============================================================================

/// A Shape describes the attribute layout of containers.
///
/// Containers with the same attribute sequence share a Shape, enabling:
/// - slot access without name hashing once the shape is known
/// - cache keying by shape identity at attribute access sites
///
/// Shapes are immutable once created and form a transition tree.
#[derive(Debug)]
pub struct Shape {
    /// Unique identifier for this shape.
    id: ShapeId,

    /// Parent shape (None for the empty shape).
    parent: Option<Arc<Shape>>,

    /// Attribute added by this shape transition. None for the empty shape.
    binding: Option<Binding>,

    /// Total number of attributes in this shape chain.
    binding_count: u16,

    /// Transitions to child shapes (lazily populated).
    /// Key: attribute name, Value: child shape.
    transitions: RwLock<FxHashMap<Symbol, Arc<Shape>>>,
}

impl Shape {
    /// Create the empty shape (root of the transition tree).
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            id: ShapeId::EMPTY,
            parent: None,
            binding: None,
            binding_count: 0,
            transitions: RwLock::new(FxHashMap::default()),
        })
    }

    /// Create a new shape by adding an attribute to the parent.
    fn with_binding(parent: Arc<Shape>, name: Symbol, id: ShapeId) -> Arc<Self> {
        let slot = parent.binding_count;
        let binding_count = parent.binding_count + 1;
        Arc::new(Self {
            id,
            parent: Some(parent),
            binding: Some(Binding::new(name, slot)),
            binding_count,
            transitions: RwLock::new(FxHashMap::default()),
        })
    }

    /// Get the shape ID.
    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the parent shape.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<Shape>> {
        self.parent.as_ref()
    }

    /// Get the binding added by this shape.
    #[inline]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Total attribute count.
    #[inline]
    pub fn binding_count(&self) -> u16 {
        self.binding_count
    }

    /// Check if this is the empty shape.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Lookup an attribute by name, traversing the shape chain.
    ///
    /// Returns the slot index if found. Name comparison is interned-pointer
    /// equality, so the walk is a handful of pointer compares for typical
    /// attribute counts.
    pub fn lookup(&self, name: &Symbol) -> Option<u16> {
        let mut current = self;
        loop {
            if let Some(binding) = &current.binding {
                if &binding.name == name {
                    return Some(binding.slot);
                }
            }
            match &current.parent {
                Some(parent) => current = parent.as_ref(),
                None => return None,
            }
        }
    }

    /// Collect all attribute names in insertion order.
    pub fn binding_names(&self) -> Vec<Symbol> {
        let mut names = Vec::with_capacity(self.binding_count as usize);
        self.collect_names(&mut names);
        names
    }

    /// Collect names by walking the parent chain (restores insertion order).
    fn collect_names(&self, names: &mut Vec<Symbol>) {
        if let Some(parent) = &self.parent {
            parent.collect_names(names);
        }
        if let Some(binding) = &self.binding {
            names.push(binding.name.clone());
        }
    }

    /// Collect all bindings in insertion order.
    pub fn all_bindings(&self) -> Vec<Binding> {
        let mut bindings = Vec::with_capacity(self.binding_count as usize);
        self.collect_bindings(&mut bindings);
        bindings
    }

    fn collect_bindings(&self, bindings: &mut Vec<Binding>) {
        if let Some(parent) = &self.parent {
            parent.collect_bindings(bindings);
        }
        if let Some(binding) = &self.binding {
            bindings.push(binding.clone());
        }
    }

    /// Get an existing transition (if any).
    pub fn get_transition(&self, name: &Symbol) -> Option<Arc<Shape>> {
        self.transitions
            .read()
            .expect("Shape transitions lock poisoned")
            .get(name)
            .cloned()
    }

}

// =============================================================================
// Shape Registry
// =============================================================================

/// Process-wide registry for Shape management.
///
/// Thread-safe; owns the shared empty shape, the id counter, and the removal
/// transition memo.
pub struct ShapeRegistry {
    /// Counter for generating unique shape IDs.
    next_id: AtomicU32,

    /// The empty shape (shared root).
    empty_shape: Arc<Shape>,

    /// Memoized removal transitions, keyed by (source shape id, removed name).
    removals: DashMap<(u32, Symbol), Arc<Shape>, FxBuildHasher>,
}

impl ShapeRegistry {
    /// Create a new shape registry.
    pub fn new() -> Self {
        Self {
            // ID 0 is reserved for the empty shape
            next_id: AtomicU32::new(1),
            empty_shape: Shape::empty(),
            removals: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Get the empty shape.
    #[inline]
    pub fn empty_shape(&self) -> Arc<Shape> {
        Arc::clone(&self.empty_shape)
    }

    /// Transition to a new shape by adding an attribute.
    ///
    /// If a transition already exists, returns the cached shape. Otherwise
    /// creates a new shape and caches the transition on the source.
    pub fn transition(&self, from: &Arc<Shape>, name: Symbol) -> Arc<Shape> {
        // Fast path: transition already exists
        if let Some(existing) = from.get_transition(&name) {
            return existing;
        }

        // Slow path re-checks under the write lock so concurrent requests
        // for the same (shape, name) pair mint exactly one shape. Shape ids
        // must stay in one-to-one correspondence with attribute layouts;
        // everything keyed on ShapeId depends on it.
        let mut transitions = from
            .transitions
            .write()
            .expect("Shape transitions lock poisoned");
        if let Some(existing) = transitions.get(&name) {
            return Arc::clone(existing);
        }

        let id = ShapeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let new_shape = Shape::with_binding(Arc::clone(from), name.clone(), id);
        transitions.insert(name, Arc::clone(&new_shape));

        new_shape
    }

    /// Transition to the shape with `name` removed, surviving attributes in
    /// their original insertion order.
    ///
    /// Returns None when the name is not bound. The result is memoized so
    /// repeated removals from the same shape hit the memo.
    pub fn transition_remove(&self, from: &Arc<Shape>, name: &Symbol) -> Option<Arc<Shape>> {
        from.lookup(name)?;

        let key = (from.id().raw(), name.clone());
        if let Some(cached) = self.removals.get(&key) {
            return Some(Arc::clone(cached.value()));
        }

        // Rebuild the surviving sequence through ordinary add transitions so
        // removal results are shared with shapes built by direct addition.
        let mut shape = self.empty_shape();
        for survivor in from.binding_names() {
            if &survivor != name {
                shape = self.transition(&shape, survivor);
            }
        }

        self.removals.insert(key, Arc::clone(&shape));
        Some(shape)
    }

    /// Number of shapes created (including the empty shape).
    pub fn shape_count(&self) -> u32 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Global Registry Access
// =============================================================================

/// Global shape registry instance.
static SHAPE_REGISTRY: OnceLock<ShapeRegistry> = OnceLock::new();

/// Get the global shape registry.
#[inline]
pub fn shape_registry() -> &'static ShapeRegistry {
    SHAPE_REGISTRY.get_or_init(ShapeRegistry::new)
}

// =============================================================================
// Tests
// =============================================================================
