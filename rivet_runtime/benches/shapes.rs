//! Attribute Storage Performance Benchmarks
//!
//! Benchmarks for the shape-shared attribute maps and the adaptive access
//! caches.
//!
//! # Benchmark Categories
//!
//! 1. **Attribute Access**: cached slot access vs shape chain lookup
//! 2. **Shape Transitions**: cost of adding attributes and reusing
//!    transitions, including removal transitions
//! 3. **Access Sites**: monomorphic and polymorphic hit paths vs the
//!    generic fallback
//! 4. **Cast Pipeline**: element conversion throughput for the hot pairs

use criterion::{criterion_group, criterion_main, black_box, BenchmarkId, Criterion, Throughput};
use rivet_core::diag::NullSink;
use rivet_core::intern::intern;
use rivet_core::kind::TypeRank;
use rivet_runtime::attributes::cache::AttributeAccessSite;
use rivet_runtime::attributes::fixed;
use rivet_runtime::attributes::shape::ShapeRegistry;
use rivet_runtime::cast::{cast, CastContext, CastFlags};
use rivet_runtime::deparse::DefaultDeparser;
use rivet_runtime::sharing::ReferenceCountSharing;
use rivet_runtime::vector::{RValue, RVector};
use std::sync::Arc;

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// Create a vector with N attributes named "attr0", "attr1", etc.
fn vector_with_n_attributes(n: usize) -> RVector {
    let mut v = RVector::int_vector(vec![0]);
    let map = v.ensure_attributes();
    for i in 0..n {
        let name = intern(&format!("attr{}", i));
        map.set(&name, Arc::new(RVector::int_scalar(i as i32)) as RValue);
    }
    v
}

// =============================================================================
// Attribute Access Benchmarks
// =============================================================================

fn bench_attribute_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_access");

    group.bench_function("map_lookup", |b| {
        let v = vector_with_n_attributes(4);
        let name = intern("attr2");
        b.iter(|| black_box(v.attributes().unwrap().get(&name)))
    });

    group.bench_function("slot_direct", |b| {
        let v = vector_with_n_attributes(4);
        let name = intern("attr2");
        let slot = v.attributes().unwrap().shape().lookup(&name).unwrap();
        b.iter(|| black_box(v.attributes().unwrap().get_slot(slot)))
    });

    // Chain length scaling
    for count in [1, 4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("chain_length", count), count, |b, &count| {
            let v = vector_with_n_attributes(count);
            let name = intern(&format!("attr{}", count - 1));
            b.iter(|| black_box(v.attributes().unwrap().get(&name)))
        });
    }

    group.finish();
}

// =============================================================================
// Shape Transition Benchmarks
// =============================================================================

fn bench_shape_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_transitions");

    group.bench_function("cached_transition", |b| {
        let registry = ShapeRegistry::new();
        let name = intern("names");
        let empty = registry.empty_shape();
        let _ = registry.transition(&empty, name.clone());

        b.iter(|| {
            let empty = registry.empty_shape();
            black_box(registry.transition(&empty, name.clone()))
        })
    });

    group.bench_function("unique_transitions", |b| {
        let registry = ShapeRegistry::new();
        let mut counter = 0usize;

        b.iter(|| {
            let name = intern(&format!("unique_{}", counter));
            counter += 1;
            let empty = registry.empty_shape();
            black_box(registry.transition(&empty, name))
        })
    });

    group.bench_function("memoized_removal", |b| {
        let registry = ShapeRegistry::new();
        let empty = registry.empty_shape();
        let a = registry.transition(&empty, intern("a"));
        let ab = registry.transition(&a, intern("b"));
        let abc = registry.transition(&ab, intern("c"));
        let target = intern("b");
        let _ = registry.transition_remove(&abc, &target);

        b.iter(|| black_box(registry.transition_remove(&abc, &target)))
    });

    // Building the common names+dim+dimnames+class layout from scratch
    group.bench_function("fixed_attribute_layout", |b| {
        b.iter(|| {
            let mut v = RVector::int_vector(vec![1, 2, 3, 4]);
            fixed::set_dim(&mut v, Some(&[2, 2])).unwrap();
            fixed::set_class(&mut v, Some(Arc::new(RVector::strings(&["m"])))).unwrap();
            black_box(v)
        })
    });

    group.finish();
}

// =============================================================================
// Access Site Benchmarks
// =============================================================================

fn bench_access_sites(c: &mut Criterion) {
    let mut group = c.benchmark_group("access_sites");

    group.bench_function("monomorphic_hit", |b| {
        let mut site = AttributeAccessSite::new(intern("attr1"));
        let v = vector_with_n_attributes(4);
        let _ = site.get(&v);

        b.iter(|| black_box(site.get(&v)))
    });

    group.bench_function("polymorphic_hit", |b| {
        let mut site = AttributeAccessSite::new(intern("attr0"));
        let shapes: Vec<RVector> = (1..4).map(vector_with_n_attributes).collect();
        for v in &shapes {
            let _ = site.get(v);
        }

        let mut idx = 0usize;
        b.iter(|| {
            idx = (idx + 1) % shapes.len();
            black_box(site.get(&shapes[idx]))
        })
    });

    group.bench_function("generic_fallback", |b| {
        let mut site = AttributeAccessSite::new(intern("attr0"));
        // Enough distinct layouts to push the site past every cache tier
        let shapes: Vec<RVector> = (1..80).map(vector_with_n_attributes).collect();
        for v in &shapes {
            let _ = site.get(v);
        }

        let mut idx = 0usize;
        b.iter(|| {
            idx = (idx + 1) % shapes.len();
            black_box(site.get(&shapes[idx]))
        })
    });

    group.finish();
}

// =============================================================================
// Cast Pipeline Benchmarks
// =============================================================================

fn bench_cast_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast_pipeline");
    const LEN: usize = 1024;
    group.throughput(Throughput::Elements(LEN as u64));

    group.bench_function("int_to_double", |b| {
        let value: RValue = Arc::new(RVector::int_vector((0..LEN as i32).collect()));
        b.iter(|| {
            let mut sink = NullSink;
            let mut ctx = CastContext {
                diagnostics: &mut sink,
                deparser: &DefaultDeparser,
                sharing: &ReferenceCountSharing,
            };
            black_box(cast(&value, TypeRank::Double, CastFlags::empty(), &mut ctx).unwrap())
        })
    });

    group.bench_function("double_to_int", |b| {
        let value: RValue =
            Arc::new(RVector::double_vector((0..LEN).map(|i| i as f64 + 0.5).collect()));
        b.iter(|| {
            let mut sink = NullSink;
            let mut ctx = CastContext {
                diagnostics: &mut sink,
                deparser: &DefaultDeparser,
                sharing: &ReferenceCountSharing,
            };
            black_box(cast(&value, TypeRank::Integer, CastFlags::empty(), &mut ctx).unwrap())
        })
    });

    group.bench_function("string_to_double", |b| {
        let value: RValue = Arc::new(RVector::strings(
            &(0..LEN).map(|i| format!("{}.25", i)).collect::<Vec<_>>(),
        ));
        b.iter(|| {
            let mut sink = NullSink;
            let mut ctx = CastContext {
                diagnostics: &mut sink,
                deparser: &DefaultDeparser,
                sharing: &ReferenceCountSharing,
            };
            black_box(cast(&value, TypeRank::Double, CastFlags::empty(), &mut ctx).unwrap())
        })
    });

    group.finish();
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(
    shape_benches,
    bench_attribute_access,
    bench_shape_transitions,
    bench_access_sites,
    bench_cast_pipeline,
);

criterion_main!(shape_benches);
