use criterion::{Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use serde_json::json;
use spectrum_rs::api::{SeriesStore, SourceRef, StoreConfig};
use spectrum_rs::core::{
    DenseSamples, Extent, ExtremumRule, SeriesWindow, ViewportDescriptor, bin_series,
};
use spectrum_rs::parse::LimitSpec;
use std::hint::black_box;

fn synthetic_spectrum(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64 / len as f64;
            let peak = (-((x - 0.4) * 80.0).powi(2)).exp() * 100.0;
            peak + ((i * 7919) % 113) as f64 * 0.01
        })
        .collect()
}

fn bench_bin_dense_100k_full_domain(c: &mut Criterion) {
    let source = DenseSamples::new(
        synthetic_spectrum(100_000),
        Extent::new(400.0, 4_000.0).expect("valid extent"),
    );

    c.bench_function("bin_dense_100k_full_domain", |b| {
        b.iter(|| {
            let _ = bin_series(
                black_box(&source),
                SeriesWindow::full(100_000),
                black_box((400.0, 4_000.0)),
                black_box(1920),
                1.0,
                ExtremumRule::Max,
            );
        })
    });
}

fn bench_store_zoom_sequence_4x50k(c: &mut Criterion) {
    let config = StoreConfig::default().with_x_limits(LimitSpec::Values {
        min: 0.0,
        max: 50_000.0,
    });
    let mut store = SeriesStore::new(config).expect("store init");
    for key in ["a", "b", "c", "d"] {
        store.add(SourceRef::inline(json!(synthetic_spectrum(50_000))).with_key(key));
    }
    let report = block_on(store.load());
    assert!(report.is_complete(), "bench sources must load");

    let viewports: Vec<ViewportDescriptor> = (0..20)
        .map(|step| {
            let inset = f64::from(step) * 1_000.0;
            ViewportDescriptor::new(1600, inset, 50_000.0 - inset).expect("valid viewport")
        })
        .collect();

    c.bench_function("store_zoom_sequence_4x50k", |b| {
        b.iter(|| {
            store.reset();
            for viewport in &viewports {
                let _ = store
                    .bin(black_box(viewport), ExtremumRule::Max)
                    .expect("bin should succeed");
            }
        })
    });
}

criterion_group!(
    benches,
    bench_bin_dense_100k_full_domain,
    bench_store_zoom_sequence_4x50k
);
criterion_main!(benches);
