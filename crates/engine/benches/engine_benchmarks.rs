use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

use std::sync::Arc;

use tradegate_catalog::{Category, NewProduct, Product};
use tradegate_core::{CategoryId, Money, ProductId};
use tradegate_engine::{ProductEngine, ProductFilter};
use tradegate_store::{CategoryProvider, InMemoryCatalog, ProductStore};

fn draft(category: u64, name: &str) -> NewProduct {
    NewProduct {
        category_id: CategoryId::new(category),
        name: name.to_owned(),
        unit_price: Money::from_major(25),
        units_in_stock: 4,
    }
}

fn engine_over(catalog: Arc<InMemoryCatalog>) -> ProductEngine {
    let store: Arc<dyn ProductStore> = catalog.clone();
    let categories: Arc<dyn CategoryProvider> = catalog;
    ProductEngine::new(store, categories)
}

/// Catalog of `count` products with distinct names, ten per category, so
/// the per-category capacity rule passes for any fresh category.
fn populated_catalog(count: u64) -> Arc<InMemoryCatalog> {
    let products = (0..count)
        .map(|i| {
            Product::new(
                ProductId::new(i + 1),
                CategoryId::new(i / 10 + 1),
                format!("Urun-{i}"),
                Money::from_minor(500 + i),
                3,
            )
        })
        .collect();
    let categories = (1..=(count / 10 + 2))
        .map(|i| Category::new(CategoryId::new(i), format!("Kategori-{i}")))
        .collect();
    Arc::new(InMemoryCatalog::with_data(products, categories))
}

fn bench_add_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_product");

    group.bench_function("accepted", |b| {
        b.iter_batched(
            || engine_over(Arc::new(InMemoryCatalog::seeded())),
            |engine| engine.add_product(black_box(draft(3, "Monitor"))).unwrap(),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("rejected_duplicate_name", |b| {
        let engine = engine_over(Arc::new(InMemoryCatalog::seeded()));
        b.iter(|| {
            engine
                .add_product(black_box(draft(3, "Bardak")))
                .unwrap_err()
        });
    });

    group.finish();
}

fn bench_rule_scan_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniqueness_scan");

    for product_count in [10u64, 100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(product_count));
        group.bench_with_input(
            BenchmarkId::new("rejected_duplicate", product_count),
            &product_count,
            |b, &count| {
                let engine = engine_over(populated_catalog(count));
                // Fresh category, so only the name scan decides the outcome.
                let colliding = draft(count / 10 + 2, "Urun-0");
                b.iter(|| engine.add_product(black_box(colliding.clone())).unwrap_err());
            },
        );
    }

    group.finish();
}

fn bench_read_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_paths");
    let engine = engine_over(populated_catalog(1_000));

    group.bench_function("get_all_cache_hit", |b| {
        engine.get_all(None).unwrap();
        b.iter(|| black_box(engine.get_all(None).unwrap()));
    });

    group.bench_function("get_all_filtered_cache_hit", |b| {
        let filter = ProductFilter::by_category(CategoryId::new(7));
        engine.get_all(Some(filter.clone())).unwrap();
        b.iter(|| black_box(engine.get_all(Some(filter.clone())).unwrap()));
    });

    group.bench_function("by_category_uncached", |b| {
        b.iter(|| {
            black_box(
                engine
                    .get_products_by_category(black_box(CategoryId::new(7)))
                    .unwrap(),
            )
        });
    });

    group.bench_function("price_range_uncached", |b| {
        b.iter(|| {
            black_box(
                engine
                    .get_products_by_price_range(Money::from_minor(600), Money::from_minor(900))
                    .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add_product,
    bench_rule_scan_scaling,
    bench_read_paths
);
criterion_main!(benches);
