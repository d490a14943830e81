//! Performance benchmarks for the Tax Engine.
//!
//! This benchmark suite covers:
//! - A single calculation through the engine
//! - A single calculation through the HTTP router
//! - Batch uploads of 100 and 1000 rows
//! - Scaling of batch calculation with row count
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use tax_engine::api::{AppState, CalculationRequest, create_router};
use tax_engine::calculation::{
    CalculationOptions, DonationAccumulation, compute, compute_batch, parse_records,
};
use tax_engine::models::{Allowance, DeductionConfig, IncomeStatement};
use tax_engine::store::{DeductionStore, InMemoryDeductionRepository};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with default deductions.
fn create_test_state() -> AppState {
    let store = DeductionStore::with_config(
        Arc::new(InMemoryDeductionRepository::new()),
        DeductionConfig::default(),
    );
    AppState::new(store)
}

/// Creates a statement that reaches the top bracket with both allowances.
fn create_statement() -> IncomeStatement {
    IncomeStatement::new(dec!(2560000), dec!(100000))
        .with_allowance(Allowance::donation(dec!(150000)))
        .with_allowance(Allowance::k_receipt(dec!(40000)))
}

/// Creates a batch CSV with `rows` data rows of varying income.
fn create_csv(rows: usize) -> String {
    let mut csv = String::from("totalIncome,wht,donation\n");
    for i in 0..rows {
        let income = 200_000 + (i % 50) * 50_000;
        csv.push_str(&format!("{},{},{}\n", income, (i % 7) * 5_000, (i % 5) * 1_000));
    }
    csv
}

/// Benchmark: Single calculation in the engine.
///
/// Target: < 10μs mean
fn bench_single_calculation(c: &mut Criterion) {
    let statement = create_statement();
    let deductions = DeductionConfig::default();

    c.bench_function("single_calculation", |b| {
        b.iter(|| {
            black_box(
                compute(
                    black_box(&statement),
                    &deductions,
                    CalculationOptions::default(),
                )
                .unwrap(),
            )
        })
    });
}

/// Benchmark: Single calculation through the HTTP router.
///
/// Target: < 100μs mean
fn bench_single_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let request: CalculationRequest = serde_json::from_value(serde_json::json!({
        "totalIncome": 2560000.0,
        "wht": 100000.0,
        "allowances": [
            { "allowanceType": "donation", "amount": 150000.0 },
            { "allowanceType": "k-receipt", "amount": 40000.0 }
        ]
    }))
    .unwrap();
    let body = serde_json::to_string(&request).unwrap();

    c.bench_function("single_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/tax/calculations")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Parse and calculate a batch of 100 rows.
///
/// Target: < 1ms mean
fn bench_batch_100(c: &mut Criterion) {
    let csv = create_csv(100);
    let deductions = DeductionConfig::default();

    let mut group = c.benchmark_group("batch_100");
    group.throughput(Throughput::Elements(100));

    group.bench_function("parse_and_compute", |b| {
        b.iter(|| {
            let records = parse_records(black_box(&csv)).unwrap();
            black_box(
                compute_batch(&records, &deductions, DonationAccumulation::Cumulative).unwrap(),
            )
        })
    });

    group.finish();
}

/// Benchmark: Batch upload of 1000 rows through the HTTP router.
///
/// Target: < 50ms mean
fn bench_batch_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let boundary = "bench-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"taxes.csv\"\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = create_csv(1000)
    );

    let mut group = c.benchmark_group("batch_1000");
    group.throughput(Throughput::Elements(1000));
    group.sample_size(20);

    group.bench_function("upload", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/tax/calculations/upload-csv")
                        .header(
                            "Content-Type",
                            format!("multipart/form-data; boundary={}", boundary),
                        )
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });

    group.finish();
}

/// Benchmark: Batch calculation at various row counts, both accumulation modes.
///
/// Cumulative mode keeps a running donation total, so both modes should scale
/// linearly with the row count.
fn bench_scaling(c: &mut Criterion) {
    let deductions = DeductionConfig::default();

    let mut group = c.benchmark_group("scaling");

    for row_count in [10, 100, 1000, 10000].iter() {
        let records = parse_records(&create_csv(*row_count)).unwrap();

        group.throughput(Throughput::Elements(*row_count as u64));
        for (name, mode) in [
            ("cumulative", DonationAccumulation::Cumulative),
            ("independent", DonationAccumulation::Independent),
        ] {
            group.bench_with_input(BenchmarkId::new(name, row_count), row_count, |b, _| {
                b.iter(|| black_box(compute_batch(&records, &deductions, mode).unwrap()))
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_calculation,
    bench_single_request,
    bench_batch_100,
    bench_batch_1000,
    bench_scaling,
);
criterion_main!(benches);
