//! Business-key lookup benchmarks.
//!
//! Updates and deletes re-enumerate and scan the whole sheet, so lookup
//! cost grows linearly with catalog size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shelf_core::fields::BOOK_SCHEMA;
use shelf_core::reconciler::{locate_by_business_key, normalize_field};
use shelf_core::store::{CatalogStore, SheetStore};
use std::hint::black_box;

/// Fills an in-memory sheet with `rows` normalized records.
fn populated_sheet(rows: u64) -> SheetStore {
    let store = SheetStore::in_memory(&BOOK_SCHEMA);
    for sr in 1..=rows {
        let payload = json!({
            "SrNo": sr,
            "Class": "I",
            "Book Name": format!("Book {}", sr),
            "Book Price": "120",
        });
        let mut fields = serde_json::Map::new();
        for column in BOOK_SCHEMA.columns {
            if let Some(value) = normalize_field(column, payload.get(*column), &BOOK_SCHEMA) {
                fields.insert(column.to_string(), value);
            }
        }
        store
            .append_record(fields)
            .expect("Failed to append benchmark row");
    }
    store
}

/// Benchmark: enumerate + scan for the last row
fn benchmark_locate_last_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_last_row");
    for rows in [100u64, 1_000, 10_000] {
        let store = populated_sheet(rows);
        let key = rows.to_string();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                let records = store.enumerate_records().unwrap();
                let found = locate_by_business_key(&records, &key, &BOOK_SCHEMA).unwrap();
                black_box(found.row_index);
            })
        });
    }
    group.finish();
}

/// Benchmark: per-field coercion
fn benchmark_normalize_field(c: &mut Criterion) {
    let numeric = json!("1234.5");
    let text = json!(42);
    c.bench_function("normalize_numeric", |b| {
        b.iter(|| normalize_field(black_box("Book Price"), Some(black_box(&numeric)), &BOOK_SCHEMA))
    });
    c.bench_function("normalize_text", |b| {
        b.iter(|| normalize_field(black_box("Writer"), Some(black_box(&text)), &BOOK_SCHEMA))
    });
}

criterion_group!(benches, benchmark_locate_last_row, benchmark_normalize_field);
criterion_main!(benches);
