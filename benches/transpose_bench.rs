// In benches/transpose_bench.rs

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use parquet_rows::segment::segments_from_batches;
use parquet_rows::{materialize, FieldDef, FieldType, Schema};

const ROWS_PER_SEGMENT: usize = 8192;
const SEGMENTS: usize = 8;

fn bench_schema() -> Schema {
    Schema::try_new(vec![
        FieldDef::new("id", FieldType::Int64),
        FieldDef::new("label", FieldType::Utf8),
        FieldDef::new("score", FieldType::Float64),
    ])
    .unwrap()
}

fn generate_batches() -> Vec<RecordBatch> {
    (0..SEGMENTS)
        .map(|index| {
            let base = (index * ROWS_PER_SEGMENT) as i64;
            let ids: Vec<i64> = (base..base + ROWS_PER_SEGMENT as i64).collect();
            let labels: Vec<String> = ids.iter().map(|id| format!("row-{}", id)).collect();
            let scores: Vec<f64> = ids.iter().map(|id| *id as f64 * 0.5).collect();
            RecordBatch::try_from_iter(vec![
                ("id", Arc::new(Int64Array::from(ids)) as ArrayRef),
                ("label", Arc::new(StringArray::from(labels)) as ArrayRef),
                ("score", Arc::new(Float64Array::from(scores)) as ArrayRef),
            ])
            .unwrap()
        })
        .collect()
}

fn bench_materialize(c: &mut Criterion) {
    let schema = bench_schema();
    let batches = generate_batches();

    let mut group = c.benchmark_group("Transposer");
    for limit in [1000usize, ROWS_PER_SEGMENT * SEGMENTS] {
        group.throughput(Throughput::Elements(limit as u64));
        group.bench_function(format!("materialize limit={}", limit), |b| {
            b.iter(|| {
                let source = segments_from_batches(batches.iter().cloned());
                black_box(materialize(&schema, source, black_box(limit)).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_materialize);
criterion_main!(benches);
