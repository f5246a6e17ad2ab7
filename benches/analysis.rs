use apiscope::domain::TrafficRecord;
use apiscope::schema::SchemaInferenceEngine;
use apiscope::services::normalize_path;
use apiscope::TrafficAnalyzer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::time::Duration;

fn synthetic_traffic(transactions: usize) -> Vec<TrafficRecord> {
    let mut records = Vec::with_capacity(transactions * 2);
    for i in 0..transactions {
        let id = i.to_string();
        let (method, url) = match i % 4 {
            0 => ("GET", format!("https://api.example.com/users/{}", i)),
            1 => ("GET", format!("https://api.example.com/users/{}/orders?page={}", i, i % 7)),
            2 => ("POST", "https://api.example.com/orders".to_string()),
            _ => ("DELETE", format!("https://api.example.com/orders/{}", i)),
        };
        records.push(
            TrafficRecord::request(id.clone(), method, url)
                .with_header("Authorization", format!("Bearer token-{}", i % 3))
                .with_header("X-Trace-Id", format!("trace-{}", i))
                .with_body(json!({"sku": format!("SKU-{}", i), "qty": i % 5})),
        );
        records.push(TrafficRecord::response(id, 200).with_body(json!({
            "id": i,
            "email": "buyer@example.com",
            "createdAt": "2024-01-31T10:00:00Z",
            "items": [{"sku": "A1", "price": 9.5}, {"sku": "B2", "price": 3}]
        })));
    }
    records
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("traffic_analysis");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    let analyzer = TrafficAnalyzer::new();
    for count in [100, 1000, 5000].iter() {
        let records = synthetic_traffic(*count);
        group.bench_with_input(BenchmarkId::new("analyze", count), &records, |b, records| {
            b.iter(|| black_box(analyzer.analyze(black_box(records))));
        });
    }

    group.finish();
}

fn bench_building_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_building_blocks");

    group.bench_function("normalize_path", |b| {
        b.iter(|| {
            normalize_path(black_box(
                "https://api.example.com/orders/123e4567-e89b-12d3-a456-426614174000/items/7?x=1",
            ))
        });
    });

    let engine = SchemaInferenceEngine::new();
    let body = json!({
        "id": 1,
        "name": "A",
        "tags": ["a", "b", "c"],
        "address": {"city": "Oslo", "zip": "0150"}
    });
    group.bench_function("infer_and_unify", |b| {
        b.iter(|| {
            let schema = engine.infer_from_value(black_box(&body));
            black_box(schema.unify(&schema))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_building_blocks);
criterion_main!(benches);
