//! パフォーマンスベンチマーク
//!
//! このモジュールは、xlsxbatchクレートのパフォーマンスを測定するためのベンチマークを提供します。
//!
//! 実装するベンチマーク:
//! - 時刻コード変換のスループット
//! - 派生列の追加（割り切り判定 + 時刻コード）
//! - テーブルのXLSX書き出し

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use xlsxbatch::{
    annotate_table, format_millis, CellValue, Column, MemorySink, ProcessingConfig, Table,
    XlsxTableWriter,
};

/// StartTime列を含むテーブルを生成
fn generate_table(rows: usize) -> Table {
    let ids = (0..rows).map(|i| CellValue::Number(i as f64)).collect();
    let times = (0..rows)
        .map(|i| match i % 10 {
            0 => CellValue::Empty,
            7 => CellValue::Number((i * 40 + 1) as f64),
            _ => CellValue::Number((i * 40) as f64),
        })
        .collect();

    Table::from_columns(vec![Column::new("id", ids), Column::new("StartTime", times)])
        .unwrap_or_default()
}

fn benchmark_format_millis(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i * 37_123) as f64).collect();

    let mut group = c.benchmark_group("format_millis");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("10k_values", |b| {
        b.iter(|| {
            for v in &values {
                black_box(format_millis(black_box(*v)));
            }
        })
    });
    group.finish();
}

fn benchmark_annotate_table(c: &mut Criterion) {
    let table = generate_table(10_000);
    let matched = vec!["StartTime".to_string()];
    let config = ProcessingConfig {
        check_divisible: true,
        convert_time: true,
        ..ProcessingConfig::default()
    };
    let sink = MemorySink::new();

    let mut group = c.benchmark_group("annotate_table");
    group.throughput(Throughput::Elements(table.height() as u64));
    group.bench_function("10k_rows", |b| {
        b.iter(|| {
            let mut table = table.clone();
            black_box(annotate_table(&mut table, &matched, &config, &sink).ok());
        })
    });
    group.finish();
}

fn benchmark_write_table(c: &mut Criterion) {
    let table = generate_table(10_000);
    let writer = XlsxTableWriter::new();

    let mut group = c.benchmark_group("write_table");
    group.sample_size(10);
    group.bench_function("10k_rows", |b| {
        b.iter(|| black_box(writer.to_buffer(&table).ok()))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_format_millis,
    benchmark_annotate_table,
    benchmark_write_table
);
criterion_main!(benches);
