//! Benchmarks for loading, annotating and exporting recordings
//!
//! Run with: cargo bench

use acti_labeler::data::export::render_csv;
use acti_labeler::{annotate, Marker, MarkerKind, MarkerSequence, Sample, SampleTable};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 8, 9)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

// One sample every 30 seconds, like a 30s-epoch recording
fn recording(size: usize) -> SampleTable {
    let samples = (0..size as i64)
        .map(|i| {
            let vm = ((i % 97) * 13) as f64;
            Sample::new(base() + TimeDelta::seconds(i * 30), vm, vm / 2.0, vm / 3.0, vm)
        })
        .collect();
    SampleTable::from_samples(samples, "bench.csv").unwrap()
}

// A night of sleep every 2880 samples plus a discard window
fn markers(table: &SampleTable) -> MarkerSequence {
    let samples = table.samples();
    let mut seq = MarkerSequence::new();
    seq.append(Marker::new(samples[0].timestamp, MarkerKind::DiscardBefore))
        .unwrap();
    for night in (100..samples.len()).step_by(2880) {
        seq.append(Marker::new(samples[night].timestamp, MarkerKind::SleepStart))
            .unwrap();
        if let Some(end) = samples.get(night + 900) {
            seq.append(Marker::new(end.timestamp, MarkerKind::SleepEnd))
                .unwrap();
        }
    }
    seq.append(Marker::new(
        samples[samples.len() - 1].timestamp,
        MarkerKind::DiscardAfter,
    ))
    .unwrap();
    seq
}

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");

    for size in [2_880, 20_160, 86_400].iter() {
        let table = recording(*size);
        let seq = markers(&table);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("flags", size), &(table, seq), |b, (table, seq)| {
            b.iter(|| black_box(annotate(table, seq)));
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [2_880, 20_160].iter() {
        let table = recording(*size);
        let seq = MarkerSequence::new();
        let text = render_csv(&table, &annotate(&table, &seq));

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| black_box(SampleTable::parse(text, "bench.csv").unwrap()));
        });
    }

    group.finish();
}

fn bench_render_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    let table = recording(20_160);
    let seq = markers(&table);
    let annotation = annotate(&table, &seq);

    group.throughput(Throughput::Elements(table.len() as u64));
    group.bench_function("render_csv", |b| {
        b.iter(|| black_box(render_csv(&table, &annotation)));
    });

    group.finish();
}

criterion_group!(benches, bench_annotate, bench_load, bench_render_csv);

criterion_main!(benches);
