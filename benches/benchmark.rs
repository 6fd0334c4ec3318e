//! Benchmarks for rotor machine operations.
//!
//! Measures machine construction, single-letter stream throughput, and
//! message throughput scaling across different rotor counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rotorcrypt::{Machine, MachineSettings, PlugSpec};

/// Message used consistently across all benchmarks.
const BENCH_MESSAGE: &str = "bootklarxbeijschnoorbetwazwosibenxnovxsechsnulcbmxproviantbiszwonul";

/// Benchmarks building the M4 machine from settings.
///
/// Covers historical table lookup, wiring validation, inverse table
/// construction and key/ring application.
fn bench_from_settings(c: &mut Criterion) {
    let settings = MachineSettings::m4_rasch();
    c.bench_function("from_settings_m4", |b| {
        b.iter(|| Machine::from_settings(black_box(&settings)).unwrap());
    });
}

/// Benchmarks single-letter `encode_letter()` in stream mode.
///
/// The machine keeps stepping between iterations, so every turnover path
/// is exercised over a long run.
fn bench_encode_letter(c: &mut Criterion) {
    let mut machine = Machine::from_settings(&MachineSettings::m4_rasch()).unwrap();

    let mut group = c.benchmark_group("encode_letter");
    group.throughput(Throughput::Elements(1));
    group.bench_function("m4", |b| {
        b.iter(|| machine.encode_letter(black_box('q')).unwrap());
    });
    group.finish();
}

/// Benchmarks `encode_text()` across rotor counts.
///
/// Each message re-applies the key, so the cost includes dial setting.
fn bench_encode_text_rotor_scaling(c: &mut Criterion) {
    let rotor_counts: &[usize] = &[3, 4, 8];

    let mut group = c.benchmark_group("encode_text_rotor_scaling");
    group.throughput(Throughput::Elements(BENCH_MESSAGE.len() as u64));

    for &count in rotor_counts {
        let mut machine = Machine::seeded(count, 2024).unwrap();
        machine.set_plugs(&PlugSpec::Random(10)).unwrap();
        let key = "m".repeat(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                machine
                    .encode_text(black_box(BENCH_MESSAGE), Some(key.as_str()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_from_settings,
    bench_encode_letter,
    bench_encode_text_rotor_scaling,
);
criterion_main!(benches);
