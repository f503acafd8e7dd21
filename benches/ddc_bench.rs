//! Benchmarks for the Down-Converter Chain
//!
//! Run with: cargo bench --bench ddc_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ddc_sim::signal_source::{two_tone_quantized, TwoToneSpec};
use ddc_sim::spectrum::{SpectrumAnalyzer, SpectrumConfig, Window};
use ddc_sim::{CicDecimator, Ddc, FirDecimator, Nco};
use rustfft::num_complex::Complex64;
use std::time::Duration;

fn reference_input(len: usize) -> Vec<f64> {
    let tones = TwoToneSpec::new(7.120e6, 7.137e6);
    two_tone_quantized(&tones, 50.0e6, 14, len)
}

// ============================================================================
// Stage Benchmarks
// ============================================================================

fn bench_nco_mixing(c: &mut Criterion) {
    let mut group = c.benchmark_group("nco_mixing");

    let size = 65_536;
    let input = reference_input(size);

    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("mix_block", |b| {
        let mut nco = Nco::new();
        nco.set_tuning(0.1425);
        b.iter(|| {
            nco.reset();
            nco.mix_block(black_box(&input))
        })
    });

    group.finish();
}

fn bench_cic_decimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cic_decimation");

    let size = 65_536;
    let input = reference_input(size);

    group.throughput(Throughput::Elements(size as u64));

    for rate in [8, 68, 125].iter() {
        let mut cic = CicDecimator::new(4, *rate).unwrap();

        group.bench_with_input(BenchmarkId::new("four_stage", rate), rate, |b, _| {
            b.iter(|| {
                cic.reset();
                cic.process(black_box(&input))
            })
        });
    }

    group.finish();
}

fn bench_fir_decimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fir_decimation");

    let size = 8_192;
    let input: Vec<Complex64> = (0..size)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * 0.01 * i as f64;
            Complex64::new(phase.cos(), phase.sin())
        })
        .collect();

    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("lowpass_div8", |b| {
        let mut fir = FirDecimator::lowpass(8, 0).unwrap();
        b.iter(|| {
            fir.reset();
            fir.process(black_box(&input))
        })
    });

    group.finish();
}

// ============================================================================
// Full Chain Benchmarks
// ============================================================================

fn bench_full_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_chain");
    group.measurement_time(Duration::from_secs(5));

    for size in [16_384, 65_536].iter() {
        let input = reference_input(*size);

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("calc", size), &input, |b, input| {
            let mut ddc = Ddc::new(14, 68).unwrap();
            ddc.set_ftune(0.1425);
            b.iter(|| {
                ddc.reset();
                ddc.calc(black_box(input))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Spectrum Benchmarks
// ============================================================================

fn bench_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrum");

    let size = 16_384;
    let input = reference_input(size);

    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("analyze_real_16k", |b| {
        let mut analyzer = SpectrumAnalyzer::new(SpectrumConfig {
            sample_rate: 50.0e6,
            window: Window::BlackmanHarris,
            full_scale: 4095.5,
            ..Default::default()
        });
        b.iter(|| analyzer.analyze_real(black_box(&input)))
    });

    group.finish();
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = stage_benches;
    config = Criterion::default();
    targets = bench_nco_mixing, bench_cic_decimation, bench_fir_decimation
);

criterion_group!(
    name = chain_benches;
    config = Criterion::default();
    targets = bench_full_chain, bench_spectrum
);

criterion_main!(stage_benches, chain_benches);
