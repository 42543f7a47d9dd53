use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sigfeat::features::{
    crest_factor, kurtosis, rms, skewness, spectral_kurtosis, spectral_skewness, spectral_variance,
};
use sigfeat::hash::{content_hash, fingerprint};
use sigfeat::{make_cache, ExecutionContext, Input};

const SAMPLERATE: f32 = 48_000.0;
const SIGNAL_LEN: usize = 4_096;
const SPECTRUM_BINS: usize = 2_049;

fn burst_signal(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLERATE;
            let envelope = (-t * 800.0).exp();
            let tone = (2.0 * std::f32::consts::PI * 5_000.0 * t).sin();
            envelope * tone + 0.01 * rng.gen_range(-1.0..1.0)
        })
        .collect()
}

fn noise_spectrum(bins: usize) -> Vec<Complex32> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..bins)
        .map(|_| Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

fn temporal_battery(c: &mut Criterion) {
    let timedata = burst_signal(SIGNAL_LEN);
    let input = Input::new(SAMPLERATE, &timedata, &[]);

    c.bench_function("temporal battery 4096", |b| {
        b.iter(|| {
            let mut ctx = ExecutionContext::new();
            let input = black_box(input);
            (
                rms(&mut ctx, input),
                crest_factor(&mut ctx, input),
                skewness(&mut ctx, input),
                kurtosis(&mut ctx, input),
            )
        })
    });
}

fn spectral_moments(c: &mut Criterion) {
    let spectrum = noise_spectrum(SPECTRUM_BINS);
    let input = Input::new(SAMPLERATE, &[], &spectrum);

    c.bench_function("spectral moments uncached", |b| {
        b.iter(|| {
            let mut ctx = ExecutionContext::new();
            let input = black_box(input);
            (
                spectral_variance(&mut ctx, input),
                spectral_skewness(&mut ctx, input),
                spectral_kurtosis(&mut ctx, input),
            )
        })
    });

    // With a fingerprint the centroid is hashed once and served from the
    // cache for the dependent moments.
    let pinned = input.with_fingerprint(fingerprint(&input));
    c.bench_function("spectral moments cached", |b| {
        b.iter(|| {
            let mut cache = make_cache();
            let mut ctx = ExecutionContext::new().with_cache(&mut *cache);
            let input = black_box(pinned);
            (
                spectral_variance(&mut ctx, input),
                spectral_skewness(&mut ctx, input),
                spectral_kurtosis(&mut ctx, input),
            )
        })
    });
}

fn buffer_hash(c: &mut Criterion) {
    let timedata = burst_signal(SIGNAL_LEN);
    c.bench_function("content hash 4096", |b| {
        b.iter(|| content_hash(black_box(&timedata)))
    });
}

criterion_group!(benches, temporal_battery, spectral_moments, buffer_hash);
criterion_main!(benches);
