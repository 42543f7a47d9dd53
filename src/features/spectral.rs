// Spectral features - descriptors of the one-sided power spectrum
//
// All features operate on power(bin) = |spectrum[bin]|^2. Bin indices map
// linearly to Hz up to the Nyquist frequency; conversions are undefined for
// spectra shorter than two bins and resolve to the documented sentinels.

use super::{cached_feature, Input};
use crate::context::ExecutionContext;
use num_complex::Complex32;

#[inline]
fn power(value: Complex32) -> f32 {
    value.norm_sqr()
}

/// Center frequency of `bin` in a `bins`-long one-sided spectrum.
///
/// NaN when `bins <= 1`: a single bin has no defined frequency axis.
pub fn bin_to_hz(samplerate: f32, bins: usize, bin: f32) -> f32 {
    if bins <= 1 {
        return f32::NAN;
    }
    0.5 * samplerate * bin / (bins - 1) as f32
}

/// Nearest bin index for `frequency`; 0 when the axis is undefined.
///
/// `frequency` must lie in `[0, samplerate / 2]`. Out-of-range arguments are
/// caller bugs: asserted in debug builds, unspecified otherwise.
pub fn hz_to_bin(samplerate: f32, bins: usize, frequency: f32) -> usize {
    if samplerate == 0.0 || bins <= 1 {
        return 0;
    }
    debug_assert!(frequency >= 0.0, "frequency must be non-negative");
    debug_assert!(
        frequency <= 0.5 * samplerate,
        "frequency must not exceed Nyquist"
    );
    ((bins - 1) as f32 * frequency / (0.5 * samplerate)).round() as usize
}

/// Frequency of the highest-power bin; NaN for an empty spectrum.
///
/// Ties resolve to the lowest bin.
pub fn spectral_peak_frequency(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    if input.spectrum.is_empty() {
        return f32::NAN;
    }
    let mut peak_bin = 0usize;
    let mut peak_power = power(input.spectrum[0]);
    for (bin, &value) in input.spectrum.iter().enumerate().skip(1) {
        let p = power(value);
        if p > peak_power {
            peak_bin = bin;
            peak_power = p;
        }
    }
    bin_to_hz(input.samplerate, input.spectrum.len(), peak_bin as f32)
}

/// Power-weighted mean frequency; NaN for an empty spectrum.
pub fn spectral_centroid(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    // Early return keeps the 0/0 mean bin from surfacing as a
    // platform-defined value instead of NaN.
    if input.spectrum.is_empty() {
        return f32::NAN;
    }
    let mut power_sum = 0.0f32;
    let mut weighted_sum = 0.0f32;
    for (bin, &value) in input.spectrum.iter().enumerate() {
        let p = power(value);
        power_sum += p;
        weighted_sum += p * bin as f32;
    }
    bin_to_hz(
        input.samplerate,
        input.spectrum.len(),
        weighted_sum / power_sum,
    )
}

fn spectral_central_moment(input: Input<'_>, centroid: f32, order: i32) -> f32 {
    let bins = input.spectrum.len();
    let hz_per_bin = bin_to_hz(input.samplerate, bins, 1.0);
    let mut power_sum = 0.0f32;
    let mut weighted_sum = 0.0f32;
    for (bin, &value) in input.spectrum.iter().enumerate() {
        let p = power(value);
        let frequency = hz_per_bin * bin as f32;
        power_sum += p;
        weighted_sum += p * (frequency - centroid).powi(order);
    }
    weighted_sum / power_sum
}

/// Power-weighted variance of frequency around the centroid.
pub fn spectral_variance(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let centroid = cached_feature(ctx, spectral_centroid, input);
    spectral_central_moment(input, centroid, 2)
}

fn spectral_standardized_moment(
    ctx: &mut ExecutionContext<'_>,
    input: Input<'_>,
    order: i32,
) -> f32 {
    let centroid = cached_feature(ctx, spectral_centroid, input);
    spectral_central_moment(input, centroid, order)
        / spectral_central_moment(input, centroid, 2)
            .sqrt()
            .powi(order)
}

/// Third standardized moment of the power-weighted frequency distribution.
pub fn spectral_skewness(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    spectral_standardized_moment(ctx, input, 3)
}

/// Fourth standardized moment of the power-weighted frequency distribution.
pub fn spectral_kurtosis(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    spectral_standardized_moment(ctx, input, 4)
}

/// Frequency below which `rolloff` of the total power is contained; 0 for an
/// empty spectrum.
///
/// The cumulative sum is strict: the reported bin is the first whose prefix
/// sum exceeds `rolloff * total`. With `rolloff = 1` the scan runs off the
/// end and reports one bin step above Nyquist.
pub fn spectral_rolloff(ctx: &mut ExecutionContext<'_>, input: Input<'_>, rolloff: f32) -> f32 {
    if input.spectrum.is_empty() {
        return 0.0;
    }
    let bins = input.spectrum.len();
    let allocator = ctx.allocator;
    let mut cumulative = allocator.take(bins);
    let mut running = 0.0f32;
    for (slot, &value) in cumulative.iter_mut().zip(input.spectrum) {
        running += power(value);
        *slot = running;
    }

    let threshold = cumulative[bins - 1] * rolloff.clamp(0.0, 1.0);
    let bin = cumulative
        .iter()
        .position(|&prefix| prefix > threshold)
        .unwrap_or(bins);
    bin_to_hz(input.samplerate, bins, bin as f32)
}

/// Fraction of total power between `fmin` and `fmax`.
///
/// Both bounds are clamped to `[0, Nyquist]` (and `fmax` to at least `fmin`)
/// before conversion to a half-open bin range.
pub fn partial_power(
    _ctx: &mut ExecutionContext<'_>,
    input: Input<'_>,
    fmin: f32,
    fmax: f32,
) -> f32 {
    let nyquist = 0.5 * input.samplerate;
    let fmin = fmin.clamp(0.0, nyquist);
    let fmax = fmax.clamp(fmin, nyquist);
    let bins = input.spectrum.len();
    let lower = hz_to_bin(input.samplerate, bins, fmin);
    let upper = hz_to_bin(input.samplerate, bins, fmax);

    let band: f32 = input.spectrum[lower..upper].iter().map(|&v| power(v)).sum();
    let total: f32 = input.spectrum.iter().map(|&v| power(v)).sum();
    band / total
}

/// Normalized Shannon entropy of the power distribution; 0 for spectra of at
/// most one bin or zero total power.
pub fn spectral_entropy(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let mut power_sum = 0.0f32;
    let mut weighted_sum = 0.0f32;
    for &value in input.spectrum {
        let p = power(value);
        power_sum += p;
        if p > 0.0 {
            weighted_sum += p * p.log2();
        }
    }
    if power_sum == 0.0 || input.spectrum.len() <= 1 {
        return 0.0;
    }
    let entropy = power_sum.log2() - weighted_sum / power_sum;
    entropy / (input.spectrum.len() as f32).log2()
}

fn geometric_mean_power(input: Input<'_>) -> f32 {
    let mut log_sum = 0.0f32;
    for &value in input.spectrum {
        let p = power(value);
        if p == 0.0 {
            return 0.0;
        }
        log_sum += p.ln();
    }
    (log_sum / input.spectrum.len() as f32).exp()
}

/// Geometric over arithmetic mean of the power distribution.
///
/// Any exactly-zero bin short-circuits the geometric mean to 0; an empty
/// spectrum yields NaN.
pub fn spectral_flatness(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let bins = input.spectrum.len();
    let arithmetic = input.spectrum.iter().map(|&v| power(v)).sum::<f32>() / bins as f32;
    geometric_mean_power(input) / arithmetic
}
