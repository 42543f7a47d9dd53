// Temporal features - amplitude statistics over the time-domain signal
//
// Formulas follow the catalog of waveform descriptors commonly used for
// burst signals: peak and energy measures, the dimensionless shape factors
// built from them, zero-crossing rate and the standardized central moments.

use super::{cached_feature, Input};
use crate::context::ExecutionContext;

fn mean<I>(values: I, count: usize) -> f32
where
    I: Iterator<Item = f32>,
{
    values.sum::<f32>() / count as f32
}

/// Maximum absolute amplitude of the waveform; 0 for empty input.
pub fn peak_amplitude(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    input
        .timedata
        .iter()
        .fold(0.0f32, |peak, &value| peak.max(value.abs()))
}

/// Signal energy: sum of squared samples divided by the sampling rate.
pub fn energy(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    input.timedata.iter().map(|&v| v * v).sum::<f32>() / input.samplerate
}

/// Root mean square amplitude; 0 for empty input.
pub fn rms(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    if input.timedata.is_empty() {
        return 0.0;
    }
    mean(input.timedata.iter().map(|&v| v * v), input.timedata.len()).sqrt()
}

/// Peak amplitude over RMS.
pub fn crest_factor(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    cached_feature(ctx, peak_amplitude, input) / cached_feature(ctx, rms, input)
}

/// Peak amplitude over mean absolute amplitude.
pub fn impulse_factor(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let peak = cached_feature(ctx, peak_amplitude, input);
    peak / mean(input.timedata.iter().map(|&v| v.abs()), input.timedata.len())
}

/// Peak amplitude over the squared mean square-root of absolute amplitudes.
pub fn clearance_factor(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let peak = cached_feature(ctx, peak_amplitude, input);
    let sqrt_mean = mean(
        input.timedata.iter().map(|&v| v.abs().sqrt()),
        input.timedata.len(),
    );
    peak / (sqrt_mean * sqrt_mean)
}

/// RMS over mean absolute amplitude.
pub fn shape_factor(ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let rms_value = cached_feature(ctx, rms, input);
    rms_value / mean(input.timedata.iter().map(|&v| v.abs()), input.timedata.len())
}

/// Sign changes per second, with the sign test `x >= 0`; 0 for empty input.
pub fn zero_crossing_rate(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    let samples = input.timedata;
    if samples.is_empty() {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f32 * input.samplerate / samples.len() as f32
}

fn central_moment(samples: &[f32], sample_mean: f32, order: i32) -> f32 {
    mean(
        samples.iter().map(|&v| (v - sample_mean).powi(order)),
        samples.len(),
    )
}

/// NaN when fewer samples than the moment order are available.
fn standardized_moment(samples: &[f32], order: i32) -> f32 {
    if samples.len() < order as usize {
        return f32::NAN;
    }
    let sample_mean = mean(samples.iter().copied(), samples.len());
    central_moment(samples, sample_mean, order)
        / central_moment(samples, sample_mean, 2).sqrt().powi(order)
}

/// Third standardized central moment of the waveform.
pub fn skewness(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    standardized_moment(input.timedata, 3)
}

/// Fourth standardized central moment of the waveform.
pub fn kurtosis(_ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f32 {
    standardized_moment(input.timedata, 4)
}
