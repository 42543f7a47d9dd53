// Feature battery - scalar descriptors of acoustic emission signals
//
// Every feature is a pure function (ExecutionContext, Input, params...) -> f32
// over caller-provided buffers. Undersized input never raises; each feature
// resolves to its documented sentinel (0 or NaN). Features that reuse other
// features (crest factor, the spectral moment family) route the shared
// quantity through the context cache when one is attached.
//
// Module organization:
// - temporal: amplitude statistics and time-domain moments
// - spectral: power-spectrum descriptors and bin/Hz conversion

mod spectral;
mod temporal;

pub use spectral::{
    bin_to_hz, hz_to_bin, partial_power, spectral_centroid, spectral_entropy, spectral_flatness,
    spectral_kurtosis, spectral_peak_frequency, spectral_rolloff, spectral_skewness,
    spectral_variance,
};
pub use temporal::{
    clearance_factor, crest_factor, energy, impulse_factor, kurtosis, peak_amplitude, rms,
    shape_factor, skewness, zero_crossing_rate,
};

use num_complex::Complex32;

use crate::cache::{cached, FuncId};
use crate::context::ExecutionContext;

/// Borrowed view of one signal: sampling rate, time-domain samples and the
/// matching one-sided spectrum.
///
/// The library never owns these buffers; an `Input` is valid for the duration
/// of the call tree that receives it. `fingerprint` optionally carries a
/// precomputed content hash (see [`crate::hash::fingerprint`]) so cache-key
/// construction can skip re-hashing large buffers.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    /// Sampling rate in Hz. Must be positive.
    pub samplerate: f32,
    /// Time-domain signal, typically in volts.
    pub timedata: &'a [f32],
    /// One-sided spectrum of `timedata`.
    pub spectrum: &'a [Complex32],
    /// Optional precomputed content hash used as the cache-key ingredient.
    pub fingerprint: Option<u64>,
}

impl<'a> Input<'a> {
    pub fn new(samplerate: f32, timedata: &'a [f32], spectrum: &'a [Complex32]) -> Self {
        Self {
            samplerate,
            timedata,
            spectrum,
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: u64) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }
}

/// Feature function shape shared by the battery and the registry.
pub type FeatureFn = fn(&mut ExecutionContext<'_>, Input<'_>) -> f32;

/// Run a parameterless feature through the context cache.
///
/// The cache is detached from the context while the wrapped function runs, so
/// nested lookups inside `func` compute directly instead of aliasing the
/// borrow.
pub(crate) fn cached_feature(
    ctx: &mut ExecutionContext<'_>,
    func: FeatureFn,
    input: Input<'_>,
) -> f32 {
    let mut cache = ctx.cache.take();
    let result = cached(
        cache.as_deref_mut(),
        FuncId::of(func as usize),
        crate::hash_args!(input),
        || func(ctx, input),
    );
    ctx.cache = cache;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::make_cache;

    #[test]
    fn cached_feature_restores_the_cache() {
        let mut cache = make_cache();
        let mut ctx = ExecutionContext::new().with_cache(&mut *cache);
        let timedata = [1.0, -1.0];
        let input = Input::new(2.0, &timedata, &[]);

        let value = cached_feature(&mut ctx, rms, input);
        assert_eq!(value, 1.0);
        assert!(ctx.cache.is_some(), "cache must be reattached after the call");
    }

    #[test]
    fn cached_feature_hits_on_equal_input() {
        let mut cache = make_cache();
        let mut ctx = ExecutionContext::new().with_cache(&mut *cache);
        let first = [1.0, -1.0];
        let second = [1.0, -1.0];

        let a = cached_feature(&mut ctx, rms, Input::new(2.0, &first, &[]));
        // Same content in a different allocation: must hit the same entry.
        let b = cached_feature(&mut ctx, rms, Input::new(2.0, &second, &[]));
        assert_eq!(a, b);
    }
}
