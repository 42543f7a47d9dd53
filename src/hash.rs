// Hashing - cache-key ingredients for memoized feature results
//
// Argument tuples are reduced to a single u64 by combining per-argument
// hashes in declaration order. Buffer-valued arguments hash by content with
// a 64-bit xxHash seeded by the element count, so equal signals in different
// allocations produce equal keys.

use std::hash::Hasher;

use num_complex::Complex32;
use twox_hash::XxHash64;

use crate::features::Input;

/// Boost-style order-dependent hash mixing.
pub fn hash_combine(seed: u64, hash: u64) -> u64 {
    seed ^ hash
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Content hash of a sample buffer, seeded with the element count.
pub fn content_hash(values: &[f32]) -> u64 {
    let mut hasher = XxHash64::with_seed(values.len() as u64);
    for value in values {
        hasher.write_u32(value.to_bits());
    }
    hasher.finish()
}

/// Content hash of a complex spectrum buffer, seeded with the element count.
pub fn content_hash_complex(values: &[Complex32]) -> u64 {
    let mut hasher = XxHash64::with_seed(values.len() as u64);
    for value in values {
        hasher.write_u32(value.re.to_bits());
        hasher.write_u32(value.im.to_bits());
    }
    hasher.finish()
}

/// Content fingerprint of an [`Input`], usable to pre-fill
/// [`Input::fingerprint`] and skip re-hashing large buffers on every cached
/// call.
///
/// The spectrum is derived from the time-domain data and is left out of the
/// fingerprint, matching the key construction used by the cache.
pub fn fingerprint(input: &Input<'_>) -> u64 {
    let seed = hash_combine(0, input.samplerate.hash_arg());
    hash_combine(seed, input.timedata.hash_arg())
}

/// Per-argument contribution to a combined argument hash.
///
/// Implementations must be equality-consistent: observably equal arguments
/// hash identically.
pub trait HashArg {
    fn hash_arg(&self) -> u64;
}

impl HashArg for bool {
    fn hash_arg(&self) -> u64 {
        *self as u64
    }
}

impl HashArg for i32 {
    fn hash_arg(&self) -> u64 {
        *self as u32 as u64
    }
}

impl HashArg for u32 {
    fn hash_arg(&self) -> u64 {
        *self as u64
    }
}

impl HashArg for usize {
    fn hash_arg(&self) -> u64 {
        *self as u64
    }
}

impl HashArg for f32 {
    fn hash_arg(&self) -> u64 {
        self.to_bits() as u64
    }
}

impl HashArg for f64 {
    fn hash_arg(&self) -> u64 {
        self.to_bits()
    }
}

impl HashArg for [f32] {
    fn hash_arg(&self) -> u64 {
        content_hash(self)
    }
}

impl HashArg for [Complex32] {
    fn hash_arg(&self) -> u64 {
        content_hash_complex(self)
    }
}

impl HashArg for Input<'_> {
    fn hash_arg(&self) -> u64 {
        match self.fingerprint {
            Some(precomputed) => precomputed,
            None => fingerprint(self),
        }
    }
}

/// Combine the hashes of an argument list in declaration order.
#[macro_export]
macro_rules! hash_args {
    ($($arg:expr),+ $(,)?) => {{
        let mut seed: u64 = 0;
        $(
            seed = $crate::hash::hash_combine(seed, $crate::hash::HashArg::hash_arg(&$arg));
        )+
        seed
    }};
}
