//! Test support consumed by the fixture-driven feature suite.
//!
//! The catalog under `fixtures/features/` holds one TOML file per feature
//! with named cases (input buffers, optional parameters, expected result).
//! This module loads those records and provides the tolerance rule the suite
//! compares against.

mod fixtures;

pub use fixtures::{
    fixture_dir, load_catalog, load_fixture_file, log_fixture_error, FeatureFixtureFile,
    FixtureCase, FixtureError, FixtureInput,
};

use num_complex::Complex32;

use crate::features::Input;

/// Owning counterpart of [`Input`] for deserialized fixture buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedInput {
    pub samplerate: f32,
    pub timedata: Vec<f32>,
    pub spectrum: Vec<Complex32>,
}

impl OwnedInput {
    pub fn as_input(&self) -> Input<'_> {
        Input::new(self.samplerate, &self.timedata, &self.spectrum)
    }
}

/// Compare a computed result against a fixture expectation.
///
/// NaN expects NaN and infinity expects infinity. Finite values pass on a
/// relative tolerance of 1e-6 or on the absolute error introduced by the
/// f32 round trip of the expected value, whichever is wider.
pub fn matches_expected(result: f64, expected: f64) -> bool {
    if expected.is_nan() {
        return result.is_nan();
    }
    if expected.is_infinite() {
        return result.is_infinite();
    }
    let relative = 1e-6 * result.abs().max(expected.abs());
    let cast_error = (expected - expected as f32 as f64).abs();
    (result - expected).abs() <= relative.max(cast_error)
}
