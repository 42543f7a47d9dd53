//! TOML-persisted fixture records for the feature catalog.
//!
//! One file per feature, named `<identifier>.toml`, holding the feature
//! identifier and a list of cases. Arrays are inline; spectra are persisted
//! as real values and widened to complex on load.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::error;
use num_complex::Complex32;
use serde::Deserialize;

use super::OwnedInput;

/// Errors raised while loading the fixture catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// Filesystem access failed.
    Io { path: PathBuf, reason: String },
    /// TOML contents did not match the fixture schema.
    Parse { path: PathBuf, reason: String },
    /// Records parsed but violated a catalog invariant.
    Validation { reason: String },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Io { path, reason } => {
                write!(f, "failed to read fixture {}: {}", path.display(), reason)
            }
            FixtureError::Parse { path, reason } => {
                write!(f, "failed to parse fixture {}: {}", path.display(), reason)
            }
            FixtureError::Validation { reason } => {
                write!(f, "invalid fixture catalog: {reason}")
            }
        }
    }
}

impl std::error::Error for FixtureError {}

/// Log a fixture error with the operation it interrupted.
pub fn log_fixture_error(err: &FixtureError, context: &str) {
    error!("Fixture error in {context}: {err}");
}

/// Contents of one per-feature fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureFixtureFile {
    /// Registry identifier of the feature under test.
    pub feature: String,
    #[serde(default)]
    pub tests: Vec<FixtureCase>,
}

/// One named case: input buffers, optional parameters, expected result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    pub input: FixtureInput,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    pub result: f64,
}

/// Deserialized input buffers. Missing fields default to empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureInput {
    #[serde(default)]
    pub samplerate: f32,
    #[serde(default)]
    pub timedata: Vec<f32>,
    #[serde(default)]
    pub spectrum: Vec<f32>,
}

impl FixtureInput {
    /// Widen the persisted real-valued spectrum into owned complex buffers.
    pub fn to_owned_input(&self) -> OwnedInput {
        OwnedInput {
            samplerate: self.samplerate,
            timedata: self.timedata.clone(),
            spectrum: self
                .spectrum
                .iter()
                .map(|&re| Complex32::new(re, 0.0))
                .collect(),
        }
    }
}

impl FeatureFixtureFile {
    /// Parse file contents and validate record invariants.
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, FixtureError> {
        let file: FeatureFixtureFile =
            toml::from_str(contents).map_err(|err| FixtureError::Parse {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        if self.feature.trim().is_empty() {
            return Err(FixtureError::Validation {
                reason: "feature identifier cannot be empty".into(),
            });
        }
        let mut seen = HashSet::new();
        for case in &self.tests {
            if !seen.insert(case.name.as_str()) {
                return Err(FixtureError::Validation {
                    reason: format!(
                        "duplicate case name `{}` for feature {}",
                        case.name, self.feature
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Directory holding the bundled fixture catalog.
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/features"))
}

/// Load a single fixture file.
pub fn load_fixture_file(path: &Path) -> Result<FeatureFixtureFile, FixtureError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        let err = FixtureError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        log_fixture_error(&err, "load_fixture_file");
        err
    })?;
    FeatureFixtureFile::from_toml(path, &contents).map_err(|err| {
        log_fixture_error(&err, "load_fixture_file");
        err
    })
}

/// Load the whole bundled catalog, sorted by file name.
///
/// Fails if two files declare the same feature identifier.
pub fn load_catalog() -> Result<Vec<FeatureFixtureFile>, FixtureError> {
    let dir = fixture_dir();
    let entries = fs::read_dir(&dir).map_err(|err| {
        let err = FixtureError::Io {
            path: dir.clone(),
            reason: err.to_string(),
        };
        log_fixture_error(&err, "load_catalog");
        err
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut catalog = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();
    for path in paths {
        let file = load_fixture_file(&path)?;
        if !seen.insert(file.feature.clone()) {
            let err = FixtureError::Validation {
                reason: format!("duplicate fixture file for feature {}", file.feature),
            };
            log_fixture_error(&err, "load_catalog");
            return Err(err);
        }
        catalog.push(file);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<FeatureFixtureFile, FixtureError> {
        FeatureFixtureFile::from_toml(Path::new("inline.toml"), contents)
    }

    #[test]
    fn parses_a_minimal_fixture() {
        let file = parse(
            r#"
            feature = "rms"

            [[tests]]
            name = "square wave"
            input = { samplerate = 2.0, timedata = [1.0, -1.0] }
            result = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(file.feature, "rms");
        assert_eq!(file.tests.len(), 1);
        let case = &file.tests[0];
        assert_eq!(case.name, "square wave");
        assert_eq!(case.input.timedata, [1.0, -1.0]);
        assert!(case.params.is_empty());
        assert_eq!(case.result, 1.0);
    }

    #[test]
    fn missing_buffers_default_to_empty() {
        let file = parse(
            r#"
            feature = "spectral-centroid"

            [[tests]]
            name = "empty"
            input = { samplerate = 1000.0 }
            result = nan
            "#,
        )
        .unwrap();
        let case = &file.tests[0];
        assert!(case.input.timedata.is_empty());
        assert!(case.input.spectrum.is_empty());
        assert!(case.result.is_nan());
    }

    #[test]
    fn parses_parameters_and_spectra() {
        let file = parse(
            r#"
            feature = "spectral-rolloff"

            [[tests]]
            name = "flat"
            input = { samplerate = 6.0, spectrum = [1.0, 1.0, 1.0, 1.0] }
            params = { rolloff = 0.5 }
            result = 2.0
            "#,
        )
        .unwrap();
        let case = &file.tests[0];
        assert_eq!(case.params.get("rolloff"), Some(&0.5));
        let owned = case.input.to_owned_input();
        assert_eq!(owned.spectrum.len(), 4);
        assert_eq!(owned.spectrum[0], Complex32::new(1.0, 0.0));
    }

    #[test]
    fn rejects_an_empty_feature_identifier() {
        let err = parse(
            r#"
            feature = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, FixtureError::Validation { .. }));
    }

    #[test]
    fn rejects_duplicate_case_names() {
        let err = parse(
            r#"
            feature = "rms"

            [[tests]]
            name = "dup"
            input = { samplerate = 1.0 }
            result = 0.0

            [[tests]]
            name = "dup"
            input = { samplerate = 1.0 }
            result = 0.0
            "#,
        )
        .unwrap_err();
        match err {
            FixtureError::Validation { reason } => assert!(reason.contains("duplicate")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_missing_files_as_io_errors() {
        let err = load_fixture_file(Path::new("/nonexistent/fixture.toml")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
