// End-to-end behavior of the name-driven algorithm interface.

use num_complex::Complex32;
use sigfeat::{identifiers, make_algorithm, ExecutionContext, Input};

fn real_spectrum(values: &[f32]) -> Vec<Complex32> {
    values.iter().map(|&re| Complex32::new(re, 0.0)).collect()
}

#[test]
fn rms_of_a_unit_square_wave_is_one() {
    let mut algorithm = make_algorithm("rms").expect("rms must be registered");
    let timedata = [1.0, -1.0];
    let mut ctx = ExecutionContext::new();
    let result = algorithm.process(&mut ctx, Input::new(2.0, &timedata, &[]));
    assert_eq!(result, 1.0);
}

#[test]
fn rolloff_parameter_defaults_to_zero_and_round_trips() {
    let mut algorithm = make_algorithm("spectral-rolloff").unwrap();
    assert_eq!(algorithm.get_parameter("rolloff"), Some(0.0));

    assert!(algorithm.set_parameter("rolloff", 0.9));
    let stored = algorithm.get_parameter("rolloff").unwrap();
    assert!((stored - 0.9).abs() < 1e-7, "got {stored}");

    assert!(!algorithm.set_parameter("unknown", 0.1));
    assert_eq!(algorithm.get_parameter("unknown"), None);
    let unchanged = algorithm.get_parameter("rolloff").unwrap();
    assert!((unchanged - 0.9).abs() < 1e-7);
}

#[test]
fn parameters_feed_the_underlying_function() {
    let spectrum = real_spectrum(&[1.0, 1.0, 1.0, 1.0]);
    let input = Input::new(6.0, &[], &spectrum);
    let mut ctx = ExecutionContext::new();

    let mut algorithm = make_algorithm("spectral-rolloff").unwrap();
    // Default rolloff 0.0 reports the first bin.
    assert_eq!(algorithm.process(&mut ctx, input), 0.0);
    algorithm.set_parameter("rolloff", 0.5);
    assert_eq!(algorithm.process(&mut ctx, input), 2.0);
}

#[test]
fn single_bin_concentration_makes_centroid_equal_the_peak() {
    let mut values = vec![0.0f32; 100];
    values[10] = 1.0;
    let spectrum = real_spectrum(&values);
    let input = Input::new(1_000.0, &[], &spectrum);
    let mut ctx = ExecutionContext::new();

    let mut peak = make_algorithm("spectral-peak-frequency").unwrap();
    let mut centroid = make_algorithm("spectral-centroid").unwrap();
    let peak_hz = peak.process(&mut ctx, input);
    let centroid_hz = centroid.process(&mut ctx, input);

    let expected = f64::from(sigfeat::features::bin_to_hz(1_000.0, 100, 10.0));
    assert_eq!(peak_hz, expected);
    assert_eq!(centroid_hz, expected);
}

#[test]
fn every_identifier_processes_an_ordinary_input() {
    let timedata: Vec<f32> = (0..64).map(|i| (i as f32 * 0.2).sin()).collect();
    let spectrum = real_spectrum(&[0.5, 1.0, 0.25, 0.125]);
    let input = Input::new(128.0, &timedata, &spectrum);

    for identifier in identifiers() {
        let mut algorithm = make_algorithm(identifier).unwrap();
        let mut ctx = ExecutionContext::new();
        // Parameterized features run at their zero defaults; every feature
        // must return a deterministic value without panicking.
        let first = algorithm.process(&mut ctx, input);
        let second = algorithm.process(&mut ctx, input);
        assert_eq!(
            first.to_bits(),
            second.to_bits(),
            "{identifier} must be idempotent"
        );
    }
}

#[test]
fn info_round_trips_the_identifier() {
    for identifier in identifiers() {
        let algorithm = make_algorithm(identifier).unwrap();
        assert_eq!(algorithm.info().identifier, identifier);
    }
}
