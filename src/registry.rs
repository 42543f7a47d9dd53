// Algorithm registry - name-driven dispatch over the feature battery
//
// A compile-time table maps kebab-case identifiers to feature functions and
// their parameter names. make_algorithm wraps a table entry in a runtime
// handle with variant-typed parameter storage, so callers holding only a
// string (e.g. from configuration) can parameterize and invoke any feature
// without enumerating signatures.

use crate::context::ExecutionContext;
use crate::features::{self, Input};

/// Primitive types a feature parameter can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    Boolean,
    Int32,
    UInt32,
    Float,
}

/// Runtime value of one parameter, tagged with its native type.
///
/// Values are set and read through `f64`, cast to the native type on store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Boolean(bool),
    Int32(i32),
    UInt32(u32),
    Float(f32),
}

impl ParamValue {
    fn zero(param_type: ParameterType) -> Self {
        match param_type {
            ParameterType::Boolean => ParamValue::Boolean(false),
            ParameterType::Int32 => ParamValue::Int32(0),
            ParameterType::UInt32 => ParamValue::UInt32(0),
            ParameterType::Float => ParamValue::Float(0.0),
        }
    }

    fn set_from_f64(&mut self, value: f64) {
        *self = match *self {
            ParamValue::Boolean(_) => ParamValue::Boolean(value != 0.0),
            ParamValue::Int32(_) => ParamValue::Int32(value as i32),
            ParamValue::UInt32(_) => ParamValue::UInt32(value as u32),
            ParamValue::Float(_) => ParamValue::Float(value as f32),
        };
    }

    fn as_f64(&self) -> f64 {
        match *self {
            ParamValue::Boolean(v) => v as u8 as f64,
            ParamValue::Int32(v) => v as f64,
            ParamValue::UInt32(v) => v as f64,
            ParamValue::Float(v) => v as f64,
        }
    }

    fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }
}

/// Name and type of one feature parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub param_type: ParameterType,
}

/// Identifier and parameter list of a registered feature.
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmInfo {
    pub identifier: &'static str,
    pub parameters: &'static [ParameterDescriptor],
}

/// One registry entry: identifier, parameter descriptors and a shim invoking
/// the underlying function with parameters in declared order.
struct FeatureEntry {
    identifier: &'static str,
    parameters: &'static [ParameterDescriptor],
    invoke: fn(&mut ExecutionContext<'_>, Input<'_>, &[ParamValue]) -> f32,
}

const fn float_param(name: &'static str) -> ParameterDescriptor {
    ParameterDescriptor {
        name,
        param_type: ParameterType::Float,
    }
}

static FEATURES: &[FeatureEntry] = &[
    FeatureEntry {
        identifier: "peak-amplitude",
        parameters: &[],
        invoke: |ctx, input, _| features::peak_amplitude(ctx, input),
    },
    FeatureEntry {
        identifier: "energy",
        parameters: &[],
        invoke: |ctx, input, _| features::energy(ctx, input),
    },
    FeatureEntry {
        identifier: "rms",
        parameters: &[],
        invoke: |ctx, input, _| features::rms(ctx, input),
    },
    FeatureEntry {
        identifier: "crest-factor",
        parameters: &[],
        invoke: |ctx, input, _| features::crest_factor(ctx, input),
    },
    FeatureEntry {
        identifier: "impulse-factor",
        parameters: &[],
        invoke: |ctx, input, _| features::impulse_factor(ctx, input),
    },
    FeatureEntry {
        identifier: "clearance-factor",
        parameters: &[],
        invoke: |ctx, input, _| features::clearance_factor(ctx, input),
    },
    FeatureEntry {
        identifier: "shape-factor",
        parameters: &[],
        invoke: |ctx, input, _| features::shape_factor(ctx, input),
    },
    FeatureEntry {
        identifier: "skewness",
        parameters: &[],
        invoke: |ctx, input, _| features::skewness(ctx, input),
    },
    FeatureEntry {
        identifier: "kurtosis",
        parameters: &[],
        invoke: |ctx, input, _| features::kurtosis(ctx, input),
    },
    FeatureEntry {
        identifier: "zero-crossing-rate",
        parameters: &[],
        invoke: |ctx, input, _| features::zero_crossing_rate(ctx, input),
    },
    FeatureEntry {
        identifier: "partial-power",
        parameters: &[float_param("fmin"), float_param("fmax")],
        invoke: |ctx, input, params| {
            features::partial_power(ctx, input, params[0].as_f32(), params[1].as_f32())
        },
    },
    FeatureEntry {
        identifier: "spectral-peak-frequency",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_peak_frequency(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-centroid",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_centroid(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-variance",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_variance(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-skewness",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_skewness(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-kurtosis",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_kurtosis(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-rolloff",
        parameters: &[float_param("rolloff")],
        invoke: |ctx, input, params| features::spectral_rolloff(ctx, input, params[0].as_f32()),
    },
    FeatureEntry {
        identifier: "spectral-entropy",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_entropy(ctx, input),
    },
    FeatureEntry {
        identifier: "spectral-flatness",
        parameters: &[],
        invoke: |ctx, input, _| features::spectral_flatness(ctx, input),
    },
];

/// Uniform runtime handle over one feature function.
///
/// Handles are independently stateful: two handles for the same identifier do
/// not share parameter values.
pub trait Algorithm {
    /// Identifier and parameter descriptors of the wrapped feature.
    fn info(&self) -> AlgorithmInfo;

    /// Store `value` into the named parameter, cast to its native type.
    /// Returns false (without mutation) for an unknown name.
    fn set_parameter(&mut self, name: &str, value: f64) -> bool;

    /// Current value of the named parameter widened to `f64`, or `None` for
    /// an unknown name.
    fn get_parameter(&self, name: &str) -> Option<f64>;

    /// Invoke the wrapped feature with the stored parameter values.
    fn process(&mut self, ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f64;
}

struct FeatureAlgorithm {
    entry: &'static FeatureEntry,
    values: Vec<ParamValue>,
}

impl Algorithm for FeatureAlgorithm {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            identifier: self.entry.identifier,
            parameters: self.entry.parameters,
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> bool {
        match self.parameter_index(name) {
            Some(index) => {
                self.values[index].set_from_f64(value);
                true
            }
            None => false,
        }
    }

    fn get_parameter(&self, name: &str) -> Option<f64> {
        self.parameter_index(name)
            .map(|index| self.values[index].as_f64())
    }

    fn process(&mut self, ctx: &mut ExecutionContext<'_>, input: Input<'_>) -> f64 {
        f64::from((self.entry.invoke)(ctx, input, &self.values))
    }
}

impl FeatureAlgorithm {
    fn parameter_index(&self, name: &str) -> Option<usize> {
        self.entry
            .parameters
            .iter()
            .position(|descriptor| descriptor.name == name)
    }
}

/// Construct an [`Algorithm`] for `identifier`, or `None` if unknown.
///
/// Matching is exact and case-sensitive; the first registry entry wins.
/// Parameters start at their type's zero value.
pub fn make_algorithm(identifier: &str) -> Option<Box<dyn Algorithm>> {
    FEATURES
        .iter()
        .find(|entry| entry.identifier == identifier)
        .map(|entry| {
            Box::new(FeatureAlgorithm {
                entry,
                values: entry
                    .parameters
                    .iter()
                    .map(|descriptor| ParamValue::zero(descriptor.param_type))
                    .collect(),
            }) as Box<dyn Algorithm>
        })
}

/// All registered feature identifiers, in registry order.
pub fn identifiers() -> impl Iterator<Item = &'static str> {
    FEATURES.iter().map(|entry| entry.identifier)
}
