//! Activation and loss functions for network nodes
//!
//! Both are closed enums dispatched by `match`, so a node stores only a tag
//! and derivatives come from the same table as the values:
//! - `Activation::Sigmoid` for input and hidden nodes (and output by default)
//! - `Activation::Identity` as an optional output activation for regression
//! - `Loss::SquaredError` for the per-pattern error at output nodes

use serde::{Deserialize, Serialize};

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-1.0 * x).exp())
}

/// Sigmoid derivative with respect to the pre-activation value `z`.
///
/// Returns sigmoid(z) * (1 - sigmoid(z))
pub fn sigmoid_derivative(z: f64) -> f64 {
    sigmoid(z) * (1.0 - sigmoid(z))
}

/// Activation kinds a node can apply to its weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Logistic sigmoid
    #[default]
    Sigmoid,
    /// f(z) = z
    Identity,
}

impl Activation {
    /// Applies the activation to a weighted sum.
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(z),
            Activation::Identity => z,
        }
    }

    /// Derivative of the activation evaluated at the weighted sum `z`.
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_derivative(z),
            Activation::Identity => 1.0,
        }
    }

    /// Parses the names used in JSON configs ("sigmoid", "identity").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sigmoid" => Some(Activation::Sigmoid),
            "identity" | "linear" => Some(Activation::Identity),
            _ => None,
        }
    }
}

/// Error functions comparing a network output with the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loss {
    /// (output - target)^2
    #[default]
    SquaredError,
}

impl Loss {
    /// Error of a single output against its target.
    pub fn value(self, output: f64, target: f64) -> f64 {
        match self {
            Loss::SquaredError => (output - target).powi(2),
        }
    }

    /// Derivative of the error with respect to the output.
    pub fn derivative(self, output: f64, target: f64) -> f64 {
        match self {
            Loss::SquaredError => 2.0 * (output - target),
        }
    }
}
