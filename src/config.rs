//! Configuration structures for training
//!
//! Training hyperparameters can be kept in JSON files and turned into
//! [`TrainingOptions`] at run time.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::training::{TrainingOptions, DEFAULT_MIN_STEP_SIZE};

fn default_min_step_size() -> f64 {
    DEFAULT_MIN_STEP_SIZE
}

/// Configuration for a training run.
///
/// `decrease_learning_rate` defaults to false and `min_step_size` to 0.01.
/// `seed` and `num_patterns` are read by callers that generate their own
/// patterns or random generators.
///
/// # Example
///
/// ```json
/// {
///   "epochs": 1000,
///   "lower_bound": 0.0,
///   "upper_bound": 1.0,
///   "step_size": 0.1,
///   "decrease_learning_rate": true,
///   "min_step_size": 0.01,
///   "seed": 42,
///   "num_patterns": 2000
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Number of passes over the training patterns
    pub epochs: usize,

    /// Lower bound for initial weights
    pub lower_bound: f64,

    /// Upper bound for initial weights
    pub upper_bound: f64,

    /// Initial step size (learning rate)
    pub step_size: f64,

    /// Linearly decrease the step size after each epoch
    #[serde(default)]
    pub decrease_learning_rate: bool,

    /// Step size reached by the decay after the last epoch
    #[serde(default = "default_min_step_size")]
    pub min_step_size: f64,

    /// Seed for the weight-initialization generator
    pub seed: Option<u64>,

    /// Number of patterns to generate, for callers that synthesize data
    pub num_patterns: Option<usize>,
}

impl TrainingConfig {
    /// Converts the config into the options accepted by `Network::train`.
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions {
            epochs: self.epochs,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            step_size: self.step_size,
            decrease_learning_rate: self.decrease_learning_rate,
            min_step_size: self.min_step_size,
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `TrainingConfig` and
/// checks the values with the same rules `Network::train` applies.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success; `Io` if the file cannot be read, `Config`
/// if the JSON is invalid, `InvalidParameters` if a value is out of range.
///
/// # Examples
///
/// ```no_run
/// use layered_perceptron::config::load_config;
///
/// let cfg = load_config("config/torus.json").unwrap();
/// assert!(cfg.epochs > 0);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    config.options().validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;

    #[test]
    fn test_defaults_applied() {
        let json = r#"{"epochs": 3, "lower_bound": -1.0, "upper_bound": 1.0, "step_size": 0.5}"#;
        let config: TrainingConfig = serde_json::from_str(json).unwrap();
        assert!(!config.decrease_learning_rate);
        assert_eq!(config.min_step_size, 0.01);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_options_conversion() {
        let json = r#"{
            "epochs": 7,
            "lower_bound": 0.0,
            "upper_bound": 1.0,
            "step_size": 0.2,
            "decrease_learning_rate": true,
            "min_step_size": 0.05
        }"#;
        let config: TrainingConfig = serde_json::from_str(json).unwrap();
        let options = config.options();
        assert_eq!(options.epochs, 7);
        assert!(options.decrease_learning_rate);
        assert_eq!(options.min_step_size, 0.05);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("does/not/exist.json");
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }
}
