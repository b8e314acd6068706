//! Architecture configuration structures
//!
//! Describes a network shape in JSON so experiments can change topology
//! without code changes.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::utils::activations::Activation;

/// Configuration for the network architecture.
///
/// # Example
///
/// ```json
/// {
///   "num_inputs": 2,
///   "layers": [7, 1],
///   "output_activation": "sigmoid"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Dimension of the input vector
    pub num_inputs: usize,

    /// Node count per layer, first to last
    pub layers: Vec<usize>,

    /// Output activation: "sigmoid" (default) or "identity"
    pub output_activation: Option<String>,
}

impl ArchitectureConfig {
    /// Output activation named by the config, `Sigmoid` when absent.
    pub fn activation(&self) -> Result<Activation> {
        match &self.output_activation {
            None => Ok(Activation::Sigmoid),
            Some(name) => Activation::from_name(name).ok_or_else(|| {
                NetworkError::parameters(format!(
                    "Invalid output activation '{}'. Must be one of: sigmoid, identity",
                    name
                ))
            }),
        }
    }

    /// Builds the network described by this config.
    pub fn build(&self) -> Result<Network> {
        Network::with_output_activation(self.num_inputs, &self.layers, self.activation()?)
    }
}

/// Loads an architecture configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use layered_perceptron::architecture::load_architecture;
///
/// let arch = load_architecture("config/torus_architecture.json").unwrap();
/// let network = arch.build().unwrap();
/// assert_eq!(network.num_inputs(), 2);
/// ```
pub fn load_architecture(path: impl AsRef<Path>) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.num_inputs == 0 {
        return Err(NetworkError::topology("num_inputs must be positive"));
    }
    if config.layers.is_empty() {
        return Err(NetworkError::topology("architecture must have at least one layer"));
    }
    if let Some(layer) = config.layers.iter().position(|&size| size == 0) {
        return Err(NetworkError::topology(format!("layer {} has no nodes", layer)));
    }
    config.activation()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ArchitectureConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_default_activation() {
        let config = parse(r#"{"num_inputs": 2, "layers": [3, 1]}"#);
        assert_eq!(config.activation().unwrap(), Activation::Sigmoid);
    }

    #[test]
    fn test_identity_activation() {
        let config = parse(r#"{"num_inputs": 2, "layers": [3, 1], "output_activation": "identity"}"#);
        let network = config.build().unwrap();
        assert_eq!(network.output_activation(), Activation::Identity);
    }

    #[test]
    fn test_invalid_activation() {
        let config = parse(r#"{"num_inputs": 2, "layers": [3, 1], "output_activation": "relu"}"#);
        assert!(matches!(
            validate_architecture(&config),
            Err(NetworkError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_zero_layer_rejected() {
        let config = parse(r#"{"num_inputs": 2, "layers": [3, 0, 1]}"#);
        assert!(matches!(
            validate_architecture(&config),
            Err(NetworkError::InvalidTopology(_))
        ));
    }
}
