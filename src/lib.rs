//! Layered Perceptron Library
//!
//! A fully connected, layered feed-forward network built as an explicit graph
//! of nodes and weighted connections, trained by online backpropagation.
//!
//! # Modules
//!
//! - `graph`: Node and connection primitives stored in network-owned arenas
//! - `network`: Topology construction, forward/backward propagation, inference
//! - `training`: Patterns, training options and the epoch loop
//! - `utils`: Activation/loss tables and learning rate schedules
//! - `config`: Training configuration loaded from JSON
//! - `architecture`: Network shape loaded from JSON
//! - `export`: Sampling the trained function to a data file and plotting it
//! - `error`: Error taxonomy shared by all modules

pub mod architecture;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod network;
pub mod training;
pub mod utils;

pub use error::{NetworkError, Result};
pub use network::Network;
pub use training::{Pattern, TrainingOptions, TrainingReport};
pub use utils::activations::Activation;
