//! Shared utilities for the network implementation
//!
//! Activation/loss tables and learning rate schedules used by training.

pub mod activations;
pub mod lr_scheduler;

pub use activations::{sigmoid, sigmoid_derivative, Activation, Loss};
pub use lr_scheduler::{ConstantLR, LRScheduler, LinearDecay};
