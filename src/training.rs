//! Online (per-pattern) gradient descent
//!
//! Training draws fresh weights, then for every epoch walks the patterns in
//! order: forward pass, backward pass, and an immediate weight update. There
//! is no shuffling, batching or convergence check; the epoch count alone
//! decides when training stops.

use log::{debug, info, log_enabled, trace, Level};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::{check_bounds, Network};
use crate::utils::lr_scheduler::{ConstantLR, LRScheduler, LinearDecay};

/// Minimum step size used when none is given.
pub const DEFAULT_MIN_STEP_SIZE: f64 = 0.01;

/// One training example: an input vector and the expected scalar output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub input: Vec<f64>,
    pub target: f64,
}

impl Pattern {
    pub fn new(input: Vec<f64>, target: f64) -> Self {
        Self { input, target }
    }
}

impl From<(Vec<f64>, f64)> for Pattern {
    fn from((input, target): (Vec<f64>, f64)) -> Self {
        Self { input, target }
    }
}

/// Hyperparameters of a training run.
///
/// # Fields
///
/// * `epochs` - Number of passes over the patterns (must be > 0)
/// * `lower_bound`, `upper_bound` - Range for the initial weights
/// * `step_size` - Initial learning rate (must be positive)
/// * `decrease_learning_rate` - Lower the step size linearly after each epoch
/// * `min_step_size` - Step size the linear decay heads towards
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub epochs: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub step_size: f64,
    pub decrease_learning_rate: bool,
    pub min_step_size: f64,
}

impl TrainingOptions {
    /// Options with a constant step size.
    pub fn new(epochs: usize, lower_bound: f64, upper_bound: f64, step_size: f64) -> Self {
        Self {
            epochs,
            lower_bound,
            upper_bound,
            step_size,
            decrease_learning_rate: false,
            min_step_size: DEFAULT_MIN_STEP_SIZE,
        }
    }

    /// Enables linear decay towards `min_step_size`.
    pub fn with_decay(mut self, min_step_size: f64) -> Self {
        self.decrease_learning_rate = true;
        self.min_step_size = min_step_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::parameters("epoch count must be positive"));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(NetworkError::parameters(format!(
                "step size must be positive, got {}",
                self.step_size
            )));
        }
        if !(self.min_step_size.is_finite() && self.min_step_size > 0.0) {
            return Err(NetworkError::parameters(format!(
                "minimum step size must be positive, got {}",
                self.min_step_size
            )));
        }
        check_bounds(self.lower_bound, self.upper_bound)
    }

    fn scheduler(&self) -> Box<dyn LRScheduler> {
        if self.decrease_learning_rate {
            Box::new(LinearDecay::new(
                self.step_size,
                self.min_step_size,
                self.epochs,
            ))
        } else {
            Box::new(ConstantLR::new(self.step_size))
        }
    }
}

/// Per-epoch record of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    /// Mean squared error of each epoch, accumulated while the weights were
    /// being updated
    pub epoch_errors: Vec<f64>,
    /// Step size used during each epoch
    pub step_sizes: Vec<f64>,
}

impl TrainingReport {
    pub fn final_error(&self) -> Option<f64> {
        self.epoch_errors.last().copied()
    }
}

impl Network {
    /// Trains the network on `patterns`.
    ///
    /// All arguments are validated before any weight changes. Every connection
    /// then receives a weight drawn from `rng`, and each epoch logs its mean
    /// squared error at `info` level.
    ///
    /// # Errors
    ///
    /// * `InvalidParameters` - bad options or no patterns
    /// * `InvalidInput` - a pattern's input length differs from the input count
    /// * `InvalidTopology` - the output layer does not have exactly one node
    ///
    /// # Example
    ///
    /// ```
    /// use layered_perceptron::{Network, Pattern, TrainingOptions};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut network = Network::new(1, &[2, 1]).unwrap();
    /// let patterns = vec![Pattern::new(vec![0.0], 0.0), Pattern::new(vec![1.0], 1.0)];
    /// let options = TrainingOptions::new(10, -1.0, 1.0, 0.5);
    /// let mut rng = ChaCha8Rng::seed_from_u64(3);
    /// let report = network.train(&patterns, &options, &mut rng).unwrap();
    /// assert_eq!(report.epoch_errors.len(), 10);
    /// ```
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        patterns: &[Pattern],
        options: &TrainingOptions,
        rng: &mut R,
    ) -> Result<TrainingReport> {
        options.validate()?;
        if patterns.is_empty() {
            return Err(NetworkError::parameters("no training patterns"));
        }
        self.require_single_output()?;
        for pattern in patterns {
            self.check_input(&pattern.input)?;
        }

        self.initialize_weights(options.lower_bound, options.upper_bound, rng)?;
        if log_enabled!(Level::Debug) {
            debug!("initial weights: {:?}", self.weights());
        }

        let mut scheduler = options.scheduler();
        let mut report = TrainingReport {
            epoch_errors: Vec::with_capacity(options.epochs),
            step_sizes: Vec::with_capacity(options.epochs),
        };

        let mut index = 0usize;
        for epoch in 0..options.epochs {
            let step_size = scheduler.get_lr();
            let mut error = 0.0;
            for pattern in patterns {
                error += self.compute_gradients_unchecked(&pattern.input, pattern.target);
                self.apply_weight_update(step_size);
                if log_enabled!(Level::Trace) {
                    self.trace_pattern(index);
                }
                index += 1;
            }

            let mean = error / patterns.len() as f64;
            info!("epoch {}: mean squared error {:.6}", epoch, mean);
            report.epoch_errors.push(mean);
            report.step_sizes.push(step_size);
            scheduler.step();
        }

        Ok(report)
    }

    /// One online step on a single pattern with the current weights.
    ///
    /// Returns the squared error measured before the update.
    pub fn train_pattern(&mut self, pattern: &Pattern, step_size: f64) -> Result<f64> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(NetworkError::parameters(format!(
                "step size must be positive, got {}",
                step_size
            )));
        }
        let error = self.compute_gradients(&pattern.input, pattern.target)?;
        self.apply_weight_update(step_size);
        Ok(error)
    }

    fn trace_pattern(&self, index: usize) {
        trace!("pattern {}", index);
        for connection in self.connections() {
            trace!(
                "  edge {}: w {} v {} e {}",
                connection.serial(),
                connection.weight(),
                connection.value(),
                connection.error()
            );
        }
        for node in self.nodes() {
            trace!(
                "  node [{}, {}]: o {} d {}",
                node.layer(),
                node.index(),
                node.output(),
                node.delta()
            );
        }
    }
}
