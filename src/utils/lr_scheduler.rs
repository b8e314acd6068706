//! Learning rate scheduler trait and implementations
//!
//! Training uses a fixed step size by default. With decay enabled the step size
//! is lowered linearly after every epoch, so that the final epoch runs close to
//! a configured minimum.

/// Core trait for learning rate schedulers.
///
/// Schedulers adjust the step size during training based on the current epoch.
///
/// # Example
///
/// ```
/// use layered_perceptron::utils::lr_scheduler::{LRScheduler, LinearDecay};
///
/// let mut scheduler = LinearDecay::new(0.5, 0.1, 4);
/// for _epoch in 0..4 {
///     let _step = scheduler.get_lr();
///     // ... train one epoch with `_step` ...
///     scheduler.step();
/// }
/// ```
pub trait LRScheduler {
    /// Get the step size for the current epoch.
    fn get_lr(&self) -> f64;

    /// Advance the scheduler to the next epoch.
    ///
    /// Call once at the end of each epoch.
    fn step(&mut self);

    /// Reset the scheduler to its initial state.
    fn reset(&mut self);
}

/// Constant step size; `step` is a no-op.
#[derive(Debug, Clone)]
pub struct ConstantLR {
    lr: f64,
}

impl ConstantLR {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl LRScheduler for ConstantLR {
    fn get_lr(&self) -> f64 {
        self.lr
    }

    fn step(&mut self) {}

    fn reset(&mut self) {}
}

/// Linear decay scheduler.
///
/// The decrement is precomputed once as `(initial_lr - min_lr) / epochs` and
/// subtracted from the running step size after every epoch. The running value
/// is updated by repeated subtraction rather than recomputed from the epoch
/// index, so the sequence of step sizes is reproducible bit for bit.
///
/// After `k` steps the step size is `initial_lr - k * decrement` (up to
/// rounding); the last epoch of a run of `epochs` therefore trains with
/// `initial_lr - (epochs - 1) * (initial_lr - min_lr) / epochs`.
///
/// # Example
///
/// ```
/// use layered_perceptron::utils::lr_scheduler::{LRScheduler, LinearDecay};
///
/// let mut scheduler = LinearDecay::new(1.0, 0.0, 4);
/// scheduler.step();
/// assert!((scheduler.get_lr() - 0.75).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearDecay {
    initial_lr: f64,
    decrement: f64,
    current_lr: f64,
}

impl LinearDecay {
    /// Creates a new linear decay scheduler.
    ///
    /// # Arguments
    ///
    /// * `initial_lr` - Step size used in the first epoch
    /// * `min_lr` - Step size the schedule approaches after `epochs` steps
    /// * `epochs` - Number of epochs the decay is spread over (must be > 0)
    pub fn new(initial_lr: f64, min_lr: f64, epochs: usize) -> Self {
        let decrement = (initial_lr - min_lr) / epochs as f64;
        Self {
            initial_lr,
            decrement,
            current_lr: initial_lr,
        }
    }

    /// Amount subtracted from the step size after each epoch.
    pub fn decrement(&self) -> f64 {
        self.decrement
    }
}

impl LRScheduler for LinearDecay {
    fn get_lr(&self) -> f64 {
        self.current_lr
    }

    fn step(&mut self) {
        self.current_lr -= self.decrement;
    }

    fn reset(&mut self) {
        self.current_lr = self.initial_lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_lr_never_changes() {
        let mut scheduler = ConstantLR::new(0.3);
        for _ in 0..10 {
            scheduler.step();
        }
        assert_eq!(scheduler.get_lr(), 0.3);
    }

    #[test]
    fn test_linear_decay_decrement() {
        let scheduler = LinearDecay::new(0.5, 0.01, 7);
        assert!((scheduler.decrement() - 0.07).abs() < 1e-12);
        assert_eq!(scheduler.get_lr(), 0.5);
    }

    #[test]
    fn test_linear_decay_reaches_min_after_all_epochs() {
        let mut scheduler = LinearDecay::new(0.5, 0.01, 10);
        for _ in 0..10 {
            scheduler.step();
        }
        assert!((scheduler.get_lr() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_linear_decay_reset() {
        let mut scheduler = LinearDecay::new(0.2, 0.1, 2);
        scheduler.step();
        scheduler.reset();
        assert_eq!(scheduler.get_lr(), 0.2);
    }

    #[test]
    fn test_linear_decay_replays_after_reset() {
        let mut scheduler = LinearDecay::new(0.5, 0.05, 6);
        let mut first = Vec::new();
        for _ in 0..6 {
            first.push(scheduler.get_lr());
            scheduler.step();
        }
        scheduler.reset();
        let mut second = Vec::new();
        for _ in 0..6 {
            second.push(scheduler.get_lr());
            scheduler.step();
        }
        assert_eq!(first, second);
    }
}
