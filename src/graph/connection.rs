//! Weighted links between nodes
//!
//! A connection carries the value its source produced, the weight applied to
//! that value, and the error (gradient of the pattern loss with respect to the
//! weight) written by the last backward pass. Endpoints are arena indices into
//! the owning network's node list and never keep a node alive.

use super::node::{Node, NodeId};

/// Index of a connection inside its network's connection arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) usize);

impl ConnectionId {
    /// Position of the connection in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether the value flowing over a connection can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Value permanently 1; used for bias.
    Fixed,
    /// Value supplied by the source node's output or by external input.
    Variable,
}

/// A single weighted, directed link.
///
/// # Fields
///
/// * `serial` - Number handed out by the network's sequence at construction
/// * `kind` - Bias (`Fixed`) or data-carrying (`Variable`) link
/// * `value` - Last value placed on the link
/// * `weight` - Trainable multiplier
/// * `error` - Gradient contribution, valid between a backward pass and the
///   following weight update
/// * `source` - Producing node; `None` for bias and network inputs
/// * `destination` - Consuming node; `None` for output taps
#[derive(Debug, Clone)]
pub struct Connection {
    serial: u64,
    kind: ConnectionKind,
    value: f64,
    weight: f64,
    error: f64,
    source: Option<NodeId>,
    destination: Option<NodeId>,
}

impl Connection {
    pub(crate) fn new(
        serial: u64,
        kind: ConnectionKind,
        source: Option<NodeId>,
        destination: Option<NodeId>,
    ) -> Self {
        Self {
            serial,
            kind,
            value: 1.0,
            weight: 1.0,
            error: 0.0,
            source,
            destination,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn is_bias(&self) -> bool {
        self.kind == ConnectionKind::Fixed
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    /// Places a value on the link. Bias links keep their constant 1.
    pub(crate) fn set_value(&mut self, value: f64) {
        if self.kind == ConnectionKind::Variable {
            self.value = value;
        }
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub(crate) fn set_error(&mut self, error: f64) {
        self.error = error;
    }

    /// value × weight, the contribution to the destination's weighted sum.
    pub fn weighted_value(&self) -> f64 {
        self.value * self.weight
    }

    /// Back-propagated signal of the destination node, or 0 for output taps.
    pub(crate) fn successor_signal(&self, nodes: &[Node]) -> f64 {
        match self.destination {
            Some(id) => nodes[id.0].backpropagated_signal(),
            None => 0.0,
        }
    }

    /// Gradient descent step: weight ← weight − error × step_size.
    pub(crate) fn apply_update(&mut self, step_size: f64) {
        self.weight -= self.error * step_size;
    }
}
