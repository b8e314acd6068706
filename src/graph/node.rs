//! Computational units of the network
//!
//! A node aggregates the weighted values of its predecessor connections,
//! applies its activation, and writes the result onto its successor
//! connections. During the backward pass it computes its delta and stores the
//! gradient contribution on each predecessor connection.

use super::connection::{Connection, ConnectionId};
use crate::utils::activations::{Activation, Loss};

/// Index of a node inside its network's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a node in the layered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Input,
    Hidden,
    Output,
}

/// One neuron.
///
/// Predecessors and successors are filled while the network is built and are
/// not changed afterwards; their order is the construction order.
#[derive(Debug, Clone)]
pub struct Node {
    layer: usize,
    index: usize,
    role: NodeRole,
    activation: Activation,
    loss: Loss,
    weighted_sum: f64,
    output: f64,
    delta: f64,
    predecessors: Vec<ConnectionId>,
    successors: Vec<ConnectionId>,
}

impl Node {
    pub(crate) fn new(role: NodeRole, layer: usize, index: usize, activation: Activation) -> Self {
        Self {
            layer,
            index,
            role,
            activation,
            loss: Loss::SquaredError,
            weighted_sum: 0.0,
            output: 0.0,
            delta: 0.0,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weighted_sum(&self) -> f64 {
        self.weighted_sum
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn predecessors(&self) -> &[ConnectionId] {
        &self.predecessors
    }

    pub fn successors(&self) -> &[ConnectionId] {
        &self.successors
    }

    pub(crate) fn add_predecessor(&mut self, connection: ConnectionId) {
        self.predecessors.push(connection);
    }

    pub(crate) fn add_successor(&mut self, connection: ConnectionId) {
        self.successors.push(connection);
    }

    /// Gradient of the pattern loss with respect to this node's weighted sum.
    ///
    /// Output deltas already include the activation derivative; for the other
    /// roles the delta is taken with respect to the output and the derivative
    /// is applied here.
    pub fn backpropagated_signal(&self) -> f64 {
        match self.role {
            NodeRole::Output => self.delta,
            NodeRole::Input | NodeRole::Hidden => {
                self.delta * self.activation.derivative(self.weighted_sum)
            }
        }
    }

    /// Used in forward propagation.
    ///
    /// Aggregates weighted values from all predecessors, feeds the sum to the
    /// activation function and places the output on the successor connections.
    pub(crate) fn process_inputs(&mut self, connections: &mut [Connection]) {
        self.weighted_sum = 0.0;
        for predecessor in &self.predecessors {
            self.weighted_sum += connections[predecessor.0].weighted_value();
        }

        self.output = self.activation.apply(self.weighted_sum);

        for successor in &self.successors {
            connections[successor.0].set_value(self.output);
        }
    }

    /// Used in backward propagation.
    ///
    /// `downstream` is Σ (successor signal × connection weight) over the
    /// successor connections, computed by the caller; output nodes ignore it
    /// and use `target` instead.
    pub(crate) fn calculate_delta(
        &mut self,
        target: f64,
        downstream: f64,
        connections: &mut [Connection],
    ) {
        match self.role {
            NodeRole::Output => {
                self.delta = self.loss.derivative(self.output, target)
                    * self.activation.derivative(self.weighted_sum);
                for predecessor in &self.predecessors {
                    let edge = &mut connections[predecessor.0];
                    let error = edge.value() * self.delta;
                    edge.set_error(error);
                }
            }
            NodeRole::Input | NodeRole::Hidden => {
                self.delta = downstream;
                let derivative = self.activation.derivative(self.weighted_sum);
                for predecessor in &self.predecessors {
                    let edge = &mut connections[predecessor.0];
                    let error = edge.value() * derivative * self.delta;
                    edge.set_error(error);
                }
            }
        }
    }

    /// Error of this node's output against `target`.
    pub fn loss(&self, target: f64) -> f64 {
        self.loss.value(self.output, target)
    }
}
