//! Layered feed-forward network
//!
//! The network owns two arenas: the node grid and a flat list of connections.
//! Connections are laid out trainable-first (bias, input and inter-layer links
//! in construction order), followed by one output tap per output node.
//!
//! # Example
//!
//! ```
//! use layered_perceptron::Network;
//!
//! let mut network = Network::new(2, &[3, 1]).unwrap();
//! let output = network.predict(&[0.5, -0.25]).unwrap();
//! assert_eq!(output.len(), 1);
//! ```

use log::debug;
use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::graph::{Connection, ConnectionId, ConnectionKind, Node, NodeId, NodeRole, Sequence};
use crate::training::Pattern;
use crate::utils::activations::Activation;

/// Fully connected layered network with a bias link on every node.
#[derive(Debug, Clone)]
pub struct Network {
    num_inputs: usize,
    layer_sizes: Vec<usize>,
    output_activation: Activation,
    nodes: Vec<Node>,
    layers: Vec<Vec<NodeId>>,
    connections: Vec<Connection>,
    trainable_count: usize,
    input_connections: Vec<Vec<ConnectionId>>,
    output_taps: Vec<ConnectionId>,
    sequence: Sequence,
}

impl Network {
    /// Builds a network with sigmoid activation on every node.
    ///
    /// # Arguments
    ///
    /// * `num_inputs` - Dimension of the input vector (must be > 0)
    /// * `layer_sizes` - Node count per layer, first to last (non-empty, each > 0)
    pub fn new(num_inputs: usize, layer_sizes: &[usize]) -> Result<Self> {
        Self::with_output_activation(num_inputs, layer_sizes, Activation::Sigmoid)
    }

    /// Builds a network whose output nodes use `output_activation`.
    ///
    /// Input and hidden nodes always use the sigmoid.
    pub fn with_output_activation(
        num_inputs: usize,
        layer_sizes: &[usize],
        output_activation: Activation,
    ) -> Result<Self> {
        if num_inputs == 0 {
            return Err(NetworkError::topology("network needs at least one input"));
        }
        if layer_sizes.is_empty() {
            return Err(NetworkError::topology("layer list is empty"));
        }
        if let Some(layer) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::topology(format!("layer {} has no nodes", layer)));
        }

        let mut network = Self {
            num_inputs,
            layer_sizes: layer_sizes.to_vec(),
            output_activation,
            nodes: Vec::new(),
            layers: Vec::with_capacity(layer_sizes.len()),
            connections: Vec::new(),
            trainable_count: 0,
            input_connections: vec![Vec::new(); num_inputs],
            output_taps: Vec::new(),
            sequence: Sequence::new(),
        };
        network.build_nodes();
        network.build_input_layer();
        network.build_inner_layers();
        network.trainable_count = network.connections.len();
        network.build_output_taps();

        debug!(
            "built network: {} inputs, layers {:?}, {} trainable connections",
            num_inputs,
            network.layer_sizes,
            network.trainable_count
        );
        Ok(network)
    }

    fn build_nodes(&mut self) {
        let num_layers = self.layer_sizes.len();
        for (layer, &size) in self.layer_sizes.iter().enumerate() {
            let mut ids = Vec::with_capacity(size);
            for index in 0..size {
                // A single layer is both first and last; it trains as output.
                let role = if layer == num_layers - 1 {
                    NodeRole::Output
                } else if layer == 0 {
                    NodeRole::Input
                } else {
                    NodeRole::Hidden
                };
                let activation = match role {
                    NodeRole::Output => self.output_activation,
                    NodeRole::Input | NodeRole::Hidden => Activation::Sigmoid,
                };
                ids.push(NodeId(self.nodes.len()));
                self.nodes.push(Node::new(role, layer, index, activation));
            }
            self.layers.push(ids);
        }
    }

    fn push_connection(
        &mut self,
        kind: ConnectionKind,
        source: Option<NodeId>,
        destination: Option<NodeId>,
    ) -> ConnectionId {
        let id = ConnectionId(self.connections.len());
        let serial = self.sequence.next_serial();
        self.connections
            .push(Connection::new(serial, kind, source, destination));
        id
    }

    /// Bias for every first-layer node, then input 0 for every node, input 1, ...
    fn build_input_layer(&mut self) {
        for slot in 0..=self.num_inputs {
            for j in 0..self.layers[0].len() {
                let node = self.layers[0][j];
                let kind = if slot == 0 {
                    ConnectionKind::Fixed
                } else {
                    ConnectionKind::Variable
                };
                let id = self.push_connection(kind, None, Some(node));
                self.nodes[node.0].add_predecessor(id);
                if slot > 0 {
                    self.input_connections[slot - 1].push(id);
                }
            }
        }
    }

    /// Bias for every destination node, then source 0 to every destination, ...
    fn build_inner_layers(&mut self) {
        for layer in 0..self.layers.len() - 1 {
            let origin_size = self.layers[layer].len();
            let destination_size = self.layers[layer + 1].len();
            for slot in 0..=origin_size {
                for j in 0..destination_size {
                    let destination = self.layers[layer + 1][j];
                    let id = if slot == 0 {
                        self.push_connection(ConnectionKind::Fixed, None, Some(destination))
                    } else {
                        let source = self.layers[layer][slot - 1];
                        let id = self.push_connection(
                            ConnectionKind::Variable,
                            Some(source),
                            Some(destination),
                        );
                        self.nodes[source.0].add_successor(id);
                        id
                    };
                    self.nodes[destination.0].add_predecessor(id);
                }
            }
        }
    }

    fn build_output_taps(&mut self) {
        let last = self.layers.len() - 1;
        for j in 0..self.layers[last].len() {
            let node = self.layers[last][j];
            let id = self.push_connection(ConnectionKind::Variable, Some(node), None);
            self.nodes[node.0].add_successor(id);
            self.output_taps.push(id);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_layers(&self) -> usize {
        self.layer_sizes.len()
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn output_activation(&self) -> Activation {
        self.output_activation
    }

    /// Node at `index` within `layer`, if both exist.
    pub fn node(&self, layer: usize, index: usize) -> Option<&Node> {
        self.layers
            .get(layer)
            .and_then(|ids| ids.get(index))
            .map(|id| &self.nodes[id.0])
    }

    /// Resolves a connection endpoint.
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Any connection in the arena, output taps included.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// All trainable connections, in construction order. Output taps are not
    /// included.
    pub fn connections(&self) -> &[Connection] {
        &self.connections[..self.trainable_count]
    }

    /// Weights of all trainable connections, in construction order.
    pub fn weights(&self) -> Vec<f64> {
        self.connections().iter().map(Connection::weight).collect()
    }

    pub fn output_taps(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.output_taps.iter().map(move |id| &self.connections[id.0])
    }

    /// Overwrites one connection's weight.
    pub fn set_weight(&mut self, id: ConnectionId, weight: f64) -> Result<()> {
        let connection = self.connections.get_mut(id.0).ok_or_else(|| {
            NetworkError::parameters(format!("no connection with index {}", id.0))
        })?;
        connection.set_weight(weight);
        Ok(())
    }

    /// Draws every connection weight (taps included) uniformly from
    /// `[lower_bound, upper_bound]`, in arena order.
    pub fn initialize_weights<R: Rng + ?Sized>(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        rng: &mut R,
    ) -> Result<()> {
        check_bounds(lower_bound, upper_bound)?;
        for connection in &mut self.connections {
            let weight = if lower_bound == upper_bound {
                lower_bound
            } else {
                rng.gen_range(lower_bound..=upper_bound)
            };
            connection.set_weight(weight);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    pub(crate) fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.num_inputs {
            return Err(NetworkError::InvalidInput {
                expected: self.num_inputs,
                actual: input.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn require_single_output(&self) -> Result<()> {
        if self.output_size() != 1 {
            return Err(NetworkError::topology(format!(
                "expected a single output node, network has {}",
                self.output_size()
            )));
        }
        Ok(())
    }

    /// Places the input on the input connections and processes every layer in
    /// order. The input length must already be checked.
    fn forward_propagate(&mut self, input: &[f64]) {
        for (dimension, &value) in input.iter().enumerate() {
            for id in &self.input_connections[dimension] {
                self.connections[id.0].set_value(value);
            }
        }

        for layer in &self.layers {
            for id in layer {
                self.nodes[id.0].process_inputs(&mut self.connections);
            }
        }
    }

    /// Σ (successor signal × weight) over the successors of `id`.
    fn downstream_signal(&self, id: NodeId) -> f64 {
        let mut signal = 0.0;
        for successor in self.nodes[id.0].successors() {
            let edge = &self.connections[successor.0];
            signal += edge.successor_signal(&self.nodes) * edge.weight();
        }
        signal
    }

    /// Computes deltas in reverse layer order, so every successor's delta is
    /// written before it is read.
    fn backward_propagate(&mut self, target: f64) {
        for layer in self.layers.iter().rev() {
            for &id in layer {
                let downstream = match self.nodes[id.0].role() {
                    NodeRole::Output => 0.0,
                    NodeRole::Input | NodeRole::Hidden => self.downstream_signal(id),
                };
                self.nodes[id.0].calculate_delta(target, downstream, &mut self.connections);
            }
        }
    }

    fn output_error(&self, target: f64) -> f64 {
        let last = &self.layers[self.layers.len() - 1];
        self.nodes[last[0].0].loss(target)
    }

    /// Forward and backward pass without validation; returns the squared error.
    pub(crate) fn compute_gradients_unchecked(&mut self, input: &[f64], target: f64) -> f64 {
        self.forward_propagate(input);
        let error = self.output_error(target);
        self.backward_propagate(target);
        error
    }

    /// weight ← weight − error × step for every trainable connection.
    pub(crate) fn apply_weight_update(&mut self, step_size: f64) {
        for connection in &mut self.connections[..self.trainable_count] {
            connection.apply_update(step_size);
        }
    }

    /// Runs a forward and a backward pass for one pattern and leaves the
    /// gradient on every trainable connection (`Connection::error`). Weights
    /// are not changed.
    ///
    /// Returns the squared error of the output before the pass.
    pub fn compute_gradients(&mut self, input: &[f64], target: f64) -> Result<f64> {
        self.check_input(input)?;
        self.require_single_output()?;
        Ok(self.compute_gradients_unchecked(input, target))
    }

    // ------------------------------------------------------------------
    // Inference
    // ------------------------------------------------------------------

    /// Forward-propagates `input` and returns the output layer's outputs.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        self.forward_propagate(input);
        Ok(self.current_outputs())
    }

    /// Output of a single-output network.
    pub fn predict_single(&mut self, input: &[f64]) -> Result<f64> {
        self.require_single_output()?;
        self.check_input(input)?;
        self.forward_propagate(input);
        Ok(self.first_output())
    }

    fn first_output(&self) -> f64 {
        let last = &self.layers[self.layers.len() - 1];
        self.nodes[last[0].0].output()
    }

    fn current_outputs(&self) -> Vec<f64> {
        self.layers[self.layers.len() - 1]
            .iter()
            .map(|id| self.nodes[id.0].output())
            .collect()
    }

    /// The trained function of a 2-input, 1-output network as `f(x, y)`.
    ///
    /// Shape is checked once here; the returned closure cannot fail.
    pub fn surface_fn(&mut self) -> Result<impl FnMut(f64, f64) -> f64 + '_> {
        if self.num_inputs != 2 {
            return Err(NetworkError::InvalidInput {
                expected: self.num_inputs,
                actual: 2,
            });
        }
        self.require_single_output()?;
        Ok(move |x: f64, y: f64| {
            self.forward_propagate(&[x, y]);
            self.first_output()
        })
    }

    /// Mean squared error over `patterns` with the current weights.
    pub fn mean_squared_error(&mut self, patterns: &[Pattern]) -> Result<f64> {
        self.require_single_output()?;
        if patterns.is_empty() {
            return Err(NetworkError::parameters("no patterns to evaluate"));
        }
        for pattern in patterns {
            self.check_input(&pattern.input)?;
        }
        let mut error = 0.0;
        for pattern in patterns {
            self.forward_propagate(&pattern.input);
            error += self.output_error(pattern.target);
        }
        Ok(error / patterns.len() as f64)
    }

    /// Iterates over all nodes, layer by layer.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.layers
            .iter()
            .flat_map(move |layer| layer.iter().map(move |id| &self.nodes[id.0]))
    }
}

pub(crate) fn check_bounds(lower_bound: f64, upper_bound: f64) -> Result<()> {
    if !lower_bound.is_finite() || !upper_bound.is_finite() {
        return Err(NetworkError::parameters("weight bounds must be finite"));
    }
    if lower_bound > upper_bound {
        return Err(NetworkError::parameters(format!(
            "lower bound {} exceeds upper bound {}",
            lower_bound, upper_bound
        )));
    }
    Ok(())
}
