//! Graph primitives: nodes, connections and the sequence that numbers them
//!
//! Nodes and connections are stored in arenas owned by
//! [`Network`](crate::network::Network) and refer to each other by index.

pub mod connection;
pub mod node;

pub use connection::{Connection, ConnectionId, ConnectionKind};
pub use node::{Node, NodeId, NodeRole};

/// Monotonic serial numbers for diagnostics, scoped to one network.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    next: u64,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next serial and advances.
    pub fn next_serial(&mut self) -> u64 {
        let serial = self.next;
        self.next += 1;
        serial
    }
}
