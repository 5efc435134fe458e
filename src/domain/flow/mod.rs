//! Flow nodes
//!
//! Only what the configuration panel needs: a node's identity, its kind and
//! the configuration committed to it. Canvas layout and edges live elsewhere.

mod node;

pub use node::{FlowNode, NodeKind};
