//! Outclass Graph - Upgrade order management
//!
//! This crate maintains a strict "is better than" order over cards. Every
//! upgrade a caller asserts is remembered, while the graph itself only shows
//! the transitively-reduced view: if Shock upgrades Breath of Fire and
//! Lightning Bolt upgrades Shock, a direct "Bolt upgrades Breath" edge is
//! hidden, and comes back if the chain is later broken.
//!
//! # Architecture
//!
//! Cards live in a petgraph `StableDiGraph` arena and are addressed by
//! stable [`NodeId`] handles. Visible edges are graph edges pointing from
//! the worse card to the better one; declared upgrades are kept on each node.
//! Persistence stores only declared upgrades and rebuilds everything else by
//! replay.
//!
//! # Example
//!
//! ```
//! use outclass_core::Card;
//! use outclass_graph::CardGraph;
//!
//! let mut graph = CardGraph::new();
//! let breath = graph.add_card(Card::new("Breath of Fire"));
//! let shock = graph.add_card(Card::new("Shock"));
//! let bolt = graph.add_card(Card::new("Lightning Bolt"));
//!
//! graph.add_upgrade(breath, shock).unwrap();
//! graph.add_upgrade(shock, bolt).unwrap();
//!
//! assert!(graph.is_worse_than(breath, bolt));
//! assert!(!graph.is_directly_worse_than(breath, bolt));
//! assert!(graph.add_upgrade(bolt, breath).is_err());
//! ```

mod edge;
mod graph;
mod relation;
mod snapshot;
mod store;

#[cfg(test)]
mod test_support;

pub use edge::{DeclaredEdge, UpgradeEdge, Visibility};
pub use graph::{CardGraph, GraphStats, NodeId};
pub use relation::{RelationError, Upgrade};
pub use snapshot::{Snapshot, StoredCard, SNAPSHOT_VERSION};
pub use store::{read_snapshot_file, write_snapshot_file, CardStore, StoreError};
