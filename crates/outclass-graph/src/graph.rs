//! Card collection and arena.
//!
//! The CardGraph owns every card and deduplicates them by identifier. It
//! wraps a petgraph `StableDiGraph` whose edges are the visible upgrades;
//! the ordering logic itself lives in `relation.rs`.

use crate::edge::{DeclaredEdge, UpgradeEdge, Visibility};
use outclass_core::Card;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Stable handle to a card in the graph.
///
/// Handles stay valid when other cards are removed.
pub type NodeId = NodeIndex;

/// A card and the upgrades declared for it.
#[derive(Debug, Clone)]
pub(crate) struct CardNode {
    pub(crate) card: Card,

    /// Cards explicitly declared better than this one, in declaration order.
    pub(crate) declared: Vec<NodeId>,
}

impl CardNode {
    fn new(card: Card) -> Self {
        Self {
            card,
            declared: Vec::new(),
        }
    }
}

/// The card collection together with its upgrade order.
///
/// Edges of the inner graph point from a card to a card that directly
/// outclasses it, so a node's outgoing neighbours are its visible upgrades
/// and its incoming neighbours its visible downgrades.
#[derive(Debug, Default)]
pub struct CardGraph {
    pub(crate) graph: StableDiGraph<CardNode, ()>,

    /// Maps card identifiers to graph handles.
    id_index: HashMap<String, NodeId>,
}

impl CardGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card to the collection.
    ///
    /// If a card with the same identifier is already present nothing
    /// changes and the existing handle is returned.
    pub fn add_card(&mut self, card: Card) -> NodeId {
        if let Some(&existing) = self.id_index.get(&card.id) {
            debug!("Card {} already registered", card.id);
            return existing;
        }

        let id = card.id.clone();
        let index = self.graph.add_node(CardNode::new(card));
        self.id_index.insert(id, index);
        index
    }

    /// Removes a card by identifier.
    ///
    /// Every upgrade declared to or from the card is retracted first, so
    /// upgrades the card was hiding become visible again.
    pub fn remove_card(&mut self, id: &str) -> Option<Card> {
        let index = self.index_of(id)?;

        let dependents: Vec<NodeId> = self
            .node_ids()
            .filter(|&other| {
                self.graph
                    .node_weight(other)
                    .is_some_and(|node| node.declared.contains(&index))
            })
            .collect();
        for worse in dependents {
            self.retract(worse, index);
        }

        for better in self.declared_upgrades(index).to_vec() {
            self.retract(index, better);
        }

        self.id_index.remove(id);
        self.graph.remove_node(index).map(|node| node.card)
    }

    /// Gets a card by its identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&Card> {
        self.card(self.index_of(id)?)
    }

    /// Gets the handle for an identifier.
    pub fn index_of(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Gets a card by handle.
    pub fn card(&self, index: NodeId) -> Option<&Card> {
        self.graph.node_weight(index).map(|node| &node.card)
    }

    /// Resolves a user-supplied key: identifier first, then display name.
    pub fn resolve(&self, key: &str) -> Option<NodeId> {
        self.index_of(key).or_else(|| {
            self.node_ids()
                .find(|&index| self.card(index).is_some_and(|card| card.name == key))
        })
    }

    /// Returns true if a card with the same identifier is present.
    pub fn contains(&self, card: &Card) -> bool {
        self.contains_id(&card.id)
    }

    /// Returns true if the identifier is registered.
    pub fn contains_id(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Iterates over all cards in handle order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.node_ids().filter_map(|index| self.card(index))
    }

    /// Iterates over all handles in order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Returns the number of cards.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the collection holds no cards.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns every visible upgrade, sorted by identifiers.
    pub fn visible_edges(&self) -> Vec<UpgradeEdge> {
        let mut edges: Vec<UpgradeEdge> = self
            .node_ids()
            .flat_map(|worse| {
                self.graph
                    .neighbors_directed(worse, Direction::Outgoing)
                    .map(move |better| (worse, better))
            })
            .filter_map(|(worse, better)| {
                Some(UpgradeEdge {
                    worse: self.card(worse)?.id.clone(),
                    better: self.card(better)?.id.clone(),
                })
            })
            .collect();
        edges.sort();
        edges
    }

    /// Returns every declared upgrade in card order, then declaration order.
    pub fn declared_edges(&self) -> Vec<DeclaredEdge> {
        let mut edges = Vec::new();
        for worse in self.node_ids() {
            for &better in self.declared_upgrades(worse) {
                let (Some(low), Some(high)) = (self.card(worse), self.card(better)) else {
                    continue;
                };
                let visibility = if self.is_directly_worse_than(worse, better) {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
                edges.push(DeclaredEdge {
                    worse: low.id.clone(),
                    better: high.id.clone(),
                    visibility,
                });
            }
        }
        edges
    }

    /// Returns identifier of a handle, or an empty string for stale handles.
    pub(crate) fn id_of(&self, index: NodeId) -> String {
        self.card(index)
            .map(|card| card.id.clone())
            .unwrap_or_default()
    }
}

/// Collection statistics for the status command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub card_count: usize,
    pub declared_edges: usize,
    pub visible_edges: usize,
    pub orphaned: usize,
    pub outclassed: usize,
}

impl CardGraph {
    /// Returns collection statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            card_count: self.len(),
            declared_edges: self
                .node_ids()
                .map(|index| self.declared_upgrades(index).len())
                .sum(),
            visible_edges: self.graph.edge_count(),
            orphaned: self.node_ids().filter(|&i| self.is_orphaned(i)).count(),
            outclassed: self.node_ids().filter(|&i| self.is_outclassed(i)).count(),
        }
    }
}
