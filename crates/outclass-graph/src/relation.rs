//! The upgrade order.
//!
//! Two views of the same relation are kept in step:
//!
//! - **declared** upgrades, stored on each node, are exactly what callers
//!   asserted and are the only thing persisted;
//! - **visible** upgrades, the edges of the inner graph, form the transitive
//!   reduction of the declared upgrades.
//!
//! Adding an upgrade hides every visible edge the new one makes redundant.
//! Removing an upgrade re-checks the declared upgrades below it and makes
//! visible again whatever is no longer implied. Since a DAG has a single
//! transitive reduction, the visible view depends only on the declared set,
//! never on the order upgrades arrived in.
//!
//! All walks are explicit worklists with a visited set.

use crate::graph::{CardGraph, NodeId};
use petgraph::stable_graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors from mutating the upgrade order. None of them leave the graph
/// modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    #[error("making {better} an upgrade of {worse} would create a cycle")]
    WouldCreateCycle { worse: String, better: String },

    #[error("no card with handle {0:?}")]
    UnknownNode(NodeId),
}

/// What an accepted upgrade did to the visible view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upgrade {
    /// A new direct edge became visible.
    Linked,

    /// The upgrade was already implied by a longer chain; it is recorded
    /// but stays hidden.
    Implied,

    /// The upgrade was already a direct visible edge.
    Existing,
}

impl CardGraph {
    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Declares `better` strictly better than `worse`.
    ///
    /// Rejected without touching the graph if `worse` and `better` are the
    /// same card or `better` is already worse than `worse`. The rejection
    /// is logged as a warning and returned; it is never a panic.
    pub fn add_upgrade(
        &mut self,
        worse: NodeId,
        better: NodeId,
    ) -> Result<Upgrade, RelationError> {
        self.require(worse)?;
        self.require(better)?;

        if self.would_create_cycle(worse, better) {
            let err = RelationError::WouldCreateCycle {
                worse: self.id_of(worse),
                better: self.id_of(better),
            };
            warn!("Can't add upgrade: {}", err);
            return Err(err);
        }

        self.declare(worse, better);
        Ok(self.link(worse, better))
    }

    /// Retracts the declaration that `better` is better than `worse`.
    ///
    /// Upgrades that were hidden behind the removed edge become visible
    /// again. Returns whether the upgrade had been declared.
    pub fn remove_upgrade(
        &mut self,
        worse: NodeId,
        better: NodeId,
    ) -> Result<bool, RelationError> {
        self.require(worse)?;
        self.require(better)?;
        Ok(self.retract(worse, better))
    }

    pub(crate) fn retract(&mut self, worse: NodeId, better: NodeId) -> bool {
        let was_declared = match self.graph.node_weight_mut(worse) {
            Some(node) => {
                let before = node.declared.len();
                node.declared.retain(|&declared| declared != better);
                node.declared.len() != before
            }
            None => false,
        };

        if let Some(edge) = self.graph.find_edge(worse, better) {
            self.graph.remove_edge(edge);
        }

        self.restore_hidden(worse);
        was_declared
    }

    fn require(&self, index: NodeId) -> Result<(), RelationError> {
        if self.graph.contains_node(index) {
            Ok(())
        } else {
            Err(RelationError::UnknownNode(index))
        }
    }

    fn would_create_cycle(&self, worse: NodeId, better: NodeId) -> bool {
        worse == better || self.is_worse_than(better, worse)
    }

    fn declare(&mut self, worse: NodeId, better: NodeId) {
        if let Some(node) = self.graph.node_weight_mut(worse) {
            if !node.declared.contains(&better) {
                node.declared.push(better);
            }
        }
    }

    /// Makes a declared upgrade visible unless something already implies it.
    fn link(&mut self, worse: NodeId, better: NodeId) -> Upgrade {
        if self.is_directly_worse_than(worse, better) {
            return Upgrade::Existing;
        }
        if self.is_worse_than(worse, better) {
            debug!(
                "Upgrade {} -> {} implied by an existing chain",
                self.id_of(worse),
                self.id_of(better)
            );
            return Upgrade::Implied;
        }

        self.hide_redundant(worse, better);
        self.graph.add_edge(worse, better, ());
        Upgrade::Linked
    }

    /// Hides every visible edge from `worse` or below it to `better` or
    /// above it. The new edge implies all of them.
    fn hide_redundant(&mut self, worse: NodeId, better: NodeId) {
        let mut above = self.reachable(better, Direction::Outgoing);
        above.insert(better);
        let mut below = self.reachable(worse, Direction::Incoming);
        below.insert(worse);

        let mut redundant: Vec<EdgeIndex> = Vec::new();
        for &low in &below {
            for edge in self.graph.edges_directed(low, Direction::Outgoing) {
                if above.contains(&edge.target()) {
                    redundant.push(edge.id());
                }
            }
        }

        for edge in redundant {
            if let Some((low, high)) = self.graph.edge_endpoints(edge) {
                trace!(
                    "Hiding redundant upgrade {} -> {}",
                    self.id_of(low),
                    self.id_of(high)
                );
            }
            self.graph.remove_edge(edge);
        }
    }

    /// Re-links declared upgrades of `start` and everything visibly below
    /// it that the current view no longer implies.
    fn restore_hidden(&mut self, start: NodeId) {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            for better in self.declared_upgrades(current).to_vec() {
                if self.is_worse_than(current, better) {
                    continue;
                }
                if self.would_create_cycle(current, better) {
                    warn!(
                        "Skipping restore of {} -> {}: would create a cycle",
                        self.id_of(current),
                        self.id_of(better)
                    );
                    continue;
                }
                trace!(
                    "Restoring upgrade {} -> {}",
                    self.id_of(current),
                    self.id_of(better)
                );
                self.link(current, better);
            }

            stack.extend(
                self.graph
                    .neighbors_directed(current, Direction::Incoming)
                    .filter(|lower| !visited.contains(lower)),
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Returns true if `other` is a direct or transitive upgrade of `card`.
    pub fn is_worse_than(&self, card: NodeId, other: NodeId) -> bool {
        card != other && self.reaches(card, other, Direction::Outgoing)
    }

    /// Returns true if `other` is a direct or transitive downgrade of `card`.
    pub fn is_better_than(&self, card: NodeId, other: NodeId) -> bool {
        card != other && self.reaches(card, other, Direction::Incoming)
    }

    /// Returns true if `other` is a visible, direct upgrade of `card`.
    pub fn is_directly_worse_than(&self, card: NodeId, other: NodeId) -> bool {
        self.graph.find_edge(card, other).is_some()
    }

    /// Returns true if `other` is a visible, direct downgrade of `card`.
    pub fn is_directly_better_than(&self, card: NodeId, other: NodeId) -> bool {
        self.graph.find_edge(other, card).is_some()
    }

    /// Returns true if anything is directly better than `card`.
    pub fn is_outclassed(&self, card: NodeId) -> bool {
        self.graph.contains_node(card)
            && self
                .graph
                .neighbors_directed(card, Direction::Outgoing)
                .next()
                .is_some()
    }

    /// Returns true if `card` has no visible upgrades or downgrades.
    pub fn is_orphaned(&self, card: NodeId) -> bool {
        self.graph.contains_node(card)
            && self.graph.neighbors_undirected(card).next().is_none()
    }

    /// Returns true if `other` can be reached from `card` across visible
    /// edges in either direction.
    ///
    /// A card is related to itself whenever it has any visible edge, since
    /// the walk comes back to it through that neighbour.
    pub fn is_related(&self, card: NodeId, other: NodeId) -> bool {
        if !self.graph.contains_node(card) {
            return false;
        }
        if card == other {
            return !self.is_orphaned(card);
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![card];
        visited.insert(card);

        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors_undirected(current) {
                if neighbor == other {
                    return true;
                }
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        false
    }

    /// Cards directly better than `card`, sorted by handle.
    pub fn direct_upgrades(&self, card: NodeId) -> Vec<NodeId> {
        self.neighbors_sorted(card, Direction::Outgoing)
    }

    /// Cards directly worse than `card`, sorted by handle.
    pub fn direct_downgrades(&self, card: NodeId) -> Vec<NodeId> {
        self.neighbors_sorted(card, Direction::Incoming)
    }

    /// Every card better than `card`, sorted by handle.
    pub fn upgrades_of(&self, card: NodeId) -> Vec<NodeId> {
        self.reachable_sorted(card, Direction::Outgoing)
    }

    /// Every card worse than `card`, sorted by handle.
    pub fn downgrades_of(&self, card: NodeId) -> Vec<NodeId> {
        self.reachable_sorted(card, Direction::Incoming)
    }

    /// Upgrades declared for `card`, in declaration order.
    pub fn declared_upgrades(&self, card: NodeId) -> &[NodeId] {
        self.graph
            .node_weight(card)
            .map(|node| node.declared.as_slice())
            .unwrap_or(&[])
    }

    fn neighbors_sorted(&self, card: NodeId, direction: Direction) -> Vec<NodeId> {
        if !self.graph.contains_node(card) {
            return Vec::new();
        }
        let mut nodes: Vec<NodeId> = self.graph.neighbors_directed(card, direction).collect();
        nodes.sort();
        nodes
    }

    fn reachable_sorted(&self, card: NodeId, direction: Direction) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.reachable(card, direction).into_iter().collect();
        nodes.sort();
        nodes
    }

    /// Every node reachable from `start` along `direction`, excluding
    /// `start` itself.
    fn reachable(&self, start: NodeId, direction: Direction) -> HashSet<NodeId> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        if !self.graph.contains_node(start) {
            return visited;
        }

        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        visited.remove(&start);
        visited
    }

    fn reaches(&self, from: NodeId, to: NodeId, direction: Direction) -> bool {
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            return false;
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            for neighbor in self.graph.neighbors_directed(current, direction) {
                if neighbor == to {
                    return true;
                }
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        false
    }
}
