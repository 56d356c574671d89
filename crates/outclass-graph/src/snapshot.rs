//! Persisted shape of a card collection.
//!
//! Only cards and their declared upgrades are written. The visible view is
//! rebuilt on restore by creating every card first and then replaying each
//! card's declared upgrades, in card order and then declaration order,
//! through [`CardGraph::add_upgrade`].

use crate::graph::CardGraph;
use outclass_core::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A card with the identifiers of the cards declared better than it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    pub card: Card,

    #[serde(default)]
    pub upgrades: Vec<String>,
}

/// A serializable image of a [`CardGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub cards: Vec<StoredCard>,
}

impl Snapshot {
    /// Captures cards and declared upgrades from a graph.
    pub fn capture(graph: &CardGraph) -> Self {
        let cards = graph
            .node_ids()
            .filter_map(|index| {
                let card = graph.card(index)?.clone();
                let upgrades = graph
                    .declared_upgrades(index)
                    .iter()
                    .filter_map(|&better| graph.card(better).map(|c| c.id.clone()))
                    .collect();
                Some(StoredCard { card, upgrades })
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            cards,
        }
    }

    /// Rebuilds a graph by replaying declared upgrades.
    ///
    /// Upgrades naming unknown cards are skipped with a warning, as are
    /// upgrades that would close a cycle (only possible in hand-edited
    /// files).
    pub fn restore(self) -> CardGraph {
        let mut graph = CardGraph::new();
        graph.merge(self);
        graph
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl CardGraph {
    /// Adds every card of `snapshot` and replays its declared upgrades.
    ///
    /// All cards are created before any upgrade is replayed, in card order
    /// and then declaration order. Cards already in the collection keep
    /// their metadata and receive the imported upgrades on top of their
    /// own. An identifier repeated within the snapshot keeps its first
    /// entry; the repeat and its upgrades are ignored.
    ///
    /// Returns how many upgrades were rejected, either because they name an
    /// unknown card or because they would close a cycle.
    pub fn merge(&mut self, snapshot: Snapshot) -> usize {
        let mut seen: HashSet<String> = HashSet::with_capacity(snapshot.cards.len());
        let mut pending = Vec::with_capacity(snapshot.cards.len());

        for stored in snapshot.cards {
            if !seen.insert(stored.card.id.clone()) {
                warn!("Skipping duplicate card {}", stored.card.id);
                continue;
            }
            let index = self.add_card(stored.card);
            pending.push((index, stored.upgrades));
        }

        let mut rejected = 0;
        for (worse, upgrades) in pending {
            for id in upgrades {
                let Some(better) = self.index_of(&id) else {
                    warn!("Skipping upgrade to unknown card {}", id);
                    rejected += 1;
                    continue;
                };
                // add_upgrade already logs rejected cycles
                if self.add_upgrade(worse, better).is_err() {
                    rejected += 1;
                }
            }
        }

        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn names(graph: &CardGraph, nodes: Vec<NodeId>) -> Vec<String> {
        nodes.into_iter().map(|n| graph.id_of(n)).collect()
    }

    /// Every query answer keyed by identifiers, so graphs with different
    /// handles can be compared.
    fn query_table(graph: &CardGraph) -> Vec<(String, Vec<String>, Vec<String>, bool, bool)> {
        let mut table: Vec<_> = graph
            .node_ids()
            .map(|n| {
                let mut ups = names(graph, graph.upgrades_of(n));
                let mut directs = names(graph, graph.direct_upgrades(n));
                ups.sort();
                directs.sort();
                (
                    graph.id_of(n),
                    ups,
                    directs,
                    graph.is_orphaned(n),
                    graph.is_outclassed(n),
                )
            })
            .collect();
        table.sort();
        table
    }

    fn sample_graph() -> CardGraph {
        let mut graph = CardGraph::new();
        let breath = graph.add_card(Card::new("Breath of Fire"));
        let shock = graph.add_card(Card::new("Shock"));
        let bolt = graph.add_card(Card::new("Lightning Bolt").with_image("bolt.jpg"));
        let garbage = graph.add_card(Card::new("Absolute Garbage"));
        graph.add_card(Card::new("Ancestral Recall"));

        graph.add_upgrade(garbage, bolt).unwrap();
        graph.add_upgrade(breath, bolt).unwrap();
        graph.add_upgrade(breath, shock).unwrap();
        graph.add_upgrade(shock, bolt).unwrap();
        graph.add_upgrade(garbage, breath).unwrap();
        graph
    }

    #[test]
    fn test_capture_keeps_declaration_order() {
        let graph = sample_graph();
        let snapshot = Snapshot::capture(&graph);

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.cards.len(), 5);
        assert_eq!(snapshot.cards[0].card.id, "Breath of Fire");
        assert_eq!(
            snapshot.cards[0].upgrades,
            vec!["Lightning Bolt".to_string(), "Shock".to_string()]
        );
        assert_eq!(snapshot.cards[3].upgrades.len(), 2);
        assert!(snapshot.cards[4].upgrades.is_empty());
    }

    #[test]
    fn test_restore_preserves_queries() {
        let graph = sample_graph();
        let restored = Snapshot::capture(&graph).restore();

        assert_eq!(query_table(&restored), query_table(&graph));
        assert_eq!(restored.visible_edges(), graph.visible_edges());
        assert_eq!(restored.declared_edges(), graph.declared_edges());
    }

    #[test]
    fn test_restore_is_independent_of_card_order() {
        let graph = sample_graph();
        let mut snapshot = Snapshot::capture(&graph);
        snapshot.cards.reverse();
        for stored in &mut snapshot.cards {
            stored.upgrades.reverse();
        }

        let restored = snapshot.restore();
        assert_eq!(query_table(&restored), query_table(&graph));
        assert_eq!(restored.visible_edges(), graph.visible_edges());
    }

    #[test]
    fn test_json_roundtrip() {
        let graph = sample_graph();
        let json = Snapshot::capture(&graph).to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap().restore();

        assert_eq!(query_table(&restored), query_table(&graph));
        assert_eq!(
            restored.find_by_id("Lightning Bolt").unwrap().image_uri.as_deref(),
            Some("bolt.jpg")
        );
    }

    #[test]
    fn test_restore_skips_unknown_and_cyclic_upgrades() {
        let json = r#"{
            "version": 1,
            "cards": [
                { "card": { "id": "a", "name": "a" }, "upgrades": ["b", "ghost"] },
                { "card": { "id": "b", "name": "b" }, "upgrades": ["a"] },
                { "card": { "id": "c", "name": "c" } }
            ]
        }"#;

        let graph = Snapshot::from_json(json).unwrap().restore();
        let a = graph.index_of("a").unwrap();
        let b = graph.index_of("b").unwrap();
        let c = graph.index_of("c").unwrap();

        assert_eq!(graph.len(), 3);
        assert!(graph.is_worse_than(a, b));
        assert!(!graph.is_worse_than(b, a));
        assert!(graph.declared_upgrades(b).is_empty());
        assert!(graph.is_orphaned(c));
    }

    #[test]
    fn test_duplicate_cards_keep_first() {
        let json = r#"{
            "version": 1,
            "cards": [
                { "card": { "id": "a", "name": "first" }, "upgrades": [] },
                { "card": { "id": "a", "name": "second" }, "upgrades": ["b"] },
                { "card": { "id": "b", "name": "b" }, "upgrades": [] }
            ]
        }"#;

        let graph = Snapshot::from_json(json).unwrap().restore();
        let a = graph.index_of("a").unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.find_by_id("a").unwrap().name, "first");
        assert!(graph.is_orphaned(a));
    }

    #[test]
    fn test_merge_into_existing_collection() {
        let mut graph = CardGraph::new();
        let shock = graph.add_card(Card::new("Shock").with_name("Local Shock"));
        let bolt = graph.add_card(Card::new("Lightning Bolt"));
        graph.add_upgrade(shock, bolt).unwrap();

        let json = r#"{
            "version": 1,
            "cards": [
                { "card": { "id": "Breath of Fire", "name": "Breath of Fire" },
                  "upgrades": ["Lightning Bolt", "Shock", "ghost"] },
                { "card": { "id": "Shock", "name": "Imported Shock" } },
                { "card": { "id": "Lightning Bolt", "name": "Lightning Bolt" },
                  "upgrades": ["Breath of Fire"] }
            ]
        }"#;

        let rejected = graph.merge(Snapshot::from_json(json).unwrap());
        let breath = graph.index_of("Breath of Fire").unwrap();

        // "ghost" is unknown and Bolt -> Breath closes a cycle
        assert_eq!(rejected, 2);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.find_by_id("Shock").unwrap().name, "Local Shock");
        assert!(graph.is_directly_worse_than(breath, shock));
        assert!(!graph.is_directly_worse_than(breath, bolt));
        assert!(graph.is_worse_than(breath, bolt));
        assert_eq!(graph.declared_upgrades(breath), &[bolt, shock]);
    }
}
