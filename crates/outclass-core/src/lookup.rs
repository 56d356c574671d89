//! Name-based card lookup.
//!
//! The graph never needs this: it only works with identifiers. Lookup is
//! how a user-typed name becomes a [`Card`] with a stable identifier and
//! some metadata attached.

use crate::card::Card;
use crate::error::{LookupError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Resolves a card name to a card.
pub trait CardLookup {
    /// Finds the card with the given full name.
    fn find_by_name(&self, name: &str) -> Option<Card>;
}

/// One entry of a Scryfall bulk-data export. Unused fields are ignored.
#[derive(Debug, Clone, Deserialize)]
struct ScryfallCard {
    name: String,
    id: String,
    #[serde(default)]
    image_uris: Option<ScryfallImageUris>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScryfallImageUris {
    #[serde(default)]
    normal: Option<String>,
}

impl From<&ScryfallCard> for Card {
    fn from(entry: &ScryfallCard) -> Self {
        let card = Card::new(entry.id.clone()).with_name(entry.name.clone());
        match entry.image_uris.as_ref().and_then(|uris| uris.normal.clone()) {
            Some(uri) => card.with_image(uri),
            None => card,
        }
    }
}

/// An offline catalog parsed from a Scryfall bulk-data JSON array.
#[derive(Debug, Clone, Default)]
pub struct ScryfallCatalog {
    cards: Vec<ScryfallCard>,
}

impl ScryfallCatalog {
    /// Parses a catalog from the JSON text of a bulk-data file.
    pub fn from_json(json: &str) -> Result<Self> {
        let cards: Vec<ScryfallCard> = serde_json::from_str(json)?;
        debug!("Loaded {} catalog entries", cards.len());
        Ok(Self { cards })
    }

    /// Reads and parses a bulk-data file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LookupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardLookup for ScryfallCatalog {
    /// Exact names win; otherwise the first ASCII-case-insensitive match.
    fn find_by_name(&self, name: &str) -> Option<Card> {
        self.cards
            .iter()
            .find(|entry| entry.name == name)
            .or_else(|| {
                self.cards
                    .iter()
                    .find(|entry| entry.name.eq_ignore_ascii_case(name))
            })
            .map(Card::from)
    }
}
