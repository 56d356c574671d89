//! The card entity.
//!
//! A card is identified by an opaque string. Everything else on it is
//! display metadata and plays no part in ordering.

use serde::{Deserialize, Serialize};

/// A single card that can take part in the upgrade order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique, immutable identifier.
    pub id: String,

    /// Human-readable name. Defaults to the identifier.
    pub name: String,

    /// Link to a card image, when known.
    #[serde(default)]
    pub image_uri: Option<String>,
}

impl Card {
    /// Creates a bare card whose name is its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            image_uri: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the image link.
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// Returns true if this card carries the given identifier.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name == self.id {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_stores_id() {
        let card = Card::new("newCard");
        assert!(card.matches_id("newCard"));
        assert!(!card.matches_id("otherCard"));
        assert_eq!(card.name, "newCard");
    }

    #[test]
    fn test_display_shows_id_only_when_named() {
        assert_eq!(Card::new("Shock").to_string(), "Shock");
        assert_eq!(
            Card::new("e7e4").with_name("Shock").to_string(),
            "Shock (e7e4)"
        );
    }

    #[test]
    fn test_image_defaults_when_missing_from_json() {
        let back: Card = serde_json::from_str(r#"{"id":"a","name":"b"}"#).unwrap();
        assert_eq!(back.image_uri, None);
    }
}
