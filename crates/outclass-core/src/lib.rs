//! Outclass Core - Card entities and lookup
//!
//! This crate defines the [`Card`] entity that every other Outclass crate
//! orders, along with the [`CardLookup`] seam used to turn a card name into
//! an identifier and metadata.
//!
//! # Example
//!
//! ```
//! use outclass_core::{Card, CardLookup, ScryfallCatalog};
//!
//! let catalog = ScryfallCatalog::from_json(
//!     r#"[{"name": "Shock", "id": "e7e4d4a5"}]"#,
//! ).unwrap();
//!
//! let shock: Card = catalog.find_by_name("Shock").unwrap();
//! assert!(shock.matches_id("e7e4d4a5"));
//! ```

mod card;
mod error;
mod lookup;

pub use card::Card;
pub use error::{LookupError, Result};
pub use lookup::{CardLookup, ScryfallCatalog};
