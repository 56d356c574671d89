//! Edge types for export and display.
//!
//! Inside the graph an upgrade edge carries no data: its endpoints say
//! everything. These types name the endpoints by card identifier so they
//! can leave the graph.

use serde::{Deserialize, Serialize};

/// A visible upgrade: `worse` is directly outclassed by `better`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeEdge {
    pub worse: String,
    pub better: String,
}

/// Whether a declared upgrade currently shows up in the reduced view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// The upgrade is a direct edge of the reduced view.
    Visible,

    /// A longer chain of upgrades implies this one.
    Hidden,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        write!(f, "{}", s)
    }
}

/// An upgrade a caller asserted, with its current visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredEdge {
    pub worse: String,
    pub better: String,
    pub visibility: Visibility,
}
