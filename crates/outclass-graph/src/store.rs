use crate::graph::CardGraph;
use crate::snapshot::{Snapshot, SNAPSHOT_VERSION};
use sled::Db;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error};

/// Key the collection snapshot is stored under.
const CARDS_KEY: &str = "cards";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

fn check_version(snapshot: &Snapshot) -> Result<(), StoreError> {
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(StoreError::UnsupportedVersion(snapshot.version));
    }
    Ok(())
}

pub struct CardStore {
    db: Db,
}

impl CardStore {
    /// Opens or creates a card store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Opens a store only if it already exists.
    ///
    /// A missing path is logged and yields `Ok(None)`; callers keep
    /// whatever collection they already have.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Option<Self>, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            error!("Provided storage file does not exist: {}", path.display());
            return Ok(None);
        }
        Self::open(path).map(Some)
    }

    /// Saves cards and their declared upgrades.
    ///
    /// The snapshot is serialized using bincode and stored under a fixed key.
    pub fn save(&self, graph: &CardGraph) -> Result<(), StoreError> {
        let snapshot = Snapshot::capture(graph);
        let bytes = bincode::serialize(&snapshot)?;
        self.db.insert(CARDS_KEY, bytes)?;
        self.db.flush()?;
        debug!("Saved {} cards", snapshot.cards.len());
        Ok(())
    }

    /// Loads the collection, replaying declared upgrades.
    ///
    /// Returns `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<CardGraph>, StoreError> {
        let Some(bytes) = self.db.get(CARDS_KEY)? else {
            return Ok(None);
        };
        let snapshot: Snapshot = bincode::deserialize(&bytes)?;
        check_version(&snapshot)?;
        Ok(Some(snapshot.restore()))
    }

    /// Clears the stored collection.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.remove(CARDS_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}

/// Reads a JSON snapshot file.
///
/// Same missing-path policy as [`CardStore::open_existing`].
pub fn read_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Option<Snapshot>, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        error!("Provided storage file does not exist: {}", path.display());
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let snapshot = Snapshot::from_json(&json)?;
    check_version(&snapshot)?;
    Ok(Some(snapshot))
}

/// Writes a JSON snapshot file.
pub fn write_snapshot_file<P: AsRef<Path>>(
    path: P,
    snapshot: &Snapshot,
) -> Result<(), StoreError> {
    fs::write(path, snapshot.to_json()?)?;
    Ok(())
}
