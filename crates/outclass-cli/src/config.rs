//! Workspace configuration.
//!
//! All state lives in a `.outclass/` directory: a `config.json` written by
//! `outclass init` and the card store next to it.

use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the state directory inside a workspace.
pub const STATE_DIR: &str = ".outclass";

const CONFIG_FILE: &str = "config.json";

fn default_store() -> String {
    "store".to_string()
}

/// Contents of `.outclass/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,

    /// Store directory, relative to the state directory.
    #[serde(default = "default_store")]
    pub store: String,

    /// Scryfall bulk-data file used by `outclass lookup`.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            store: default_store(),
            catalog: None,
        }
    }
}

/// An initialized workspace.
#[derive(Debug)]
pub struct Workspace {
    state_dir: PathBuf,
    config: Config,
}

impl Workspace {
    /// Creates the state directory and a default config.
    ///
    /// Returns `None` if the workspace was already initialized.
    pub fn init(path: &Path) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let state_dir = path.join(STATE_DIR);
        if state_dir.exists() {
            return Ok(None);
        }

        fs::create_dir_all(&state_dir)?;
        let config = Config::default();
        fs::write(
            state_dir.join(CONFIG_FILE),
            serde_json::to_string_pretty(&config)?,
        )?;

        Ok(Some(Self { state_dir, config }))
    }

    /// Opens an existing workspace.
    ///
    /// A missing config file falls back to defaults.
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let state_dir = path.join(STATE_DIR);
        if !state_dir.is_dir() {
            return Err(CommandError::NotInitialized(path.to_path_buf()).into());
        }

        let config_path = state_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            serde_json::from_str(&fs::read_to_string(&config_path)?)?
        } else {
            Config::default()
        };

        Ok(Self { state_dir, config })
    }

    /// Path of the sled store.
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join(&self.config.store)
    }

    /// Resolves the catalog location.
    ///
    /// Relative paths in the config are taken relative to the workspace
    /// root. Without a configured catalog, a `scryfall.json` in the user
    /// data directory is used if present.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        if let Some(catalog) = &self.config.catalog {
            if catalog.is_absolute() {
                return Some(catalog.clone());
            }
            let root = self.state_dir.parent().unwrap_or(Path::new("."));
            return Some(root.join(catalog));
        }

        dirs::data_dir()
            .map(|dir| dir.join("outclass").join("scryfall.json"))
            .filter(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_then_open() {
        let dir = tempdir().unwrap();

        let created = Workspace::init(dir.path()).unwrap().unwrap();
        assert_eq!(created.config, Config::default());
        assert!(Workspace::init(dir.path()).unwrap().is_none());

        let opened = Workspace::open(dir.path()).unwrap();
        assert_eq!(opened.store_path(), dir.path().join(STATE_DIR).join("store"));
    }

    #[test]
    fn test_open_uninitialized() {
        let dir = tempdir().unwrap();
        let err = Workspace::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    fn test_relative_catalog_resolves_against_root() {
        let dir = tempdir().unwrap();
        Workspace::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(STATE_DIR).join(CONFIG_FILE),
            r#"{ "version": "1.0", "catalog": "data/scryfall.json" }"#,
        )
        .unwrap();

        let workspace = Workspace::open(dir.path()).unwrap();
        assert_eq!(workspace.config.store, "store");
        assert_eq!(
            workspace.catalog_path(),
            Some(dir.path().join("data/scryfall.json"))
        );
    }
}
