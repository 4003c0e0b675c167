//! Storage for per-path folder expand flags.
//!
//! Keys are the `/`-joined display path of a folder, so a flag survives a
//! rebuild of the tree as long as the folder keeps its path.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Keyed storage of folder expand flags
pub trait ExpandStore {
    /// Stored flag for `key`, if any
    fn load(&self, key: &str) -> Option<bool>;

    /// Record the flag for `key`
    fn store(&mut self, key: &str, expanded: bool);

    /// Persist recorded flags, for stores that buffer writes
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Expand flags kept for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryExpandStore {
    flags: HashMap<String, bool>,
}

impl MemoryExpandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl ExpandStore for MemoryExpandStore {
    fn load(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn store(&mut self, key: &str, expanded: bool) {
        self.flags.insert(key.to_string(), expanded);
    }
}

/// Expand store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Expand flags backed by a JSON object on disk
///
/// Changes stay in memory until [`JsonExpandStore::save`] is called.
#[derive(Debug, Clone)]
pub struct JsonExpandStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
    dirty: bool,
}

impl JsonExpandStore {
    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let flags = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), entries = flags.len(), "opened expand store");
        Ok(Self {
            path,
            flags,
            dirty: false,
        })
    }

    /// Write pending changes to disk
    pub fn save(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let contents = serde_json::to_string_pretty(&self.flags)?;
        std::fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }

    /// Whether there are changes not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpandStore for JsonExpandStore {
    fn load(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn store(&mut self, key: &str, expanded: bool) {
        if self.flags.insert(key.to_string(), expanded) != Some(expanded) {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.save()
    }
}
