//! Client key-value storage (the browser's localStorage equivalent)

use crate::core::error::SessionError;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// String key-value store persisted on the client
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    fn remove_item(&self, key: &str) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

fn poisoned(e: impl std::fmt::Display) -> SessionError {
    SessionError::Io {
        path: "<memory>".to_string(),
        message: format!("lock poisoned: {}", e),
    }
}

/// In-memory local storage, for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryLocalStorage {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for InMemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.clear();
        Ok(())
    }
}

/// Local storage persisted as a JSON object in a file
///
/// The file is read once on open and rewritten after every mutation. The
/// in-memory entries only change once the file has been written.
#[derive(Debug)]
pub struct FileLocalStorage {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileLocalStorage {
    /// Open the storage file, starting empty when it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| SessionError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(SessionError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        tracing::debug!(path = %path.display(), entries = items.len(), "local storage opened");
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |message: String| SessionError::Io {
            path: self.path.display().to_string(),
            message,
        };
        let content = serde_json::to_string_pretty(items).map_err(|e| io_err(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| io_err(e.to_string()))
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        let mut next = items.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *items = next;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        if !items.contains_key(key) {
            return Ok(());
        }
        let mut next = items.clone();
        next.remove(key);
        self.persist(&next)?;
        *items = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(poisoned)?;
        let next = BTreeMap::new();
        self.persist(&next)?;
        *items = next;
        Ok(())
    }
}
