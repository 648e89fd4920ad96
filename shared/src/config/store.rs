use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::{Table, Value};

/// Errors raised by loading or persisting a backing store. Callers log these
/// and surface a generic failure; they never crash the host process.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not read the backing file
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file held an unparseable document
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Could not write the backing file
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document could not be serialized
    #[error("Failed to serialize config document: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Persist was requested on a memory-only store
    #[error("Config store has no backing file")]
    NoBackingFile,
}

/// A live config document plus where it came from. Memory-only stores carry
/// no path and cannot be persisted.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    data: Table,
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn in_memory(data: Table) -> Self {
        Self { data, path: None }
    }

    /// Reads and parses the document at `path`. A missing file is an error;
    /// creating defaults is the caller's decision, not the store's.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data = text.parse::<Table>().map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            data,
            path: Some(path.to_path_buf()),
        })
    }

    /// A store that will persist to `path` but starts from the given
    /// document instead of reading the file.
    pub fn with_path(data: Table, path: PathBuf) -> Self {
        Self {
            data,
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &Table {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Table {
        &mut self.data
    }

    pub fn get(&self, path: &[String]) -> Option<&Value> {
        let (name, prefix) = path.split_last()?;
        let mut table = &self.data;
        for segment in prefix {
            table = table.get(segment)?.as_table()?;
        }
        table.get(name)
    }

    pub fn set(&mut self, path: &[String], value: Value) {
        let Some((name, prefix)) = path.split_last() else {
            return;
        };
        let mut table = &mut self.data;
        for segment in prefix {
            let entry = table
                .entry(segment.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }
            let Some(next) = entry.as_table_mut() else {
                return;
            };
            table = next;
        }
        table.insert(name.clone(), value);
    }

    /// Deep-merges `patch` into the document. Only the keys present in the
    /// patch are touched; unrelated keys survive, so a minimal patch never
    /// clobbers concurrent external edits to the rest of the file.
    pub fn put_all(&mut self, patch: &Table) {
        merge_tables(&mut self.data, patch);
    }

    /// The document in its native text encoding, as sent over the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let text = toml::to_string(&self.data)?;
        Ok(text.into_bytes())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Err(StoreError::NoBackingFile);
        };
        let text = toml::to_string(&self.data)?;
        fs::write(path, text).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })
    }
}

fn merge_tables(target: &mut Table, patch: &Table) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_all_preserves_unrelated_keys() {
        let mut store = ConfigStore::in_memory("a = 1\nb = 2\n".parse().unwrap());
        let patch: Table = "a = 5\n".parse().unwrap();
        store.put_all(&patch);
        assert_eq!(store.data()["a"], Value::Integer(5));
        assert_eq!(store.data()["b"], Value::Integer(2));
    }

    #[test]
    fn test_put_all_merges_nested_tables() {
        let mut store =
            ConfigStore::in_memory("[general]\nlevel = 1\nname = \"x\"\n".parse().unwrap());
        let patch: Table = "[general]\nlevel = 7\n".parse().unwrap();
        store.put_all(&patch);
        assert_eq!(store.data()["general"]["level"], Value::Integer(7));
        assert_eq!(store.data()["general"]["name"], Value::String("x".into()));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_mod.server.toml");
        let store = ConfigStore::with_path("a = 1\n".parse().unwrap(), path.clone());
        store.save().unwrap();

        let reloaded = ConfigStore::load(&path).unwrap();
        assert_eq!(reloaded.data()["a"], Value::Integer(1));
    }

    #[test]
    fn test_memory_store_refuses_to_save() {
        let store = ConfigStore::in_memory(Table::new());
        assert!(matches!(store.save(), Err(StoreError::NoBackingFile)));
    }

    #[test]
    fn test_get_and_set_by_path() {
        let mut store = ConfigStore::in_memory(Table::new());
        let path = vec!["general".to_string(), "level".to_string()];
        store.set(&path, Value::Integer(4));
        assert_eq!(store.get(&path), Some(&Value::Integer(4)));
    }
}
