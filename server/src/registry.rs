use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use confsync_shared::{ModConfig, StoredConfig};

/// Every server-scoped config registered on this server, keyed by file name
/// (the identifier clients send). Each config sits behind its own mutex so
/// a sync commit's read-modify-write cannot interleave with a second sync
/// arriving for the same file.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: HashMap<String, Arc<Mutex<StoredConfig>>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, config: StoredConfig) {
        if !config.storage_type().is_loaded_on_dedicated_server() {
            // Client-local and world configs have no home on a dedicated
            // server.
            warn!(
                "Refusing to register config '{}': not loaded on a dedicated server",
                config.file_name()
            );
            return;
        }
        debug!(
            "Registering server config '{}' for mod '{}'",
            config.file_name(),
            config.mod_id()
        );
        self.configs.insert(
            config.file_name().to_string(),
            Arc::new(Mutex::new(config)),
        );
    }

    pub fn get(&self, file_name: &str) -> Option<Arc<Mutex<StoredConfig>>> {
        self.configs.get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
