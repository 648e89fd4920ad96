use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use toml::{Table, Value};

use crate::action_result::ActionResult;
use crate::backend::{ConfigTask, ModConfig, UpdateAction, UpdateOutcome};
use crate::config::descriptor::ConfigDescriptor;
use crate::config::entry::{ConfigEntry, ConfigValue};
use crate::config::spec::{ConfigSpec, CorrectionAction};
use crate::config::store::{ConfigStore, StoreError};
use crate::config::value::Property;
use crate::env::ExecutionContext;
use crate::lang;
use crate::messages::SyncConfigMessage;
use crate::permission;
use crate::storage_type::StorageType;
use crate::text::Text;

/// A config backend that owns its TOML document outright: the descriptor,
/// the schema, the live store (absent while unloaded) and the memoized
/// property values derived from it.
#[derive(Debug)]
pub struct StoredConfig {
    descriptor: ConfigDescriptor,
    spec: ConfigSpec,
    properties: Vec<Property>,
    store: Option<ConfigStore>,
    /// Where the local template lives when this config is opened outside a
    /// live game. World configs resolve their path per-save instead.
    local_path: Option<PathBuf>,
}

impl StoredConfig {
    pub fn new(descriptor: ConfigDescriptor, spec: ConfigSpec) -> Self {
        let properties = spec
            .iter()
            .map(|(path, value_spec)| Property::new(path.to_vec(), value_spec.clone()))
            .collect();
        Self {
            descriptor,
            spec,
            properties,
            store: None,
            local_path: None,
        }
    }

    pub fn with_local_path(mut self, path: PathBuf) -> Self {
        self.local_path = Some(path);
        self
    }

    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn descriptor(&self) -> &ConfigDescriptor {
        &self.descriptor
    }

    pub fn spec(&self) -> &ConfigSpec {
        &self.spec
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&ConfigStore> {
        self.store.as_ref()
    }

    pub fn property(&self, path: &[String]) -> Option<&Property> {
        self.properties.iter().find(|property| property.path() == path)
    }

    /// Drops the live store. Safe to call redundantly.
    pub fn unload(&mut self) {
        self.store = None;
        self.invalidate_property_caches();
    }

    /// Reads a property through the memo, filling it from the store on a
    /// miss. Returns the default when the document lacks the key.
    pub fn cached_value(&mut self, path: &[String]) -> Option<Value> {
        let store = self.store.as_ref()?;
        let property = self
            .properties
            .iter_mut()
            .find(|property| property.path() == path)?;
        if let Some(value) = property.cached() {
            return Some(value.clone());
        }
        let value = store
            .get(path)
            .cloned()
            .unwrap_or_else(|| property.spec().default_value().clone());
        Some(property.fill_cache(value).clone())
    }

    pub fn invalidate_property_caches(&mut self) {
        for property in &mut self.properties {
            property.invalidate_cache();
        }
    }

    /// The live document in its native text encoding, for transmission.
    pub fn serialize_document(&self) -> Option<Vec<u8>> {
        let store = self.store.as_ref()?;
        match store.to_bytes() {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                warn!(
                    "Failed to serialize '{}': {}",
                    self.descriptor.file_name(),
                    error
                );
                None
            }
        }
    }

    /// Replaces the live document with one received from the server in
    /// answer to a request. Corrections here are local policy: logged,
    /// never rejected.
    pub fn load_from_data(&mut self, data: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(data) else {
            warn!(
                "Received non-UTF-8 config data for '{}'",
                self.descriptor.file_name()
            );
            return false;
        };
        let mut table = match text.parse::<Table>() {
            Ok(table) => table,
            Err(error) => {
                warn!(
                    "Received unparseable config data for '{}': {}",
                    self.descriptor.file_name(),
                    error
                );
                return false;
            }
        };
        self.spec.correct(&mut table, log_replacements);
        let path = self
            .store
            .as_ref()
            .and_then(|store| store.path())
            .map(Path::to_path_buf);
        self.store = Some(match path {
            Some(path) => ConfigStore::with_path(table, path),
            None => ConfigStore::in_memory(table),
        });
        self.invalidate_property_caches();
        true
    }

    /// Commits a document that already passed the sync receiver's schema
    /// checks. Runs under the registry's store lock on the server.
    pub fn commit_synced(&mut self, data: &Table) -> ActionResult {
        let Some(store) = self.store.as_mut() else {
            return ActionResult::fail_with(Text::translatable(lang::UPDATE_ERROR_NOT_LOADED));
        };
        store.put_all(data);
        self.invalidate_property_caches();
        if let Err(error) = self.persist() {
            warn!(
                "Failed to persist '{}': {}",
                self.descriptor.file_name(),
                error
            );
        }
        ActionResult::success()
    }

    fn persist(&self) -> Result<(), StoreError> {
        if self.descriptor.storage_type() == StorageType::Memory {
            return Ok(());
        }
        match &self.store {
            Some(store) if store.path().is_some() => store.save(),
            _ => Ok(()),
        }
    }

    /// The sync gate: a serialized copy of the document, but only when this
    /// client is actually entitled and able to push it to a server.
    fn sync_to_server_message(&self, context: &ExecutionContext) -> Option<SyncConfigMessage> {
        if !context.is_client() {
            return None;
        }
        let store = self.store.as_ref()?;
        if !context.is_playing_game() {
            return None;
        }
        if !context.is_companion_installed_remotely() {
            return None;
        }
        if !self.descriptor.storage_type().can_sync_to_server() {
            return None;
        }
        if self.descriptor.is_read_only() {
            return None;
        }
        if !context.is_player_an_operator() || !context.is_developer_player() {
            return None;
        }
        let data = match store.to_bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(
                    "Failed to serialize '{}' for sync: {}",
                    self.descriptor.file_name(),
                    error
                );
                return None;
            }
        };
        Some(SyncConfigMessage {
            file_name: self.descriptor.file_name().to_string(),
            data,
        })
    }
}

impl ModConfig for StoredConfig {
    fn storage_type(&self) -> StorageType {
        self.descriptor.storage_type()
    }

    fn file_name(&self) -> &str {
        self.descriptor.file_name()
    }

    fn mod_id(&self) -> &str {
        self.descriptor.mod_id()
    }

    fn is_read_only(&self) -> bool {
        self.descriptor.is_read_only()
    }

    fn translation_key(&self) -> Option<&str> {
        self.descriptor.get_translation_key()
    }

    fn create_root_entry(&self) -> ConfigEntry {
        let mut children: Vec<ConfigEntry> = Vec::new();
        for (path, value_spec) in self.spec.iter() {
            let initial = self
                .store
                .as_ref()
                .and_then(|store| store.get(path))
                .cloned()
                .unwrap_or_else(|| value_spec.default_value().clone());
            let value = ConfigValue::new(path.to_vec(), initial, value_spec.clone());
            insert_leaf(&mut children, path, 0, value);
        }
        ConfigEntry::root(children)
    }

    fn update(&mut self, entry: &ConfigEntry, context: &ExecutionContext) -> UpdateOutcome {
        if self.descriptor.is_read_only() {
            return UpdateOutcome::denied(ActionResult::fail_with(Text::translatable(
                lang::UPDATE_ERROR_READ_ONLY,
            )));
        }
        if self.store.is_none() {
            return UpdateOutcome::denied(ActionResult::fail_with(Text::translatable(
                lang::UPDATE_ERROR_NOT_LOADED,
            )));
        }

        // Find changed values and return if nothing changed.
        let changed = entry.changed_values();
        if changed.is_empty() {
            return UpdateOutcome::success(UpdateAction::None);
        }
        debug!(
            "Applying {} changed value(s) to '{}'",
            changed.len(),
            self.descriptor.file_name()
        );

        if let Some(store) = self.store.as_mut() {
            // Merge a minimal patch of just the changed paths; unrelated
            // keys in the document stay as they are.
            let mut patch = ConfigStore::in_memory(Table::new());
            for value in &changed {
                patch.set(value.path(), value.get().clone());
            }
            store.put_all(patch.data());
            self.spec.correct(store.data_mut(), log_replacements);
        }
        self.invalidate_property_caches();

        let storage = self.descriptor.storage_type();
        if storage.is_server_scoped() {
            if !context.is_playing_game() {
                // A server config touched from the main menu has no
                // authoritative destination yet.
                self.unload();
                return UpdateOutcome::success(UpdateAction::Unloaded);
            }
            if let Some(message) = self.sync_to_server_message(context) {
                if !context.is_integrated_server() && !storage.is_always_synced() {
                    self.unload();
                }
                return UpdateOutcome::success(UpdateAction::SyncToServer(message));
            }
            if !context.is_integrated_server() && !storage.is_always_synced() {
                self.unload();
                return UpdateOutcome::success(UpdateAction::Unloaded);
            }
        }

        if let Err(error) = self.persist() {
            warn!(
                "Failed to persist '{}': {}",
                self.descriptor.file_name(),
                error
            );
            return UpdateOutcome::denied(ActionResult::fail_with(Text::translatable(
                lang::UPDATE_ERROR_SAVE_FAILED,
            )));
        }
        info!(
            "Sending config reload event for {}",
            self.descriptor.file_name()
        );
        UpdateOutcome::success(UpdateAction::Reload)
    }

    fn is_changed(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        self.spec.iter().any(|(path, value_spec)| {
            store
                .get(path)
                .is_some_and(|value| value != value_spec.default_value())
        })
    }

    fn can_player_edit(&self, context: &ExecutionContext) -> ActionResult {
        permission::can_player_edit(self.descriptor.storage_type(), context)
    }

    fn restore_defaults_task(&self) -> Option<ConfigTask> {
        if self.descriptor.is_read_only() {
            return None;
        }
        if self.descriptor.storage_type().is_world() && !self.is_loaded() {
            return None;
        }
        Some(ConfigTask::RestoreDefaults)
    }

    fn restore_defaults(&mut self) {
        if let Some(store) = self.store.as_mut() {
            for (path, value_spec) in self.spec.iter() {
                store.set(path, value_spec.default_value().clone());
            }
        } else {
            return;
        }
        self.invalidate_property_caches();
        if let Err(error) = self.persist() {
            warn!(
                "Failed to persist '{}': {}",
                self.descriptor.file_name(),
                error
            );
        }
    }

    fn request_from_server_task(&self) -> Option<ConfigTask> {
        // Only on-demand server configs are fetched; the always-synced types
        // arrive with the join and world configs load from the save itself.
        (self.descriptor.storage_type() == StorageType::Server)
            .then_some(ConfigTask::RequestFromServer)
    }

    fn load_world_config(&mut self, path: &Path) -> ActionResult {
        if !self.descriptor.storage_type().is_world() {
            return ActionResult::fail();
        }
        if self.is_loaded() {
            return ActionResult::success();
        }
        let file = path.join(self.descriptor.file_name());
        if !file.exists() {
            // The save has no document yet; start it from defaults.
            self.store = Some(ConfigStore::with_path(self.spec.default_table(), file));
            self.invalidate_property_caches();
            return ActionResult::success();
        }
        match ConfigStore::load(&file) {
            Ok(store) => {
                self.store = Some(store);
                self.invalidate_property_caches();
                ActionResult::success()
            }
            Err(error) => {
                warn!(
                    "Failed to load world config '{}': {}",
                    self.descriptor.file_name(),
                    error
                );
                ActionResult::fail_with(Text::translatable(lang::LOAD_WORLD_CONFIG_FAILED))
            }
        }
    }

    fn start_editing(&mut self, context: &ExecutionContext) {
        if context.is_playing_game()
            || !self.descriptor.storage_type().is_server_scoped()
            || self.store.is_some()
        {
            return;
        }
        // Editing a server config from the main menu works on the local
        // template until a live connection gives it an authoritative home.
        match self.local_path.clone() {
            Some(path) => match ConfigStore::load(&path) {
                Ok(store) => self.store = Some(store),
                Err(error) => {
                    debug!(
                        "No local template for '{}' ({}), starting from defaults",
                        self.descriptor.file_name(),
                        error
                    );
                    self.store = Some(ConfigStore::with_path(self.spec.default_table(), path));
                }
            },
            None => {
                self.store = Some(ConfigStore::in_memory(self.spec.default_table()));
            }
        }
    }

    fn stop_editing(&mut self, _changed: bool, context: &ExecutionContext) {
        if self.store.is_none() {
            return;
        }
        let storage = self.descriptor.storage_type();
        if !storage.is_server_scoped() {
            return;
        }
        if context.is_playing_game()
            && (context.is_integrated_server() || storage.is_always_synced())
        {
            return;
        }
        self.unload();
    }

    fn show_save_confirmation(&self, context: &ExecutionContext) -> ActionResult {
        if context.is_client()
            && context.is_playing_on_remote_server()
            && self.descriptor.storage_type().can_sync_to_server()
        {
            return ActionResult::success_with(Text::translatable(lang::PLAYERS_KICKED));
        }
        ActionResult::fail()
    }
}

fn log_replacements(
    action: CorrectionAction,
    path: &[String],
    incorrect: Option<&Value>,
    corrected: Option<&Value>,
) {
    if action == CorrectionAction::Replace {
        warn!(
            "The value at \"{}\" was {:?} but was corrected to {:?}",
            path.join("."),
            incorrect,
            corrected
        );
    }
}

fn insert_leaf(children: &mut Vec<ConfigEntry>, path: &[String], depth: usize, value: ConfigValue) {
    if depth == path.len() - 1 {
        children.push(ConfigEntry::Leaf(value));
        return;
    }
    let name = &path[depth];
    let position = children.iter().position(
        |entry| matches!(entry, ConfigEntry::Branch { name: n, .. } if n == name),
    );
    let index = match position {
        Some(index) => index,
        None => {
            children.push(ConfigEntry::Branch {
                name: name.clone(),
                children: Vec::new(),
            });
            children.len() - 1
        }
    };
    if let ConfigEntry::Branch {
        children: nested, ..
    } = &mut children[index]
    {
        insert_leaf(nested, path, depth + 1, value);
    }
}
