use std::path::Path;

use crate::action_result::ActionResult;
use crate::config::entry::ConfigEntry;
use crate::env::ExecutionContext;
use crate::messages::SyncConfigMessage;
use crate::storage_type::StorageType;

/// A deferred operation a config offers the UI. Returned as data so the
/// caller decides when (and whether) to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigTask {
    RestoreDefaults,
    RequestFromServer,
}

/// What the caller must do after a successful update. The update itself
/// never transmits anything; server-bound bytes come back here so the host's
/// networking layer owns delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Nothing further; either nothing changed or the denial says why.
    None,
    /// Changes were committed locally; notify the owning mod to reload.
    Reload,
    /// Changes belong to the authoritative server; send this message.
    SyncToServer(SyncConfigMessage),
    /// The config had no authoritative destination and was unloaded.
    Unloaded,
}

/// Result of an update: the user-facing verdict plus the follow-up action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub result: ActionResult,
    pub action: UpdateAction,
}

impl UpdateOutcome {
    pub fn success(action: UpdateAction) -> Self {
        Self {
            result: ActionResult::success(),
            action,
        }
    }

    pub fn denied(result: ActionResult) -> Self {
        Self {
            result,
            action: UpdateAction::None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.result.is_allowed()
    }
}

/// The contract every config backend exposes to the editor core. One
/// implementation per config format; the core drives editing, permission
/// checks and synchronization exclusively through this surface.
pub trait ModConfig {
    /// The storage type, which determines where the config lives and
    /// whether edits travel to the server.
    fn storage_type(&self) -> StorageType;

    fn file_name(&self) -> &str;

    fn mod_id(&self) -> &str;

    fn is_read_only(&self) -> bool {
        false
    }

    /// The name to display on the file list, if the config provides one.
    fn translation_key(&self) -> Option<&str> {
        None
    }

    /// The root of the editable entry tree. Built fresh each time an editor
    /// opens; edits accumulate in the tree until `update` commits them.
    fn create_root_entry(&self) -> ConfigEntry;

    /// Commits the changed subset of `entry` back into the backing store.
    /// Idempotent when nothing changed.
    fn update(&mut self, entry: &ConfigEntry, context: &ExecutionContext) -> UpdateOutcome;

    /// Whether any value currently differs from its default. Unloaded
    /// configs report false.
    fn is_changed(&self) -> bool {
        false
    }

    fn can_player_edit(&self, context: &ExecutionContext) -> ActionResult {
        let _ = context;
        ActionResult::fail()
    }

    /// Present when the config can be reset wholesale. Absent for read-only
    /// configs and for world configs with no loaded store.
    fn restore_defaults_task(&self) -> Option<ConfigTask> {
        None
    }

    /// Runs the task announced by `restore_defaults_task`.
    fn restore_defaults(&mut self) {}

    /// Present when the config's authoritative document lives on the server
    /// and must be fetched before editing.
    fn request_from_server_task(&self) -> Option<ConfigTask> {
        None
    }

    /// Loads a world-scoped config from the given save directory.
    fn load_world_config(&mut self, path: &Path) -> ActionResult {
        let _ = path;
        ActionResult::fail()
    }

    /// Fired once when an editor opens on this config. May lazily load
    /// backing data.
    fn start_editing(&mut self, context: &ExecutionContext) {
        let _ = context;
    }

    /// Fired once when the editor closes. `changed` reports whether any
    /// update was saved during the session.
    fn stop_editing(&mut self, changed: bool, context: &ExecutionContext) {
        let _ = (changed, context);
    }

    /// An allow-with-message result here makes the UI show a confirmation
    /// before saving, warning the player about a side effect of proceeding.
    fn show_save_confirmation(&self, context: &ExecutionContext) -> ActionResult {
        let _ = context;
        ActionResult::fail()
    }
}
