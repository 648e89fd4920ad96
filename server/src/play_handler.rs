use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};
use toml::Table;

use confsync_shared::{
    can_player_edit, lang, CorrectionAction, ExecutionContext, ModConfig, Payload, PlayerInfo,
    PlayerKey, RequestConfigMessage, ResponseConfigMessage, SessionDataMessage, StorageType,
    StoredConfig, SyncConfigMessage, Text,
};

use crate::players::PlayerList;
use crate::registry::ConfigRegistry;
use crate::settings::ServerSettings;

/// The authoritative side of the protocol: owns the server's settings and
/// the registry of server-scoped configs, and processes each inbound payload
/// as one discrete work item on the game-logic thread. Client-side
/// permission checks are advisory; everything is re-verified here before a
/// byte of config is committed.
#[derive(Debug)]
pub struct ConfigServer {
    settings: ServerSettings,
    registry: ConfigRegistry,
}

impl ConfigServer {
    pub fn new(settings: ServerSettings, registry: ConfigRegistry) -> Self {
        Self { settings, registry }
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.registry
    }

    /// The session flags pushed to a client when it joins. A dedicated
    /// server is never a LAN game.
    pub fn session_data_for(&self, player: &PlayerInfo) -> SessionDataMessage {
        SessionDataMessage {
            developer: self.settings.is_developer(&player.profile.id),
            lan: false,
        }
    }

    pub fn player_joined(&self, key: PlayerKey, players: &mut dyn PlayerList) {
        let Some(info) = players.info(key) else {
            return;
        };
        let message = self.session_data_for(&info);
        debug!(
            "Sending session data to '{}': developer={}",
            info.profile.name, message.developer
        );
        players.send_payload(key, Payload::SessionData(message));
    }

    /// Consumes one client-to-server payload.
    pub fn receive(&mut self, sender: PlayerKey, payload: Payload, players: &mut dyn PlayerList) {
        match payload {
            Payload::SyncConfig(message) => self.handle_sync(sender, message, players),
            Payload::RequestConfig(message) => self.handle_request(sender, message, players),
            other => {
                warn!("Unexpected server-bound payload: {:?}", other);
            }
        }
    }

    /// The authorization gate, run before the file name is even looked at so
    /// an unauthorized sender learns nothing about which configs exist.
    /// Server-scoped types all share one edit category, so any of them
    /// stands in for the set.
    fn can_edit_server_configs(&self, player: &PlayerInfo) -> bool {
        let developer = self.settings.is_developer(&player.profile.id);
        let context = ExecutionContext::dedicated_server(player, developer);
        can_player_edit(StorageType::Server, &context).is_allowed()
    }

    fn reject_unauthorized(
        &self,
        sender: PlayerKey,
        info: &PlayerInfo,
        players: &mut dyn PlayerList,
    ) {
        warn!(
            "Player '{}' sent a config request without permission",
            info.profile.name
        );
        players.broadcast_to_operators(Text::translatable_with(
            lang::CHAT_UNAUTHORIZED_ATTEMPT,
            vec![Text::literal(info.profile.name.clone())],
        ));
        players.disconnect(sender, Text::translatable(lang::DISCONNECT_UNAUTHORIZED));
    }

    pub fn handle_sync(
        &mut self,
        sender: PlayerKey,
        message: SyncConfigMessage,
        players: &mut dyn PlayerList,
    ) {
        let Some(info) = players.info(sender) else {
            return;
        };
        if !self.can_edit_server_configs(&info) {
            self.reject_unauthorized(sender, &info, players);
            return;
        }

        // A stale or forged file name is a protocol violation, not a miss.
        let Some(entry) = self.registry.get(&message.file_name) else {
            warn!(
                "Player '{}' tried to update unknown config '{}'",
                info.profile.name, message.file_name
            );
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        };
        let mut config = lock_store(&entry, &message.file_name);
        if !config.storage_type().can_sync_to_server() {
            warn!(
                "Player '{}' tried to update non-syncable config '{}'",
                info.profile.name, message.file_name
            );
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        }

        let mut data = match parse_document(&message.data) {
            Some(data) => data,
            None => {
                warn!(
                    "Player '{}' sent unparseable data for config '{}'",
                    info.profile.name, message.file_name
                );
                players.broadcast_to_operators(Text::translatable_with(
                    lang::CHAT_MALFORMED_DATA,
                    vec![
                        Text::literal(info.profile.name.clone()),
                        Text::literal(message.file_name.clone()),
                    ],
                ));
                players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
                return;
            }
        };

        // A correction that has to add or remove a key means the sender's
        // schema disagrees with ours; that is never silently applied. A
        // replace-only correction is a benign out-of-range edit.
        let mut schema_drift = false;
        config.spec().correct(&mut data, |action, path, incorrect, corrected| {
            match action {
                CorrectionAction::Add | CorrectionAction::Remove => {
                    warn!(
                        "Config '{}' from '{}' is missing or carries extra key \"{}\"",
                        message.file_name,
                        info.profile.name,
                        path.join(".")
                    );
                    schema_drift = true;
                }
                CorrectionAction::Replace => {
                    warn!(
                        "The value at \"{}\" was {:?} but was corrected to {:?}",
                        path.join("."),
                        incorrect,
                        corrected
                    );
                }
            }
        });
        if schema_drift {
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        }

        if !config.commit_synced(&data).is_allowed() {
            warn!(
                "Config '{}' has no live store to commit into",
                message.file_name
            );
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        }
        drop(config);
        info!(
            "Player '{}' updated config '{}'",
            info.profile.name, message.file_name
        );
        players.broadcast_to_operators(Text::translatable_with(
            lang::CHAT_CONFIG_UPDATED,
            vec![
                Text::literal(info.profile.name.clone()),
                Text::literal(message.file_name.clone()),
            ],
        ));

        // There is no live hot-reload propagation; everyone else rejoins and
        // re-syncs the authoritative state.
        for key in players.players() {
            if key != sender {
                players.disconnect(key, Text::translatable(lang::SERVER_CONFIGS_UPDATED));
            }
        }
    }

    pub fn handle_request(
        &mut self,
        sender: PlayerKey,
        message: RequestConfigMessage,
        players: &mut dyn PlayerList,
    ) {
        let Some(info) = players.info(sender) else {
            return;
        };
        if !self.can_edit_server_configs(&info) {
            self.reject_unauthorized(sender, &info, players);
            return;
        }

        let Some(entry) = self.registry.get(&message.file_name) else {
            warn!(
                "Player '{}' requested unknown config '{}'",
                info.profile.name, message.file_name
            );
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        };
        let config = lock_store(&entry, &message.file_name);
        // Only on-demand configs answer requests; the always-synced types
        // were already pushed on join.
        if config.storage_type() != StorageType::Server {
            warn!(
                "Player '{}' requested non-requestable config '{}'",
                info.profile.name, message.file_name
            );
            players.disconnect(sender, Text::translatable(lang::DISCONNECT_BAD_PACKET));
            return;
        }
        let Some(data) = config.serialize_document() else {
            return;
        };
        drop(config);
        debug!(
            "Sending config '{}' to '{}'",
            message.file_name, info.profile.name
        );
        players.send_payload(
            sender,
            Payload::ResponseConfig(ResponseConfigMessage {
                file_name: message.file_name,
                data,
            }),
        );
    }
}

fn parse_document(data: &[u8]) -> Option<Table> {
    let text = std::str::from_utf8(data).ok()?;
    text.parse::<Table>().ok()
}

/// A poisoned lock means a previous commit panicked mid-write. The document
/// behind it is still a well-formed table and every commit re-corrects it
/// against the schema first, so recover the guard rather than taking the
/// game-logic thread down with it.
fn lock_store<'a>(
    entry: &'a Mutex<StoredConfig>,
    file_name: &str,
) -> MutexGuard<'a, StoredConfig> {
    match entry.lock() {
        Ok(config) => config,
        Err(poisoned) => {
            warn!("Recovering poisoned store lock for config '{}'", file_name);
            poisoned.into_inner()
        }
    }
}
