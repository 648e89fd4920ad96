//! Translation keys for every user-visible message. The host game owns the
//! actual language files; these are the keys it resolves.

pub const UPDATE_ERROR_READ_ONLY: &str = "confsync.gui.update_error.read_only";
pub const UPDATE_ERROR_NOT_LOADED: &str = "confsync.gui.update_error.not_loaded";
pub const UPDATE_ERROR_SAVE_FAILED: &str = "confsync.gui.update_error.save_failed";
pub const LOAD_WORLD_CONFIG_FAILED: &str = "confsync.gui.load_world_config_failed";

pub const LAN_SERVER: &str = "confsync.gui.lan_server";
pub const NO_DEVELOPER_STATUS: &str = "confsync.gui.no_developer_status";
pub const NO_PERMISSION: &str = "confsync.gui.no_permission";
pub const PLAYERS_KICKED: &str = "confsync.gui.players_kicked";
pub const SERVER_CONFIGS_UPDATED: &str = "confsync.gui.server_configs_updated";

pub const DISCONNECT_UNAUTHORIZED: &str = "confsync.multiplayer.disconnect.unauthorized_request";
pub const DISCONNECT_BAD_PACKET: &str = "confsync.multiplayer.disconnect.bad_config_packet";

pub const CHAT_CONFIG_UPDATED: &str = "confsync.chat.config_updated";
pub const CHAT_MALFORMED_DATA: &str = "confsync.chat.malformed_config_data";
pub const CHAT_UNAUTHORIZED_ATTEMPT: &str = "confsync.chat.unauthorized_attempt";
