//! # Confsync Shared
//! Common functionality shared between confsync-server & confsync-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod action_result;
mod backend;
mod config;
mod env;
mod messages;
mod permission;
mod player;
mod storage_type;
mod text;
mod wire;

pub mod lang;

pub use action_result::ActionResult;
pub use backend::{ConfigTask, ModConfig, UpdateAction, UpdateOutcome};
pub use config::{
    descriptor::ConfigDescriptor,
    entry::{ConfigEntry, ConfigValue},
    spec::{ConfigSpec, CorrectionAction},
    store::{ConfigStore, StoreError},
    stored::StoredConfig,
    value::{Property, Validator, ValueSpec},
};
pub use env::{ClientEnvironment, Environment, ExecutionContext, GameSession, SessionState};
pub use messages::{
    Payload, RequestConfigMessage, ResponseConfigMessage, SessionDataMessage, SyncConfigMessage,
};
pub use permission::can_player_edit;
pub use player::{PlayerInfo, PlayerKey, PlayerProfile};
pub use storage_type::{EditCategory, StorageType};
pub use text::Text;
pub use wire::{ByteReader, ByteWriter, Wire, WireError};
