//! # Confsync Server
//! Server-side authorization, config registry and synchronization handlers
//! for synchronized mod configs.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod play_handler;
mod players;
mod registry;
mod settings;

pub use play_handler::ConfigServer;
pub use players::PlayerList;
pub use registry::ConfigRegistry;
pub use settings::ServerSettings;
