//! # Confsync Client
//! Client-side session state, editing tracker and request flow for
//! synchronized mod configs.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod editing;
mod handler;
mod request;
mod session;

pub use editing::{EditingError, EditingEvent, EditingTracker, Screen};
pub use handler::{ClientEvent, ConfigEditorClient};
pub use request::{PendingRequest, RequestStatus, REQUEST_TIMEOUT_TICKS};
pub use session::ClientSession;
