use log::debug;

use confsync_shared::{SessionDataMessage, SessionState};

/// The client's mirror of the flags the server pushed on join. Used only to
/// gate UI navigation; the server re-derives the authoritative answer for
/// every mutation it receives.
#[derive(Debug, Default)]
pub struct ClientSession {
    flags: SessionState,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.flags
    }

    /// Overwrites both flags wholesale with the server's message.
    pub fn apply(&mut self, message: &SessionDataMessage) {
        debug!(
            "Received session data: developer={}, lan={}",
            message.developer, message.lan
        );
        self.flags = SessionState {
            developer: message.developer,
            lan: message.lan,
        };
    }

    /// Drops the flags when the connection ends; the next server asserts
    /// its own.
    pub fn reset(&mut self) {
        self.flags = SessionState::default();
    }
}
