use std::collections::HashMap;

use log::{debug, warn};

use confsync_shared::{ModConfig, Payload, SessionState, StoredConfig};

use crate::request::{PendingRequest, RequestStatus};
use crate::session::ClientSession;

/// Something the UI layer reacts to after a payload was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    SessionUpdated(SessionState),
    ConfigLoaded { file_name: String },
}

/// The client's view of every editable config, plus the session flags and
/// the one request that may be in flight. Driven from the UI thread; payload
/// delivery is the host's job, this only consumes what arrives.
#[derive(Debug, Default)]
pub struct ConfigEditorClient {
    session: ClientSession,
    configs: HashMap<String, StoredConfig>,
    pending: Option<PendingRequest>,
}

impl ConfigEditorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, config: StoredConfig) {
        if !config.storage_type().is_loaded_on_client() {
            // Dedicated-server configs never exist in a client process.
            warn!(
                "Refusing to register config '{}': not loaded on a client",
                config.file_name()
            );
            return;
        }
        debug!(
            "Registering config '{}' for mod '{}'",
            config.file_name(),
            config.mod_id()
        );
        self.configs
            .insert(config.file_name().to_string(), config);
    }

    pub fn config(&self, file_name: &str) -> Option<&StoredConfig> {
        self.configs.get(file_name)
    }

    pub fn config_mut(&mut self, file_name: &str) -> Option<&mut StoredConfig> {
        self.configs.get_mut(file_name)
    }

    pub fn configs(&self) -> impl Iterator<Item = &StoredConfig> {
        self.configs.values()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Starts the request-from-server flow for a config that offers it.
    /// Returns the payload to transmit, or `None` when the config does not
    /// exist, does not fetch from the server, or a request is already
    /// outstanding.
    pub fn begin_request(&mut self, file_name: &str) -> Option<Payload> {
        if self.pending.is_some() {
            return None;
        }
        let config = self.configs.get(file_name)?;
        config.request_from_server_task()?;
        let request = PendingRequest::new(file_name);
        let payload = Payload::RequestConfig(request.message());
        self.pending = Some(request);
        Some(payload)
    }

    /// Advances the request timeout by one game tick. Returns the file name
    /// of a request that just ran out, so the UI can report the failure.
    pub fn tick(&mut self) -> Option<String> {
        let request = self.pending.as_mut()?;
        if request.tick() == RequestStatus::TimedOut {
            let request = self.pending.take();
            return request.map(|request| request.file_name().to_string());
        }
        None
    }

    /// Consumes one server-to-client payload.
    pub fn receive(&mut self, payload: Payload) -> Option<ClientEvent> {
        match payload {
            Payload::SessionData(message) => {
                self.session.apply(&message);
                Some(ClientEvent::SessionUpdated(self.session.state()))
            }
            Payload::ResponseConfig(message) => {
                if self
                    .pending
                    .as_ref()
                    .is_some_and(|request| request.matches(&message.file_name))
                {
                    self.pending = None;
                }
                let Some(config) = self.configs.get_mut(&message.file_name) else {
                    warn!("Received data for unknown config '{}'", message.file_name);
                    return None;
                };
                if !config.load_from_data(&message.data) {
                    return None;
                }
                Some(ClientEvent::ConfigLoaded {
                    file_name: message.file_name,
                })
            }
            other => {
                warn!("Unexpected client-bound payload: {:?}", other);
                None
            }
        }
    }

    /// Fired when the connection to a server ends: the next server asserts
    /// its own session flags, any in-flight request is moot, and server
    /// documents synced for this session lose their authority.
    pub fn disconnected(&mut self) {
        self.session.reset();
        self.pending = None;
        for config in self.configs.values_mut() {
            if config.storage_type().is_always_synced() {
                config.unload();
            }
        }
    }

    /// Fired when the active save closes; world configs only exist while
    /// their save is loaded.
    pub fn world_closed(&mut self) {
        for config in self.configs.values_mut() {
            if config.storage_type().is_world() {
                config.unload();
            }
        }
    }
}
