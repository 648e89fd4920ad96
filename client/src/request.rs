use confsync_shared::RequestConfigMessage;

/// How long the client waits on the server's response before telling the UI
/// the request failed. Ticks, at the game's 20 per second: 5 seconds.
pub const REQUEST_TIMEOUT_TICKS: u32 = 20 * 5;

/// What `tick` reports about an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Waiting,
    TimedOut,
}

/// One outstanding request-from-server, counted down once per game tick.
/// There is no acknowledgement protocol; either the response arrives or the
/// clock runs out.
#[derive(Debug)]
pub struct PendingRequest {
    file_name: String,
    ticks: u32,
}

impl PendingRequest {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ticks: 0,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The message to put on the wire for this request.
    pub fn message(&self) -> RequestConfigMessage {
        RequestConfigMessage {
            file_name: self.file_name.clone(),
        }
    }

    /// Whether an arriving response answers this request.
    pub fn matches(&self, file_name: &str) -> bool {
        self.file_name == file_name
    }

    /// Advances the timeout clock by one game tick.
    pub fn tick(&mut self) -> RequestStatus {
        self.ticks += 1;
        if self.ticks >= REQUEST_TIMEOUT_TICKS {
            RequestStatus::TimedOut
        } else {
            RequestStatus::Waiting
        }
    }
}
