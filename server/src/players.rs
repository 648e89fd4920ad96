use confsync_shared::{Payload, PlayerInfo, PlayerKey, Text};

/// The seam between the handlers and the host game's player list. The host
/// adapter resolves keys to profiles, delivers chat and payloads, and owns
/// the actual connections; disconnecting a player is the enforcement
/// mechanism for protocol violations.
pub trait PlayerList {
    /// Every currently connected player.
    fn players(&self) -> Vec<PlayerKey>;

    /// The profile and flags behind a connection key, or `None` once the
    /// player is gone.
    fn info(&self, key: PlayerKey) -> Option<PlayerInfo>;

    fn send_chat(&mut self, key: PlayerKey, message: Text);

    fn send_payload(&mut self, key: PlayerKey, payload: Payload);

    /// Terminates the connection, showing `reason` on the player's screen.
    fn disconnect(&mut self, key: PlayerKey, reason: Text);

    /// Delivers a chat message to every online operator.
    fn broadcast_to_operators(&mut self, message: Text) {
        let operators: Vec<PlayerKey> = self
            .players()
            .into_iter()
            .filter(|key| self.info(*key).is_some_and(|info| info.operator))
            .collect();
        for key in operators {
            self.send_chat(key, message.clone());
        }
    }
}
