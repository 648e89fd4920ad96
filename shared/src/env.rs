use crate::player::PlayerInfo;

/// Which kind of process this code is running in. Fixed for the lifetime of
/// the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Client,
    DedicatedServer,
}

/// Where a client currently is. Only meaningful on a client process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSession {
    /// No world loaded.
    MainMenu,
    /// Hosting the integrated server; `published` means it was opened to LAN.
    Integrated { published: bool },
    /// Joined another player's published LAN world.
    LanGuest,
    /// Connected to a dedicated server. `companion_installed` is whether the
    /// remote side runs the synchronization plugin.
    Remote { companion_installed: bool },
}

/// Session flags pushed from the server on join. Overwritten wholesale by
/// each session-data message and used for UI gating only; the server never
/// trusts them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub developer: bool,
    pub lan: bool,
}

/// Everything a client knows about its current surroundings when a
/// permission check is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEnvironment {
    pub session: GameSession,
    pub flags: SessionState,
}

impl ClientEnvironment {
    pub fn main_menu() -> Self {
        Self {
            session: GameSession::MainMenu,
            flags: SessionState::default(),
        }
    }

    pub fn new(session: GameSession, flags: SessionState) -> Self {
        Self { session, flags }
    }
}

/// A snapshot of "who is asking, from where" taken at the moment of a
/// permission check. Never cached: location and permission state can change
/// between game ticks, so callers construct a fresh context every call.
#[derive(Debug, Clone)]
pub struct ExecutionContext<'a> {
    env: Environment,
    session: GameSession,
    flags: SessionState,
    player: Option<&'a PlayerInfo>,
    /// Developer status resolved against the server's allow-list. Only
    /// meaningful on a dedicated server; the client mirrors its own flag
    /// through `SessionState`.
    dedicated_developer: bool,
}

impl<'a> ExecutionContext<'a> {
    /// Context for a check made on a client process. `player` is `None` when
    /// evaluating from the main menu.
    pub fn client(environment: &ClientEnvironment, player: Option<&'a PlayerInfo>) -> Self {
        Self {
            env: Environment::Client,
            session: environment.session,
            flags: environment.flags,
            player,
            dedicated_developer: false,
        }
    }

    /// Context for a check made on a dedicated server. The caller resolves
    /// `developer` against the server settings before constructing this.
    pub fn dedicated_server(player: &'a PlayerInfo, developer: bool) -> Self {
        Self {
            env: Environment::DedicatedServer,
            session: GameSession::MainMenu,
            flags: SessionState::default(),
            player: Some(player),
            dedicated_developer: developer,
        }
    }

    pub fn player(&self) -> Option<&PlayerInfo> {
        self.player
    }

    pub fn is_client(&self) -> bool {
        self.env == Environment::Client
    }

    pub fn is_dedicated_server(&self) -> bool {
        self.env == Environment::DedicatedServer
    }

    pub fn is_integrated_server(&self) -> bool {
        self.is_client() && matches!(self.session, GameSession::Integrated { .. })
    }

    pub fn is_integrated_server_owned_by_player(&self) -> bool {
        self.is_integrated_server() && self.player.is_some_and(|player| player.local)
    }

    pub fn is_main_menu(&self) -> bool {
        self.is_client() && self.session == GameSession::MainMenu
    }

    /// True on any server process; on a client only while a world is active.
    pub fn is_playing_game(&self) -> bool {
        !self.is_client() || self.session != GameSession::MainMenu
    }

    /// Singleplayer means hosting the integrated server without having
    /// published it. A remote session is never singleplayer, whatever the
    /// server-pushed LAN flag says.
    pub fn is_singleplayer(&self) -> bool {
        self.is_integrated_server() && !self.is_lan()
    }

    pub fn is_playing_on_lan(&self) -> bool {
        self.is_client() && self.is_playing_game() && self.is_lan()
    }

    pub fn is_playing_on_remote_server(&self) -> bool {
        if self.is_dedicated_server() {
            return true;
        }
        self.is_playing_game() && !self.is_integrated_server()
    }

    pub fn is_player_an_operator(&self) -> bool {
        self.player.is_some_and(|player| player.operator)
    }

    pub fn is_local_player(&self) -> bool {
        self.player.is_some_and(|player| player.local)
    }

    /// Developer status is asserted by the authoritative side. On a dedicated
    /// server this is the allow-list verdict supplied at construction; on a
    /// client it is the mirrored session flag for the local player, or
    /// outright ownership of the integrated server.
    pub fn is_developer_player(&self) -> bool {
        if self.is_dedicated_server() {
            return self.dedicated_developer;
        }
        self.is_local_player() && self.flags.developer
            || self.is_integrated_server_owned_by_player()
    }

    /// Whether the remote side of the current connection runs the companion
    /// synchronization plugin. Trivially true when the server is this process.
    pub fn is_companion_installed_remotely(&self) -> bool {
        match self.env {
            Environment::DedicatedServer => true,
            Environment::Client => match self.session {
                GameSession::Remote {
                    companion_installed,
                } => companion_installed,
                // Integrated and LAN sessions received our own session data.
                _ => true,
            },
        }
    }

    fn is_lan(&self) -> bool {
        match self.session {
            GameSession::Integrated { published } => published,
            GameSession::LanGuest => true,
            // A remote session can still be flagged as LAN by the server.
            GameSession::Remote { .. } => self.flags.lan,
            GameSession::MainMenu => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(session: GameSession, flags: SessionState) -> ExecutionContext<'static> {
        ExecutionContext::client(&ClientEnvironment::new(session, flags), None)
    }

    #[test]
    fn test_singleplayer_requires_the_integrated_server() {
        let context = context(
            GameSession::Integrated { published: false },
            SessionState::default(),
        );
        assert!(context.is_singleplayer());
        assert!(!context.is_playing_on_lan());
        assert!(!context.is_playing_on_remote_server());
    }

    #[test]
    fn test_published_integrated_server_is_lan_not_singleplayer() {
        let context = context(
            GameSession::Integrated { published: true },
            SessionState::default(),
        );
        assert!(!context.is_singleplayer());
        assert!(context.is_playing_on_lan());
    }

    #[test]
    fn test_remote_session_is_never_singleplayer() {
        // The lan flag defaults to false on a dedicated server, which must
        // not make the session look like singleplayer.
        let context = context(
            GameSession::Remote {
                companion_installed: true,
            },
            SessionState::default(),
        );
        assert!(!context.is_singleplayer());
        assert!(!context.is_playing_on_lan());
        assert!(context.is_playing_on_remote_server());
    }

    #[test]
    fn test_server_flagged_lan_session_counts_as_lan() {
        let context = context(
            GameSession::Remote {
                companion_installed: true,
            },
            SessionState {
                developer: false,
                lan: true,
            },
        );
        assert!(!context.is_singleplayer());
        assert!(context.is_playing_on_lan());
    }

    #[test]
    fn test_main_menu_is_neither() {
        let context = context(GameSession::MainMenu, SessionState::default());
        assert!(context.is_main_menu());
        assert!(!context.is_singleplayer());
        assert!(!context.is_playing_game());
    }
}
