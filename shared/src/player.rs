// PlayerKey
/// Handle to a connected player, assigned by the host for the lifetime of
/// the connection.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct PlayerKey(u64);

impl PlayerKey {
    pub fn new(value: u64) -> Self {
        PlayerKey(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

// PlayerProfile
/// Stable identity for a player account, independent of any connection.
/// The `id` is what the developer allow-list is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// PlayerInfo
/// A player as seen at permission-check time: their profile plus the flags
/// the host resolved for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub profile: PlayerProfile,
    /// Whether the server considers this player an operator.
    pub operator: bool,
    /// Whether this is the local player on the client evaluating the check.
    pub local: bool,
}

impl PlayerInfo {
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            profile,
            operator: false,
            local: false,
        }
    }

    pub fn operator(mut self, operator: bool) -> Self {
        self.operator = operator;
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }
}
