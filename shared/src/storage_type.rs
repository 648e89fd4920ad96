/// Where a config is loaded, which processes own it, and whether it travels
/// to the server. One storage type per config, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Client-side only, never loaded by a dedicated server.
    Client,
    /// Loaded by both sides, never synchronized.
    Universal,
    /// Server-owned; clients hold a local template and push edits on demand.
    Server,
    /// Server-owned and always synchronized to joining clients.
    ServerSync,
    /// Only exists on a dedicated server; never loadable from a client.
    DedicatedServer,
    /// Tied to a specific saved world, loaded while that save is active.
    World,
    /// World-scoped and synchronized to the server.
    WorldSync,
    /// Held in memory, never persisted.
    Memory,
}

/// The capability bucket a storage type falls into for permission purposes.
/// Every backend adapter maps its own type vocabulary onto this, so the
/// permission matrix exists exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCategory {
    /// Owned by the local process; always editable there.
    Local,
    /// Owned by whichever server is authoritative for the session.
    ServerScoped,
    /// Only a dedicated server ever loads it; no remote editing at all.
    DedicatedOnly,
}

impl StorageType {
    pub const ALL: [StorageType; 8] = [
        StorageType::Client,
        StorageType::Universal,
        StorageType::Server,
        StorageType::ServerSync,
        StorageType::DedicatedServer,
        StorageType::World,
        StorageType::WorldSync,
        StorageType::Memory,
    ];

    pub fn edit_category(self) -> EditCategory {
        match self {
            StorageType::Client | StorageType::Universal | StorageType::Memory => {
                EditCategory::Local
            }
            StorageType::Server
            | StorageType::ServerSync
            | StorageType::World
            | StorageType::WorldSync => EditCategory::ServerScoped,
            StorageType::DedicatedServer => EditCategory::DedicatedOnly,
        }
    }

    pub fn is_server_scoped(self) -> bool {
        self.edit_category() == EditCategory::ServerScoped
    }

    /// Whether edits to this type ever travel to the server.
    pub fn can_sync_to_server(self) -> bool {
        matches!(
            self,
            StorageType::Server | StorageType::ServerSync | StorageType::WorldSync
        )
    }

    /// Whether the server pushes this type to every joining client, meaning
    /// the client keeps a live copy for the whole session.
    pub fn is_always_synced(self) -> bool {
        matches!(self, StorageType::ServerSync | StorageType::WorldSync)
    }

    pub fn is_world(self) -> bool {
        matches!(self, StorageType::World | StorageType::WorldSync)
    }

    pub fn is_loaded_on_client(self) -> bool {
        self != StorageType::DedicatedServer
    }

    pub fn is_loaded_on_dedicated_server(self) -> bool {
        match self {
            StorageType::Universal
            | StorageType::Server
            | StorageType::ServerSync
            | StorageType::DedicatedServer
            | StorageType::Memory => true,
            StorageType::Client | StorageType::World | StorageType::WorldSync => false,
        }
    }
}
