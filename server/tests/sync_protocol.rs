use std::collections::HashMap;

use toml::Value;

use confsync_server::{ConfigRegistry, ConfigServer, PlayerList, ServerSettings};
use confsync_shared::{
    lang, ConfigDescriptor, ConfigSpec, ConfigStore, Payload, PlayerInfo, PlayerKey,
    PlayerProfile, RequestConfigMessage, StorageType, StoredConfig, SyncConfigMessage, Text,
    Validator, ValueSpec,
};

// A player list double that records everything the handlers do to it.
#[derive(Default)]
struct TestPlayers {
    connected: Vec<PlayerKey>,
    infos: HashMap<PlayerKey, PlayerInfo>,
    chats: Vec<(PlayerKey, Text)>,
    payloads: Vec<(PlayerKey, Payload)>,
    disconnects: Vec<(PlayerKey, Text)>,
}

impl TestPlayers {
    fn join(&mut self, key: u64, name: &str, operator: bool) -> PlayerKey {
        let key = PlayerKey::new(key);
        let profile = PlayerProfile::new(format!("uuid-{}", name), name);
        self.infos
            .insert(key, PlayerInfo::new(profile).operator(operator));
        self.connected.push(key);
        key
    }

    fn disconnect_reason(&self, key: PlayerKey) -> Option<&str> {
        self.disconnects
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, reason)| reason.key())
    }

    fn chat_keys(&self, key: PlayerKey) -> Vec<&str> {
        self.chats
            .iter()
            .filter(|(k, _)| *k == key)
            .filter_map(|(_, message)| message.key())
            .collect()
    }
}

impl PlayerList for TestPlayers {
    fn players(&self) -> Vec<PlayerKey> {
        self.connected.clone()
    }

    fn info(&self, key: PlayerKey) -> Option<PlayerInfo> {
        self.infos.get(&key).cloned()
    }

    fn send_chat(&mut self, key: PlayerKey, message: Text) {
        self.chats.push((key, message));
    }

    fn send_payload(&mut self, key: PlayerKey, payload: Payload) {
        self.payloads.push((key, payload));
    }

    fn disconnect(&mut self, key: PlayerKey, reason: Text) {
        self.connected.retain(|k| *k != key);
        self.infos.remove(&key);
        self.disconnects.push((key, reason));
    }
}

fn test_spec() -> ConfigSpec {
    let mut spec = ConfigSpec::new();
    spec.define(
        &["general", "level"],
        ValueSpec::new(3i64).with_validator(Validator::IntRange { min: 0, max: 10 }),
    );
    spec.define(&["general", "enabled"], ValueSpec::new(true));
    spec
}

fn server_with_config(storage: StorageType) -> ConfigServer {
    let descriptor = ConfigDescriptor::new("my_mod", "my_mod.server.toml", storage);
    let spec = test_spec();
    let store = ConfigStore::in_memory(spec.default_table());
    let config = StoredConfig::new(descriptor, spec).with_store(store);
    let mut registry = ConfigRegistry::new();
    registry.register(config);
    let settings = ServerSettings::new(true, vec!["uuid-dev".to_string()]);
    ConfigServer::new(settings, registry)
}

fn stored_value(server: &ConfigServer, path: &[&str]) -> Option<Value> {
    let entry = server.registry().get("my_mod.server.toml")?;
    let config = match entry.lock() {
        Ok(config) => config,
        Err(poisoned) => poisoned.into_inner(),
    };
    let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    config.store()?.get(&path).cloned()
}

fn sync(file_name: &str, data: &str) -> SyncConfigMessage {
    SyncConfigMessage {
        file_name: file_name.to_string(),
        data: data.as_bytes().to_vec(),
    }
}

const VALID_DOC: &str = "[general]\nlevel = 7\nenabled = false\n";

#[test]
fn test_unauthorized_sync_disconnects_sender() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let op = players.join(1, "op", true);
    // Operator but not on the developer allow-list.
    server.handle_sync(op, sync("my_mod.server.toml", VALID_DOC), &mut players);

    assert_eq!(
        players.disconnect_reason(op),
        Some(lang::DISCONNECT_UNAUTHORIZED)
    );
    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(3))
    );
}

#[test]
fn test_developer_without_operator_is_unauthorized() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", false);
    server.handle_sync(dev, sync("my_mod.server.toml", VALID_DOC), &mut players);
    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_UNAUTHORIZED)
    );
}

#[test]
fn test_unauthorized_attempt_is_reported_to_operators() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let op = players.join(1, "op", true);
    let intruder = players.join(2, "intruder", false);
    server.handle_sync(intruder, sync("my_mod.server.toml", VALID_DOC), &mut players);

    assert_eq!(players.chat_keys(op), vec![lang::CHAT_UNAUTHORIZED_ATTEMPT]);
    // Only the offender loses their connection.
    assert!(players.disconnect_reason(op).is_none());
}

#[test]
fn test_unknown_file_name_is_a_bad_packet() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_sync(dev, sync("forged.toml", VALID_DOC), &mut players);
    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
}

#[test]
fn test_non_syncable_storage_type_is_a_bad_packet() {
    let mut server = server_with_config(StorageType::DedicatedServer);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_sync(dev, sync("my_mod.server.toml", VALID_DOC), &mut players);
    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
}

#[test]
fn test_unparseable_data_disconnects_and_warns_operators() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let op = players.join(1, "op", true);
    let dev = players.join(2, "dev", true);
    server.handle_sync(dev, sync("my_mod.server.toml", "not toml ["), &mut players);

    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
    assert_eq!(players.chat_keys(op), vec![lang::CHAT_MALFORMED_DATA]);
    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(3))
    );
}

#[test]
fn test_missing_key_is_rejected_never_partially_committed() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    // Parseable, but 'enabled' is gone: schema drift.
    server.handle_sync(
        dev,
        sync("my_mod.server.toml", "[general]\nlevel = 7\n"),
        &mut players,
    );

    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(3))
    );
}

#[test]
fn test_extra_key_is_rejected() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    let doc = "[general]\nlevel = 7\nenabled = false\nintruder = 1\n";
    server.handle_sync(dev, sync("my_mod.server.toml", doc), &mut players);
    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
}

#[test]
fn test_valid_sync_commits_and_kicks_everyone_else() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let op = players.join(1, "op", true);
    let dev = players.join(2, "dev", true);
    let bystander = players.join(3, "bystander", false);
    server.handle_sync(dev, sync("my_mod.server.toml", VALID_DOC), &mut players);

    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(7))
    );
    assert_eq!(
        stored_value(&server, &["general", "enabled"]),
        Some(Value::Boolean(false))
    );
    // Operators hear about it; the sender stays, everyone else rejoins.
    assert_eq!(players.chat_keys(op), vec![lang::CHAT_CONFIG_UPDATED]);
    assert!(players.disconnect_reason(dev).is_none());
    assert_eq!(
        players.disconnect_reason(op),
        Some(lang::SERVER_CONFIGS_UPDATED)
    );
    assert_eq!(
        players.disconnect_reason(bystander),
        Some(lang::SERVER_CONFIGS_UPDATED)
    );
}

#[test]
fn test_out_of_range_value_is_replaced_and_accepted() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    let doc = "[general]\nlevel = 99\nenabled = true\n";
    server.handle_sync(dev, sync("my_mod.server.toml", doc), &mut players);

    assert!(players.disconnect_reason(dev).is_none());
    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(10))
    );
}

#[test]
fn test_sync_survives_a_poisoned_store_lock() {
    let mut server = server_with_config(StorageType::ServerSync);
    let entry = server.registry().get("my_mod.server.toml").unwrap();
    let poisoner = std::thread::spawn(move || {
        let _guard = entry.lock().unwrap();
        panic!("poison the store lock");
    });
    assert!(poisoner.join().is_err());

    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_sync(dev, sync("my_mod.server.toml", VALID_DOC), &mut players);

    assert!(players.disconnect_reason(dev).is_none());
    assert_eq!(
        stored_value(&server, &["general", "level"]),
        Some(Value::Integer(7))
    );
}

#[test]
fn test_committed_sync_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my_mod.server.toml");
    let spec = test_spec();
    let store = ConfigStore::with_path(spec.default_table(), path.clone());
    let config = StoredConfig::new(
        ConfigDescriptor::new("my_mod", "my_mod.server.toml", StorageType::ServerSync),
        spec,
    )
    .with_store(store);
    let mut registry = ConfigRegistry::new();
    registry.register(config);
    let settings = ServerSettings::new(true, vec!["uuid-dev".to_string()]);
    let mut server = ConfigServer::new(settings, registry);

    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_sync(dev, sync("my_mod.server.toml", VALID_DOC), &mut players);

    let reloaded = ConfigStore::load(&path).unwrap();
    assert_eq!(reloaded.data()["general"]["level"], Value::Integer(7));
}

#[test]
fn test_request_returns_the_serialized_store() {
    let mut server = server_with_config(StorageType::Server);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_request(
        dev,
        RequestConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
        },
        &mut players,
    );

    assert_eq!(players.payloads.len(), 1);
    let (key, payload) = &players.payloads[0];
    assert_eq!(*key, dev);
    let Payload::ResponseConfig(response) = payload else {
        panic!("expected a config response, got {:?}", payload);
    };
    assert_eq!(response.file_name, "my_mod.server.toml");
    let document: toml::Table = std::str::from_utf8(&response.data)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(document["general"]["level"], Value::Integer(3));
}

#[test]
fn test_request_for_always_synced_config_is_a_bad_packet() {
    let mut server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", true);
    server.handle_request(
        dev,
        RequestConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
        },
        &mut players,
    );
    assert_eq!(
        players.disconnect_reason(dev),
        Some(lang::DISCONNECT_BAD_PACKET)
    );
}

#[test]
fn test_unauthorized_request_disconnects() {
    let mut server = server_with_config(StorageType::Server);
    let mut players = TestPlayers::default();
    let op = players.join(1, "op", true);
    server.handle_request(
        op,
        RequestConfigMessage {
            file_name: "my_mod.server.toml".to_string(),
        },
        &mut players,
    );
    assert_eq!(
        players.disconnect_reason(op),
        Some(lang::DISCONNECT_UNAUTHORIZED)
    );
    assert!(players.payloads.is_empty());
}

#[test]
fn test_session_data_on_join() {
    let server = server_with_config(StorageType::ServerSync);
    let mut players = TestPlayers::default();
    let dev = players.join(1, "dev", false);
    let other = players.join(2, "other", true);
    server.player_joined(dev, &mut players);
    server.player_joined(other, &mut players);

    assert_eq!(
        players.payloads,
        vec![
            (
                dev,
                Payload::SessionData(confsync_shared::SessionDataMessage {
                    developer: true,
                    lan: false,
                })
            ),
            (
                other,
                Payload::SessionData(confsync_shared::SessionDataMessage {
                    developer: false,
                    lan: false,
                })
            ),
        ]
    );
}
