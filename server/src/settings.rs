use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

/// The server's own settings file. Developer status is a trust tier above
/// operator: the administrator must both enable the feature and list the
/// player's profile id before that player may push config edits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    developer: DeveloperSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DeveloperSettings {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    players: Vec<String>,
}

impl ServerSettings {
    pub fn new(enabled: bool, players: Vec<String>) -> Self {
        Self {
            developer: DeveloperSettings { enabled, players },
        }
    }

    /// Reads the settings file. A missing or unreadable file yields the
    /// defaults: feature disabled, nobody listed.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&text) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(
                    "Failed to parse server settings {}: {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn is_developer_enabled(&self) -> bool {
        self.developer.enabled
    }

    pub fn is_developer(&self, profile_id: &str) -> bool {
        self.developer.enabled
            && self
                .developer
                .players
                .iter()
                .any(|listed| listed == profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_requires_enable_switch() {
        let settings = ServerSettings::new(false, vec!["1111-2222".to_string()]);
        assert!(!settings.is_developer("1111-2222"));

        let settings = ServerSettings::new(true, vec!["1111-2222".to_string()]);
        assert!(settings.is_developer("1111-2222"));
        assert!(!settings.is_developer("3333-4444"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ServerSettings::load(&dir.path().join("confsync.toml"));
        assert!(!settings.is_developer_enabled());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confsync.toml");
        fs::write(
            &path,
            "[developer]\nenabled = true\nplayers = [\"1111-2222\"]\n",
        )
        .unwrap();
        let settings = ServerSettings::load(&path);
        assert!(settings.is_developer("1111-2222"));
        assert!(!settings.is_developer("9999-0000"));
    }

    #[test]
    fn test_unparseable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confsync.toml");
        fs::write(&path, "not toml [").unwrap();
        let settings = ServerSettings::load(&path);
        assert!(!settings.is_developer_enabled());
    }
}
