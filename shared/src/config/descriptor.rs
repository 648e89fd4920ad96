use crate::storage_type::StorageType;

/// Identifies one configuration unit: which mod owns it, the file it backs
/// onto, and how it is stored. Constructed once when a backend discovers the
/// config and immutable afterwards; exactly one descriptor per backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDescriptor {
    mod_id: String,
    file_name: String,
    storage_type: StorageType,
    read_only: bool,
    translation_key: Option<String>,
}

impl ConfigDescriptor {
    pub fn new(
        mod_id: impl Into<String>,
        file_name: impl Into<String>,
        storage_type: StorageType,
    ) -> Self {
        Self {
            mod_id: mod_id.into(),
            file_name: file_name.into(),
            storage_type,
            read_only: false,
            translation_key: None,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn translation_key(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }

    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn get_translation_key(&self) -> Option<&str> {
        self.translation_key.as_deref()
    }
}
