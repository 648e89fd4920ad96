use std::collections::VecDeque;

use toml::Value;

use crate::config::value::ValueSpec;

/// The editable snapshot of one leaf property. `initial` is the value that
/// was committed when the tree was built; `current` is whatever the editor
/// has it at now. A value is "changed" while the two differ.
#[derive(Debug, Clone)]
pub struct ConfigValue {
    path: Vec<String>,
    initial: Value,
    current: Value,
    spec: ValueSpec,
}

impl ConfigValue {
    pub fn new(path: Vec<String>, initial: Value, spec: ValueSpec) -> Self {
        Self {
            path,
            current: initial.clone(),
            initial,
            spec,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self) -> &Value {
        &self.current
    }

    pub fn set(&mut self, value: Value) {
        self.current = value;
    }

    pub fn spec(&self) -> &ValueSpec {
        &self.spec
    }

    pub fn is_changed(&self) -> bool {
        self.current != self.initial
    }
}

/// A node in the editable tree handed to the UI: branches mirror the
/// document's tables, leaves hold the values.
#[derive(Debug, Clone)]
pub enum ConfigEntry {
    Branch {
        name: String,
        children: Vec<ConfigEntry>,
    },
    Leaf(ConfigValue),
}

impl ConfigEntry {
    pub fn root(children: Vec<ConfigEntry>) -> Self {
        ConfigEntry::Branch {
            name: String::new(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ConfigEntry::Leaf(_))
    }

    pub fn children(&self) -> &[ConfigEntry] {
        match self {
            ConfigEntry::Branch { children, .. } => children,
            ConfigEntry::Leaf(_) => &[],
        }
    }

    pub fn value(&self) -> Option<&ConfigValue> {
        match self {
            ConfigEntry::Leaf(value) => Some(value),
            ConfigEntry::Branch { .. } => None,
        }
    }

    /// Locates the leaf at `path` for mutation. How the UI applies edits.
    pub fn value_mut(&mut self, path: &[String]) -> Option<&mut ConfigValue> {
        match self {
            ConfigEntry::Leaf(value) => (value.path() == path).then_some(value),
            ConfigEntry::Branch { children, .. } => {
                children.iter_mut().find_map(|child| child.value_mut(path))
            }
        }
    }

    /// Every leaf whose current value differs from its committed value.
    /// Breadth-first; entries are independent so order carries no meaning.
    pub fn changed_values(&self) -> Vec<&ConfigValue> {
        let mut changed = Vec::new();
        let mut queue: VecDeque<&ConfigEntry> = VecDeque::new();
        queue.push_back(self);
        while let Some(entry) = queue.pop_front() {
            match entry {
                ConfigEntry::Leaf(value) => {
                    if value.is_changed() {
                        changed.push(value);
                    }
                }
                ConfigEntry::Branch { children, .. } => {
                    queue.extend(children.iter());
                }
            }
        }
        changed
    }

}
