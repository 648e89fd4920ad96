use std::collections::BTreeMap;

use toml::{Table, Value};

use crate::config::value::ValueSpec;

/// What a correction had to do to one path while reconciling a document
/// against its schema. `Add` and `Remove` indicate the document's key set
/// disagrees with the schema; `Replace` means a key was present but held an
/// invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionAction {
    Add,
    Remove,
    Replace,
}

/// The schema of a config document: every defined leaf path with its value
/// spec. Documents are reconciled against this before they are committed.
#[derive(Debug, Clone, Default)]
pub struct ConfigSpec {
    entries: BTreeMap<Vec<String>, ValueSpec>,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, path: &[&str], spec: ValueSpec) {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.entries.insert(path, spec);
    }

    pub fn is_defined(&self, path: &[String]) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &[String]) -> Option<&ValueSpec> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], &ValueSpec)> {
        self.entries
            .iter()
            .map(|(path, spec)| (path.as_slice(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A fresh document holding every defined path at its default value.
    pub fn default_table(&self) -> Table {
        let mut table = Table::new();
        self.correct(&mut table, |_, _, _, _| {});
        table
    }

    /// Reconciles `data` against the schema in place, reporting every
    /// correction to `listener` as `(action, path, incorrect, corrected)`.
    /// Returns the number of corrections made. Policy on the result is the
    /// caller's: local edits log replacements and move on, while the sync
    /// receiver treats any Add/Remove as schema drift and rejects the whole
    /// document.
    pub fn correct<F>(&self, data: &mut Table, mut listener: F) -> usize
    where
        F: FnMut(CorrectionAction, &[String], Option<&Value>, Option<&Value>),
    {
        let mut count = 0;
        for (path, spec) in &self.entries {
            count += correct_entry(data, path, spec, &mut listener);
        }
        let mut prefix = Vec::new();
        count += self.remove_undefined(data, &mut prefix, &mut listener);
        count
    }

    fn remove_undefined<F>(&self, table: &mut Table, prefix: &mut Vec<String>, listener: &mut F) -> usize
    where
        F: FnMut(CorrectionAction, &[String], Option<&Value>, Option<&Value>),
    {
        let mut count = 0;
        let keys: Vec<String> = table.keys().cloned().collect();
        for key in keys {
            prefix.push(key.clone());
            let defined_leaf = self.entries.contains_key(prefix.as_slice());
            let covers_branch = self.covers_prefix(prefix);
            match table.get_mut(&key) {
                Some(Value::Table(child)) if covers_branch => {
                    count += self.remove_undefined(child, prefix, listener);
                }
                Some(_) if defined_leaf => {}
                Some(value) => {
                    listener(CorrectionAction::Remove, prefix, Some(value), None);
                    table.remove(&key);
                    count += 1;
                }
                None => {}
            }
            prefix.pop();
        }
        count
    }

    fn covers_prefix(&self, prefix: &[String]) -> bool {
        self.entries
            .keys()
            .any(|path| path.len() > prefix.len() && path.starts_with(prefix))
    }
}

fn correct_entry<F>(data: &mut Table, path: &[String], spec: &ValueSpec, listener: &mut F) -> usize
where
    F: FnMut(CorrectionAction, &[String], Option<&Value>, Option<&Value>),
{
    let mut count = 0;
    let mut table = data;
    for segment in &path[..path.len() - 1] {
        match table.get(segment) {
            Some(Value::Table(_)) => {}
            Some(_) => {
                // A value sits where the schema expects a table.
                let old = table.insert(segment.clone(), Value::Table(Table::new()));
                listener(CorrectionAction::Replace, path, old.as_ref(), None);
                count += 1;
            }
            None => {
                table.insert(segment.clone(), Value::Table(Table::new()));
            }
        }
        let Some(Value::Table(next)) = table.get_mut(segment) else {
            return count;
        };
        table = next;
    }

    let name = &path[path.len() - 1];
    match table.get(name) {
        None => {
            let default = spec.default_value().clone();
            listener(CorrectionAction::Add, path, None, Some(&default));
            table.insert(name.clone(), default);
            count += 1;
        }
        Some(value) if !spec.is_valid(value) => {
            let corrected = spec.correct(value);
            listener(CorrectionAction::Replace, path, Some(value), Some(&corrected));
            table.insert(name.clone(), corrected);
            count += 1;
        }
        Some(_) => {}
    }
    count
}
