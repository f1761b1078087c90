//! Flat dotted-key namespaces and the read-only trees rebuilt from them.

use crate::domain::{ConfigTree, ConfigValue};
use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::Deref;

/// Flat mapping from dotted key path to a leaf value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArgumentNamespace {
    entries: BTreeMap<String, ConfigValue>,
}

impl ArgumentNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for ArgumentNamespace {
    fn from_iter<T: IntoIterator<Item = (K, ConfigValue)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

/// Flatten `tree` into dotted keys, one entry per leaf. Empty mappings have
/// no leaves and disappear.
pub fn flatten(tree: &ConfigTree) -> ArgumentNamespace {
    let mut namespace = ArgumentNamespace::new();
    flatten_into(tree, "", &mut namespace);
    namespace
}

fn flatten_into(tree: &ConfigTree, prefix: &str, out: &mut ArgumentNamespace) {
    for (key, value) in tree {
        let path = format!("{prefix}{key}");
        match value {
            ConfigValue::Tree(sub) => flatten_into(sub, &format!("{path}."), out),
            leaf => out.insert(path, leaf.clone()),
        }
    }
}

/// Rebuild a nested tree by splitting every key on `.`.
///
/// A prefix used both as a value and as a mapping path is a
/// [`ConfigError::KeyCollision`].
pub fn namespace_to_tree(namespace: &ArgumentNamespace) -> Result<FinalConfig> {
    let mut root = ConfigTree::new();

    for (key, value) in namespace.iter() {
        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
            None => (Vec::new(), key.as_str()),
        };

        let mut node = &mut root;
        let mut walked = String::new();
        for segment in parents {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);
            node = match node
                .entry(segment.to_string())
                .or_insert_with(|| ConfigValue::Tree(ConfigTree::new()))
            {
                ConfigValue::Tree(sub) => sub,
                _ => return Err(ConfigError::KeyCollision { key: walked }),
            };
        }

        match node.entry(leaf.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
            Entry::Occupied(_) => return Err(ConfigError::KeyCollision { key: key.clone() }),
        }
    }

    Ok(FinalConfig { tree: root })
}

/// The resolved configuration handed to the harness.
///
/// Read-only: the tree is only reachable through shared references, and a
/// clone is an independent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FinalConfig {
    tree: ConfigTree,
}

impl FinalConfig {
    /// The selected run mode (`train` / `eval`), if present.
    pub fn command(&self) -> Option<&str> {
        self.tree.get("cmd").and_then(ConfigValue::as_str)
    }

    /// Look up a value by dotted path, e.g. `model.depth`.
    pub fn lookup(&self, dotted: &str) -> Option<&ConfigValue> {
        let mut segments = dotted.split('.');
        let mut current = self.tree.get(segments.next()?)?;
        for segment in segments {
            current = current.as_tree()?.get(segment)?;
        }
        Some(current)
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Flatten back into dotted keys.
    pub fn to_namespace(&self) -> ArgumentNamespace {
        flatten(&self.tree)
    }
}

impl Deref for FinalConfig {
    type Target = ConfigTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}
