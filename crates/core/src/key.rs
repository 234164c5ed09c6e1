//! Namespaced item keys.
//!
//! Item keys are stable string identifiers of the form `namespace:path`
//! (e.g., `minecraft:cobblestone`). They are ordered lexically so that any
//! map keyed by them iterates deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error returned when parsing an invalid [`ItemKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ItemKeyError {
    message: String,
}

impl ItemKeyError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced item key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    namespace: String,
    path: String,
}

impl ItemKey {
    /// Parse an item key.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, ItemKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ItemKeyError::new("ItemKey cannot be empty"));
        }

        let (namespace, path) = match input.split_once(':') {
            Some((ns, p)) => (ns.trim(), p.trim()),
            None => (DEFAULT_NAMESPACE, input),
        };

        validate_namespace(namespace)?;
        validate_path(path)?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ItemKey {
    type Err = ItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemKey {
    type Error = ItemKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}

fn validate_namespace(ns: &str) -> Result<(), ItemKeyError> {
    if ns.is_empty() {
        return Err(ItemKeyError::new("ItemKey namespace cannot be empty"));
    }
    if ns.len() > 64 {
        return Err(ItemKeyError::new("ItemKey namespace too long (max 64)"));
    }
    if !ns
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(ItemKeyError::new(
            "ItemKey namespace has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ItemKeyError> {
    if path.is_empty() {
        return Err(ItemKeyError::new("ItemKey path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(ItemKeyError::new("ItemKey path too long (max 128)"));
    }
    if !path
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
    {
        return Err(ItemKeyError::new(
            "ItemKey path has invalid characters (allowed: a-z0-9_./-)",
        ));
    }
    Ok(())
}
