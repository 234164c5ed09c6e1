//! Golden file snapshots of container states.
//!
//! Values are serialized as pretty JSON with object keys sorted, so a
//! snapshot only changes when the observable result changes. Container
//! `slots` arrays are stored sparsely: only occupied slots, each tagged with
//! its `slot` index, so a double chest golden lists its stacks and nothing else.
//!
//! Tests compare against the file on disk. Rerun with
//! `STOWAGE_UPDATE_SNAPSHOTS=1` to rewrite the goldens.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "STOWAGE_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// With `STOWAGE_UPDATE_SNAPSHOTS=1` the file is (over)written instead.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if should_update_snapshots() {
        return write_snapshot(path, &actual);
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "snapshot missing at {} (run with {}=1 to create it)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    if normalize_newlines(&expected) != actual {
        anyhow::bail!(
            "snapshot mismatch at {} (run with {}=1 to update)\n--- expected\n{}--- actual\n{}",
            path.display(),
            UPDATE_SNAPSHOTS_ENV,
            expected,
            actual
        );
    }

    Ok(())
}

fn should_update_snapshots() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

fn write_snapshot(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create snapshot directory {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write snapshot {}", path.display()))
}

/// Serialize `value` the way snapshots are stored.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("failed to serialize snapshot value")?;
    let mut text = serde_json::to_string_pretty(&canonicalize(value))
        .context("failed to format snapshot JSON")?;
    text.push('\n');
    Ok(text)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| {
                        let value = match (key.as_str(), value) {
                            ("slots", Value::Array(slots)) => sparse_slots(slots),
                            (_, value) => canonicalize(value),
                        };
                        (key, value)
                    })
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn sparse_slots(slots: Vec<Value>) -> Value {
    Value::Array(
        slots
            .into_iter()
            .enumerate()
            .filter(|(_, stack)| !stack.is_null())
            .map(|(index, stack)| match stack {
                Value::Object(mut stack) => {
                    stack.insert("slot".to_string(), Value::from(index));
                    canonicalize(Value::Object(stack))
                }
                other => canonicalize(other),
            })
            .collect(),
    )
}
