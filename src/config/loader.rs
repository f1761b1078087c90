//! Config file loading

use crate::domain::{ConfigTree, ConfigValue, Scalar};
use crate::error::{ConfigError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load one config file into a [`ConfigTree`].
///
/// The format follows the extension (`.toml`, `.json`, YAML otherwise).
/// Empty files and documents that are just `null` yield an empty tree.
pub fn load_config(path: &Path) -> Result<ConfigTree> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(ConfigError::Io { path: path.to_path_buf(), source: e }),
    };

    if content.trim().is_empty() {
        return Ok(ConfigTree::new());
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let tree = match ext.as_str() {
        "toml" => parse_toml_config(&content, path)?,
        "json" => parse_json_config(&content, path)?,
        "yaml" | "yml" => parse_yaml_config(&content, path)?,
        other => {
            tracing::debug!("Unknown config extension '.{}', reading {} as YAML", other, path.display());
            parse_yaml_config(&content, path)?
        }
    };

    tracing::debug!("Loaded {} top-level keys from {}", tree.len(), path.display());
    Ok(tree)
}

fn parse_error(path: &Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::Parse { path: path.to_path_buf(), reason: reason.into() }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a homogeneous sequence, using the first element's kind as the authority.
fn collect_sequence(path: &Path, key: &str, items: Vec<ConfigValue>) -> Result<ConfigValue> {
    let mut scalars: Vec<Scalar> = Vec::with_capacity(items.len());
    for item in items {
        let ConfigValue::Scalar(scalar) = item else {
            return Err(parse_error(
                path,
                format!("sequence at '{key}' may only contain scalar values"),
            ));
        };
        if let Some(first) = scalars.first() {
            if first.kind() != scalar.kind() {
                return Err(ConfigError::TypeMismatch {
                    path: path.to_path_buf(),
                    key: key.to_string(),
                    expected: first.kind(),
                    found: scalar.kind(),
                });
            }
        }
        scalars.push(scalar);
    }
    Ok(ConfigValue::Sequence(scalars))
}

fn into_root(path: &Path, value: ConfigValue) -> Result<ConfigTree> {
    match value {
        ConfigValue::Tree(tree) => Ok(tree),
        ConfigValue::Null => Ok(ConfigTree::new()),
        _ => Err(parse_error(path, "top-level value must be a mapping")),
    }
}

fn parse_yaml_config(content: &str, path: &Path) -> Result<ConfigTree> {
    let raw: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;
    let value = yaml_to_value(raw, path, "")?;
    into_root(path, value)
}

fn yaml_to_value(raw: serde_yaml::Value, path: &Path, key: &str) -> Result<ConfigValue> {
    use serde_yaml::Value;

    Ok(match raw {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::int(i),
            None => ConfigValue::float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => ConfigValue::str(s),
        Value::Sequence(items) => {
            let items = items
                .into_iter()
                .map(|item| yaml_to_value(item, path, key))
                .collect::<Result<Vec<_>>>()?;
            collect_sequence(path, key, items)?
        }
        Value::Mapping(mapping) => {
            let mut tree = ConfigTree::new();
            for (k, v) in mapping {
                let Value::String(name) = k else {
                    return Err(parse_error(
                        path,
                        format!("mapping keys must be strings (under '{key}')"),
                    ));
                };
                let child_key = join_key(key, &name);
                let child = yaml_to_value(v, path, &child_key)?;
                tree.insert(name, child);
            }
            ConfigValue::Tree(tree)
        }
        Value::Tagged(tagged) => {
            return Err(parse_error(
                path,
                format!("unsupported YAML tag {} at '{key}'", tagged.tag),
            ));
        }
    })
}

fn parse_toml_config(content: &str, path: &Path) -> Result<ConfigTree> {
    let raw: toml::Table = toml::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;
    let value = toml_to_value(toml::Value::Table(raw), path, "")?;
    into_root(path, value)
}

fn toml_to_value(raw: toml::Value, path: &Path, key: &str) -> Result<ConfigValue> {
    use toml::Value;

    Ok(match raw {
        Value::Boolean(b) => ConfigValue::bool(b),
        Value::Integer(i) => ConfigValue::int(i),
        Value::Float(x) => ConfigValue::float(x),
        Value::String(s) => ConfigValue::str(s),
        Value::Datetime(dt) => ConfigValue::str(dt.to_string()),
        Value::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| toml_to_value(item, path, key))
                .collect::<Result<Vec<_>>>()?;
            collect_sequence(path, key, items)?
        }
        Value::Table(table) => {
            let mut tree = ConfigTree::new();
            for (name, v) in table {
                let child_key = join_key(key, &name);
                let child = toml_to_value(v, path, &child_key)?;
                tree.insert(name, child);
            }
            ConfigValue::Tree(tree)
        }
    })
}

fn parse_json_config(content: &str, path: &Path) -> Result<ConfigTree> {
    let raw: serde_json::Value =
        serde_json::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;
    let value = json_to_value(raw, path, "")?;
    into_root(path, value)
}

fn json_to_value(raw: serde_json::Value, path: &Path, key: &str) -> Result<ConfigValue> {
    use serde_json::Value;

    Ok(match raw {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::int(i),
            None => ConfigValue::float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => ConfigValue::str(s),
        Value::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| json_to_value(item, path, key))
                .collect::<Result<Vec<_>>>()?;
            collect_sequence(path, key, items)?
        }
        Value::Object(object) => {
            let mut tree = ConfigTree::new();
            for (name, v) in object {
                let child_key = join_key(key, &name);
                let child = json_to_value(v, path, &child_key)?;
                tree.insert(name, child);
            }
            ConfigValue::Tree(tree)
        }
    })
}
