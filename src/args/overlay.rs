//! Turn a resolved config tree into additional command-line flags.

use super::schema::{ArgSpec, ArgumentSchema, COMMAND_ID};
use crate::domain::{ConfigTree, ConfigValue, Scalar, ScalarKind};
use crate::error::{ConfigError, Result};

/// Help heading for flags that come from a config file.
pub const FROM_FILE: &str = "from_file";

const RESERVED_KEYS: [&str; 2] = [COMMAND_ID, "help"];

/// Declare one flag per leaf of `config`, named by its dotted path.
///
/// - sequences take zero or more values of the first element's kind
/// - booleans become toggles defaulting to the configured value
/// - other scalars take one value of their own kind
/// - `null` leaves take one string and default to unset
///
/// Flags already in `schema` with the same name are replaced.
pub fn overlay_config_as_arguments(
    schema: ArgumentSchema,
    config: &ConfigTree,
) -> Result<ArgumentSchema> {
    overlay_at(schema, config, "")
}

fn overlay_at(mut schema: ArgumentSchema, config: &ConfigTree, prefix: &str) -> Result<ArgumentSchema> {
    for (key, value) in config {
        let name = format!("{prefix}{key}");
        if key.is_empty() || key.starts_with('-') {
            return Err(ConfigError::InvalidFlagName(name));
        }
        if prefix.is_empty() && RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ConfigError::ReservedKey(name));
        }

        let spec = match value {
            ConfigValue::Tree(sub) => {
                schema = overlay_at(schema, sub, &format!("{name}."))?;
                continue;
            }
            ConfigValue::Sequence(items) => {
                // An empty sequence has no element to take a kind from.
                let kind = items.first().map_or(ScalarKind::Str, Scalar::kind);
                ArgSpec::list(name, kind, 0).default_value(value.clone())
            }
            ConfigValue::Scalar(Scalar::Bool(b)) => ArgSpec::flag(name).default_value(ConfigValue::bool(*b)),
            ConfigValue::Scalar(scalar) => {
                ArgSpec::value(name, scalar.kind()).default_value(value.clone())
            }
            ConfigValue::Null => ArgSpec::value(name, ScalarKind::Str),
        };
        schema = schema.with_flag(spec.heading(FROM_FILE));
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::base::declare_base_arguments;
    use crate::args::schema::ArgKind;

    fn config() -> ConfigTree {
        let mut model = ConfigTree::new();
        model.insert("depth".into(), ConfigValue::int(3));
        model.insert("pretrained".into(), ConfigValue::bool(true));
        model.insert("dropout".into(), ConfigValue::Null);

        let mut cfg = ConfigTree::new();
        cfg.insert("lr".into(), ConfigValue::int(1));
        cfg.insert("betas".into(), ConfigValue::Sequence(vec![Scalar::Float(0.9), Scalar::Float(0.99)]));
        cfg.insert("tags".into(), ConfigValue::Sequence(Vec::new()));
        cfg.insert("net".into(), ConfigValue::Tree(model));
        cfg.insert("empty".into(), ConfigValue::Tree(ConfigTree::new()));
        cfg
    }

    #[test]
    fn declares_flag_per_leaf() {
        let schema = overlay_config_as_arguments(declare_base_arguments(), &config()).expect("overlay");

        let depth = schema.flag("net.depth").expect("net.depth");
        assert_eq!(depth.kind, ArgKind::Value(ScalarKind::Int));
        assert_eq!(depth.default, ConfigValue::int(3));
        assert_eq!(depth.heading.as_deref(), Some(FROM_FILE));

        let pretrained = schema.flag("net.pretrained").expect("net.pretrained");
        assert_eq!(pretrained.kind, ArgKind::Flag);
        assert_eq!(pretrained.default, ConfigValue::bool(true));

        let dropout = schema.flag("net.dropout").expect("net.dropout");
        assert_eq!(dropout.kind, ArgKind::Value(ScalarKind::Str));
        assert_eq!(dropout.default, ConfigValue::Null);

        let betas = schema.flag("betas").expect("betas");
        assert_eq!(betas.kind, ArgKind::List { kind: ScalarKind::Float, min: 0 });

        let tags = schema.flag("tags").expect("tags");
        assert_eq!(tags.kind, ArgKind::List { kind: ScalarKind::Str, min: 0 });

        assert!(schema.flag("empty").is_none());
        assert!(schema.flag("net").is_none());
    }

    #[test]
    fn config_leaf_replaces_base_flag() {
        let schema = overlay_config_as_arguments(declare_base_arguments(), &config()).expect("overlay");
        let lr = schema.flag("lr").expect("lr");
        assert_eq!(lr.kind, ArgKind::Value(ScalarKind::Int));
        assert_eq!(lr.default, ConfigValue::int(1));
        assert_eq!(lr.heading.as_deref(), Some(FROM_FILE));
        assert_eq!(schema.flags().iter().filter(|f| f.name == "lr").count(), 1);
    }

    #[test]
    fn reserved_keys_rejected() {
        let mut cfg = ConfigTree::new();
        cfg.insert("cmd".into(), ConfigValue::str("train"));
        assert!(matches!(
            overlay_config_as_arguments(declare_base_arguments(), &cfg),
            Err(ConfigError::ReservedKey(key)) if key == "cmd"
        ));

        let mut nested = ConfigTree::new();
        nested.insert("help".into(), ConfigValue::str("fine when nested"));
        let mut cfg = ConfigTree::new();
        cfg.insert("doc".into(), ConfigValue::Tree(nested));
        assert!(overlay_config_as_arguments(declare_base_arguments(), &cfg).is_ok());
    }

    #[test]
    fn dash_prefixed_keys_rejected() {
        let mut cfg = ConfigTree::new();
        cfg.insert("-x".into(), ConfigValue::int(1));
        assert!(matches!(
            overlay_config_as_arguments(declare_base_arguments(), &cfg),
            Err(ConfigError::InvalidFlagName(key)) if key == "-x"
        ));

        let mut nested = ConfigTree::new();
        nested.insert("-depth".into(), ConfigValue::int(3));
        let mut cfg = ConfigTree::new();
        cfg.insert("net".into(), ConfigValue::Tree(nested));
        assert!(matches!(
            overlay_config_as_arguments(declare_base_arguments(), &cfg),
            Err(ConfigError::InvalidFlagName(key)) if key == "net.-depth"
        ));

        let mut cfg = ConfigTree::new();
        cfg.insert(String::new(), ConfigValue::int(1));
        assert!(matches!(
            overlay_config_as_arguments(declare_base_arguments(), &cfg),
            Err(ConfigError::InvalidFlagName(_))
        ));
    }

    #[test]
    fn overlaid_schema_is_a_valid_command() {
        overlay_config_as_arguments(declare_base_arguments(), &config())
            .expect("overlay")
            .to_command()
            .debug_assert();
    }
}
