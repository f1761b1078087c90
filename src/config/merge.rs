//! Deep merge of config layers with first-wins precedence.

use crate::domain::{ConfigTree, ConfigValue};
use crate::error::{ConfigError, Result};
use std::collections::BTreeSet;

/// Merge `maps` so that earlier maps take priority over later ones.
///
/// - The result holds the union of all keys.
/// - When every value found for a key is a mapping, those mappings are merged
///   recursively with the same rule.
/// - Otherwise the first value found wins outright; sequences are never
///   concatenated.
///
/// A key that is a mapping in one input and a plain value in another is a
/// [`ConfigError::MergeConflict`].
pub fn chain_maps(maps: &[&ConfigTree]) -> Result<ConfigTree> {
    chain_maps_at(maps, "")
}

fn chain_maps_at(maps: &[&ConfigTree], prefix: &str) -> Result<ConfigTree> {
    let keys: BTreeSet<&String> = maps.iter().flat_map(|m| m.keys()).collect();

    let mut chained = ConfigTree::new();
    for key in keys {
        let vals: Vec<&ConfigValue> = maps.iter().filter_map(|m| m.get(key)).collect();
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };

        let subtrees: Vec<&ConfigTree> = vals.iter().filter_map(|v| v.as_tree()).collect();
        let merged = if subtrees.is_empty() {
            vals[0].clone()
        } else if subtrees.len() == vals.len() {
            ConfigValue::Tree(chain_maps_at(&subtrees, &path)?)
        } else {
            return Err(ConfigError::MergeConflict { key: path });
        };
        chained.insert(key.clone(), merged);
    }
    Ok(chained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scalar;
    use proptest::prelude::*;
    use similar_asserts::assert_eq;

    fn tree(pairs: &[(&str, ConfigValue)]) -> ConfigTree {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn merges_nested_mappings_first_wins() {
        let a = tree(&[
            ("lr", ConfigValue::float(0.1)),
            ("model", ConfigValue::Tree(tree(&[("name", ConfigValue::str("x"))]))),
        ]);
        let b = tree(&[
            ("lr", ConfigValue::float(0.01)),
            ("model", ConfigValue::Tree(tree(&[("depth", ConfigValue::int(3))]))),
        ]);

        let merged = chain_maps(&[&a, &b]).expect("merge");
        let expected = tree(&[
            ("lr", ConfigValue::float(0.1)),
            (
                "model",
                ConfigValue::Tree(tree(&[
                    ("depth", ConfigValue::int(3)),
                    ("name", ConfigValue::str("x")),
                ])),
            ),
        ]);
        assert_eq!(merged, expected);
    }

    #[test]
    fn scalar_precedence_falls_through_in_order() {
        let a = tree(&[("x", ConfigValue::int(1))]);
        let b = tree(&[("x", ConfigValue::int(2)), ("y", ConfigValue::int(20))]);
        let c = tree(&[("x", ConfigValue::int(3)), ("y", ConfigValue::int(30)), ("z", ConfigValue::int(300))]);

        let merged = chain_maps(&[&a, &b, &c]).expect("merge");
        assert_eq!(merged["x"], ConfigValue::int(1));
        assert_eq!(merged["y"], ConfigValue::int(20));
        assert_eq!(merged["z"], ConfigValue::int(300));
    }

    #[test]
    fn sequences_are_replaced_not_concatenated() {
        let a = tree(&[("w", ConfigValue::Sequence(vec![Scalar::Float(1.0)]))]);
        let b = tree(&[("w", ConfigValue::Sequence(vec![Scalar::Float(2.0), Scalar::Float(3.0)]))]);
        let merged = chain_maps(&[&a, &b]).expect("merge");
        assert_eq!(merged["w"], ConfigValue::Sequence(vec![Scalar::Float(1.0)]));
    }

    #[test]
    fn mapping_against_scalar_is_conflict() {
        let a = tree(&[("model", ConfigValue::str("unet"))]);
        let b = tree(&[(
            "model",
            ConfigValue::Tree(tree(&[("opt", ConfigValue::Tree(tree(&[("depth", ConfigValue::int(1))])))])),
        )]);
        let c = tree(&[(
            "model",
            ConfigValue::Tree(tree(&[("opt", ConfigValue::int(2))])),
        )]);

        assert!(matches!(
            chain_maps(&[&a, &b]),
            Err(ConfigError::MergeConflict { key }) if key == "model"
        ));
        assert!(matches!(
            chain_maps(&[&b, &c]),
            Err(ConfigError::MergeConflict { key }) if key == "model.opt"
        ));
    }

    #[test]
    fn empty_input_gives_empty_tree() {
        assert!(chain_maps(&[]).expect("merge").is_empty());
    }

    fn flat_layer() -> impl Strategy<Value = ConfigTree> {
        let value = prop_oneof![
            any::<i64>().prop_map(ConfigValue::int),
            "[a-z]{0,6}".prop_map(ConfigValue::str),
            any::<bool>().prop_map(ConfigValue::bool),
            prop::collection::vec(any::<i64>().prop_map(Scalar::Int), 0..3)
                .prop_map(ConfigValue::Sequence),
        ];
        prop::collection::btree_map("[a-e]", value, 0..5)
    }

    proptest! {
        #[test]
        fn scalar_first_wins_across_three_layers(
            a in flat_layer(),
            b in flat_layer(),
            c in flat_layer(),
        ) {
            let merged = chain_maps(&[&a, &b, &c]).expect("merge");
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).chain(c.keys()).collect();
            prop_assert_eq!(merged.len(), keys.len());
            for key in keys {
                let expected = a.get(key).or_else(|| b.get(key)).or_else(|| c.get(key));
                prop_assert_eq!(merged.get(key), expected);
            }
        }
    }
}
