//! Tagged configuration resolution
//!
//! Given a runtime context (a small set of tags) and a list of tagged
//! override candidates, resolution finds every candidate whose tag set
//! is a subset of the context and orders them so the most specific
//! applicable candidate wins. The same algorithm derives each cache's
//! provider configuration at bootstrap and resolves arbitrary tagged
//! application configuration at runtime.
//!
//! The algorithm is intentionally a power-set scan, O(2^k) in the number
//! of context tags k. Context sets stay single-digit sized in practice;
//! a precomputed specificity index is not worth its complexity at that
//! scale.

use crate::error::Result;
use crate::value_objects::{Tag, TagSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One override candidate: a partial document applicable when the
/// candidate's tags are all present in the runtime context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedOverride {
    /// Tags that must all hold for this candidate to apply
    #[serde(default)]
    pub tags: TagSet,
    /// Partial document merged over less specific candidates
    pub values: Value,
}

/// Base values plus tagged override candidates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord<T> {
    /// Defaults applied before any override
    pub values: T,
    /// Override candidates, any subset of which may apply to a context
    #[serde(default)]
    pub overrides: Vec<TaggedOverride>,
}

/// Resolves tagged override candidates against one runtime context
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    context: TagSet,
}

impl ConfigurationResolver {
    /// Create a resolver for the given runtime context
    pub fn new(context: TagSet) -> Self {
        Self { context }
    }

    /// The runtime context this resolver was built from
    pub fn context(&self) -> &TagSet {
        &self.context
    }

    /// Order the applicable candidates most-specific-first.
    ///
    /// Every non-empty subset of the context is enumerated ascending by
    /// cardinality (and by bitmask within equal cardinality, over the
    /// canonically sorted context tags, so identical inputs always
    /// produce identical output). Candidates set-equal to a subset are
    /// collected in that order, then the whole selection is reversed so
    /// the largest-cardinality matches come first. When nothing matched
    /// any non-empty subset, candidates with an empty tag set serve as
    /// the fallback.
    pub fn resolve<'a>(&self, candidates: &'a [TaggedOverride]) -> Vec<&'a TaggedOverride> {
        let tags: Vec<&Tag> = self.context.iter().collect();
        let k = tags.len();

        let mut masks: Vec<u64> = (1..(1u64 << k)).collect();
        masks.sort_by_key(|mask| (mask.count_ones(), *mask));

        let mut matched: Vec<&TaggedOverride> = Vec::new();
        for mask in masks {
            let subset: TagSet = tags
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, tag)| (*tag).clone())
                .collect();
            matched.extend(candidates.iter().filter(|c| c.tags == subset));
        }
        matched.reverse();

        if matched.is_empty() {
            candidates.iter().filter(|c| c.tags.is_empty()).collect()
        } else {
            matched
        }
    }

    /// Merge a record down to its effective value for this context.
    ///
    /// Starts from the record's base values and merges the resolved
    /// candidates least-specific-first, so a more specific candidate
    /// overrides a less specific one on conflict. Pure: identical
    /// inputs always produce an identical merge.
    pub fn resolve_record<T>(&self, record: &PropertyRecord<T>) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut merged = serde_json::to_value(&record.values)?;
        for candidate in self.resolve(&record.overrides).into_iter().rev() {
            merge_value(&mut merged, &candidate.values);
        }
        Ok(serde_json::from_value(merged)?)
    }
}

/// Deep-merge `overlay` into `base`: objects merge key-wise and
/// recursively, anything else (scalars, arrays, null) replaces the base
/// slot outright. An explicit null therefore clears an optional field.
fn merge_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Tag;
    use serde_json::json;

    fn tag_set(tags: &[(&str, &str)]) -> TagSet {
        tags.iter().map(|(k, v)| Tag::new(*k, *v)).collect()
    }

    fn record() -> PropertyRecord<Value> {
        PropertyRecord {
            values: json!({"ttl": 100, "size": 10, "label": "default"}),
            overrides: vec![
                TaggedOverride {
                    tags: tag_set(&[("env", "prod")]),
                    values: json!({"ttl": 200, "label": "prod"}),
                },
                TaggedOverride {
                    tags: tag_set(&[("env", "prod"), ("region", "us")]),
                    values: json!({"ttl": 300}),
                },
            ],
        }
    }

    #[test]
    fn test_most_specific_candidate_wins() {
        let resolver =
            ConfigurationResolver::new(tag_set(&[("env", "prod"), ("region", "us")]));
        let merged = resolver.resolve_record(&record()).unwrap();

        // O2 (ttl) over O1 (label) over defaults (size)
        assert_eq!(merged["ttl"], 300);
        assert_eq!(merged["label"], "prod");
        assert_eq!(merged["size"], 10);
    }

    #[test]
    fn test_candidate_outside_context_is_inapplicable() {
        let resolver = ConfigurationResolver::new(tag_set(&[("env", "prod")]));
        let merged = resolver.resolve_record(&record()).unwrap();

        // Only O1 applies; O2's tag set is not a subset of the context
        assert_eq!(merged["ttl"], 200);
        assert_eq!(merged["label"], "prod");
        assert_eq!(merged["size"], 10);
    }

    #[test]
    fn test_resolve_orders_most_specific_first() {
        let resolver =
            ConfigurationResolver::new(tag_set(&[("env", "prod"), ("region", "us")]));
        let rec = record();
        let resolved = resolver.resolve(&rec.overrides);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].tags.len(), 2);
        assert_eq!(resolved[1].tags.len(), 1);
    }

    #[test]
    fn test_empty_tag_set_fallback() {
        let rec = PropertyRecord {
            values: json!({"ttl": 100}),
            overrides: vec![
                TaggedOverride {
                    tags: TagSet::new(),
                    values: json!({"ttl": 150}),
                },
                TaggedOverride {
                    tags: tag_set(&[("env", "prod")]),
                    values: json!({"ttl": 200}),
                },
            ],
        };

        // Context shares no tags with any candidate: the pure-defaults
        // candidate applies
        let resolver = ConfigurationResolver::new(tag_set(&[("env", "dev")]));
        let merged = resolver.resolve_record(&rec).unwrap();
        assert_eq!(merged["ttl"], 150);

        // A matching tagged candidate suppresses the fallback
        let resolver = ConfigurationResolver::new(tag_set(&[("env", "prod")]));
        let merged = resolver.resolve_record(&rec).unwrap();
        assert_eq!(merged["ttl"], 200);
    }

    #[test]
    fn test_no_candidates_yields_base_values() {
        let rec: PropertyRecord<Value> = PropertyRecord {
            values: json!({"ttl": 100}),
            overrides: vec![],
        };
        let resolver = ConfigurationResolver::new(tag_set(&[("env", "prod")]));
        let merged = resolver.resolve_record(&rec).unwrap();
        assert_eq!(merged, json!({"ttl": 100}));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = ConfigurationResolver::new(tag_set(&[
            ("env", "prod"),
            ("region", "us"),
            ("tenant", "acme"),
        ]));
        let rec = record();

        let first = resolver.resolve_record(&rec).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve_record(&rec).unwrap(), first);
        }
    }

    #[test]
    fn test_merge_is_deep_for_objects() {
        let mut base = json!({"server": {"host": "localhost", "port": 80}, "tags": [1, 2]});
        merge_value(
            &mut base,
            &json!({"server": {"port": 443}, "tags": [3]}),
        );

        // Objects merge key-wise; arrays replace
        assert_eq!(
            base,
            json!({"server": {"host": "localhost", "port": 443}, "tags": [3]})
        );
    }

    #[test]
    fn test_explicit_null_clears_a_field() {
        let mut base = json!({"max_size": 100});
        merge_value(&mut base, &json!({"max_size": null}));
        assert_eq!(base["max_size"], Value::Null);
    }
}
