//! Deep merge of decoded mappings.
//!
//! Later mappings win. Nested mappings are merged key by key; every other
//! value type (scalars, sequences) replaces the accumulated value wholesale.

use crate::value::Mapping;
use serde_json::Value;

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        let Value::Object(incoming) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(Value::Object(existing)) = base.get_mut(&key) {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key, Value::Object(incoming));
    }
}

/// Fold `mappings` left to right into a fresh mapping.
pub fn merge_all<I>(mappings: I) -> Mapping
where
    I: IntoIterator<Item = Mapping>,
{
    let mut acc = Mapping::new();
    for mapping in mappings {
        deep_merge(&mut acc, mapping);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn m(value: Value) -> Mapping {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn later_scalar_wins_at_depth() {
        let merged = merge_all([m(json!({"a": {"x": 1}})), m(json!({"a": {"x": 2}}))]);
        assert_eq!(Value::Object(merged), json!({"a": {"x": 2}}));
    }

    #[test]
    fn sibling_keys_survive() {
        let merged = merge_all([
            m(json!({"a": {"x": 1, "y": 9}})),
            m(json!({"a": {"x": 2}})),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": {"x": 2, "y": 9}}));
    }

    #[test]
    fn sequences_are_replaced_not_concatenated() {
        let merged = merge_all([
            m(json!({"hosts": ["a", "b"]})),
            m(json!({"hosts": ["c"]})),
        ]);
        assert_eq!(merged["hosts"], json!(["c"]));
    }

    #[test]
    fn mapping_replaces_scalar_and_vice_versa() {
        let merged = merge_all([m(json!({"a": 1, "b": {"c": 1}})), m(json!({"a": {"z": 0}, "b": 5}))]);
        assert_eq!(Value::Object(merged), json!({"a": {"z": 0}, "b": 5}));
    }

    #[test]
    fn merging_in_stages_matches_single_pass() {
        let a = m(json!({"a": {"x": 1, "y": [1]}, "k": "a"}));
        let b = m(json!({"a": {"y": [2], "z": {"q": 1}}, "k": "b"}));
        let c = m(json!({"a": {"z": {"r": 2}}, "extra": true}));

        let all = merge_all([a.clone(), b.clone(), c.clone()]);
        let staged = merge_all([merge_all([a, b]), c]);
        assert_eq!(all, staged);
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        assert!(merge_all(Vec::<Mapping>::new()).is_empty());
    }
}
