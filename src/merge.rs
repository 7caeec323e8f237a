use serde_yaml::{Mapping, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// A `null` in the overlay leaves the base value alone; any other overlay
/// value wins. String keys match case-insensitively, and a matched key keeps
/// the spelling it has in `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            Value::Mapping(merge_mappings(base_map, overlay_map))
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_val) in overlay {
        let key = matching_key(&base, &key).unwrap_or(key);
        match base.get_mut(&key) {
            Some(slot) => {
                let base_val = std::mem::replace(slot, Value::Null);
                *slot = deep_merge(base_val, overlay_val);
            }
            None if overlay_val.is_null() => {}
            None => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

fn matching_key(base: &Mapping, key: &Value) -> Option<Value> {
    let wanted = key.as_str()?.to_lowercase();
    base.keys()
        .find(|k| k.as_str().is_some_and(|s| s.to_lowercase() == wanted))
        .cloned()
}
