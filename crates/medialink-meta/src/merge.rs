//! The deep-merge rule
//!
//! Merging `src` into `dst`:
//! - two mappings merge field by field, recursively;
//! - two lists concatenate, `dst` elements first, duplicates kept;
//! - any other pairing replaces `dst` with `src`;
//! - fields present only in `src` are added.

use serde_json::Value;

/// Deep merge `src` into `dst` in place.
pub fn deep_merge(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, src_val) in src_map {
                if let Some(dst_val) = dst_map.get_mut(key) {
                    deep_merge(dst_val, src_val);
                } else {
                    dst_map.insert(key.clone(), src_val.clone());
                }
            }
        }
        (Value::Array(dst_list), Value::Array(src_list)) => {
            dst_list.extend(src_list.iter().cloned());
        }
        (dst, src) => {
            *dst = src.clone();
        }
    }
}
