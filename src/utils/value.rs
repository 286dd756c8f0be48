use serde_json::Value;

/// Follow `keys` through nested objects.
///
/// Returns `None` as soon as a step is missing or the current value is not an
/// object, so malformed data never panics.
pub fn get_path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}
