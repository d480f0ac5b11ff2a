use serde_json::Value;

/// Counts the primitive values of a JSON tree.
///
/// Arrays and objects count their descendants, `null` counts nothing.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tj_reflect::serde::count_leaves;
///
/// assert_eq!(count_leaves(&json!({ "a": [1, "x", null], "b": { "c": true } })), 3);
/// ```
pub fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => 1,
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        Value::Object(entries) => entries.values().map(count_leaves).sum(),
    }
}
