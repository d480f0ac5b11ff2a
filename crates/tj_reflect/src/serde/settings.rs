use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;

use serde_json::{Map, Value};

use crate::registry::RESERVED_MEMBER_NAME;

/// A `(key, value)` hook applied to every entry of a JSON tree.
///
/// Returning `None` removes the entry from objects and turns array items
/// into `null`. The root is visited with the key `""`.
pub type ValueHook = Arc<dyn Fn(&str, Value) -> Option<Value> + Send + Sync>;

// -----------------------------------------------------------------------------
// Settings

/// Read and write configuration.
///
/// Settings are passed by reference through a whole traversal and never
/// change during one. Use [`SettingsPatch`] to derive per-call settings.
#[derive(Clone)]
pub struct Settings {
    /// The property holding type hints.
    pub type_hint_key: String,
    /// Emit type hints when writing and honour them when reading.
    pub enable_type_hints: bool,
    /// Emit a hint for every object, fail reading objects without one.
    pub require_type_hints: bool,
    /// The maximum number of primitive values accepted by the reader.
    pub max_objects: Option<usize>,
    /// Reject hinted types that are not subtypes of the declared type.
    pub strict: bool,
    /// Render indented JSON text.
    pub pretty: bool,
    /// Applied to the written tree, parents before children.
    pub replacer: Option<ValueHook>,
    /// Applied to the parsed tree, children before parents.
    pub reviver: Option<ValueHook>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            type_hint_key: String::from(RESERVED_MEMBER_NAME),
            enable_type_hints: true,
            require_type_hints: false,
            max_objects: None,
            strict: true,
            pretty: false,
            replacer: None,
            reviver: None,
        }
    }
}

impl Settings {
    /// Returns a copy of `self` with every value set in `patch` replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use tj_reflect::serde::{Settings, SettingsPatch};
    ///
    /// let base = Settings::default();
    /// let merged = base.merge(&SettingsPatch::new().type_hint_key("$type").max_objects(Some(10)));
    ///
    /// assert_eq!(merged.type_hint_key, "$type");
    /// assert_eq!(merged.max_objects, Some(10));
    /// assert!(merged.enable_type_hints);
    /// ```
    pub fn merge(&self, patch: &SettingsPatch) -> Settings {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }

    /// Replaces every value set in `patch`, in place.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(key) = &patch.type_hint_key {
            self.type_hint_key.clone_from(key);
        }
        if let Some(enable) = patch.enable_type_hints {
            self.enable_type_hints = enable;
        }
        if let Some(require) = patch.require_type_hints {
            self.require_type_hints = require;
        }
        if let Some(max_objects) = patch.max_objects {
            self.max_objects = max_objects;
        }
        if let Some(strict) = patch.strict {
            self.strict = strict;
        }
        if let Some(pretty) = patch.pretty {
            self.pretty = pretty;
        }
        if let Some(replacer) = &patch.replacer {
            self.replacer = Some(replacer.clone());
        }
        if let Some(reviver) = &patch.reviver {
            self.reviver = Some(reviver.clone());
        }
    }

    /// Runs the replacer over a written tree.
    #[inline]
    pub fn replace(&self, value: Value) -> Value {
        match &self.replacer {
            Some(replacer) => apply_replacer(value, &**replacer),
            None => value,
        }
    }

    /// Runs the reviver over a parsed tree.
    #[inline]
    pub fn revive(&self, value: Value) -> Value {
        match &self.reviver {
            Some(reviver) => apply_reviver(value, &**reviver),
            None => value,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("type_hint_key", &self.type_hint_key)
            .field("enable_type_hints", &self.enable_type_hints)
            .field("require_type_hints", &self.require_type_hints)
            .field("max_objects", &self.max_objects)
            .field("strict", &self.strict)
            .field("pretty", &self.pretty)
            .field("replacer", &self.replacer.is_some())
            .field("reviver", &self.reviver.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SettingsPatch

/// A partial [`Settings`], merged shallowly on top of a base.
#[derive(Clone, Default)]
pub struct SettingsPatch {
    type_hint_key: Option<String>,
    enable_type_hints: Option<bool>,
    require_type_hints: Option<bool>,
    max_objects: Option<Option<usize>>,
    strict: Option<bool>,
    pretty: Option<bool>,
    replacer: Option<ValueHook>,
    reviver: Option<ValueHook>,
}

impl SettingsPatch {
    /// A patch that changes nothing.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn type_hint_key(mut self, key: impl Into<String>) -> Self {
        self.type_hint_key = Some(key.into());
        self
    }

    #[inline]
    pub fn enable_type_hints(mut self, enable: bool) -> Self {
        self.enable_type_hints = Some(enable);
        self
    }

    #[inline]
    pub fn require_type_hints(mut self, require: bool) -> Self {
        self.require_type_hints = Some(require);
        self
    }

    /// `None` removes the limit.
    #[inline]
    pub fn max_objects(mut self, max_objects: Option<usize>) -> Self {
        self.max_objects = Some(max_objects);
        self
    }

    #[inline]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    #[inline]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Sets the replacer, see [`ValueHook`].
    pub fn replacer(
        mut self,
        func: impl Fn(&str, Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.replacer = Some(Arc::new(func));
        self
    }

    /// Sets the reviver, see [`ValueHook`].
    pub fn reviver(
        mut self,
        func: impl Fn(&str, Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.reviver = Some(Arc::new(func));
        self
    }
}

impl fmt::Debug for SettingsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsPatch")
            .field("type_hint_key", &self.type_hint_key)
            .field("enable_type_hints", &self.enable_type_hints)
            .field("require_type_hints", &self.require_type_hints)
            .field("max_objects", &self.max_objects)
            .field("strict", &self.strict)
            .field("pretty", &self.pretty)
            .field("replacer", &self.replacer.is_some())
            .field("reviver", &self.reviver.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Hooks

/// Applies `replacer` top-down: an entry is replaced first, then the
/// replacement's children are visited.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use tj_reflect::serde::apply_replacer;
///
/// let out = apply_replacer(json!({ "a": 1, "secret": 2 }), &|key: &str, value: Value| {
///     (key != "secret").then_some(value)
/// });
/// assert_eq!(out, json!({ "a": 1 }));
/// ```
pub fn apply_replacer(value: Value, replacer: &dyn Fn(&str, Value) -> Option<Value>) -> Value {
    match replacer("", value) {
        Some(value) => replace_children(value, replacer),
        None => Value::Null,
    }
}

fn replace_children(value: Value, replacer: &dyn Fn(&str, Value) -> Option<Value>) -> Value {
    match value {
        Value::Object(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, child) in entries {
                if let Some(child) = replacer(&key, child) {
                    out.insert(key, replace_children(child, replacer));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match replacer(&index.to_string(), item) {
                    Some(item) => replace_children(item, replacer),
                    None => Value::Null,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Applies `reviver` bottom-up: children are revived before their parent
/// sees them.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use tj_reflect::serde::apply_reviver;
///
/// let out = apply_reviver(json!({ "n": 1, "list": [2, 3] }), &|_: &str, value: Value| {
///     match value.as_i64() {
///         Some(n) => Some(Value::from(n * 10)),
///         None => Some(value),
///     }
/// });
/// assert_eq!(out, json!({ "n": 10, "list": [20, 30] }));
/// ```
pub fn apply_reviver(value: Value, reviver: &dyn Fn(&str, Value) -> Option<Value>) -> Value {
    reviver("", revive_children(value, reviver)).unwrap_or(Value::Null)
}

fn revive_children(value: Value, reviver: &dyn Fn(&str, Value) -> Option<Value>) -> Value {
    match value {
        Value::Object(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, child) in entries {
                let child = revive_children(child, reviver);
                if let Some(child) = reviver(&key, child) {
                    out.insert(key, child);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    let item = revive_children(item, reviver);
                    reviver(&index.to_string(), item).unwrap_or(Value::Null)
                })
                .collect(),
        ),
        other => other,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use serde_json::{Value, json};

    use super::{Settings, SettingsPatch, apply_replacer, apply_reviver};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.type_hint_key, "__type");
        assert!(settings.enable_type_hints);
        assert!(!settings.require_type_hints);
        assert!(settings.strict);
        assert_eq!(settings.max_objects, None);
    }

    #[test]
    fn merge_is_shallow_and_last_wins() {
        let base = Settings::default().merge(&SettingsPatch::new().max_objects(Some(3)).strict(false));
        let merged = base.merge(&SettingsPatch::new().max_objects(None));

        assert_eq!(merged.max_objects, None);
        assert!(!merged.strict);
        assert_eq!(base.max_objects, Some(3));
    }

    #[test]
    fn replacer_visits_parents_first() {
        let seen = Mutex::new(Vec::new());
        let out = apply_replacer(json!({ "a": { "b": 1 } }), &|key: &str, value: Value| {
            seen.lock().unwrap().push(String::from(key));
            Some(value)
        });

        assert_eq!(out, json!({ "a": { "b": 1 } }));
        assert_eq!(*seen.lock().unwrap(), ["", "a", "b"]);
    }

    #[test]
    fn reviver_visits_children_first() {
        let seen = Mutex::new(Vec::new());
        let out = apply_reviver(json!({ "a": [true] }), &|key: &str, value: Value| {
            seen.lock().unwrap().push(String::from(key));
            Some(value)
        });

        assert_eq!(out, json!({ "a": [true] }));
        assert_eq!(*seen.lock().unwrap(), ["0", "a", ""]);
    }

    #[test]
    fn removed_array_items_become_null() {
        let out = apply_replacer(json!([1, 2, 3]), &|key: &str, value: Value| {
            (key != "1").then_some(value)
        });
        assert_eq!(out, json!([1, null, 3]));
    }
}
