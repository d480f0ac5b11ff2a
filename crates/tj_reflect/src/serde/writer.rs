use alloc::string::String;
use alloc::vec::Vec;

use chrono::SecondsFormat;
use serde_core::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ops::{List, Object, ReflectRef};
use crate::registry::{MemberDescriptor, TypeRegistry};
use crate::serde::Settings;
use crate::{DeclaredType, Reflect};

// -----------------------------------------------------------------------------
// Writer

/// Converts reflected values into JSON value trees.
///
/// # Write Rules
///
/// - `None` and [`Null`](crate::ops::Null) members are omitted, unless the
///   member asks for its default value. Inside arrays they are `null`.
/// - Dates are written as RFC 3339 UTC strings with millisecond precision.
/// - A registered [`serializer`](crate::registry::ObjectOptions::serializer)
///   owns the whole output of its type.
/// - Registered types are written member by member in sorted order. A type
///   hint is added when hints are enabled and either required by the
///   settings, or the value's type is not exactly the declared one.
/// - Objects without registered metadata are written key by key, without
///   type hints.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tj_reflect::derive::Reflect;
/// use tj_reflect::registry::{MemberOptions, ObjectOptions, TypeRegistry};
/// use tj_reflect::serde::{Settings, Writer};
///
/// #[derive(Reflect, Default)]
/// struct Tag {
///     label: String,
///     weight: Option<f64>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .register::<Tag>(ObjectOptions::new())
///     .member("label", MemberOptions::new()).unwrap()
///     .member("weight", MemberOptions::new()).unwrap();
///
/// let settings = Settings::default();
/// let tag = Tag { label: "rust".into(), weight: None };
///
/// let json = Writer::new(&registry, &settings).write(&tag);
/// assert_eq!(json, json!({ "label": "rust" }));
/// ```
#[derive(Clone, Copy)]
pub struct Writer<'a> {
    registry: &'a TypeRegistry,
    settings: &'a Settings,
}

// The declared side of one written value.
#[derive(Clone, Copy)]
struct Slot<'d> {
    ty: DeclaredType,
    elements: Option<&'d MemberDescriptor>,
    emit_default: bool,
}

impl<'d> Slot<'d> {
    const ANY: Slot<'static> = Slot {
        ty: DeclaredType::Any,
        elements: None,
        emit_default: false,
    };

    fn of(member: &'d MemberDescriptor) -> Self {
        Self {
            ty: member.ty,
            elements: member.elements.as_deref(),
            emit_default: member.emit_default_value,
        }
    }

    // Array items always produce a value.
    fn element(&self) -> Slot<'d> {
        match self.elements {
            Some(elements) => Slot {
                emit_default: false,
                ..Slot::of(elements)
            },
            None => Slot::ANY,
        }
    }
}

impl<'a> Writer<'a> {
    /// Creates a writer.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    /// Writes `value`, using its own type as the declared type.
    ///
    /// A root without a value is written as `null`.
    pub fn write(&self, value: &dyn Reflect) -> Value {
        let view = value.reflect_ref();
        let ty = match &view {
            ReflectRef::Object(object) => DeclaredType::Type(object.type_ref()),
            _ => DeclaredType::Any,
        };
        let slot = Slot { ty, ..Slot::ANY };
        self.write_view(view, slot).unwrap_or(Value::Null)
    }

    /// Writes `value` as a member declared by `member`.
    ///
    /// Returns `None` if the member would be omitted.
    pub fn write_member(&self, value: &dyn Reflect, member: &MemberDescriptor) -> Option<Value> {
        self.write_view(value.reflect_ref(), Slot::of(member))
    }

    fn write_view(&self, view: ReflectRef<'_>, slot: Slot<'_>) -> Option<Value> {
        match view {
            ReflectRef::Null => slot.emit_default.then(|| default_value(&slot.ty)),
            ReflectRef::Bool(value) => Some(Value::Bool(value)),
            ReflectRef::Number(number) => Some(Value::Number(number)),
            ReflectRef::String(text) => Some(Value::String(String::from(text))),
            ReflectRef::Date(date) => Some(Value::String(
                date.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            ReflectRef::List(list) => Some(self.write_list(list, slot)),
            ReflectRef::Object(object) => Some(self.write_object(object, slot)),
        }
    }

    fn write_list(&self, list: &dyn List, slot: Slot<'_>) -> Value {
        let element = slot.element();
        let items: Vec<Value> = list
            .iter()
            .map(|item| {
                self.write_view(item.reflect_ref(), element)
                    .unwrap_or(Value::Null)
            })
            .collect();
        Value::Array(items)
    }

    fn write_object(&self, object: &dyn Object, slot: Slot<'_>) -> Value {
        let ty = object.type_ref();
        let Some(meta) = self.registry.get_metadata(ty.id()) else {
            return self.write_plain(object);
        };

        if let Some(serializer) = meta.serializer() {
            let value: &dyn Reflect = object;
            return serializer(value);
        }

        let mut json = Map::new();

        let settings = self.settings;
        let hinted = settings.enable_type_hints
            && (settings.require_type_hints || slot.ty != DeclaredType::Type(ty));
        if hinted {
            json.insert(
                settings.type_hint_key.clone(),
                Value::String(self.registry.known_type_name(ty)),
            );
        }

        for member in meta.sorted_members() {
            // The hint wins over a member sharing its name.
            if hinted && member.name == settings.type_hint_key {
                log::warn!(
                    "member '{}' of '{}' is shadowed by the type hint",
                    member.name,
                    meta.class_name(),
                );
                continue;
            }
            let view = match object.member(&member.key) {
                Some(value) => value.reflect_ref(),
                None => ReflectRef::Null,
            };
            if let Some(value) = self.write_view(view, Slot::of(member)) {
                json.insert(member.name.clone(), value);
            }
        }

        Value::Object(json)
    }

    fn write_plain(&self, object: &dyn Object) -> Value {
        log::trace!(
            "writing '{}' without metadata",
            object.type_ref().short_name()
        );

        let mut json = Map::new();
        for key in object.keys() {
            let Some(value) = object.member(key) else {
                continue;
            };
            if let Some(value) = self.write_view(value.reflect_ref(), Slot::ANY) {
                json.insert(String::from(key), value);
            }
        }
        Value::Object(json)
    }
}

/// The value written for an undefined member that asks for its default.
fn default_value(ty: &DeclaredType) -> Value {
    match ty {
        DeclaredType::Number => Value::from(0),
        DeclaredType::String => Value::String(String::new()),
        DeclaredType::Boolean => Value::Bool(false),
        DeclaredType::Array => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

// -----------------------------------------------------------------------------
// Serializable

/// A reflected value that implements [`Serialize`].
///
/// Serializes what the [`Writer`] produces, after the settings' replacer.
/// This lets typed values be embedded in other `serde` data structures.
///
/// # Examples
///
/// ```
/// use tj_reflect::registry::TypeRegistry;
/// use tj_reflect::serde::{Serializable, Settings};
///
/// let registry = TypeRegistry::new();
/// let settings = Settings::default();
/// let tags = vec![String::from("a"), String::from("b")];
///
/// let text = serde_json::to_string(&Serializable::new(&tags, &registry, &settings)).unwrap();
/// assert_eq!(text, r#"["a","b"]"#);
/// ```
#[derive(Clone, Copy)]
pub struct Serializable<'a> {
    value: &'a dyn Reflect,
    writer: Writer<'a>,
}

impl<'a> Serializable<'a> {
    #[inline]
    pub const fn new(
        value: &'a dyn Reflect,
        registry: &'a TypeRegistry,
        settings: &'a Settings,
    ) -> Self {
        Self {
            value,
            writer: Writer::new(registry, settings),
        }
    }

    /// Returns the JSON value tree, after the replacer.
    #[inline]
    pub fn to_value(&self) -> Value {
        self.writer.settings.replace(self.writer.write(self.value))
    }
}

impl Serialize for Serializable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    use super::Writer;
    use crate::derive::Reflect;
    use crate::ops::PlainObject;
    use crate::registry::{MemberOptions, ObjectOptions, TypeRegistry};
    use crate::serde::{Settings, SettingsPatch};
    use crate::{DeclaredType, Reflect};

    trait Animal: Reflect {}

    #[derive(Reflect, Default)]
    #[reflect(upcast(dyn Animal))]
    struct Cat {
        name: String,
        lives: u8,
    }

    impl Animal for Cat {}

    #[derive(Reflect, Default)]
    struct Shelter {
        resident: Option<Box<dyn Animal>>,
        favorite: Option<Cat>,
        anything: Option<Box<dyn Reflect>>,
        opened: Option<chrono::DateTime<Utc>>,
        tags: Vec<Option<String>>,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_abstract::<dyn Animal>(ObjectOptions::new());
        registry
            .register::<Cat>(ObjectOptions::new())
            .member("name", MemberOptions::new())
            .unwrap()
            .member("lives", MemberOptions::new().emit_default(true))
            .unwrap();
        registry
            .register::<Shelter>(ObjectOptions::new())
            .member("resident", MemberOptions::new())
            .unwrap()
            .member("favorite", MemberOptions::new())
            .unwrap()
            .member("anything", MemberOptions::new().ty(DeclaredType::Any))
            .unwrap()
            .member("opened", MemberOptions::new())
            .unwrap()
            .member("tags", MemberOptions::new().emit_default(true))
            .unwrap();
        registry
    }

    fn cat(name: &str) -> Cat {
        Cat {
            name: name.into(),
            lives: 9,
        }
    }

    #[test]
    fn hints_only_where_types_differ() {
        let registry = registry();
        let settings = Settings::default();
        let shelter = Shelter {
            resident: Some(Box::new(cat("Tom"))),
            favorite: Some(cat("Kit")),
            anything: Some(Box::new(cat("Any"))),
            ..Default::default()
        };

        let json = Writer::new(&registry, &settings).write(&shelter);
        assert_eq!(
            json,
            json!({
                "anything": { "__type": "Cat", "lives": 9, "name": "Any" },
                "favorite": { "lives": 9, "name": "Kit" },
                "resident": { "__type": "Cat", "lives": 9, "name": "Tom" },
                "tags": [],
            })
        );
    }

    #[test]
    fn abstract_flag_does_not_force_hints() {
        let mut registry = registry();
        registry
            .add_member::<Shelter>("favorite", MemberOptions::new().refers_abstract(true))
            .unwrap();
        let settings = Settings::default();
        let shelter = Shelter {
            favorite: Some(cat("Kit")),
            ..Default::default()
        };

        let json = Writer::new(&registry, &settings).write(&shelter);
        assert_eq!(json["favorite"], json!({ "lives": 9, "name": "Kit" }));
    }

    #[test]
    fn hint_shadows_member_of_same_name() {
        let registry = registry();
        let settings = Settings::default().merge(
            &SettingsPatch::new()
                .require_type_hints(true)
                .type_hint_key("name"),
        );

        let json = Writer::new(&registry, &settings).write(&cat("Tom"));
        assert_eq!(json, json!({ "lives": 9, "name": "Cat" }));
    }

    #[test]
    fn required_hints_everywhere() {
        let registry = registry();
        let settings = Settings::default().merge(&SettingsPatch::new().require_type_hints(true));

        let json = Writer::new(&registry, &settings).write(&cat("Tom"));
        assert_eq!(json, json!({ "__type": "Cat", "lives": 9, "name": "Tom" }));

        let disabled = settings.merge(&SettingsPatch::new().enable_type_hints(false));
        let json = Writer::new(&registry, &disabled).write(&cat("Tom"));
        assert!(json.get("__type").is_none());
    }

    #[test]
    fn dates_and_array_nulls() {
        let registry = registry();
        let settings = Settings::default();
        let shelter = Shelter {
            opened: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
            tags: vec![Some("a".into()), None],
            ..Default::default()
        };

        let json = Writer::new(&registry, &settings).write(&shelter);
        assert_eq!(json["opened"], json!("2020-01-02T03:04:05.000Z"));
        assert_eq!(json["tags"], json!(["a", null]));
    }

    #[test]
    fn serializer_owns_output() {
        let mut registry = registry();
        registry.register::<Cat>(
            ObjectOptions::new().serializer_typed(|cat: &Cat| Value::String(cat.name.clone())),
        );
        let settings = Settings::default();

        let json = Writer::new(&registry, &settings).write(&cat("Tom"));
        assert_eq!(json, json!("Tom"));
    }

    #[test]
    fn plain_objects_have_no_hints() {
        let registry = registry();
        let settings = Settings::default().merge(&SettingsPatch::new().require_type_hints(true));

        let mut object = PlainObject::new();
        object.insert("b", 2_u8.into_boxed_reflect());
        object.insert("a", None::<String>.into_boxed_reflect());
        object.insert("c", cat("Tom").into_boxed_reflect());

        let json = Writer::new(&registry, &settings).write(&object);
        assert_eq!(
            json,
            json!({ "b": 2, "c": { "__type": "Cat", "lives": 9, "name": "Tom" } })
        );
    }

    #[test]
    fn member_order_is_sorted() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Cat>(ObjectOptions::new())
            .member("name", MemberOptions::new().order(1))
            .unwrap()
            .member("lives", MemberOptions::new().order(0))
            .unwrap();
        let settings = Settings::default();

        let json = Writer::new(&registry, &settings).write(&cat("Tom"));
        let text = serde_json::to_string(&json).unwrap();
        assert_eq!(text, r#"{"lives":9,"name":"Tom"}"#);
    }
}
