use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::ops::{Null, PlainObject, ReflectMut};
use crate::registry::{
    KnownTypeScope, KnownTypeTable, MemberDescriptor, TypeMetadata, TypeRegistry,
};
use crate::serde::{PropertyPath, Settings, count_leaves};
use crate::{DeclaredType, Error, FromReflect, Reflect, TypeRef, TypeShape, Typed};

// -----------------------------------------------------------------------------
// Reader

/// Builds reflected values from JSON value trees.
///
/// # Read Rules
///
/// Values are resolved in this order:
///
/// 1. `null` and absent values read as [`Null`], or fail with
///    [`Error::RequiredMember`] for required members.
/// 2. `Number`, `String` and `Boolean` slots accept exactly that JSON kind.
/// 3. `Array` slots read every item with the element descriptor.
/// 4. `Date` slots accept RFC 3339 strings, local date-times and plain dates.
/// 5. Object slots resolve the type hint against the known types in scope,
///    then use the type's initializer, or construct an instance and read its
///    members in sorted order.
///
/// `Any` slots read whatever JSON kind they find. Objects without registered
/// metadata become a [`PlainObject`].
///
/// Reading a registered root type first checks the input against
/// [`Settings::max_objects`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tj_reflect::{DeclaredType, Error};
/// use tj_reflect::ops::PlainObject;
/// use tj_reflect::registry::TypeRegistry;
/// use tj_reflect::serde::{Reader, Settings};
///
/// let registry = TypeRegistry::new();
/// let settings = Settings::default();
/// let reader = Reader::new(&registry, &settings);
///
/// let value = reader.read(&json!({ "a": "x" }), &DeclaredType::Any).unwrap();
/// let object = value.downcast_ref::<PlainObject>().unwrap();
/// assert_eq!(object.get_as::<String>("a").map(String::as_str), Some("x"));
///
/// let err = reader.read(&json!("7"), &DeclaredType::Number).unwrap_err();
/// assert!(matches!(err, Error::TypeMismatch { expected, .. } if expected == "number"));
/// ```
#[derive(Clone, Copy)]
pub struct Reader<'a> {
    registry: &'a TypeRegistry,
    settings: &'a Settings,
}

impl<'a> Reader<'a> {
    /// Creates a reader.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    /// Reads `json` as a value of the declared type.
    ///
    /// Arrays read this way have no element type. Use
    /// [`read_shape`](Self::read_shape) to describe nested arrays.
    #[inline]
    pub fn read(&self, json: &Value, declared: &DeclaredType) -> Result<Box<dyn Reflect>, Error> {
        self.read_shape(json, &TypeShape::new(*declared))
    }

    /// Reads `json` as a value of the given shape.
    pub fn read_shape(&self, json: &Value, shape: &TypeShape) -> Result<Box<dyn Reflect>, Error> {
        let root = self.root_metadata(shape);

        if let (Some(_), Some(limit)) = (root, self.settings.max_objects) {
            let count = count_leaves(json);
            if count > limit {
                return Err(Error::BudgetExceeded { limit, count });
            }
        }

        let name = root_name(root);
        let descriptor = MemberDescriptor::from_shape("", shape);
        let scope = KnownTypeScope::new(root.and_then(|meta| self.known_types(meta)));
        let path = PropertyPath::root(&name);

        self.read_value(Some(json), &descriptor, &scope, &path)
    }

    /// Reads `json` as a `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tj_reflect::registry::TypeRegistry;
    /// use tj_reflect::serde::{Reader, Settings};
    ///
    /// let registry = TypeRegistry::new();
    /// let settings = Settings::default();
    ///
    /// let grid: Vec<Vec<u8>> = Reader::new(&registry, &settings)
    ///     .read_as(&json!([[1, 2], [3]]))
    ///     .unwrap();
    /// assert_eq!(grid, [vec![1, 2], vec![3]]);
    /// ```
    pub fn read_as<T: FromReflect + Typed>(&self, json: &Value) -> Result<T, Error> {
        let shape = T::type_shape();
        let value = self.read_shape(json, &shape)?;
        T::from_reflect(value, self.registry).map_err(|rejected| Error::TypeMismatch {
            path: root_name(self.root_metadata(&shape)),
            expected: tj_utils::short_type_name(core::any::type_name::<T>()),
            found: (*rejected).type_ref().short_name(),
        })
    }

    fn root_metadata(&self, shape: &TypeShape) -> Option<&'a TypeMetadata> {
        match shape.ty {
            DeclaredType::Type(ty) => self.registry.get_metadata(ty.id()),
            _ => None,
        }
    }

    fn known_types(&self, meta: &TypeMetadata) -> Option<&'a KnownTypeTable> {
        self.registry.known_types_of(meta.ty().id())
    }

    fn read_value(
        &self,
        json: Option<&Value>,
        descriptor: &MemberDescriptor,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        let json = match json {
            None | Some(Value::Null) => {
                if descriptor.is_required {
                    return Err(Error::RequiredMember {
                        path: path.render(),
                    });
                }
                return Ok(Null.into_boxed_reflect());
            }
            Some(json) => json,
        };

        match descriptor.ty {
            DeclaredType::Any => self.read_any(json, scope, path),
            DeclaredType::Number => match json {
                Value::Number(number) => Ok(number.clone().into_boxed_reflect()),
                _ => Err(mismatch(path, &descriptor.ty, json)),
            },
            DeclaredType::String => match json {
                Value::String(text) => Ok(text.clone().into_boxed_reflect()),
                _ => Err(mismatch(path, &descriptor.ty, json)),
            },
            DeclaredType::Boolean => match json {
                Value::Bool(value) => Ok((*value).into_boxed_reflect()),
                _ => Err(mismatch(path, &descriptor.ty, json)),
            },
            DeclaredType::Array => match json {
                Value::Array(items) => {
                    self.read_array(items, descriptor.elements.as_deref(), scope, path)
                }
                _ => Err(mismatch(path, &descriptor.ty, json)),
            },
            DeclaredType::Date => match json.as_str().and_then(parse_date) {
                Some(date) => Ok(date.into_boxed_reflect()),
                None => Err(mismatch(path, &descriptor.ty, json)),
            },
            DeclaredType::Type(ty) => match json {
                Value::Object(map) => self.read_object(json, map, Some(ty), scope, path),
                _ => Err(Error::TypeMismatch {
                    path: path.render(),
                    expected: self.registry.known_type_name(ty),
                    found: String::from(kind_name(json)),
                }),
            },
        }
    }

    fn read_any(
        &self,
        json: &Value,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        Ok(match json {
            Value::Null => Null.into_boxed_reflect(),
            Value::Bool(value) => (*value).into_boxed_reflect(),
            Value::Number(number) => number.clone().into_boxed_reflect(),
            Value::String(text) => text.clone().into_boxed_reflect(),
            Value::Array(items) => self.read_array(items, None, scope, path)?,
            Value::Object(map) => self.read_object(json, map, None, scope, path)?,
        })
    }

    fn read_array(
        &self,
        items: &[Value],
        elements: Option<&MemberDescriptor>,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        let any;
        let elements = match elements {
            Some(elements) => elements,
            None => {
                any = MemberDescriptor::new("", DeclaredType::Any);
                &any
            }
        };

        let path = path.element();
        let list = items
            .iter()
            .map(|item| self.read_value(Some(item), elements, scope, &path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(list.into_boxed_reflect())
    }

    fn read_object(
        &self,
        json: &Value,
        map: &Map<String, Value>,
        declared: Option<TypeRef>,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        let declared_meta = declared.and_then(|ty| self.registry.get_metadata(ty.id()));
        let scope = scope.push(declared_meta.and_then(|meta| self.known_types(meta)));

        let resolved = match self.resolve_hint(map, declared, &scope, path)? {
            Some(hinted) => Some(hinted),
            None => declared,
        };

        let Some(meta) = resolved.and_then(|ty| self.registry.get_metadata(ty.id())) else {
            return self.read_plain(map, &scope, path);
        };

        if let Some(initializer) = meta.initializer() {
            return Ok(initializer(json).unwrap_or_else(|| Null.into_boxed_reflect()));
        }

        let Some(mut instance) = meta.construct() else {
            return Err(Error::NotConstructible {
                path: path.render(),
                ty: String::from(meta.class_name()),
            });
        };

        let scope = scope.push(self.known_types(meta));
        for member in meta.sorted_members() {
            let member_path = path.member(&member.name);
            let value = self.read_value(map.get(&member.name), member, &scope, &member_path)?;
            if value.is::<Null>() {
                continue;
            }

            let result = match instance.reflect_mut() {
                ReflectMut::Object(object) => object.set_member(&member.key, value, self.registry),
                ReflectMut::Opaque(_) => Err(value),
            };
            if let Err(rejected) = result {
                return Err(Error::Assign {
                    path: member_path.render(),
                    found: (*rejected).type_ref().short_name(),
                });
            }
        }

        Ok(instance)
    }

    /// Returns the type named by the hint of `map`, if any.
    fn resolve_hint(
        &self,
        map: &Map<String, Value>,
        declared: Option<TypeRef>,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Option<TypeRef>, Error> {
        let settings = self.settings;
        if !settings.enable_type_hints {
            return Ok(None);
        }

        let hint = match map.get(&settings.type_hint_key) {
            None | Some(Value::Null) => {
                if settings.require_type_hints {
                    return Err(Error::MissingTypeHint {
                        path: path.render(),
                    });
                }
                return Ok(None);
            }
            Some(Value::String(hint)) => hint,
            Some(_) => {
                return Err(Error::InvalidTypeHint {
                    path: path.render(),
                    key: settings.type_hint_key.clone(),
                });
            }
        };

        let Some(ty) = self.registry.resolve_known_type(scope, hint) else {
            return Err(Error::UnknownType {
                path: path.render(),
                hint: hint.clone(),
            });
        };

        if let Some(declared) = declared {
            if settings.strict && !self.registry.is_subtype(ty, declared) {
                return Err(Error::InvalidSubtype {
                    path: path.render(),
                    hint: hint.clone(),
                    expected: self.registry.known_type_name(declared),
                });
            }
        }

        Ok(Some(ty))
    }

    fn read_plain(
        &self,
        map: &Map<String, Value>,
        scope: &KnownTypeScope<'_>,
        path: &PropertyPath<'_>,
    ) -> Result<Box<dyn Reflect>, Error> {
        log::trace!("reading '{path}' without metadata");

        let any = MemberDescriptor::new("", DeclaredType::Any);
        let mut object = PlainObject::new();
        for (key, json) in map {
            if *key == self.settings.type_hint_key {
                continue;
            }
            let member_path = path.member(key);
            let value = self.read_value(Some(json), &any, scope, &member_path)?;
            if !value.is::<Null>() {
                object.insert(key.as_str(), value);
            }
        }
        Ok(object.into_boxed_reflect())
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn root_name(root: Option<&TypeMetadata>) -> String {
    match root {
        Some(meta) => String::from(meta.class_name()),
        None => String::new(),
    }
}

fn kind_name(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &PropertyPath<'_>, expected: &DeclaredType, json: &Value) -> Error {
    Error::TypeMismatch {
        path: path.render(),
        expected: expected.display_name(),
        found: String::from(kind_name(json)),
    }
}

/// Parses RFC 3339, then `YYYY-MM-DDTHH:MM:SS[.fff]` as UTC, then
/// `YYYY-MM-DD` as UTC midnight.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{Value, json};

    use super::{Reader, parse_date};
    use crate::derive::Reflect;
    use crate::ops::{Null, PlainObject};
    use crate::registry::{MemberOptions, ObjectOptions, TypeRegistry};
    use crate::serde::{Settings, SettingsPatch};
    use crate::{DeclaredType, Error, Reflect};

    trait Shape: Reflect {
        fn area(&self) -> f64;
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(upcast(dyn Shape))]
    struct Square {
        side: f64,
    }

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.side * self.side
        }
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(upcast(dyn Shape))]
    struct Circle {
        radius: f64,
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            3.0 * self.radius * self.radius
        }
    }

    #[derive(Reflect, Default)]
    struct Drawing {
        title: String,
        shapes: Vec<Box<dyn Shape>>,
        main: Option<Box<dyn Shape>>,
        square: Option<Square>,
        created: Option<DateTime<Utc>>,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_abstract::<dyn Shape>(ObjectOptions::new());
        registry
            .register::<Square>(ObjectOptions::new())
            .member("side", MemberOptions::new())
            .unwrap();
        registry
            .register::<Circle>(ObjectOptions::new())
            .member("radius", MemberOptions::new())
            .unwrap();
        registry
            .register::<Drawing>(
                ObjectOptions::new()
                    .known_type::<Square>()
                    .known_type::<Circle>(),
            )
            .member("title", MemberOptions::new().required(true))
            .unwrap()
            .member("shapes", MemberOptions::new())
            .unwrap()
            .member("main", MemberOptions::new().refers_abstract(true))
            .unwrap()
            .member("square", MemberOptions::new())
            .unwrap()
            .member("created", MemberOptions::new())
            .unwrap();
        registry
    }

    fn read(json: Value, settings: &Settings) -> Result<Drawing, Error> {
        let registry = registry();
        Reader::new(&registry, settings).read_as::<Drawing>(&json)
    }

    fn read_err(json: Value, settings: &Settings) -> Error {
        match read(json, settings) {
            Ok(_) => panic!("expected the read to fail"),
            Err(err) => err,
        }
    }

    #[test]
    fn hinted_trait_objects() {
        let drawing = read(
            json!({
                "title": "t",
                "shapes": [
                    { "__type": "Square", "side": 2 },
                    { "__type": "Circle", "radius": 1 },
                ],
                "main": { "__type": "Circle", "radius": 2 },
                "square": { "side": 3 },
            }),
            &Settings::default(),
        )
        .unwrap();

        let areas: Vec<f64> = drawing.shapes.iter().map(|shape| shape.area()).collect();
        assert_eq!(areas, [4.0, 3.0]);
        assert_eq!(drawing.main.unwrap().area(), 12.0);
        assert_eq!(drawing.square.unwrap().side, 3.0);
        assert!(drawing.created.is_none());
    }

    #[test]
    fn missing_required_member() {
        let err = read_err(json!({ "shapes": [] }), &Settings::default());
        assert!(matches!(err, Error::RequiredMember { path } if path == "Drawing.title"));

        let err = read_err(json!({ "title": null }), &Settings::default());
        assert!(matches!(err, Error::RequiredMember { .. }));
    }

    #[test]
    fn falsy_values_satisfy_required_members() {
        #[derive(Reflect, Default)]
        struct Counter {
            count: u32,
            on: bool,
            label: String,
        }

        let mut registry = TypeRegistry::new();
        registry
            .register::<Counter>(ObjectOptions::new())
            .member("count", MemberOptions::new().required(true))
            .unwrap()
            .member("on", MemberOptions::new().required(true))
            .unwrap()
            .member("label", MemberOptions::new().required(true))
            .unwrap();

        let settings = Settings::default();
        let counter: Counter = Reader::new(&registry, &settings)
            .read_as(&json!({ "count": 0, "on": false, "label": "" }))
            .unwrap();
        assert_eq!((counter.count, counter.on, counter.label.as_str()), (0, false, ""));
    }

    #[test]
    fn missing_hint_falls_back_to_declared_type() {
        // `main` is abstract, so the fallback cannot be built.
        let err = read_err(
            json!({ "title": "t", "main": { "radius": 2 } }),
            &Settings::default(),
        );
        assert!(matches!(err, Error::NotConstructible { path, ty } if path == "Drawing.main" && ty == "Shape"));

        // A concrete member reads as its declared type.
        let drawing = read(
            json!({ "title": "t", "square": { "side": 2 } }),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(drawing.square.unwrap().side, 2.0);
    }

    #[test]
    fn required_hints() {
        let settings = Settings::default().merge(&SettingsPatch::new().require_type_hints(true));
        let err = read_err(
            json!({ "__type": "Drawing", "title": "t", "square": { "side": 2 } }),
            &settings,
        );
        assert!(matches!(err, Error::MissingTypeHint { path } if path == "Drawing.square"));
    }

    #[test]
    fn rejected_root_names_the_root() {
        let mut registry = registry();
        registry.register::<Square>(ObjectOptions::new().known_type::<Circle>());
        let settings = Settings::default().merge(&SettingsPatch::new().strict(false));

        let result = Reader::new(&registry, &settings)
            .read_as::<Square>(&json!({ "__type": "Circle", "radius": 1 }));
        match result {
            Err(Error::TypeMismatch { path, expected, found }) => {
                assert_eq!(path, "Square");
                assert_eq!(expected, "Square");
                assert_eq!(found, "Circle");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn abstract_element_without_hint_is_not_constructible() {
        let err = read_err(
            json!({ "title": "t", "shapes": [{ "side": 1 }] }),
            &Settings::default(),
        );
        assert!(matches!(err, Error::NotConstructible { path, .. } if path == "Drawing.shapes[]"));
    }

    #[test]
    fn hint_errors() {
        let settings = Settings::default();

        let err = read_err(
            json!({ "title": "t", "shapes": [{ "__type": "Hexagon" }] }),
            &settings,
        );
        assert!(matches!(err, Error::UnknownType { hint, .. } if hint == "Hexagon"));

        let err = read_err(json!({ "title": "t", "shapes": [{ "__type": 5 }] }), &settings);
        assert!(matches!(err, Error::InvalidTypeHint { .. }));

        let err = read_err(
            json!({ "title": "t", "square": { "__type": "Circle", "radius": 1 } }),
            &settings,
        );
        assert!(matches!(
            err,
            Error::InvalidSubtype { hint, expected, .. } if hint == "Circle" && expected == "Square"
        ));
    }

    #[test]
    fn lenient_subtypes_fail_on_assignment() {
        let settings = Settings::default().merge(&SettingsPatch::new().strict(false));
        let err = read_err(
            json!({ "title": "t", "square": { "__type": "Circle", "radius": 1 } }),
            &settings,
        );
        assert!(matches!(err, Error::Assign { path, found } if path == "Drawing.square" && found == "Circle"));
    }

    #[test]
    fn primitive_kinds_are_strict() {
        let err = read_err(json!({ "title": 5 }), &Settings::default());
        assert_eq!(
            err.to_string(),
            "Drawing.title: Expected value to be of type 'string', got 'number'."
        );
    }

    #[test]
    fn budget() {
        let json = json!({ "title": "t", "square": { "side": 1 }, "created": "2020-01-01" });
        let at_limit = Settings::default().merge(&SettingsPatch::new().max_objects(Some(3)));
        assert!(read(json.clone(), &at_limit).is_ok());

        let below = Settings::default().merge(&SettingsPatch::new().max_objects(Some(2)));
        let err = read_err(json, &below);
        assert!(matches!(err, Error::BudgetExceeded { limit: 2, count: 3 }));
    }

    #[test]
    fn any_reads_by_kind() {
        let registry = registry();
        let settings = Settings::default().merge(&SettingsPatch::new().enable_type_hints(false));
        let reader = Reader::new(&registry, &settings);

        // The hint key is never copied into plain objects.
        let value = reader
            .read(&json!([1, "a", null, { "__type": "x", "k": true }]), &DeclaredType::Any)
            .unwrap();
        let items = value.take::<Vec<Box<dyn Reflect>>>().unwrap();

        assert!(items[0].is::<serde_json::Number>());
        assert!(items[1].is::<String>());
        assert!(items[2].is::<Null>());
        let object = items[3].downcast_ref::<PlainObject>().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get_as::<bool>("k"), Some(&true));
    }

    #[test]
    fn initializer_replaces_member_reading() {
        let mut registry = registry();
        registry.register::<Square>(ObjectOptions::new().initializer_typed(|json: &Value| {
            Some(Square {
                side: json.get("size")?.as_f64()?,
            })
        }));
        let settings = Settings::default();

        let square: Square = Reader::new(&registry, &settings)
            .read_as(&json!({ "size": 5 }))
            .unwrap();
        assert_eq!(square.side, 5.0);

        let missing: Option<Square> = Reader::new(&registry, &settings)
            .read_as(&json!({}))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn date_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2021-03-04T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2021-03-04T00:00:00.000"), Some(expected));
        assert_eq!(parse_date("2021-03-04"), Some(expected));
        assert_eq!(parse_date("2021-03-04T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }
}
