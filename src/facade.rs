use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

use serde_json::Value;
use tj_reflect::ops::Object;
use tj_reflect::registry::{MemberOptions, ObjectOptions, TypeRegistryArc};
use tj_reflect::serde::{Reader, Serializable, Settings, SettingsPatch};
use tj_reflect::{DeclaredType, Error, FromReflect, Introspect, Reflect, Result, Typed};

// -----------------------------------------------------------------------------
// TypedJson

/// A type registry plus the default settings used by every call.
///
/// Each call may pass a [`SettingsPatch`] which is merged over the defaults
/// for that call only.
///
/// # Examples
///
/// ```
/// use typed_json::{MemberOptions, ObjectOptions, Reflect, TypedJson};
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let json = TypedJson::new();
/// json.registry()
///     .write()
///     .register::<Point>(ObjectOptions::new())
///     .member("x", MemberOptions::new()).unwrap()
///     .member("y", MemberOptions::new()).unwrap();
///
/// let text = json.serialize(&Point { x: 1, y: 2 }, None).unwrap();
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
///
/// let point: Point = json.deserialize(&text, None).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
pub struct TypedJson {
    registry: TypeRegistryArc,
    defaults: RwLock<Settings>,
}

impl Default for TypedJson {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedJson {
    /// An empty registry with default settings.
    pub fn new() -> Self {
        Self {
            registry: TypeRegistryArc::default(),
            defaults: RwLock::new(Settings::default()),
        }
    }

    /// The process-wide instance used by the free functions.
    pub fn global() -> &'static TypedJson {
        static GLOBAL: LazyLock<TypedJson> = LazyLock::new(TypedJson::new);
        &GLOBAL
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Merges `patch` into the default settings.
    ///
    /// Values the patch leaves unset keep their current value.
    pub fn configure(&self, patch: SettingsPatch) {
        log::debug!("Configure defaults with {patch:?}.");
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(&patch);
    }

    /// Returns a snapshot of the default settings.
    pub fn settings(&self) -> Settings {
        self.defaults().clone()
    }

    fn defaults(&self) -> RwLockReadGuard<'_, Settings> {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn effective(&self, patch: Option<&SettingsPatch>) -> Settings {
        match patch {
            Some(patch) => self.defaults().merge(patch),
            None => self.settings(),
        }
    }

    /// Registers `T` and its members in one step.
    ///
    /// Returns the non-fatal errors reported while registering `T`, such as
    /// an unregistered parent. Member errors abort the call.
    pub fn register<'k, T: Object + Default + Introspect>(
        &self,
        options: ObjectOptions,
        members: impl IntoIterator<Item = (&'k str, MemberOptions)>,
    ) -> Result<Vec<Error>> {
        let mut registry = self.registry.write();
        let mut registration = registry.register::<T>(options);
        for (key, member) in members {
            registration = registration.member(key, member)?;
        }
        Ok(registration.into_reported())
    }

    /// Writes `value` to a JSON value tree, after the replacer.
    pub fn to_value(&self, value: &dyn Reflect, patch: Option<SettingsPatch>) -> Value {
        let settings = self.effective(patch.as_ref());
        let registry = self.registry.read();
        Serializable::new(value, &registry, &settings).to_value()
    }

    /// Writes `value` to JSON text.
    ///
    /// The text is indented when `pretty` is set.
    pub fn serialize(&self, value: &dyn Reflect, patch: Option<SettingsPatch>) -> Result<String> {
        let settings = self.effective(patch.as_ref());
        let registry = self.registry.read();
        let serializable = Serializable::new(value, &registry, &settings);

        let text = if settings.pretty {
            serde_json::to_string_pretty(&serializable)?
        } else {
            serde_json::to_string(&serializable)?
        };
        Ok(text)
    }

    /// Reads JSON text as a `T`.
    ///
    /// The text is parsed and revived, then read with `T`'s declared shape.
    pub fn deserialize<T: FromReflect + Typed>(
        &self,
        text: &str,
        patch: Option<SettingsPatch>,
    ) -> Result<T> {
        let settings = self.effective(patch.as_ref());
        let json = settings.revive(serde_json::from_str(text)?);
        let registry = self.registry.read();
        Reader::new(&registry, &settings).read_as(&json)
    }

    /// Reads JSON text against a declared type, returning the reflected value.
    ///
    /// # Examples
    ///
    /// ```
    /// use typed_json::{DeclaredType, TypedJson};
    /// use typed_json::reflect::ops::PlainObject;
    ///
    /// let json = TypedJson::new();
    /// let value = json
    ///     .deserialize_dynamic(r#"{"a":[1,"b"]}"#, DeclaredType::Any, None)
    ///     .unwrap();
    ///
    /// let object = value.downcast_ref::<PlainObject>().unwrap();
    /// assert_eq!(object.len(), 1);
    /// ```
    pub fn deserialize_dynamic(
        &self,
        text: &str,
        declared: DeclaredType,
        patch: Option<SettingsPatch>,
    ) -> Result<Box<dyn Reflect>> {
        let settings = self.effective(patch.as_ref());
        let json = settings.revive(serde_json::from_str(text)?);
        let registry = self.registry.read();
        Reader::new(&registry, &settings).read(&json, &declared)
    }

    /// Parses JSON text and applies the reviver. Nothing is typed.
    pub fn parse(&self, text: &str, patch: Option<SettingsPatch>) -> Result<Value> {
        let settings = self.effective(patch.as_ref());
        Ok(settings.revive(serde_json::from_str(text)?))
    }
}

impl core::fmt::Debug for TypedJson {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypedJson")
            .field("registry", &self.registry)
            .field("defaults", &*self.defaults())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Global shorthands

/// [`TypedJson::configure`] on the global instance.
pub fn configure(patch: SettingsPatch) {
    TypedJson::global().configure(patch);
}

/// [`TypedJson::register`] on the global instance.
pub fn register<'k, T: Object + Default + Introspect>(
    options: ObjectOptions,
    members: impl IntoIterator<Item = (&'k str, MemberOptions)>,
) -> Result<Vec<Error>> {
    TypedJson::global().register::<T>(options, members)
}

/// [`TypedJson::serialize`] on the global instance, with its defaults.
pub fn serialize(value: &dyn Reflect) -> Result<String> {
    TypedJson::global().serialize(value, None)
}

/// [`TypedJson::deserialize`] on the global instance, with its defaults.
pub fn deserialize<T: FromReflect + Typed>(text: &str) -> Result<T> {
    TypedJson::global().deserialize(text, None)
}

/// [`TypedJson::parse`] on the global instance, with its defaults.
pub fn parse(text: &str) -> Result<Value> {
    TypedJson::global().parse(text, None)
}

// -----------------------------------------------------------------------------
// Tests
