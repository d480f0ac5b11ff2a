use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::registry::RESERVED_MEMBER_NAME;
use crate::{DeclaredType, Error, TypeRef, TypeShape};

// -----------------------------------------------------------------------------
// MemberOptions

/// Options of a serializable member, consumed by
/// [`TypeRegistry::add_member`](crate::registry::TypeRegistry::add_member).
///
/// Every option is optional. The declared type is inferred from the field
/// when the owning type was registered with `#[derive(Reflect)]`.
///
/// # Examples
///
/// ```
/// use tj_reflect::DeclaredType;
/// use tj_reflect::registry::MemberOptions;
///
/// // A required `string[][]` member written as "tags".
/// let options = MemberOptions::new()
///     .name("tags")
///     .required(true)
///     .elements(MemberOptions::new().elements(DeclaredType::String.into()));
/// # let _ = options;
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemberOptions {
    name: Option<String>,
    ty: Option<DeclaredType>,
    elements: Option<Box<MemberOptions>>,
    order: Option<i32>,
    required: bool,
    emit_default: bool,
    refers_abstract: bool,
}

impl MemberOptions {
    /// Options with every value left to its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The JSON property name. Defaults to the member key.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The declared type.
    #[inline]
    pub fn ty(mut self, ty: DeclaredType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Declares the member as an object of type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>(self) -> Self {
        self.ty(DeclaredType::of::<T>())
    }

    /// The element options. Implies [`DeclaredType::Array`] unless a type is given.
    #[inline]
    pub fn elements(mut self, elements: MemberOptions) -> Self {
        self.elements = Some(Box::new(elements));
        self
    }

    /// Ordered members are written and read before unordered ones.
    #[inline]
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Reading fails if the member is `null` or absent.
    #[inline]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Writes the canonical zero value instead of omitting an undefined member.
    #[inline]
    pub fn emit_default(mut self, emit_default: bool) -> Self {
        self.emit_default = emit_default;
        self
    }

    /// The declared type cannot be instantiated, so a type hint is always
    /// written and required when reading.
    #[inline]
    pub fn refers_abstract(mut self, refers_abstract: bool) -> Self {
        self.refers_abstract = refers_abstract;
        self
    }
}

/// Shorthand for `MemberOptions::new().ty(ty)`.
impl From<DeclaredType> for MemberOptions {
    #[inline]
    fn from(ty: DeclaredType) -> Self {
        Self::new().ty(ty)
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One serializable member of a registered type.
///
/// Array members carry an element descriptor keyed `key[]`, recursively for
/// nested arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDescriptor {
    /// The Rust field name.
    pub key: String,
    /// The JSON property name.
    pub name: String,
    pub ty: DeclaredType,
    pub elements: Option<Box<MemberDescriptor>>,
    pub order: Option<i32>,
    pub is_required: bool,
    pub emit_default_value: bool,
    pub refers_abstract_type: bool,
}

impl MemberDescriptor {
    /// A descriptor with default flags, named after its key.
    pub fn new(key: impl Into<String>, ty: DeclaredType) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            ty,
            elements: None,
            order: None,
            is_required: false,
            emit_default_value: false,
            refers_abstract_type: false,
        }
    }

    /// A descriptor for a value of the given shape, with element descriptors
    /// for every array level.
    ///
    /// # Examples
    ///
    /// ```
    /// use tj_reflect::{DeclaredType, Typed};
    /// use tj_reflect::registry::MemberDescriptor;
    ///
    /// let shape = <Vec<Vec<u8>> as Typed>::type_shape();
    /// let descriptor = MemberDescriptor::from_shape("grid", &shape);
    ///
    /// let inner = descriptor.elements.as_deref().unwrap();
    /// assert_eq!(inner.key, "grid[]");
    /// assert_eq!(inner.elements.as_deref().unwrap().ty, DeclaredType::Number);
    /// ```
    pub fn from_shape(key: impl Into<String>, shape: &TypeShape) -> Self {
        let mut descriptor = Self::new(key, shape.ty);
        if let Some(elements) = shape.elements.as_deref() {
            let mut element = Self::from_shape(format!("{}[]", descriptor.key), elements);
            element.name.clone_from(&descriptor.name);
            descriptor.elements = Some(Box::new(element));
        }
        descriptor
    }

    /// Object types referenced by this member and its elements.
    pub fn referenced_types(&self) -> Vec<TypeRef> {
        let mut types = Vec::new();
        let mut current = Some(self);
        while let Some(descriptor) = current {
            if let DeclaredType::Type(ty) = descriptor.ty {
                types.push(ty);
            }
            current = descriptor.elements.as_deref();
        }
        types
    }
}

/// Member ordering: explicitly ordered members first, by `order` then
/// `name`; then the remaining members by `name`.
///
/// # Examples
///
/// ```
/// use tj_reflect::DeclaredType;
/// use tj_reflect::registry::{MemberDescriptor, compare_members};
///
/// let a = MemberDescriptor::new("a", DeclaredType::Number);
/// let mut b = MemberDescriptor::new("b", DeclaredType::Number);
/// b.order = Some(5);
///
/// let mut members = vec![&a, &b];
/// members.sort_by(|x, y| compare_members(x, y));
/// assert_eq!(members[0].key, "b");
/// ```
pub fn compare_members(a: &MemberDescriptor, b: &MemberDescriptor) -> Ordering {
    match (a.order, b.order) {
        (None, None) => a.name.cmp(&b.name),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
    }
}

// -----------------------------------------------------------------------------
// Descriptor construction

/// Builds the descriptor of `class.key` from its options and the inferred
/// field shape, if the type supports introspection.
pub(crate) fn build_descriptor(
    class: &str,
    key: &str,
    options: MemberOptions,
    inferred: Option<&TypeShape>,
) -> Result<MemberDescriptor, Error> {
    let display = format!("{class}.{key}");
    let name = options.name.clone().unwrap_or_else(|| String::from(key));

    if name == RESERVED_MEMBER_NAME {
        return Err(Error::Configuration(format!(
            "'{name}' is a reserved name (on '{display}')."
        )));
    }

    resolve(&display, String::from(key), name, options, inferred, false)
}

fn resolve(
    display: &str,
    key: String,
    name: String,
    options: MemberOptions,
    inferred: Option<&TypeShape>,
    nested: bool,
) -> Result<MemberDescriptor, Error> {
    let explicit = options
        .ty
        .or_else(|| options.elements.is_some().then_some(DeclaredType::Array));

    let ty = match (explicit, inferred) {
        (Some(ty), Some(shape)) => {
            if shape.ty != ty {
                log::warn!(
                    "'type' specified for '{display}' ({ty}) does not match detected type ({}).",
                    shape.ty
                );
            }
            ty
        }
        (Some(ty), None) => ty,
        (None, Some(shape)) => shape.ty,
        (None, None) => {
            return Err(Error::Configuration(format!(
                "No valid 'type' option was specified for '{display}'."
            )));
        }
    };

    let elements = if ty == DeclaredType::Array {
        let element_display = format!("{display}[]");
        let element_shape = inferred
            .filter(|shape| shape.ty == DeclaredType::Array)
            .and_then(|shape| shape.elements.as_deref());
        let element_options = match (options.elements, element_shape) {
            (Some(element_options), _) => Some(*element_options),
            (None, Some(_)) => Some(MemberOptions::new()),
            (None, None) if nested => {
                log::warn!("No valid 'elements' option was specified for '{display}'.");
                None
            }
            (None, None) => {
                return Err(Error::Configuration(format!(
                    "No valid 'elements' option was specified for '{display}'."
                )));
            }
        };
        match element_options {
            Some(element_options) => Some(Box::new(resolve(
                &element_display,
                format!("{key}[]"),
                name.clone(),
                element_options,
                element_shape,
                true,
            )?)),
            None => None,
        }
    } else {
        None
    };

    Ok(MemberDescriptor {
        key,
        name,
        ty,
        elements,
        order: options.order,
        is_required: options.required,
        emit_default_value: options.emit_default,
        refers_abstract_type: options.refers_abstract,
    })
}

// -----------------------------------------------------------------------------
// Tests
