use alloc::string::String;

use tj_utils::hash::HashMap;

use crate::TypeRef;

// -----------------------------------------------------------------------------
// KnownTypeTable

/// Type-hint names mapped to the types they resolve to.
#[derive(Clone, Debug, Default)]
pub struct KnownTypeTable {
    types: HashMap<String, TypeRef>,
}

impl KnownTypeTable {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `name` to `ty`, returning the previous entry.
    #[inline]
    pub fn insert(&mut self, name: String, ty: TypeRef) -> Option<TypeRef> {
        self.types.insert(name, ty)
    }

    /// Resolves a hint name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).copied()
    }

    /// Returns the number of names.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no names are known.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates `(name, type)` pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeRef)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

// -----------------------------------------------------------------------------
// KnownTypeScope

/// The known types visible while reading one value.
///
/// Each object level pushes the table of its type on top of the enclosing
/// scope. Inner names shadow outer ones.
///
/// # Examples
///
/// ```
/// use tj_reflect::TypeRef;
/// use tj_reflect::registry::{KnownTypeScope, KnownTypeTable};
///
/// let mut outer = KnownTypeTable::new();
/// outer.insert("Node".into(), TypeRef::of::<u8>());
/// outer.insert("Leaf".into(), TypeRef::of::<u16>());
///
/// let mut inner = KnownTypeTable::new();
/// inner.insert("Node".into(), TypeRef::of::<u32>());
///
/// let root = KnownTypeScope::new(Some(&outer));
/// let scope = root.push(Some(&inner));
///
/// assert_eq!(scope.resolve("Node"), Some(TypeRef::of::<u32>()));
/// assert_eq!(scope.resolve("Leaf"), Some(TypeRef::of::<u16>()));
/// assert_eq!(scope.resolve("Tree"), None);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownTypeScope<'a> {
    table: Option<&'a KnownTypeTable>,
    parent: Option<&'a KnownTypeScope<'a>>,
}

impl<'a> KnownTypeScope<'a> {
    /// A root scope.
    #[inline]
    pub const fn new(table: Option<&'a KnownTypeTable>) -> Self {
        Self {
            table,
            parent: None,
        }
    }

    /// A nested scope on top of `self`.
    #[inline]
    pub fn push(&'a self, table: Option<&'a KnownTypeTable>) -> KnownTypeScope<'a> {
        KnownTypeScope {
            table,
            parent: Some(self),
        }
    }

    /// Resolves a hint name, innermost table first.
    pub fn resolve(&self, name: &str) -> Option<TypeRef> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(ty) = scope.table.and_then(|table| table.get(name)) {
                return Some(ty);
            }
            current = scope.parent;
        }
        None
    }
}
