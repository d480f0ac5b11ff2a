use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised by registration, writing and reading.
///
/// Reading errors carry the property path of the offending value, e.g.
/// `Graph.nodes[].name`. Every error aborts the whole call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid registration input.
    #[error("{0}")]
    Configuration(String),

    #[error("Member '{name}' already exists on '{class}'.")]
    DuplicateMember { class: String, name: String },

    #[error("{path}: Expected value to be of type '{expected}', got '{found}'.")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("{path}: '{hint}' is not a known type.")]
    UnknownType { path: String, hint: String },

    #[error("{path}: '{hint}' is not a subtype of '{expected}'.")]
    InvalidSubtype {
        path: String,
        hint: String,
        expected: String,
    },

    #[error("{path}: Type-hint ({key}) must be a string.")]
    InvalidTypeHint { path: String, key: String },

    #[error("{path}: Missing required type-hint.")]
    MissingTypeHint { path: String },

    #[error("{path}: Missing required member.")]
    RequiredMember { path: String },

    #[error("JSON exceeds object count limit ({limit}), found {count} values.")]
    BudgetExceeded { limit: usize, count: usize },

    /// The object rejected the value read for one of its members.
    #[error("{path}: a value of type '{found}' cannot be assigned to this member.")]
    Assign { path: String, found: String },

    /// An abstract type was read without a type hint or initializer.
    #[error("{path}: '{ty}' cannot be constructed, a type-hint or initializer is required.")]
    NotConstructible { path: String, ty: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A `Result` defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
