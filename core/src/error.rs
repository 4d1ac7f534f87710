//! Error types for option-table construction, help rendering, and value
//! extraction.

use thiserror::Error;

use crate::OptSpecifier;

/// Errors raised while building an [`OptTable`](crate::OptTable).
///
/// A table is built all-or-nothing: the first violation found aborts the
/// build and no table is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Option ids must be greater than zero.
    #[error("option id '{0}' must be greater than 0")]
    InvalidId(OptSpecifier),
    /// Two options share an id.
    #[error("duplicate option id '{0}'")]
    DuplicateId(OptSpecifier),
    /// Two options share a name, regardless of their kinds.
    #[error("duplicate option name '{0}'")]
    DuplicateName(String),
    /// More than one Unknown-kind option was registered.
    #[error("duplicate option with kind Unknown (id {0})")]
    DuplicateUnknown(OptSpecifier),
    /// More than one Input-kind option was registered.
    #[error("duplicate option with kind Input (id {0})")]
    DuplicateInput(OptSpecifier),
    /// A matchable option was registered without any prefix.
    #[error("option '{name}' (id {id}) must have at least one prefix")]
    MissingPrefix { id: OptSpecifier, name: String },
    /// A prefix is empty or contains whitespace.
    #[error("option '{name}' (id {id}) has a blank prefix")]
    BlankPrefix { id: OptSpecifier, name: String },
    /// A name is empty (for a matchable option) or contains whitespace.
    #[error("option name '{name}' (id {id}) is empty or contains whitespace")]
    BlankName { id: OptSpecifier, name: String },
    /// A multi-arg option must consume at least one trailing value.
    #[error("option '{name}' (id {id}) must take at least one argument")]
    InvalidArgCount { id: OptSpecifier, name: String },
    /// No id is left above the current maximum for the synthesized Unknown option.
    #[error("no id available for the fallback Unknown option")]
    IdOverflow,
}

/// Errors raised while rendering help output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelpError {
    /// The option kind has no help name (Group, Input, Unknown, MultiArg).
    #[error("option {id} cannot be rendered in help output")]
    NotRenderable { id: OptSpecifier },
    /// The underlying writer failed.
    #[error("failed to write help: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Errors raised when converting an argument value to a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value could not be parsed as the requested type.
    #[error("invalid value '{value}' for '{spelling}': {reason}")]
    Invalid {
        spelling: String,
        value: String,
        reason: String,
    },
}
