use rowstore_value::Kind;
use thiserror::Error;

/// Errors a [`crate::Collection`] fails loudly on rather than silently
/// coercing around. These are all programmer-error conditions: callers are
/// expected to know a property's `Kind` before setting it.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("column {name:?} holds {column_kind:?}, got a value of kind {value_kind:?}")]
    ColumnTypeMismatch {
        name: String,
        column_kind: Kind,
        value_kind: Kind,
    },

    #[error("{kind:?} values cannot be stored in a column")]
    UnsupportedColumnType { kind: Kind },

    #[cfg(feature = "commit")]
    #[error(transparent)]
    Commitlog(#[from] rowstore_commitlog::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
