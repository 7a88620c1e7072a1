use thiserror::Error;

/// Errors that indicate a caller bug rather than a recoverable condition.
///
/// Every variant here is documented, in the public API of this crate, as
/// fatal: the functions that can return it abort the write or read they were
/// attempting. The type exists so the failure has a name and a `Display`
/// impl, not so callers are expected to recover from it.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// `Buffer::put_any` was asked to encode a [`rowstore_value::Value`]
    /// this commit log has no wire representation for.
    #[error("value of kind {0:?} has no commit-log encoding")]
    UnsupportedType(rowstore_value::Kind),

    /// A typed accessor on [`crate::Reader`] was called against an entry
    /// whose encoded type cannot be coerced to the requested type.
    #[error("entry at offset {offset} has type {actual:?}, which cannot be read as {requested}")]
    TypeMismatchOnRead {
        offset: u32,
        actual: crate::Type,
        requested: &'static str,
    },

    /// `Reader::swap_*` was called with a value whose encoded width does
    /// not match the width of the entry currently under the cursor.
    #[error("cannot swap a {requested_width}-byte value into an entry of type {actual:?} ({actual_width}-byte payload)")]
    WidthMismatchOnSwap {
        actual: crate::Type,
        actual_width: usize,
        requested_width: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
