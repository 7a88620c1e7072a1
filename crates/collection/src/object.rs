use std::collections::HashMap;

use rowstore_value::Value;

/// A single row's worth of named values, as handed to [`crate::Collection::add`]
/// and returned by [`crate::Collection::fetch`].
///
/// Deliberately a plain map rather than a newtype: callers build these with
/// ordinary map literals/`collect()` and never need `Object`-specific
/// methods beyond what [`HashMap`] already gives them.
pub type Object = HashMap<String, Value>;
