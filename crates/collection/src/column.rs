use roaring::RoaringBitmap;
use rowstore_value::{Kind, Value};

use crate::error::{Error, Result};
use crate::handle::RowId;
use crate::property::Property;

/// Generates one visibility-preserving method per non-Timestamp [`Kind`],
/// dispatching on `self` and delegating to the named [`Property`] method.
/// Keeps the 13-armed matches that don't need to construct a [`Value`] out
/// of the error-prone business of hand-writing each arm.
macro_rules! dispatch_all {
    ($self:expr, $prop:ident => $body:expr) => {
        match $self {
            Column::I16($prop) => $body,
            Column::I32($prop) => $body,
            Column::I64($prop) => $body,
            Column::U16($prop) => $body,
            Column::U32($prop) => $body,
            Column::U64($prop) => $body,
            Column::F32($prop) => $body,
            Column::F64($prop) => $body,
            Column::Bool($prop) => $body,
            Column::String($prop) => $body,
            Column::Bytes($prop) => $body,
            Column::Int($prop) => $body,
            Column::Uint($prop) => $body,
        }
    };
}

/// A named, dynamically typed column of a [`crate::Collection`].
///
/// One variant per storable [`Kind`] (every [`Kind`] except
/// [`Kind::Timestamp`], which has no on-disk representation and is rejected
/// at column-creation time). Each variant wraps the monomorphic
/// [`Property<T>`] that actually holds the data; `Column` exists only to let
/// a [`crate::Collection`] keep columns of differing type in one map.
pub enum Column {
    I16(Property<i16>),
    I32(Property<i32>),
    I64(Property<i64>),
    U16(Property<u16>),
    U32(Property<u32>),
    U64(Property<u64>),
    F32(Property<f32>),
    F64(Property<f64>),
    Bool(Property<bool>),
    String(Property<String>),
    Bytes(Property<Vec<u8>>),
    Int(Property<i64>),
    Uint(Property<u64>),
}

impl Column {
    /// Creates an empty column of the given `kind`. Fails for
    /// [`Kind::Timestamp`], which this store never materializes as column
    /// storage.
    pub fn new(kind: Kind) -> Result<Self> {
        Ok(match kind {
            Kind::I16 => Column::I16(Property::new()),
            Kind::I32 => Column::I32(Property::new()),
            Kind::I64 => Column::I64(Property::new()),
            Kind::U16 => Column::U16(Property::new()),
            Kind::U32 => Column::U32(Property::new()),
            Kind::U64 => Column::U64(Property::new()),
            Kind::F32 => Column::F32(Property::new()),
            Kind::F64 => Column::F64(Property::new()),
            Kind::Bool => Column::Bool(Property::new()),
            Kind::String => Column::String(Property::new()),
            Kind::Bytes => Column::Bytes(Property::new()),
            Kind::Int => Column::Int(Property::new()),
            Kind::Uint => Column::Uint(Property::new()),
            Kind::Timestamp => return Err(Error::UnsupportedColumnType { kind }),
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Column::I16(_) => Kind::I16,
            Column::I32(_) => Kind::I32,
            Column::I64(_) => Kind::I64,
            Column::U16(_) => Kind::U16,
            Column::U32(_) => Kind::U32,
            Column::U64(_) => Kind::U64,
            Column::F32(_) => Kind::F32,
            Column::F64(_) => Kind::F64,
            Column::Bool(_) => Kind::Bool,
            Column::String(_) => Kind::String,
            Column::Bytes(_) => Kind::Bytes,
            Column::Int(_) => Kind::Int,
            Column::Uint(_) => Kind::Uint,
        }
    }

    /// Stores `value` under `handle`. Fails with
    /// [`Error::ColumnTypeMismatch`] if `value`'s kind doesn't match this
    /// column's kind — columns are fixed-type for their whole lifetime.
    pub fn set(&mut self, name: &str, handle: RowId, value: Value) -> Result<()> {
        let value_kind = value.kind();
        match self {
            Column::I16(p) => match value {
                Value::I16(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::I16, value_kind)),
            },
            Column::I32(p) => match value {
                Value::I32(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::I32, value_kind)),
            },
            Column::I64(p) => match value {
                Value::I64(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::I64, value_kind)),
            },
            Column::U16(p) => match value {
                Value::U16(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::U16, value_kind)),
            },
            Column::U32(p) => match value {
                Value::U32(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::U32, value_kind)),
            },
            Column::U64(p) => match value {
                Value::U64(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::U64, value_kind)),
            },
            Column::F32(p) => match value {
                Value::F32(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::F32, value_kind)),
            },
            Column::F64(p) => match value {
                Value::F64(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::F64, value_kind)),
            },
            Column::Bool(p) => match value {
                Value::Bool(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::Bool, value_kind)),
            },
            Column::String(p) => match value {
                Value::String(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::String, value_kind)),
            },
            Column::Bytes(p) => match value {
                Value::Bytes(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::Bytes, value_kind)),
            },
            Column::Int(p) => match value {
                Value::Int(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::Int, value_kind)),
            },
            Column::Uint(p) => match value {
                Value::Uint(v) => Ok(p.set(handle, v)),
                _ => Err(mismatch(name, Kind::Uint, value_kind)),
            },
        }
    }

    /// Reads back `handle`'s value as a dynamic [`Value`], or `None` if the
    /// field is absent for that handle.
    pub fn get_value(&self, handle: RowId) -> Option<Value> {
        match self {
            Column::I16(p) => p.get(handle).copied().map(Value::I16),
            Column::I32(p) => p.get(handle).copied().map(Value::I32),
            Column::I64(p) => p.get(handle).copied().map(Value::I64),
            Column::U16(p) => p.get(handle).copied().map(Value::U16),
            Column::U32(p) => p.get(handle).copied().map(Value::U32),
            Column::U64(p) => p.get(handle).copied().map(Value::U64),
            Column::F32(p) => p.get(handle).copied().map(Value::F32),
            Column::F64(p) => p.get(handle).copied().map(Value::F64),
            Column::Bool(p) => p.get(handle).copied().map(Value::Bool),
            Column::String(p) => p.get(handle).cloned().map(Value::String),
            Column::Bytes(p) => p.get(handle).cloned().map(Value::Bytes),
            Column::Int(p) => p.get(handle).copied().map(Value::Int),
            Column::Uint(p) => p.get(handle).copied().map(Value::Uint),
        }
    }

    pub fn remove(&mut self, handle: RowId) {
        dispatch_all!(self, p => p.remove(handle))
    }

    pub fn is_present(&self, handle: RowId) -> bool {
        dispatch_all!(self, p => p.is_present(handle))
    }

    pub fn present(&self) -> &RoaringBitmap {
        dispatch_all!(self, p => p.present())
    }
}

fn mismatch(name: &str, column_kind: Kind, value_kind: Kind) -> Error {
    Error::ColumnTypeMismatch {
        name: name.to_owned(),
        column_kind,
        value_kind,
    }
}
