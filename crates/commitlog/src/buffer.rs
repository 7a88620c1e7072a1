use std::collections::BTreeMap;

use rowstore_value::{Kind, Value};

use crate::error::{Error, Result};
use crate::types::Type;
use crate::varint::{encode_delta, encode_uvarint};

/// Rows are partitioned into chunks of this size; entries in the same chunk
/// share a delta-encoding base. This is a stable on-wire constant.
pub const CHUNK_SIZE: u32 = 1 << 14;

/// The chunk a row handle belongs to.
#[inline]
pub fn chunk_of(offset: u32) -> u32 {
    offset >> 14
}

#[derive(Default)]
pub(crate) struct ChunkData {
    pub(crate) bytes: Vec<u8>,
    pub(crate) last_offset: Option<u32>,
}

/// An append-only, chunk-partitioned, delta-encoded operation log.
///
/// Entries are grouped by [`chunk_of`] their row handle; within a chunk the
/// first entry carries its absolute offset and every later entry carries
/// the (ZigZag-varint-encoded) delta from the previous entry written to
/// that same chunk. See the crate documentation for the full wire format.
#[derive(Default)]
pub struct Buffer {
    chunks: BTreeMap<u32, ChunkData>,
    capacity_hint: usize,
    field_name: Option<String>,
}

impl Buffer {
    /// Allocates a new, empty buffer. `capacity_hint`, if given, sizes the
    /// byte buffer allocated for each chunk the first time it is touched.
    pub fn new(capacity_hint: Option<usize>) -> Self {
        Self {
            chunks: BTreeMap::new(),
            capacity_hint: capacity_hint.unwrap_or(0),
            field_name: None,
        }
    }

    /// Clears all chunks and records `name` as metadata describing which
    /// property this buffer accumulates writes for. Purely informational:
    /// nothing in this crate reads it back.
    pub fn reset(&mut self, name: impl Into<String>) {
        self.chunks.clear();
        self.field_name = Some(name.into());
    }

    /// The field name set by the last [`Buffer::reset`], if any.
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// True iff no entries have been written since the last [`Buffer::reset`]
    /// (or since construction).
    pub fn is_empty(&self) -> bool {
        self.chunks.values().all(|c| c.bytes.is_empty())
    }

    /// Invokes `visit(chunk_id)` once per distinct chunk holding entries, in
    /// ascending chunk order.
    pub fn range_chunks(&self, mut visit: impl FnMut(u32)) {
        for (&id, data) in &self.chunks {
            if !data.bytes.is_empty() {
                visit(id);
            }
        }
    }

    pub(crate) fn chunk_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.chunks
            .iter()
            .filter(|(_, d)| !d.bytes.is_empty())
            .map(|(&id, _)| id)
    }

    pub(crate) fn chunk_bytes(&self, chunk_id: u32) -> &[u8] {
        self.chunks.get(&chunk_id).map(|c| c.bytes.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn chunk_bytes_mut(&mut self, chunk_id: u32) -> &mut Vec<u8> {
        &mut self.chunks.entry(chunk_id).or_default().bytes
    }

    fn append(&mut self, offset: u32, ty: Type, write_payload: impl FnOnce(&mut Vec<u8>)) {
        let chunk_id = chunk_of(offset);
        let capacity_hint = self.capacity_hint;
        let chunk = self.chunks.entry(chunk_id).or_insert_with(|| ChunkData {
            bytes: Vec::with_capacity(capacity_hint),
            last_offset: None,
        });
        chunk.bytes.push(ty.as_byte());
        match chunk.last_offset {
            None => chunk.bytes.extend_from_slice(&offset.to_le_bytes()),
            Some(prev) => encode_delta(offset as i64 - prev as i64, &mut chunk.bytes),
        }
        chunk.last_offset = Some(offset);
        write_payload(&mut chunk.bytes);
    }

    pub fn put_i16(&mut self, offset: u32, value: i16) {
        self.append(offset, Type::I16, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_i32(&mut self, offset: u32, value: i32) {
        self.append(offset, Type::I32, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_i64(&mut self, offset: u32, value: i64) {
        self.append(offset, Type::I64, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_u16(&mut self, offset: u32, value: u16) {
        self.append(offset, Type::U16, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_u32(&mut self, offset: u32, value: u32) {
        self.append(offset, Type::U32, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_u64(&mut self, offset: u32, value: u64) {
        self.append(offset, Type::U64, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_f32(&mut self, offset: u32, value: f32) {
        self.append(offset, Type::F32, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_f64(&mut self, offset: u32, value: f64) {
        self.append(offset, Type::F64, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    pub fn put_bool(&mut self, offset: u32, value: bool) {
        let ty = if value { Type::BoolTrue } else { Type::BoolFalse };
        self.append(offset, ty, |_| {});
    }
    pub fn put_string(&mut self, offset: u32, value: &str) {
        self.append(offset, Type::String, |b| {
            encode_uvarint(value.len() as u64, b);
            b.extend_from_slice(value.as_bytes());
        });
    }
    pub fn put_bytes(&mut self, offset: u32, value: &[u8]) {
        self.append(offset, Type::Bytes, |b| {
            encode_uvarint(value.len() as u64, b);
            b.extend_from_slice(value);
        });
    }
    /// Encodes a platform-native signed integer, on the wire as 8 bytes.
    pub fn put_int(&mut self, offset: u32, value: i64) {
        self.append(offset, Type::Int, |b| b.extend_from_slice(&value.to_le_bytes()));
    }
    /// Encodes a platform-native unsigned integer, on the wire as 8 bytes.
    pub fn put_uint(&mut self, offset: u32, value: u64) {
        self.append(offset, Type::Uint, |b| b.extend_from_slice(&value.to_le_bytes()));
    }

    /// Dynamic dispatch by `value`'s runtime [`Kind`]. Fails loudly
    /// ([`Error::UnsupportedType`]) for values this log has no encoding for
    /// (currently only [`rowstore_value::Value::Timestamp`]).
    pub fn put_any(&mut self, offset: u32, value: &Value) -> Result<()> {
        match value {
            Value::I16(v) => self.put_i16(offset, *v),
            Value::I32(v) => self.put_i32(offset, *v),
            Value::I64(v) => self.put_i64(offset, *v),
            Value::U16(v) => self.put_u16(offset, *v),
            Value::U32(v) => self.put_u32(offset, *v),
            Value::U64(v) => self.put_u64(offset, *v),
            Value::F32(v) => self.put_f32(offset, *v),
            Value::F64(v) => self.put_f64(offset, *v),
            Value::Bool(v) => self.put_bool(offset, *v),
            Value::String(v) => self.put_string(offset, v),
            Value::Bytes(v) => self.put_bytes(offset, v),
            Value::Int(v) => self.put_int(offset, *v),
            Value::Uint(v) => self.put_uint(offset, *v),
            Value::Timestamp(_) => return Err(Error::UnsupportedType(Kind::Timestamp)),
        }
        Ok(())
    }
}
