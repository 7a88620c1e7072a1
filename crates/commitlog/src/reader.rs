use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::types::Type;
use crate::varint::decode_delta;

/// A widened numeric read, returned by [`Reader::number`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// A forward cursor over a [`Buffer`].
///
/// Positioned before the first entry in scope on construction (via
/// [`Reader::seek`] or [`Reader::range`]); [`Reader::next`] advances it one
/// entry at a time. Holds a mutable borrow of the buffer so that
/// [`Reader::swap_i16`] and friends can rewrite an already-decoded entry's
/// payload in place.
pub struct Reader<'buf> {
    buffer: &'buf mut Buffer,
    chunk_ids: Vec<u32>,
    chunk_idx: usize,
    pos: usize,
    first_in_chunk: bool,

    current_chunk_id: u32,
    offset: u32,
    ty: Option<Type>,
    type_byte_pos: usize,
    i0: usize,
    i1: usize,
}

impl<'buf> Reader<'buf> {
    /// Attaches to `buffer`, positioned before the first entry in chunk
    /// order (the default, whole-buffer scope).
    pub fn seek(buffer: &'buf mut Buffer) -> Self {
        let chunk_ids: Vec<u32> = buffer.chunk_ids().collect();
        Self {
            buffer,
            chunk_ids,
            chunk_idx: 0,
            pos: 0,
            first_in_chunk: true,
            current_chunk_id: 0,
            offset: 0,
            ty: None,
            type_byte_pos: 0,
            i0: 0,
            i1: 0,
        }
    }

    /// Scopes iteration to exactly one chunk: calling [`Reader::next`] only
    /// ever visits entries `e` with `e.offset() >> 14 == chunk`.
    pub fn range(buffer: &'buf mut Buffer, chunk: u32) -> Self {
        let chunk_ids = if buffer.chunk_bytes(chunk).is_empty() {
            Vec::new()
        } else {
            vec![chunk]
        };
        Self {
            buffer,
            chunk_ids,
            chunk_idx: 0,
            pos: 0,
            first_in_chunk: true,
            current_chunk_id: chunk,
            offset: 0,
            ty: None,
            type_byte_pos: 0,
            i0: 0,
            i1: 0,
        }
    }

    /// Returns the cursor to the beginning of the current `seek`/`range`
    /// scope.
    pub fn rewind(&mut self) {
        self.chunk_idx = 0;
        self.pos = 0;
        self.first_in_chunk = true;
        self.ty = None;
    }

    /// Advances to the next entry in the current scope, decoding its type
    /// and absolute offset. Returns `false` once the scope is exhausted.
    pub fn next(&mut self) -> bool {
        loop {
            if self.chunk_idx >= self.chunk_ids.len() {
                return false;
            }
            let chunk_id = self.chunk_ids[self.chunk_idx];
            let bytes = self.buffer.chunk_bytes(chunk_id);
            if self.pos >= bytes.len() {
                self.chunk_idx += 1;
                self.pos = 0;
                self.first_in_chunk = true;
                continue;
            }

            let type_byte_pos = self.pos;
            let ty = Type::from_byte(bytes[self.pos]);
            self.pos += 1;

            if self.first_in_chunk {
                let abs = u32::from_le_bytes(bytes[self.pos..self.pos + 4].try_into().unwrap());
                self.pos += 4;
                self.offset = abs;
                self.first_in_chunk = false;
            } else {
                let (delta, consumed) = decode_delta(&bytes[self.pos..]);
                self.pos += consumed;
                self.offset = (self.offset as i64 + delta) as u32;
            }

            let (i0, i1) = match ty.fixed_width() {
                Some(width) => {
                    let i0 = self.pos;
                    self.pos += width;
                    (i0, self.pos)
                }
                None => {
                    let (len, consumed) = crate::varint::decode_uvarint(&bytes[self.pos..]);
                    self.pos += consumed;
                    let i0 = self.pos;
                    self.pos += len as usize;
                    (i0, self.pos)
                }
            };

            self.current_chunk_id = chunk_id;
            self.ty = Some(ty);
            self.type_byte_pos = type_byte_pos;
            self.i0 = i0;
            self.i1 = i1;
            return true;
        }
    }

    /// The current entry's absolute row handle.
    pub fn index(&self) -> u32 {
        self.offset
    }

    /// The current entry's decoded type.
    pub fn ty(&self) -> Type {
        self.ty.expect("Reader::next must return true before reading the current entry")
    }

    fn payload(&self) -> &[u8] {
        let bytes = self.buffer.chunk_bytes(self.current_chunk_id);
        &bytes[self.i0..self.i1]
    }

    fn mismatch(&self, requested: &'static str) -> Error {
        Error::TypeMismatchOnRead {
            offset: self.offset,
            actual: self.ty(),
            requested,
        }
    }

    pub fn i16(&self) -> Result<i16> {
        match self.ty() {
            Type::I16 => Ok(i16::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("i16")),
        }
    }
    pub fn i32(&self) -> Result<i32> {
        match self.ty() {
            Type::I32 => Ok(i32::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("i32")),
        }
    }
    pub fn i64(&self) -> Result<i64> {
        match self.ty() {
            Type::I64 => Ok(i64::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("i64")),
        }
    }
    pub fn u16(&self) -> Result<u16> {
        match self.ty() {
            Type::U16 => Ok(u16::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("u16")),
        }
    }
    pub fn u32(&self) -> Result<u32> {
        match self.ty() {
            Type::U32 => Ok(u32::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("u32")),
        }
    }
    pub fn u64(&self) -> Result<u64> {
        match self.ty() {
            Type::U64 => Ok(u64::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("u64")),
        }
    }
    pub fn f32(&self) -> Result<f32> {
        match self.ty() {
            Type::F32 => Ok(f32::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("f32")),
        }
    }
    pub fn f64(&self) -> Result<f64> {
        match self.ty() {
            Type::F64 => Ok(f64::from_le_bytes(self.payload().try_into().unwrap())),
            _ => Err(self.mismatch("f64")),
        }
    }
    pub fn bool(&self) -> Result<bool> {
        match self.ty() {
            Type::BoolTrue => Ok(true),
            Type::BoolFalse => Ok(false),
            _ => Err(self.mismatch("bool")),
        }
    }
    pub fn string(&self) -> Result<&str> {
        match self.ty() {
            Type::String => Ok(std::str::from_utf8(self.payload()).expect("put_string only ever writes valid utf8")),
            _ => Err(self.mismatch("string")),
        }
    }
    pub fn bytes(&self) -> Result<&[u8]> {
        match self.ty() {
            Type::Bytes => Ok(self.payload()),
            _ => Err(self.mismatch("bytes")),
        }
    }
    /// Accepts any stored integer width (`i16`/`i32`/`i64`/platform `int`)
    /// and widens it to `i64`.
    pub fn int(&self) -> Result<i64> {
        match self.ty() {
            Type::I16 => self.i16().map(i64::from),
            Type::I32 => self.i32().map(i64::from),
            Type::I64 | Type::Int => self.i64_raw(),
            _ => Err(self.mismatch("int")),
        }
    }
    /// Accepts any stored unsigned width and widens it to `u64`.
    pub fn uint(&self) -> Result<u64> {
        match self.ty() {
            Type::U16 => self.u16().map(u64::from),
            Type::U32 => self.u32().map(u64::from),
            Type::U64 | Type::Uint => self.u64_raw(),
            _ => Err(self.mismatch("uint")),
        }
    }
    /// Accepts `f32` or `f64` and widens to `f64`.
    pub fn float(&self) -> Result<f64> {
        match self.ty() {
            Type::F32 => self.f32().map(f64::from),
            Type::F64 => self.f64(),
            _ => Err(self.mismatch("float")),
        }
    }
    /// Accepts any numeric entry, returning it in its most natural widened
    /// representation.
    pub fn number(&self) -> Result<Number> {
        match self.ty() {
            Type::I16 | Type::I32 | Type::I64 | Type::Int => self.int().map(Number::Int),
            Type::U16 | Type::U32 | Type::U64 | Type::Uint => self.uint().map(Number::Uint),
            Type::F32 | Type::F64 => self.float().map(Number::Float),
            _ => Err(self.mismatch("number")),
        }
    }

    // Raw 8-byte readers for the two types whose `fixed_width` is 8 but
    // whose type tag isn't i64/u64 (`Int`/`Uint`).
    fn i64_raw(&self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.payload().try_into().unwrap()))
    }
    fn u64_raw(&self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.payload().try_into().unwrap()))
    }

    fn swap_fixed(&mut self, expected: Type, payload: &[u8]) -> Result<()> {
        let actual = self.ty();
        if actual != expected {
            return Err(Error::WidthMismatchOnSwap {
                actual,
                actual_width: actual.fixed_width().unwrap_or(0),
                requested_width: payload.len(),
            });
        }
        let i0 = self.i0;
        let i1 = self.i1;
        let bytes = self.buffer.chunk_bytes_mut(self.current_chunk_id);
        bytes[i0..i1].copy_from_slice(payload);
        Ok(())
    }

    pub fn swap_i16(&mut self, value: i16) -> Result<()> {
        self.swap_fixed(Type::I16, &value.to_le_bytes())
    }
    pub fn swap_i32(&mut self, value: i32) -> Result<()> {
        self.swap_fixed(Type::I32, &value.to_le_bytes())
    }
    pub fn swap_i64(&mut self, value: i64) -> Result<()> {
        self.swap_fixed(Type::I64, &value.to_le_bytes())
    }
    pub fn swap_u16(&mut self, value: u16) -> Result<()> {
        self.swap_fixed(Type::U16, &value.to_le_bytes())
    }
    pub fn swap_u32(&mut self, value: u32) -> Result<()> {
        self.swap_fixed(Type::U32, &value.to_le_bytes())
    }
    pub fn swap_u64(&mut self, value: u64) -> Result<()> {
        self.swap_fixed(Type::U64, &value.to_le_bytes())
    }
    pub fn swap_f32(&mut self, value: f32) -> Result<()> {
        self.swap_fixed(Type::F32, &value.to_le_bytes())
    }
    pub fn swap_f64(&mut self, value: f64) -> Result<()> {
        self.swap_fixed(Type::F64, &value.to_le_bytes())
    }
    pub fn swap_int(&mut self, value: i64) -> Result<()> {
        self.swap_fixed(Type::Int, &value.to_le_bytes())
    }
    pub fn swap_uint(&mut self, value: u64) -> Result<()> {
        self.swap_fixed(Type::Uint, &value.to_le_bytes())
    }

    /// `Bool` has no payload bytes of its own (see [`Type::fixed_width`]),
    /// so swapping it rewrites the type byte itself rather than a payload
    /// range — the one documented exception to "swap never touches the
    /// type byte".
    pub fn swap_bool(&mut self, value: bool) -> Result<()> {
        let actual = self.ty();
        if !actual.is_bool() {
            return Err(Error::WidthMismatchOnSwap {
                actual,
                actual_width: 0,
                requested_width: 0,
            });
        }
        let new_ty = if value { Type::BoolTrue } else { Type::BoolFalse };
        let pos = self.type_byte_pos;
        let bytes = self.buffer.chunk_bytes_mut(self.current_chunk_id);
        bytes[pos] = new_ty.as_byte();
        self.ty = Some(new_ty);
        Ok(())
    }

    /// Rewrites the current entry's value, widened or narrowed to whatever
    /// native width the entry was originally encoded with.
    pub fn swap_number(&mut self, value: Number) -> Result<()> {
        let as_i64 = |v: Number| match v {
            Number::Int(i) => i,
            Number::Uint(u) => u as i64,
            Number::Float(f) => f as i64,
        };
        let as_u64 = |v: Number| match v {
            Number::Int(i) => i as u64,
            Number::Uint(u) => u,
            Number::Float(f) => f as u64,
        };
        let as_f64 = |v: Number| match v {
            Number::Int(i) => i as f64,
            Number::Uint(u) => u as f64,
            Number::Float(f) => f,
        };
        match self.ty() {
            Type::I16 => self.swap_i16(as_i64(value) as i16),
            Type::I32 => self.swap_i32(as_i64(value) as i32),
            Type::I64 => self.swap_i64(as_i64(value)),
            Type::Int => self.swap_int(as_i64(value)),
            Type::U16 => self.swap_u16(as_u64(value) as u16),
            Type::U32 => self.swap_u32(as_u64(value) as u32),
            Type::U64 => self.swap_u64(as_u64(value)),
            Type::Uint => self.swap_uint(as_u64(value)),
            Type::F32 => self.swap_f32(as_f64(value) as f32),
            Type::F64 => self.swap_f64(as_f64(value)),
            other => Err(Error::WidthMismatchOnSwap {
                actual: other,
                actual_width: other.fixed_width().unwrap_or(0),
                requested_width: 0,
            }),
        }
    }
}
