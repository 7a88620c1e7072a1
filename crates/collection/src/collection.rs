use std::collections::HashMap;

use parking_lot::RwLock;
use roaring::RoaringBitmap;
use rowstore_value::Value;

use crate::column::Column;
use crate::handle::RowId;
use crate::object::Object;
use crate::pool::BitmapPool;
use crate::query::Query;

struct Inner {
    size: u32,
    free: RoaringBitmap,
    props: HashMap<String, Column>,
}

impl Inner {
    fn is_live(&self, handle: RowId) -> bool {
        handle.0 < self.size && !self.free.contains(handle.0)
    }
}

/// A row-addressable, columnar object store.
///
/// Rows are identified by a dense [`RowId`] allocated smallest-free-first;
/// fields are grouped by name into typed [`Column`]s created lazily on first
/// write. A single [`parking_lot::RwLock`] guards all mutable state:
/// [`Collection::count`], [`Collection::fetch`], [`Collection::fetch_to`],
/// and [`Collection::query`] take the read lock, [`Collection::add`] and
/// [`Collection::remove`] take the write lock.
pub struct Collection {
    inner: RwLock<Inner>,
    pool: BitmapPool,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                size: 0,
                free: RoaringBitmap::new(),
                props: HashMap::new(),
            }),
            pool: BitmapPool::new(),
        }
    }

    /// The number of currently live rows: `size - |free|`.
    pub fn count(&self) -> u32 {
        let inner = self.inner.read();
        inner.size - inner.free.len() as u32
    }

    /// Allocates a handle (smallest free, else the previous `size`), then
    /// writes every field of `object` into its (lazily created) column.
    /// Returns the new handle.
    pub fn add(&self, object: Object) -> crate::error::Result<RowId> {
        let mut inner = self.inner.write();
        let handle = match inner.free.min() {
            Some(h) => {
                inner.free.remove(h);
                RowId(h)
            }
            None => {
                let h = inner.size;
                inner.size += 1;
                RowId(h)
            }
        };
        log::trace!("add: allocated row {handle} with {} fields", object.len());
        for (name, value) in object {
            if !inner.props.contains_key(&name) {
                let column = Column::new(value.kind())?;
                inner.props.insert(name.clone(), column);
            }
            let column = inner.props.get_mut(&name).unwrap();
            column.set(&name, handle, value)?;
        }
        Ok(handle)
    }

    /// If `handle` is live, frees it and removes its presence from every
    /// column. A no-op if `handle` is not live.
    pub fn remove(&self, handle: RowId) {
        let mut inner = self.inner.write();
        if !inner.is_live(handle) {
            return;
        }
        inner.free.insert(handle.0);
        for column in inner.props.values_mut() {
            column.remove(handle);
        }
        log::trace!("remove: freed row {handle}");
    }

    /// Reads back every present field of `handle` as a fresh [`Object`].
    /// Returns `None` if `handle` is not live.
    pub fn fetch(&self, handle: RowId) -> Option<Object> {
        let mut object = Object::new();
        if self.fetch_to(handle, &mut object) {
            Some(object)
        } else {
            None
        }
    }

    /// Writes every present field of `handle` into `object`, leaving keys
    /// `object` already held (that aren't overwritten) untouched — an
    /// accumulate-into contract, not a replace contract. Returns whether
    /// `handle` was live; `object` is untouched if it returns `false`.
    pub fn fetch_to(&self, handle: RowId, object: &mut Object) -> bool {
        let inner = self.inner.read();
        if !inner.is_live(handle) {
            return false;
        }
        for (name, column) in &inner.props {
            if let Some(value) = column.get_value(handle) {
                object.insert(name.clone(), value);
            }
        }
        true
    }

    /// Starts a new [`Query`] over every currently live row.
    pub fn query(&self) -> Query<'_> {
        let inner = self.inner.read();
        let mut rows = self.pool.acquire();
        rows.insert_range(0..inner.size);
        rows -= &inner.free;
        Query::new(self, rows)
    }

    pub(crate) fn read_column<R>(&self, name: &str, f: impl FnOnce(Option<&Column>) -> R) -> R {
        let inner = self.inner.read();
        f(inner.props.get(name))
    }

    pub(crate) fn release_bitmap(&self, bitmap: RoaringBitmap) {
        self.pool.release(bitmap);
    }

    #[cfg(feature = "commit")]
    /// Replays `buffer`'s entries into this collection's columns in commit
    /// mode. `kinds` supplies the logical [`rowstore_value::Kind`] stored at
    /// each field name, since the wire format carries a physical
    /// [`rowstore_commitlog::Type`] rather than a column name.
    pub fn apply(
        &self,
        name: &str,
        kind: rowstore_value::Kind,
        buffer: &mut rowstore_commitlog::Buffer,
    ) -> crate::error::Result<()> {
        use rowstore_commitlog::Reader;

        let mut inner = self.inner.write();
        if !inner.props.contains_key(name) {
            let column = Column::new(kind)?;
            inner.props.insert(name.to_owned(), column);
        }
        let column = inner.props.get_mut(name).unwrap();

        let mut chunk_ids = Vec::new();
        buffer.range_chunks(|c| chunk_ids.push(c));
        for chunk_id in chunk_ids {
            let mut reader = Reader::range(buffer, chunk_id);
            while reader.next() {
                let offset = reader.index();
                let value = read_value(&mut reader, kind)?;
                let handle = RowId(offset);
                if offset >= inner.size {
                    // Handles between the old high-water mark and `offset`
                    // were never written by this entry; they must not become
                    // spuriously live (SPEC_FULL §3's live-row invariant).
                    let old_size = inner.size;
                    inner.free.insert_range(old_size..offset);
                    inner.size = offset + 1;
                }
                column.set(name, handle, value)?;
            }
        }
        log::trace!("apply: replayed buffer into column {name:?}");
        Ok(())
    }
}

#[cfg(feature = "commit")]
fn read_value(
    reader: &mut rowstore_commitlog::Reader<'_>,
    kind: rowstore_value::Kind,
) -> crate::error::Result<Value> {
    use rowstore_value::Kind;
    Ok(match kind {
        Kind::I16 => Value::I16(reader.i16()?),
        Kind::I32 => Value::I32(reader.i32()?),
        Kind::I64 => Value::I64(reader.i64()?),
        Kind::U16 => Value::U16(reader.u16()?),
        Kind::U32 => Value::U32(reader.u32()?),
        Kind::U64 => Value::U64(reader.u64()?),
        Kind::F32 => Value::F32(reader.f32()?),
        Kind::F64 => Value::F64(reader.f64()?),
        Kind::Bool => Value::Bool(reader.bool()?),
        Kind::String => Value::String(reader.string()?.to_owned()),
        Kind::Bytes => Value::Bytes(reader.bytes()?.to_owned()),
        Kind::Int => Value::Int(reader.int()?),
        Kind::Uint => Value::Uint(reader.uint()?),
        Kind::Timestamp => return Err(rowstore_commitlog::Error::UnsupportedType(kind).into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(pairs: &[(&str, Value)]) -> Object {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn add_returns_smallest_free_handle() {
        let c = Collection::new();
        let a = c.add(object(&[("name", Value::String("A".into()))])).unwrap();
        let b = c.add(object(&[("name", Value::String("B".into()))])).unwrap();
        c.remove(a);
        let reused = c.add(object(&[("name", Value::String("C".into()))])).unwrap();
        assert_eq!(reused, a);
        assert_eq!(c.fetch(reused).unwrap()["name"], Value::String("C".into()));
        assert_eq!(c.fetch(b).unwrap()["name"], Value::String("B".into()));
    }

    #[test]
    fn count_tracks_size_minus_free() {
        let c = Collection::new();
        assert_eq!(c.count(), 0);
        let a = c.add(object(&[("x", Value::I32(1))])).unwrap();
        let _b = c.add(object(&[("x", Value::I32(2))])).unwrap();
        assert_eq!(c.count(), 2);
        c.remove(a);
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn remove_is_a_no_op_on_already_removed_handle() {
        let c = Collection::new();
        let a = c.add(object(&[("x", Value::I32(1))])).unwrap();
        c.remove(a);
        c.remove(a);
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn fetch_fails_on_non_live_handle() {
        let c = Collection::new();
        assert!(c.fetch(RowId(0)).is_none());
        let a = c.add(object(&[("x", Value::I32(1))])).unwrap();
        c.remove(a);
        assert!(c.fetch(a).is_none());
    }

    #[test]
    fn fetch_to_accumulates_into_caller_object() {
        let c = Collection::new();
        let a = c.add(object(&[("x", Value::I32(1))])).unwrap();
        let mut obj = object(&[("preexisting", Value::Bool(true))]);
        assert!(c.fetch_to(a, &mut obj));
        assert_eq!(obj.get("preexisting"), Some(&Value::Bool(true)));
        assert_eq!(obj.get("x"), Some(&Value::I32(1)));
    }

    #[test]
    fn fields_absent_on_a_handle_are_not_written() {
        let c = Collection::new();
        let a = c.add(object(&[("x", Value::I32(1))])).unwrap();
        let _b = c.add(object(&[("x", Value::I32(2)), ("y", Value::I32(9))])).unwrap();
        let fetched = c.fetch(a).unwrap();
        assert!(!fetched.contains_key("y"));
    }
}
