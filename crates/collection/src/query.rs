use roaring::RoaringBitmap;

use crate::collection::Collection;

/// A filtered, ascending-order row-set under construction against a
/// [`Collection`].
///
/// Construction (`Collection::query`) takes the collection's read lock just
/// long enough to copy the live-row set into a scratch bitmap borrowed from
/// the collection's [`crate::pool::BitmapPool`]. Each subsequent
/// [`Query::where_`] call re-acquires the read lock for the duration of that
/// one predicate pass, so a `Query` reflects a state that existed at some
/// point between its construction and its last `where_` call, not
/// necessarily one single atomic snapshot across the whole chain.
pub struct Query<'a> {
    collection: &'a Collection,
    rows: RoaringBitmap,
}

impl<'a> Query<'a> {
    pub(crate) fn new(collection: &'a Collection, rows: RoaringBitmap) -> Self {
        Self { collection, rows }
    }

    /// Intersects the current row-set with the subset of rows on which
    /// property `name` is present and `predicate` holds for its value.
    /// A property not present anywhere in the collection narrows the
    /// row-set to empty, not an error.
    pub fn where_(mut self, name: &str, predicate: impl Fn(&rowstore_value::Value) -> bool) -> Self {
        let matching = self.collection.read_column(name, |column| match column {
            None => RoaringBitmap::new(),
            Some(column) => {
                let mut matches = RoaringBitmap::new();
                for handle in column.present().iter() {
                    let handle = crate::handle::RowId(handle);
                    if let Some(value) = column.get_value(handle) {
                        if predicate(&value) {
                            matches.insert(handle.0);
                        }
                    }
                }
                matches
            }
        });
        self.rows &= matching;
        self
    }

    /// The number of rows currently matching this query.
    pub fn count(&self) -> u64 {
        self.rows.len()
    }

    /// Iterates matching row handles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = crate::handle::RowId> + '_ {
        self.rows.iter().map(crate::handle::RowId)
    }
}

impl Drop for Query<'_> {
    fn drop(&mut self) {
        self.collection.release_bitmap(std::mem::take(&mut self.rows));
    }
}
