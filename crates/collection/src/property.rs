use roaring::RoaringBitmap;

use crate::handle::RowId;

/// A single typed column: a set of present handles plus a value store
/// indexed by handle.
///
/// `Property<T>` is monomorphic — one concrete `T` per property — which is
/// what [`crate::Column`] exists to multiplex over at the dynamic boundary.
pub struct Property<T> {
    present: RoaringBitmap,
    values: Vec<Option<T>>,
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Self {
            present: RoaringBitmap::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Property<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `handle`, marking it present. Overwrites any
    /// prior value silently.
    pub fn set(&mut self, handle: RowId, value: T) {
        let idx = handle.index();
        if self.values.len() <= idx {
            self.values.resize_with(idx + 1, || None);
        }
        self.values[idx] = Some(value);
        self.present.insert(handle.0);
    }

    /// Returns the current value and whether the field is present for
    /// `handle`. Absence is signaled, never synthesized as a default.
    pub fn get(&self, handle: RowId) -> Option<&T> {
        self.values.get(handle.index()).and_then(|slot| slot.as_ref())
    }

    /// Clears presence for `handle`. A no-op if `handle` was already absent.
    pub fn remove(&mut self, handle: RowId) {
        if let Some(slot) = self.values.get_mut(handle.index()) {
            *slot = None;
        }
        self.present.remove(handle.0);
    }

    pub fn is_present(&self, handle: RowId) -> bool {
        self.present.contains(handle.0)
    }

    /// The bitmap of handles for which this property currently holds a
    /// value.
    pub fn present(&self) -> &RoaringBitmap {
        &self.present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_reports_present() {
        let mut p = Property::<i32>::new();
        p.set(RowId(3), 42);
        assert_eq!(p.get(RowId(3)), Some(&42));
        assert!(p.is_present(RowId(3)));
        assert_eq!(p.get(RowId(4)), None);
        assert!(!p.is_present(RowId(4)));
    }

    #[test]
    fn set_overwrites_silently() {
        let mut p = Property::<&str>::new();
        p.set(RowId(0), "a");
        p.set(RowId(0), "b");
        assert_eq!(p.get(RowId(0)), Some(&"b"));
    }

    #[test]
    fn remove_absent_handle_is_a_no_op() {
        let mut p = Property::<i32>::new();
        p.remove(RowId(10));
        assert!(!p.is_present(RowId(10)));
    }

    #[test]
    fn remove_clears_presence_not_neighbors() {
        let mut p = Property::<i32>::new();
        p.set(RowId(0), 1);
        p.set(RowId(1), 2);
        p.remove(RowId(0));
        assert!(!p.is_present(RowId(0)));
        assert!(p.is_present(RowId(1)));
        assert_eq!(p.get(RowId(1)), Some(&2));
    }
}
