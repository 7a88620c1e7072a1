use derive_more::{Display, From, Into};

/// A stable, 32-bit row identifier, allocated densely from 0 upward and
/// recycled through [`crate::Collection`]'s free list on removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct RowId(pub u32);

impl RowId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
