use crossbeam_queue::SegQueue;
use roaring::RoaringBitmap;

/// A free list of scratch [`RoaringBitmap`]s reused across [`crate::Query`]
/// construction, so that a long-lived process issuing many queries doesn't
/// pay a fresh heap allocation for the scratch set every time.
///
/// Bitmaps are handed out cleared and returned cleared; the pool never grows
/// unbounded beyond the number of queries that were ever concurrently live.
#[derive(Default)]
pub struct BitmapPool {
    free: SegQueue<RoaringBitmap>,
}

impl BitmapPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a cleared bitmap, reusing one from the pool if available.
    pub fn acquire(&self) -> RoaringBitmap {
        self.free.pop().unwrap_or_default()
    }

    /// Returns `bitmap` to the pool after clearing it.
    pub fn release(&self, mut bitmap: RoaringBitmap) {
        bitmap.clear();
        self.free.push(bitmap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_without_prior_release_is_empty() {
        let pool = BitmapPool::new();
        let bm = pool.acquire();
        assert!(bm.is_empty());
    }

    #[test]
    fn released_bitmaps_are_reused_cleared() {
        let pool = BitmapPool::new();
        let mut bm = pool.acquire();
        bm.insert(5);
        pool.release(bm);
        let reused = pool.acquire();
        assert!(reused.is_empty());
    }
}
