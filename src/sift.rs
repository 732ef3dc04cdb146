//! Sift primitives shared by every storage layout.
//!
//! The primitives only see slots. A [`SiftStorage`] compares two slots and
//! swaps them, moving every component of an entry at once (one array for the
//! node engine, parallel arrays for the flat one). Tie-breaking lives in
//! [`SiftStorage::compare`], never here.

use std::cmp::Ordering;
use std::cmp::min;

use crate::derank::derank_by;
use crate::heap_primitives::index_first_children;
use crate::heap_primitives::index_last_children;
use crate::heap_primitives::index_parent;

/// Slot access for the sift primitives.
pub trait SiftStorage {
    /// Number of valid slots.
    fn slots(&self) -> usize;

    /// Heap order of the entries at slots `a` and `b`.
    fn compare(&self, a: usize, b: usize) -> Ordering;

    /// Exchanges two entries, every component together.
    fn swap(&mut self, a: usize, b: usize);
}

/// Raises the entry at `index` while it sorts before its parent.
/// Returns its new index.
#[inline(always)]
pub fn sift_up<S, const A: usize>(heap: &mut S, index: usize) -> usize
where
    S: SiftStorage + ?Sized,
{
    debug_assert!(
        index < heap.slots(),
        "Sift up from {index} is OUT OF BOUNDS({})",
        heap.slots()
    );

    let mut pos = index;
    while pos != 0 {
        let parent = index_parent::<A>(pos);
        if heap.compare(pos, parent) != Ordering::Less {
            break;
        }
        heap.swap(parent, pos);
        pos = parent;
    }
    pos
}

/// Lowers the entry at `index` while some child among the first `len` slots
/// sorts strictly before it. Returns its new index.
#[inline(always)]
pub fn sift_down<S, const A: usize>(heap: &mut S, index: usize, len: usize) -> usize
where
    S: SiftStorage + ?Sized,
{
    debug_assert!(len <= heap.slots());
    debug_assert!(index < len, "Sift down from {index} is OUT OF BOUNDS({len})");

    let mut pos = index;
    loop {
        let first = index_first_children::<A>(pos);
        if first >= len {
            break;
        }
        // Find the best child
        let last = min(index_last_children::<A>(pos), len - 1);
        let child = {
            let h: &S = heap;
            first + derank_by(last - first + 1, |l, r| {
                h.compare(first + l, first + r) != Ordering::Greater
            })
        };

        if heap.compare(pos, child) != Ordering::Greater {
            break;
        }
        heap.swap(pos, child);
        pos = child;
    }
    pos
}

/// Turns the first `len` slots into a heap in O(len).
pub fn heapify<S, const A: usize>(heap: &mut S, len: usize)
where
    S: SiftStorage + ?Sized,
{
    if len < 2 {
        return;
    }
    for i in (0..=index_parent::<A>(len - 1)).rev() {
        sift_down::<S, A>(heap, i, len);
    }
}

/// Whether every entry among the first `len` slots sorts after-or-equal its
/// parent.
pub fn is_heap<S, const A: usize>(heap: &S, len: usize) -> bool
where
    S: SiftStorage + ?Sized,
{
    (1..len).all(|i| heap.compare(index_parent::<A>(i), i) != Ordering::Greater)
}
