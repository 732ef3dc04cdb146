//! Flat heap
//!
//! Entries are split across parallel arrays: values, priorities and, for
//! stable queues, insertion stamps. Unstable queues keep a `Vec<()>` for
//! stamps, which never allocates.
//!
//! The arrays share one length and every relocation moves all of them
//! together. Finding them out of sync is a bug in this module and panics.

use std::cmp::Ordering;
use std::cmp::min;
use std::fmt::Debug;

use crate::entry::Entry;
use crate::error::HeapError;
use crate::growth::MAX_CAPACITY;
use crate::growth::growth_target;
use crate::growth::reserve_exact;
use crate::heap_primitives::DEFAULT_ARITY;
use crate::priority::Ascending;
use crate::priority::FlatValue;
use crate::priority::Priority;
use crate::priority::PriorityOrder;
use crate::priority::Stability;
use crate::priority::Unstable;
use crate::priority::compare_ranked;
use crate::queue::IntoSorted;
use crate::queue::PriorityQueue;
use crate::sift::SiftStorage;
use crate::sift::heapify;
use crate::sift::is_heap;
use crate::sift::sift_down;
use crate::sift::sift_up;

/// An `A`-ary heap over parallel numeric arrays.
///
/// See [`crate::FlatQueue`] and [`crate::StableFlatQueue`] for the usual
/// flavours.
#[derive(Clone, Debug)]
pub struct FlatHeap<V, P, O = Ascending, S = Unstable, const A: usize = { DEFAULT_ARITY }>
where
    S: Stability,
{
    values: Vec<V>,
    priorities: Vec<P>,
    stamps: Vec<S::Stamp>,
    order: O,
    stability: S,
}

impl<V, P, S, const A: usize> FlatHeap<V, P, Ascending, S, A>
where
    V: FlatValue,
    P: Priority,
    S: Stability,
{
    /// An empty queue, smallest priority first.
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(Ascending)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, Ascending)
    }
}

impl<V, P, O, S, const A: usize> FlatHeap<V, P, O, S, A>
where
    V: FlatValue,
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    const ARITY_CHECK: () = assert!(A >= 2, "Heap nodes need at least 2 children");

    #[must_use]
    pub fn with_order(order: O) -> Self {
        Self::with_capacity_and_order(0, order)
    }

    #[must_use]
    pub fn with_capacity_and_order(capacity: usize, order: O) -> Self {
        let () = Self::ARITY_CHECK;
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            values: Vec::with_capacity(capacity),
            priorities: Vec::with_capacity(capacity),
            stamps: Vec::with_capacity(capacity),
            order,
            stability: S::default(),
        }
    }

    /// Builds a queue from a batch in O(n).
    ///
    /// Stable queues stamp the batch in input order.
    ///
    /// ```
    /// use pqueue::{Descending, FlatQueue, PriorityQueue};
    ///
    /// let q = FlatQueue::from_parts(vec![1u32, 2, 3], vec![0.5f64, 2.5, 1.5], Descending).unwrap();
    /// assert_eq!(q.into_sorted_vec(), vec![2, 3, 1]);
    /// ```
    pub fn from_parts(values: Vec<V>, priorities: Vec<P>, order: O) -> Result<Self, HeapError> {
        if values.len() != priorities.len() {
            return Err(HeapError::LengthMismatch {
                values: values.len(),
                priorities: priorities.len(),
            });
        }
        if let Some(index) = priorities.iter().position(|p| !p.is_valid()) {
            return Err(HeapError::InvalidBatchPriority { index });
        }
        // Enforces MAX_CAPACITY.
        growth_target(0, values.len())?;

        let mut stability = S::default();
        let stamps = (0..values.len()).map(|_| stability.next_stamp()).collect();
        let mut heap = Self {
            values,
            priorities,
            stamps,
            order,
            stability,
        };

        let len = heap.values.len();
        heapify::<Self, A>(&mut heap, len);
        heap.verify_heap();
        Ok(heap)
    }

    /// The order this queue was built with.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// A copy of the entry that would be dequeued next.
    pub fn peek_entry(&self) -> Option<Entry<V, P, S::Stamp>> {
        self.entry_at(0)
    }

    /// A copy of the entry at storage index `index`.
    pub fn entry_at(&self, index: usize) -> Option<Entry<V, P, S::Stamp>> {
        if index >= self.values.len() {
            return None;
        }
        Some(Entry::new(
            self.values[index],
            self.priorities[index],
            self.stamps[index],
        ))
    }

    /// `(value, priority)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &P)> {
        self.values.iter().zip(self.priorities.iter())
    }

    /// Makes room for `additional` more entries in every array.
    pub fn reserve(&mut self, additional: usize) -> Result<(), HeapError> {
        let required = self.values.len().saturating_add(additional);
        self.grow_for(required)
    }

    pub fn shrink_to_fit(&mut self) {
        self.values.shrink_to_fit();
        self.priorities.shrink_to_fit();
        self.stamps.shrink_to_fit();
    }

    /// Whether the heap property holds over every entry.
    pub fn is_heap(&self) -> bool {
        is_heap::<Self, A>(self, self.values.len())
    }

    /// Raw backing arrays: values, priorities and stamps.
    #[cfg(feature = "inspect")]
    pub fn as_slices(&self) -> (&[V], &[P], &[S::Stamp]) {
        (&self.values, &self.priorities, &self.stamps)
    }

    /// Capacity every array can reach without reallocating.
    #[inline(always)]
    fn shared_capacity(&self) -> usize {
        min(
            min(self.values.capacity(), self.priorities.capacity()),
            self.stamps.capacity(),
        )
    }

    /// Grows every array or none.
    ///
    /// A failure can leave some arrays with spare capacity, but lengths and
    /// contents are untouched.
    #[inline(always)]
    fn grow_for(&mut self, required: usize) -> Result<(), HeapError> {
        if let Some(target) = growth_target(self.shared_capacity(), required)? {
            reserve_exact(&mut self.values, target)?;
            reserve_exact(&mut self.priorities, target)?;
            reserve_exact(&mut self.stamps, target)?;
        }
        Ok(())
    }

    #[inline(always)]
    fn assert_synchronized(&self) {
        let len = self.values.len();
        assert!(
            self.priorities.len() == len && self.stamps.len() == len,
            "Parallel arrays out of sync: |values|={len}, |priorities|={}, |stamps|={}",
            self.priorities.len(),
            self.stamps.len(),
        );
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        self.assert_synchronized();
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        self.assert_synchronized();
        let len = self.values.len();
        for i in 1..len {
            let p = crate::heap_primitives::index_parent::<A>(i);
            assert!(
                self.compare(p, i) != Ordering::Greater,
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={len}",
                self.priorities[p],
                self.priorities[i],
            );
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "FlatHeap Stats:")?;
        write_array_stats(&mut out, "Values", self.values.len(), self.values.capacity(), size_of::<V>())?;
        write_array_stats(
            &mut out,
            "Priorities",
            self.priorities.len(),
            self.priorities.capacity(),
            size_of::<P>(),
        )?;
        if S::STABLE {
            write_array_stats(
                &mut out,
                "Stamps",
                self.stamps.len(),
                self.stamps.capacity(),
                size_of::<S::Stamp>(),
            )?;
        }
        let entry = size_of::<V>() + size_of::<P>() + size_of::<S::Stamp>();
        let l = self.values.len();
        writeln!(
            out,
            "  - Total: {} entries ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * entry)
        )?;

        Ok(())
    }
    pub fn print_memory_stats(&self) -> std::io::Result<()> {
        self.write_memory_stats(std::io::stdout().lock())
    }
}

fn write_array_stats<W: std::io::Write>(
    out: &mut W,
    name: &str,
    len: usize,
    capacity: usize,
    item_size: usize,
) -> std::io::Result<()> {
    use size::Size;
    use thousands::Separable;

    writeln!(
        out,
        "  - |{name}|:  {} ({})",
        len.separate_with_commas(),
        Size::from_bytes(len * item_size)
    )?;
    writeln!(
        out,
        "  - |{name}|*: {} ({})",
        capacity.separate_with_commas(),
        Size::from_bytes(capacity * item_size)
    )
}

impl<V, P, O, S, const A: usize> SiftStorage for FlatHeap<V, P, O, S, A>
where
    V: FlatValue,
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    #[inline(always)]
    fn slots(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    fn compare(&self, a: usize, b: usize) -> Ordering {
        compare_ranked(
            &self.order,
            (&self.priorities[a], &self.stamps[a]),
            (&self.priorities[b], &self.stamps[b]),
        )
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.values.swap(a, b);
        self.priorities.swap(a, b);
        self.stamps.swap(a, b);
    }
}

impl<V, P, O, S, const A: usize> PriorityQueue<V, P> for FlatHeap<V, P, O, S, A>
where
    V: FlatValue,
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    type Stamp = S::Stamp;

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.shared_capacity()
    }

    fn try_enqueue(&mut self, value: V, priority: P) -> Result<(), HeapError> {
        if !priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        self.assert_synchronized();
        self.grow_for(self.values.len() + 1)?;

        let index = self.values.len();
        self.values.push(value);
        self.priorities.push(priority);
        self.stamps.push(self.stability.next_stamp());
        sift_up::<Self, A>(self, index);

        self.verify_heap();
        Ok(())
    }

    fn pop(&mut self) -> Option<Entry<V, P, S::Stamp>> {
        self.remove_at(0)
    }

    fn peek(&self) -> Option<&V> {
        self.values.first()
    }

    fn peek_priority(&self) -> Option<P> {
        self.priorities.first().copied()
    }

    fn position_by<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&V) -> bool,
    {
        self.values.iter().position(|v| pred(v))
    }

    fn storage_priority(&self, index: usize) -> Option<P> {
        self.priorities.get(index).copied()
    }

    fn remove_at(&mut self, index: usize) -> Option<Entry<V, P, S::Stamp>> {
        self.assert_synchronized();
        if index >= self.values.len() {
            return None;
        }

        // The last entry fills the hole, in every array.
        let removed = Entry::new(
            self.values.swap_remove(index),
            self.priorities.swap_remove(index),
            self.stamps.swap_remove(index),
        );
        let len = self.values.len();
        if index < len {
            let raise = index != 0
                && compare_ranked(
                    &self.order,
                    (&self.priorities[index], &self.stamps[index]),
                    (&removed.priority, &removed.stability),
                ) == Ordering::Less;
            if raise {
                sift_up::<Self, A>(self, index);
            } else {
                sift_down::<Self, A>(self, index, len);
            }
        }

        self.verify_heap();
        Some(removed)
    }

    fn clear(&mut self) {
        self.values.clear();
        self.priorities.clear();
        self.stamps.clear();
        self.stability.reset();
    }

    fn values<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a,
    {
        self.values.iter()
    }
}

impl<V, P, O, S, const A: usize> Default for FlatHeap<V, P, O, S, A>
where
    V: FlatValue,
    P: Priority,
    O: PriorityOrder<P> + Default,
    S: Stability,
{
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<V, P, O, S, const A: usize> IntoIterator for FlatHeap<V, P, O, S, A>
where
    V: FlatValue,
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    type Item = Entry<V, P, S::Stamp>;
    type IntoIter = IntoSorted<Self, V, P>;

    /// Drains the queue in dequeue order.
    fn into_iter(self) -> Self::IntoIter {
        IntoSorted::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Lookup;
    use crate::priority::Fifo;

    type Queue = FlatHeap<u32, i32>;
    type StableQueue = FlatHeap<u32, i32, Ascending, Fifo>;

    fn drain<O: PriorityOrder<i32>, S: Stability>(mut q: FlatHeap<u32, i32, O, S>) -> Vec<u32> {
        let mut out = vec![];
        while let Some(v) = q.dequeue() {
            assert!(q.is_heap());
            out.push(v);
        }
        out
    }

    #[test]
    fn peek_and_drain() {
        let mut q = Queue::new();
        q.enqueue(1, 5);
        q.enqueue(2, 3);
        q.enqueue(3, 4);
        assert_eq!(q.peek(), Some(&2));
        assert_eq!(q.to_vec(), vec![2, 3, 1]);
        assert_eq!(drain(q), vec![2, 3, 1]);
    }

    #[test]
    fn stable_ties_leave_in_insertion_order() {
        let mut q = StableQueue::new();
        q.enqueue(1, 5);
        q.enqueue(2, 3);
        q.enqueue(3, 4);
        q.enqueue(4, 3);
        assert_eq!(drain(q), vec![2, 4, 3, 1]);
    }

    #[test]
    fn unstable_stamps_take_no_room() {
        let mut q = Queue::new();
        for i in 0..10 {
            q.enqueue(i, 0);
        }
        assert_eq!(std::mem::size_of::<<Queue as PriorityQueue<u32, i32>>::Stamp>(), 0);
        assert_eq!(q.pop().map(|e| e.stability), Some(()));
    }

    #[test]
    fn arrays_move_together() {
        let mut q = StableQueue::new();
        for i in 0..64u32 {
            q.enqueue(i, ((i * 29) % 7) as i32);
        }
        assert!(q.remove(&10));
        assert!(q.remove(&0));
        for i in 0..q.len() {
            let e = q.entry_at(i).unwrap();
            // Each value was queued with priority (v*29)%7 and stamp v.
            assert_eq!(e.priority, ((e.value * 29) % 7) as i32);
            assert_eq!(e.stability, e.value as u64);
        }
        let mut last: Option<(i32, u64)> = None;
        while let Some(e) = q.pop() {
            let key = (e.priority, e.stability);
            if let Some(prev) = last {
                assert!(prev < key);
            }
            last = Some(key);
        }
    }

    #[test]
    #[should_panic(expected = "Parallel arrays out of sync")]
    fn desync_is_fatal() {
        let mut q = Queue::new();
        q.enqueue(1, 1);
        q.priorities.push(2);
        q.pop();
    }

    #[test]
    fn remove_present_and_absent() {
        let mut q = Queue::new();
        q.enqueue(1, 5);
        q.enqueue(2, 3);
        q.enqueue(3, 4);
        assert!(q.remove(&2));
        assert!(!q.remove(&99));
        assert_eq!(q.len(), 2);
        assert_eq!(drain(q), vec![3, 1]);
    }

    #[test]
    fn float_priorities() {
        let mut q: FlatHeap<u16, f32> = FlatHeap::new();
        assert!(q.enqueue(1, 0.25));
        assert!(!q.enqueue(2, f32::NAN));
        assert!(q.enqueue(3, -1.0));
        assert_eq!(q.len(), 2);
        assert_eq!(q.priority_at(5, Lookup::Storage), f32::MAX);
        assert_eq!(q.into_sorted_vec(), vec![3, 1]);
    }

    #[test]
    fn lookups() {
        let mut q = Queue::new();
        for (v, p) in [(10, 7), (20, 1), (30, 5), (40, 3)] {
            q.enqueue(v, p);
        }
        assert_eq!(q.index_of(&30, Lookup::DequeueOrder), Some(2));
        assert_eq!(q.index_of(&31, Lookup::Storage), None);
        assert_eq!(q.priority_at(2, Lookup::DequeueOrder), 5);
        assert_eq!(q.priority_at(0, Lookup::Storage), 1);
        assert_eq!(q.priority_at(4, Lookup::DequeueOrder), i32::MAX);
    }

    #[test]
    fn clone_and_clear() {
        let mut q = StableQueue::new();
        for (v, p) in [(1, 4), (2, 2), (3, 8)] {
            q.enqueue(v, p);
        }
        let mut c = q.clone();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.dequeue(), None);
        assert_eq!(q.to_vec(), vec![2, 1, 3]);
        c.enqueue(9, 9);
        assert_eq!(c.peek_entry(), Some(Entry::new(9, 9, 0)));
    }

    #[test]
    fn from_parts_heapifies() {
        let values: Vec<u32> = (0..40).collect();
        let priorities: Vec<i32> = (0..40).map(|i| 39 - i).collect();
        let q = StableQueue::from_parts(values, priorities, Ascending).unwrap();
        assert!(q.is_heap());
        assert_eq!(q.peek(), Some(&39));
        assert_eq!(q.into_sorted_vec(), (0..40).rev().collect::<Vec<u32>>());
    }

    #[cfg(feature = "inspect")]
    #[test]
    fn raw_slices_stay_aligned() {
        let mut q = StableQueue::new();
        for (v, p) in [(10, 3), (20, 1), (30, 2)] {
            q.enqueue(v, p);
        }
        let (values, priorities, stamps) = q.as_slices();
        assert_eq!(values.len(), 3);
        assert_eq!((values[0], priorities[0], stamps[0]), (20, 1, 1));
        for i in 0..values.len() {
            assert_eq!(q.entry_at(i), Some(Entry::new(values[i], priorities[i], stamps[i])));
        }
    }

    #[test]
    fn failed_growth_leaves_the_queue_intact() {
        let mut q = StableQueue::new();
        for (v, p) in [(1, 4), (2, 2), (3, 8), (4, 2)] {
            q.enqueue(v, p);
        }
        let capacity = q.capacity();

        assert!(matches!(
            q.reserve(usize::MAX),
            Err(HeapError::CapacityOverflow { max: MAX_CAPACITY, .. })
        ));
        assert_eq!(q.len(), 4);
        assert_eq!(q.capacity(), capacity);
        assert!(q.is_heap());
        assert_eq!(q.to_vec(), vec![2, 4, 1, 3]);

        // The failure consumed no stamp.
        q.enqueue(5, 0);
        assert_eq!(q.peek_entry(), Some(Entry::new(5, 0, 4)));
    }

    fn sorted_values<Q: PriorityQueue<u32, i32>>(q: &Q) -> Vec<u32> {
        let mut values: Vec<u32> = q.values().copied().collect();
        values.sort();
        values
    }

    #[test]
    fn values_walk_storage() {
        let mut q = Queue::new();
        for (v, p) in [(7, 4), (3, 2), (5, 8)] {
            q.enqueue(v, p);
        }
        assert_eq!(q.values().next(), Some(&3));
        assert_eq!(sorted_values(&q), vec![3, 5, 7]);
    }

    #[test]
    fn growth_keeps_arrays_aligned() {
        let mut q = StableQueue::with_capacity(2);
        for i in 0..100 {
            q.enqueue(i, 0);
        }
        assert!(q.capacity() >= 100);
        assert_eq!(q.values.len(), q.priorities.len());
        assert_eq!(q.values.len(), q.stamps.len());

        let mut out = vec![];
        q.write_memory_stats(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("|Stamps|"));
    }
}
