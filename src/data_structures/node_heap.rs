//! Node-based heap
//!
//! Entries live in a single array of [`Entry`] objects, so values can be of
//! any type. Heap order comes from the queue's [`PriorityOrder`] and, for
//! stable queues, the insertion stamp.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::entry::Entry;
use crate::error::HeapError;
use crate::growth::MAX_CAPACITY;
use crate::growth::growth_target;
use crate::growth::reserve_exact;
use crate::heap_primitives::DEFAULT_ARITY;
use crate::priority::Ascending;
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

/// An `A`-ary heap over an array of entries.
///
/// See [`crate::NodeQueue`] and [`crate::StableNodeQueue`] for the usual
/// flavours.
#[derive(Clone, Debug)]
pub struct NodeHeap<V, P, O = Ascending, S = Unstable, const A: usize = { DEFAULT_ARITY }>
where
    S: Stability,
{
    entries: Vec<Entry<V, P, S::Stamp>>,
    order: O,
    stability: S,
}

impl<V, P, S, const A: usize> NodeHeap<V, P, Ascending, S, A>
where
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

impl<V, P, O, S, const A: usize> NodeHeap<V, P, O, S, A>
where
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
        Self {
            entries: Vec::with_capacity(capacity.min(MAX_CAPACITY)),
            order,
            stability: S::default(),
        }
    }

    /// Builds a queue from a batch in O(n).
    ///
    /// Stable queues stamp the batch in input order.
    ///
    /// ```
    /// use pqueue::{Ascending, PriorityQueue, StableNodeQueue};
    ///
    /// let q = StableNodeQueue::from_parts(vec!['a', 'b', 'c'], vec![2, 1, 2], Ascending).unwrap();
    /// assert_eq!(q.into_sorted_vec(), vec!['b', 'a', 'c']);
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

        let mut heap = Self::with_order(order);
        if let Some(target) = growth_target(0, values.len())? {
            reserve_exact(&mut heap.entries, target)?;
        }
        let stability = &mut heap.stability;
        heap.entries.extend(
            values
                .into_iter()
                .zip(priorities)
                .map(|(value, priority)| Entry::new(value, priority, stability.next_stamp())),
        );

        let len = heap.entries.len();
        heapify::<Self, A>(&mut heap, len);
        heap.verify_heap();
        Ok(heap)
    }

    /// The order this queue was built with.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// The entry that would be dequeued next.
    pub fn peek_entry(&self) -> Option<&Entry<V, P, S::Stamp>> {
        self.entries.first()
    }

    /// `(value, priority)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &P)> {
        self.entries.iter().map(|e| (&e.value, &e.priority))
    }

    /// Makes room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) -> Result<(), HeapError> {
        let required = self.entries.len().saturating_add(additional);
        self.grow_for(required)
    }

    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// Whether the heap property holds over every entry.
    pub fn is_heap(&self) -> bool {
        is_heap::<Self, A>(self, self.entries.len())
    }

    /// Raw backing storage, in storage order.
    #[cfg(feature = "inspect")]
    pub fn as_entries(&self) -> &[Entry<V, P, S::Stamp>] {
        &self.entries
    }

    #[inline(always)]
    fn grow_for(&mut self, required: usize) -> Result<(), HeapError> {
        if let Some(target) = growth_target(self.entries.capacity(), required)? {
            reserve_exact(&mut self.entries, target)?;
        }
        Ok(())
    }

    #[inline(always)]
    fn compare_entries(&self, a: &Entry<V, P, S::Stamp>, b: &Entry<V, P, S::Stamp>) -> Ordering {
        compare_ranked(
            &self.order,
            (&a.priority, &a.stability),
            (&b.priority, &b.stability),
        )
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        let len = self.entries.len();
        for i in 1..len {
            let p = crate::heap_primitives::index_parent::<A>(i);
            assert!(
                self.compare(p, i) != Ordering::Greater,
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={len}",
                self.entries[p].priority,
                self.entries[i].priority,
            );
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "NodeHeap Stats:")?;
        let s = size_of::<Entry<V, P, S::Stamp>>();
        let l = self.entries.len();
        let c = self.entries.capacity();
        writeln!(
            out,
            "  - |Entries|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Entries|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        Ok(())
    }
    pub fn print_memory_stats(&self) -> std::io::Result<()> {
        self.write_memory_stats(std::io::stdout().lock())
    }
}

impl<V, P, O, S, const A: usize> SiftStorage for NodeHeap<V, P, O, S, A>
where
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    #[inline(always)]
    fn slots(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.compare_entries(&self.entries[a], &self.entries[b])
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
    }
}

impl<V, P, O, S, const A: usize> PriorityQueue<V, P> for NodeHeap<V, P, O, S, A>
where
    P: Priority,
    O: PriorityOrder<P>,
    S: Stability,
{
    type Stamp = S::Stamp;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    fn try_enqueue(&mut self, value: V, priority: P) -> Result<(), HeapError> {
        if !priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        self.grow_for(self.entries.len() + 1)?;

        let index = self.entries.len();
        let stamp = self.stability.next_stamp();
        self.entries.push(Entry::new(value, priority, stamp));
        sift_up::<Self, A>(self, index);

        self.verify_heap();
        Ok(())
    }

    fn pop(&mut self) -> Option<Entry<V, P, S::Stamp>> {
        self.remove_at(0)
    }

    fn peek(&self) -> Option<&V> {
        self.entries.first().map(|e| &e.value)
    }

    fn peek_priority(&self) -> Option<P> {
        self.entries.first().map(|e| e.priority)
    }

    fn position_by<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&V) -> bool,
    {
        self.entries.iter().position(|e| pred(&e.value))
    }

    fn storage_priority(&self, index: usize) -> Option<P> {
        self.entries.get(index).map(|e| e.priority)
    }

    fn remove_at(&mut self, index: usize) -> Option<Entry<V, P, S::Stamp>> {
        if index >= self.entries.len() {
            return None;
        }

        // The last entry fills the hole.
        let removed = self.entries.swap_remove(index);
        let len = self.entries.len();
        if index < len {
            let raise = index != 0
                && self.compare_entries(&self.entries[index], &removed) == Ordering::Less;
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
        self.entries.clear();
        self.stability.reset();
    }

    fn values<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a,
    {
        self.entries.iter().map(|e| &e.value)
    }
}

impl<V, P, O, S, const A: usize> Default for NodeHeap<V, P, O, S, A>
where
    P: Priority,
    O: PriorityOrder<P> + Default,
    S: Stability,
{
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<V, P, O, S, const A: usize> IntoIterator for NodeHeap<V, P, O, S, A>
where
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
