//! The priority queue façade
//!
//! Engines implement a small set of required operations directly on their
//! storage (enqueue, pop, peek, storage-order lookups, removal by index). The
//! rest of the API (dequeue, remove, index_of, priority_at, to_vec) is built
//! once here on top of them.
//!
//! Lookups in [`Lookup::DequeueOrder`] drain a clone of the queue. They cost
//! O(n log n) time and O(n) extra memory, so they are meant for inspection
//! and tests rather than hot paths.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::entry::Entry;
use crate::entry::Lookup;
use crate::error::HeapError;
use crate::priority::Priority;

/// A min-queue of values ranked by priority
///
/// ```
/// use pqueue::{NodeQueue, PriorityQueue};
///
/// let mut q = NodeQueue::new();
/// q.enqueue(1, 5);
/// q.enqueue(2, 3);
/// q.enqueue(3, 4);
/// assert_eq!(q.peek(), Some(&2));
/// assert_eq!(q.to_vec(), vec![2, 3, 1]);
/// assert_eq!(q.dequeue(), Some(2));
/// assert_eq!(q.len(), 2);
/// ```
pub trait PriorityQueue<V, P: Priority> {
    /// Insertion stamp carried by entries, `()` for unstable queues.
    type Stamp: Copy + Ord + Debug;

    /// Number of queued entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries the queue can hold before reallocating.
    fn capacity(&self) -> usize;

    /// Queues `value`.
    ///
    /// # Errors
    /// - [`HeapError::InvalidPriority`] if `priority` is not comparable.
    /// - [`HeapError::CapacityOverflow`] or [`HeapError::AllocationFailed`]
    ///   if the storage can't grow. The queue is left as it was.
    ///
    /// # Time Complexity
    /// O(log n) amortized.
    fn try_enqueue(&mut self, value: V, priority: P) -> Result<(), HeapError>;

    /// Queues `value`, returning whether it was accepted.
    fn enqueue(&mut self, value: V, priority: P) -> bool {
        match self.try_enqueue(value, priority) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Enqueue rejected: {e}");
                false
            }
        }
    }

    /// Removes the first entry in priority order.
    ///
    /// # Time Complexity
    /// O(log n).
    fn pop(&mut self) -> Option<Entry<V, P, Self::Stamp>>;

    /// Like [`PriorityQueue::pop`], keeping only the value.
    fn dequeue(&mut self) -> Option<V> {
        self.pop().map(|e| e.value)
    }

    /// The value that would be dequeued next.
    fn peek(&self) -> Option<&V>;

    /// The priority of the value that would be dequeued next.
    fn peek_priority(&self) -> Option<P>;

    /// Storage index of the first value matching `pred`. O(n).
    fn position_by<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&V) -> bool;

    /// Priority stored at storage index `index`.
    fn storage_priority(&self, index: usize) -> Option<P>;

    /// Removes the entry at storage index `index`, restoring the heap around
    /// the entry that takes its place.
    fn remove_at(&mut self, index: usize) -> Option<Entry<V, P, Self::Stamp>>;

    /// Drops every entry. Stable queues restart their stamps.
    fn clear(&mut self);

    /// Queued values in storage order, which is not priority order.
    fn values<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a;

    /// Removes the first value (in storage order) matching `pred`.
    ///
    /// # Time Complexity
    /// O(n) to find it, O(log n) to remove it.
    fn remove_by<F>(&mut self, pred: F) -> bool
    where
        F: FnMut(&V) -> bool,
    {
        match self.position_by(pred) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Removes the first value equal to `value`.
    fn remove(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.remove_by(|v| v == value)
    }

    /// Position of the first value matching `pred`.
    ///
    /// Position 0 is the root in either lookup and is answered without
    /// draining.
    fn index_of_by<F>(&self, mut pred: F, lookup: Lookup) -> Option<usize>
    where
        F: FnMut(&V) -> bool,
        Self: Clone,
    {
        match lookup {
            Lookup::Storage => self.position_by(pred),
            Lookup::DequeueOrder => {
                if self.peek().is_some_and(&mut pred) {
                    return Some(0);
                }
                log::debug!("Looking up a value in {lookup} over {} entries", self.len());
                let mut drained = self.clone();
                let mut position = 0usize;
                while let Some(v) = drained.dequeue() {
                    if pred(&v) {
                        return Some(position);
                    }
                    position += 1;
                }
                None
            }
        }
    }

    /// Position of the first value equal to `value`.
    fn index_of(&self, value: &V, lookup: Lookup) -> Option<usize>
    where
        V: PartialEq,
        Self: Clone,
    {
        self.index_of_by(|v| v == value, lookup)
    }

    /// Priority at `index`, or `None` past the end.
    ///
    /// Index 0 is the root in either lookup and is answered without
    /// draining.
    fn priority_at_checked(&self, index: usize, lookup: Lookup) -> Option<P>
    where
        Self: Clone,
    {
        if index >= self.len() {
            return None;
        }
        match lookup {
            Lookup::Storage => self.storage_priority(index),
            Lookup::DequeueOrder if index == 0 => self.peek_priority(),
            Lookup::DequeueOrder => {
                log::debug!("Looking up priority #{index} in {lookup}");
                let mut drained = self.clone();
                for _ in 0..index {
                    drained.pop();
                }
                drained.peek_priority()
            }
        }
    }

    /// Priority at `index`, or [`Priority::max_sentinel`] past the end.
    fn priority_at(&self, index: usize, lookup: Lookup) -> P
    where
        Self: Clone,
    {
        self.priority_at_checked(index, lookup)
            .unwrap_or_else(P::max_sentinel)
    }

    /// Values in dequeue order. Drains a clone, O(n log n).
    fn to_vec(&self) -> Vec<V>
    where
        Self: Clone,
    {
        self.clone().into_sorted_vec()
    }

    /// Consumes the queue into its values in dequeue order.
    fn into_sorted_vec(mut self) -> Vec<V>
    where
        Self: Sized,
    {
        let mut out = Vec::with_capacity(self.len());
        while let Some(v) = self.dequeue() {
            out.push(v);
        }
        out
    }
}

/// Owning iterator over entries in dequeue order.
pub struct IntoSorted<Q, V, P> {
    queue: Q,
    _phantom: PhantomData<fn() -> (V, P)>,
}

impl<Q, V, P> IntoSorted<Q, V, P> {
    pub(crate) fn new(queue: Q) -> Self {
        Self {
            queue,
            _phantom: PhantomData,
        }
    }
}

impl<Q, V, P> Iterator for IntoSorted<Q, V, P>
where
    Q: PriorityQueue<V, P>,
    P: Priority,
{
    type Item = Entry<V, P, Q::Stamp>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<Q, V, P> ExactSizeIterator for IntoSorted<Q, V, P>
where
    Q: PriorityQueue<V, P>,
    P: Priority,
{
}

impl<Q, V, P> Debug for IntoSorted<Q, V, P>
where
    Q: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntoSorted")
            .field("queue", &self.queue)
            .finish()
    }
}
