//! Keys, orders and tie-breaking policies.
//!
//! - [`Priority`]: the numeric key entries are ranked by.
//! - [`PriorityOrder`]: how two keys compare. Chosen once when a queue is
//!   built, [`Ascending`] unless told otherwise.
//! - [`Stability`]: whether equal keys leave in insertion order.

use std::cmp::Ordering;
use std::fmt::Debug;

use num_traits::Bounded;
use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

/// A totally-ordered numeric key
///
/// Floating point keys are only partially ordered. Queues reject keys that
/// don't compare with themselves (`NaN`) when they are enqueued, so every
/// key stored in a heap is comparable.
pub trait Priority: Copy + Debug + PartialOrd {
    /// Whether the key can take part in heap ordering.
    #[inline(always)]
    fn is_valid(&self) -> bool {
        self.partial_cmp(self).is_some()
    }

    /// The largest representable key, returned for out-of-range lookups.
    fn max_sentinel() -> Self;
}

macro_rules! impl_priority {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                #[inline(always)]
                fn max_sentinel() -> Self {
                    <$t as Bounded>::max_value()
                }
            }
        )*
    };
}

impl_priority!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64
);

impl<F> Priority for OrderedFloat<F>
where
    F: FloatCore + Debug,
{
    #[inline(always)]
    fn max_sentinel() -> Self {
        OrderedFloat(<F as FloatCore>::max_value())
    }
}

/// A fixed-width numeric payload for the flat engine.
pub trait FlatValue: Copy + Debug + Default + PartialEq {}

macro_rules! impl_flat_value {
    ($($t:ty),* $(,)?) => {
        $( impl FlatValue for $t {} )*
    };
}

impl_flat_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64
);

/// Heap order over priorities
///
/// `Less` means the first key leaves the queue first.
pub trait PriorityOrder<P>: Clone + Debug {
    fn compare(&self, a: &P, b: &P) -> Ordering;
}

/// Smallest priority first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ascending;

impl<P: Priority> PriorityOrder<P> for Ascending {
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        // Stored keys are valid, so this never falls back.
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }
}

/// Largest priority first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Descending;

impl<P: Priority> PriorityOrder<P> for Descending {
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.partial_cmp(a).unwrap_or(Ordering::Equal)
    }
}

/// A caller-supplied comparison.
///
/// ```
/// use pqueue::{NodeQueue, OrderBy, PriorityQueue};
///
/// // Closest to 10 first.
/// let order = OrderBy(|a: &i32, b: &i32| (a - 10).abs().cmp(&(b - 10).abs()));
/// let mut q = NodeQueue::with_order(order);
/// q.enqueue("far", 0);
/// q.enqueue("near", 11);
/// assert_eq!(q.dequeue(), Some("near"));
/// ```
#[derive(Copy, Clone)]
pub struct OrderBy<F>(pub F);

impl<F> Debug for OrderBy<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OrderBy").field(&std::any::type_name::<F>()).finish()
    }
}

impl<P, F> PriorityOrder<P> for OrderBy<F>
where
    F: Fn(&P, &P) -> Ordering + Clone,
{
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        (self.0)(a, b)
    }
}

/// Tie-breaking policy
///
/// Every enqueue stamps its entry with [`Stability::next_stamp`], and entries
/// with equal priority are ordered by stamp.
pub trait Stability: Clone + Debug + Default {
    type Stamp: Copy + Ord + Debug + Default;

    /// Whether stamps break ties.
    const STABLE: bool;

    fn next_stamp(&mut self) -> Self::Stamp;
    /// Forgets every stamp handed out so far.
    fn reset(&mut self);
}

/// No tie-breaking. Stamps are `()`, so they take no room.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unstable;

impl Stability for Unstable {
    type Stamp = ();
    const STABLE: bool = false;

    #[inline(always)]
    fn next_stamp(&mut self) -> Self::Stamp {}
    #[inline(always)]
    fn reset(&mut self) {}
}

/// Equal priorities leave in insertion order.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fifo {
    next: u64,
}

impl Fifo {
    /// The stamp the next enqueue will get.
    pub fn peek_stamp(&self) -> u64 {
        self.next
    }
}

impl Stability for Fifo {
    type Stamp = u64;
    const STABLE: bool = true;

    #[inline(always)]
    fn next_stamp(&mut self) -> Self::Stamp {
        let stamp = self.next;
        self.next += 1;
        stamp
    }
    #[inline(always)]
    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Full entry order: priority first, stamp on ties.
#[inline(always)]
pub(crate) fn compare_ranked<P, O, T>(order: &O, a: (&P, &T), b: (&P, &T)) -> Ordering
where
    O: PriorityOrder<P>,
    T: Ord,
{
    order.compare(a.0, b.0).then_with(|| a.1.cmp(b.1))
}
