//! d-ary heap priority queues
//!
//! Two storage layouts share one set of sift primitives:
//!
//! - [`NodeHeap`]: an array of entries, for payloads of any type.
//! - [`FlatHeap`]: parallel numeric arrays for values, priorities and
//!   stamps, with no per-entry objects.
//!
//! Either layout comes unstable or stable (equal priorities leave in
//! insertion order), giving the four queues [`NodeQueue`],
//! [`StableNodeQueue`], [`FlatQueue`] and [`StableFlatQueue`]. Every queue
//! implements [`PriorityQueue`].
//!
//! ```
//! use pqueue::{PriorityQueue, StableFlatQueue};
//!
//! let mut q = StableFlatQueue::new();
//! q.enqueue(1u32, 5);
//! q.enqueue(2, 3);
//! q.enqueue(3, 4);
//! q.enqueue(4, 3);
//! assert_eq!(q.into_sorted_vec(), vec![2, 4, 3, 1]);
//! ```

use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod derank;
pub mod growth;
pub mod heap_primitives;
pub mod sift;

// Keys and entries
// ----------------
pub mod entry;
pub mod error;
pub mod priority;

// Queues
// ------
pub mod data_structures;
pub mod queue;

pub use data_structures::flat_heap::FlatHeap;
pub use data_structures::node_heap::NodeHeap;
pub use entry::Entry;
pub use entry::Lookup;
pub use error::HeapError;
pub use priority::Ascending;
pub use priority::Descending;
pub use priority::Fifo;
pub use priority::FlatValue;
pub use priority::OrderBy;
pub use priority::Priority;
pub use priority::PriorityOrder;
pub use priority::Stability;
pub use priority::Unstable;
pub use queue::IntoSorted;
pub use queue::PriorityQueue;

/// Array-of-entries queue, any payload.
pub type NodeQueue<V, P, O = Ascending> = NodeHeap<V, P, O, Unstable>;
/// Array-of-entries queue where equal priorities leave first-in first-out.
pub type StableNodeQueue<V, P, O = Ascending> = NodeHeap<V, P, O, Fifo>;
/// Parallel-array queue with numeric payloads.
pub type FlatQueue<V, P, O = Ascending> = FlatHeap<V, P, O, Unstable>;
/// Parallel-array queue where equal priorities leave first-in first-out.
pub type StableFlatQueue<V, P, O = Ascending> = FlatHeap<V, P, O, Fifo>;
