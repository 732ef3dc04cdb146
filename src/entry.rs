use derive_more::Display;

/// A value with the priority it was queued with
///
/// `stability` is the insertion stamp of stable queues and `()` otherwise.
/// Entries handed out by a queue are owned copies; changing them has no
/// effect on the queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry<V, P, T = ()> {
    pub value: V,
    pub priority: P,
    pub stability: T,
}

impl<V, P, T> Entry<V, P, T> {
    pub fn new(value: V, priority: P, stability: T) -> Self {
        Self {
            value,
            priority,
            stability,
        }
    }

    pub fn into_parts(self) -> (V, P) {
        (self.value, self.priority)
    }
}

/// How positional lookups walk the queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display)]
pub enum Lookup {
    /// Backing storage order. O(1) per index, but not priority order past
    /// the root.
    #[default]
    #[display("storage order")]
    Storage,
    /// The order entries would leave the queue. Drains a clone, so it costs
    /// O(n log n) and allocates a full copy.
    #[display("dequeue order")]
    DequeueOrder,
}
