//! Property-based tests using proptest
//!
//! Random operation sequences run against every queue flavour and against a
//! plain vector model that is sorted on demand.

use proptest::prelude::*;

use pqueue::Ascending;
use pqueue::FlatQueue;
use pqueue::Lookup;
use pqueue::NodeQueue;
use pqueue::PriorityQueue;
use pqueue::StableFlatQueue;
use pqueue::StableNodeQueue;

#[derive(Clone, Debug)]
enum Op {
    Enqueue(u32, u8),
    Dequeue,
    Remove(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..64, 0u8..16).prop_map(|(v, p)| Op::Enqueue(v, p)),
        2 => Just(Op::Dequeue),
        1 => (0u32..64).prop_map(Op::Remove),
    ]
}

/// Model: entries in insertion order. The stable dequeue order is a stable
/// sort by priority.
#[derive(Default)]
struct Model {
    entries: Vec<(u32, u8)>,
}

impl Model {
    fn enqueue(&mut self, v: u32, p: u8) {
        self.entries.push((v, p));
    }

    fn best(&self) -> Option<usize> {
        let min = self.entries.iter().map(|&(_, p)| p).min()?;
        self.entries.iter().position(|&(_, p)| p == min)
    }

    fn dequeue(&mut self) -> Option<(u32, u8)> {
        let i = self.best()?;
        Some(self.entries.remove(i))
    }

    fn sorted(&self) -> Vec<(u32, u8)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|&(_, p)| p);
        sorted
    }
}

/// Runs `ops` on a stable queue, which must match the model exactly.
fn check_stable<Q>(mut q: Q, ops: &[Op]) -> Result<(), TestCaseError>
where
    Q: PriorityQueue<u32, u8, Stamp = u64> + Clone,
{
    let mut model = Model::default();
    for op in ops {
        match *op {
            Op::Enqueue(v, p) => {
                prop_assert!(q.enqueue(v, p));
                model.enqueue(v, p);
            }
            Op::Dequeue => {
                let got = q.pop().map(|e| (e.value, e.priority));
                prop_assert_eq!(got, model.dequeue());
            }
            Op::Remove(v) => {
                let removed = q.remove(&v);
                prop_assert_eq!(removed, model.entries.iter().any(|&(mv, _)| mv == v));
                if removed {
                    // Storage order picks the copy, so find it by its stamp.
                    let after = by_stamp(&q);
                    let mut gone = model.entries.clone();
                    for e in &after {
                        let i = gone.iter().position(|g| g == e);
                        prop_assert!(i.is_some(), "{:?} appeared from nowhere", e);
                        if let Some(i) = i {
                            gone.remove(i);
                        }
                    }
                    prop_assert_eq!(gone.len(), 1);
                    prop_assert_eq!(gone[0].0, v);
                    model.entries = after;
                }
            }
        }
        prop_assert_eq!(q.len(), model.entries.len());
        prop_assert_eq!(q.is_empty(), model.entries.is_empty());
        prop_assert_eq!(q.peek_priority(), model.best().map(|i| model.entries[i].1));
    }
    let expected: Vec<u32> = model.sorted().into_iter().map(|(v, _)| v).collect();
    prop_assert_eq!(q.to_vec(), expected);
    Ok(())
}

/// Queued entries in insertion order, recovered from their stamps.
fn by_stamp<Q>(q: &Q) -> Vec<(u32, u8)>
where
    Q: PriorityQueue<u32, u8, Stamp = u64> + Clone,
{
    let mut stamped: Vec<(u64, u32, u8)> = vec![];
    let mut c = q.clone();
    while let Some(e) = c.pop() {
        stamped.push((e.stability, e.value, e.priority));
    }
    stamped.sort();
    stamped.into_iter().map(|(_, v, p)| (v, p)).collect()
}

fn sorted_priorities<Q: PriorityQueue<u32, u8> + Clone>(q: &Q) -> Vec<u8> {
    let mut c = q.clone();
    let mut out = vec![];
    while let Some(e) = c.pop() {
        out.push(e.priority);
    }
    out
}

/// Runs `ops` on an unstable queue. Only the priority sequence and the
/// multiset of values are determined.
fn check_unstable<Q>(mut q: Q, ops: &[Op]) -> Result<(), TestCaseError>
where
    Q: PriorityQueue<u32, u8> + Clone,
{
    let mut model: Vec<(u32, u8)> = vec![];
    for op in ops {
        match *op {
            Op::Enqueue(v, p) => {
                prop_assert!(q.enqueue(v, p));
                model.push((v, p));
            }
            Op::Dequeue => {
                let got = q.pop();
                let min = model.iter().map(|&(_, p)| p).min();
                prop_assert_eq!(got.as_ref().map(|e| e.priority), min);
                if let Some(e) = got {
                    let i = model
                        .iter()
                        .position(|&m| m == (e.value, e.priority))
                        .expect("dequeued an entry that was never queued");
                    model.swap_remove(i);
                }
            }
            Op::Remove(v) => {
                let before: Vec<(u32, u8)> = {
                    let mut all = vec![];
                    let mut c = q.clone();
                    while let Some(e) = c.pop() {
                        all.push((e.value, e.priority));
                    }
                    all
                };
                let removed = q.remove(&v);
                prop_assert_eq!(removed, model.iter().any(|&(mv, _)| mv == v));
                if removed {
                    let mut after = vec![];
                    let mut c = q.clone();
                    while let Some(e) = c.pop() {
                        after.push((e.value, e.priority));
                    }
                    let mut gone = before.clone();
                    for e in &after {
                        let i = gone.iter().position(|g| g == e).unwrap();
                        gone.swap_remove(i);
                    }
                    prop_assert_eq!(gone.len(), 1);
                    prop_assert_eq!(gone[0].0, v);
                    let i = model.iter().position(|&m| m == gone[0]).unwrap();
                    model.swap_remove(i);
                }
            }
        }
        prop_assert_eq!(q.len(), model.len());
    }

    let mut expected: Vec<u8> = model.iter().map(|&(_, p)| p).collect();
    expected.sort();
    prop_assert_eq!(sorted_priorities(&q), expected);
    Ok(())
}

proptest! {
    #[test]
    fn stable_node_queue_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        check_stable(StableNodeQueue::<u32, u8>::new(), &ops)?;
    }

    #[test]
    fn stable_flat_queue_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        check_stable(StableFlatQueue::<u32, u8>::new(), &ops)?;
    }

    #[test]
    fn node_queue_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        check_unstable(NodeQueue::<u32, u8>::new(), &ops)?;
    }

    #[test]
    fn flat_queue_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        check_unstable(FlatQueue::<u32, u8>::new(), &ops)?;
    }

    #[test]
    fn batch_construction_matches_incremental(
        entries in prop::collection::vec((0u32..1000, 0u8..32), 0..300)
    ) {
        let values: Vec<u32> = entries.iter().map(|&(v, _)| v).collect();
        let priorities: Vec<u8> = entries.iter().map(|&(_, p)| p).collect();

        let batch = StableFlatQueue::from_parts(values.clone(), priorities.clone(), Ascending).unwrap();
        prop_assert!(batch.is_heap());
        let mut incremental = StableFlatQueue::new();
        for &(v, p) in &entries {
            incremental.enqueue(v, p);
        }
        prop_assert_eq!(batch.to_vec(), incremental.to_vec());

        let node = StableNodeQueue::from_parts(values, priorities, Ascending).unwrap();
        prop_assert!(node.is_heap());
        prop_assert_eq!(node.into_sorted_vec(), incremental.into_sorted_vec());
    }

    #[test]
    fn clone_is_a_snapshot(
        entries in prop::collection::vec((0u32..1000, 0u8..32), 1..100),
        extra in 0usize..50
    ) {
        let mut q = StableNodeQueue::new();
        for &(v, p) in &entries {
            q.enqueue(v, p);
        }
        let snapshot = q.clone();
        prop_assert_eq!(q.to_vec(), snapshot.to_vec());

        let mut c = q.clone();
        for i in 0..extra {
            c.enqueue(i as u32, (i % 7) as u8);
            c.dequeue();
        }
        prop_assert_eq!(q.to_vec(), snapshot.to_vec());
    }

    #[test]
    fn lookups_agree_with_draining(
        entries in prop::collection::vec((0u32..1000, 0u8..32), 1..100),
        probe in 0usize..120
    ) {
        let mut q = StableFlatQueue::new();
        for &(v, p) in &entries {
            q.enqueue(v, p);
        }
        let drained: Vec<_> = q.clone().into_iter().collect();

        match drained.get(probe) {
            Some(e) => {
                prop_assert_eq!(q.priority_at(probe, Lookup::DequeueOrder), e.priority);
                let first = drained.iter().position(|d| d.value == e.value);
                prop_assert_eq!(q.index_of(&e.value, Lookup::DequeueOrder), first);
                let i = q.index_of(&e.value, Lookup::Storage).unwrap();
                prop_assert_eq!(q.values().nth(i), Some(&e.value));
            }
            None => {
                prop_assert_eq!(q.priority_at(probe, Lookup::DequeueOrder), u8::MAX);
                prop_assert_eq!(q.priority_at(probe, Lookup::Storage), u8::MAX);
            }
        }
    }
}
