//! Heap engines.
//!
//! Both engines share the sift primitives and growth policy and differ only
//! in how an entry is laid out in memory.

pub mod flat_heap;
pub mod node_heap;
