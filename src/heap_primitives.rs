// Heap intrinsic operations implemented externally.
//
// A heap is a tree-like structure where every subtree's root has a better
// priority than all the other nodes in the subtree.
//
// This is implemented with an array that's traversed in a non-linear way.
// These are the indices we assign to each node on a 4-ary heap.
//
// ```text
//                                   0
//            1              2               3                4
//      5  6  7  8     9 10 11 12     13 14 15 16      17 18 19 20
//   21 ..
// ```
//
// The last level will often be incomplete
//
// You can easily go up and down from any index with,
//   - Up:          `(i-1)//A`
//   - Down-first:  `(A*i) + 1`
//   - Down-last:   `A*(i+1)`
//
// When `A` is a power of two the division is a shift by `log2(A)`.

/// Children per node unless a queue asks for something else.
pub const DEFAULT_ARITY: usize = 4;

/// `log2(A)` for power-of-two arities.
///
/// ```
/// use pqueue::heap_primitives::log2_arity;
/// assert_eq!(log2_arity::<2>(), 1);
/// assert_eq!(log2_arity::<4>(), 2);
/// assert_eq!(log2_arity::<8>(), 3);
/// ```
#[inline(always)]
#[must_use]
pub const fn log2_arity<const A: usize>() -> u32 {
    debug_assert!(A.is_power_of_two());
    A.trailing_zeros()
}

/// The parent node
///
/// The root has no parent, so `i` must be non-zero.
///
/// ```
/// use pqueue::heap_primitives::index_parent;
/// assert_eq!(index_parent::<4>(1), 0);
/// assert_eq!(index_parent::<4>(4), 0);
/// assert_eq!(index_parent::<4>(5), 1);
/// assert_eq!(index_parent::<4>(8), 1);
/// assert_eq!(index_parent::<4>(9), 2);
/// assert_eq!(index_parent::<4>(21), 5);
/// assert_eq!(index_parent::<3>(7), 2);
/// assert_eq!(index_parent::<2>(25), 12);
/// ```
#[inline(always)]
#[must_use]
pub const fn index_parent<const A: usize>(i: usize) -> usize {
    debug_assert!(i != 0);
    if A.is_power_of_two() {
        (i - 1) >> log2_arity::<A>()
    } else {
        (i - 1) / A
    }
}

/// The `offset`-th child, with `offset` in `[0, A)`
///
/// ```
/// use pqueue::heap_primitives::index_child;
/// assert_eq!(index_child::<4>(0, 0), 1);
/// assert_eq!(index_child::<4>(0, 3), 4);
/// assert_eq!(index_child::<4>(1, 0), 5);
/// assert_eq!(index_child::<4>(2, 1), 10);
/// ```
#[inline(always)]
#[must_use]
pub const fn index_child<const A: usize>(i: usize, offset: usize) -> usize {
    debug_assert!(offset < A);
    (A * i) + offset + 1
}

/// The first child
///
/// ```
/// use pqueue::heap_primitives::index_first_children;
/// assert_eq!(index_first_children::<4>(0), 1);
/// assert_eq!(index_first_children::<4>(1), 5);
/// assert_eq!(index_first_children::<4>(4), 17);
/// assert_eq!(index_first_children::<2>(11), 23);
/// ```
#[inline(always)]
#[must_use]
pub const fn index_first_children<const A: usize>(i: usize) -> usize {
    index_child::<A>(i, 0)
}

/// The last child
///
/// ```
/// use pqueue::heap_primitives::index_last_children;
/// assert_eq!(index_last_children::<4>(0), 4);
/// assert_eq!(index_last_children::<4>(1), 8);
/// assert_eq!(index_last_children::<4>(4), 20);
/// assert_eq!(index_last_children::<2>(6), 14);
/// ```
#[inline(always)]
#[must_use]
pub const fn index_last_children<const A: usize>(i: usize) -> usize {
    A * (i + 1)
}
