// Knockout tournament over slot offsets picking a heap node's best child
//
// The children of a heap node are contiguous, so finding the best one is an
// arg-min over a short run of slots. The slots may live in one array or
// several parallel ones, so entries are never borrowed here. Callers hand in
// `le(l, r)`, which answers whether slot `l` sorts before-or-equal slot `r`,
// and get back the winning offset.
//
// On ties the left contender wins, which keeps the leftmost best child.

/// Core comparison and index selection
#[inline(always)]
#[must_use]
fn fight<F: Fn(usize, usize) -> bool>(le: &F, l: usize, r: usize) -> usize {
    if le(l, r) { l } else { r }
}

// 0   1
// *   *
//  \ /
//   *
#[inline(always)]
#[must_use]
fn derank_2<F: Fn(usize, usize) -> bool>(le: &F) -> usize {
    fight(le, 0, 1)
}

// 0   1   2
// *   *   *
//  \ /    |
//   *     *
//    \   /
//      *
#[inline(always)]
#[must_use]
fn derank_3<F: Fn(usize, usize) -> bool>(le: &F) -> usize {
    fight(le, fight(le, 0, 1), 2)
}

// 0   1   2   3
// *   *   *   *
//  \ /     \ /
//   *       *
//    \     /
//       *
#[inline(always)]
#[must_use]
fn derank_4<F: Fn(usize, usize) -> bool>(le: &F) -> usize {
    fight(le, fight(le, 0, 1), fight(le, 2, 3))
}

// 0   1 2   3 4   5 6   7
// *   * *   * *   * *   *
//  \ /   \ /   \ /   \ /
//   *     *     *     *
//    \   /       \   /
//      *           *
//        \        /
//            *
#[inline(always)]
#[must_use]
fn derank_8<F: Fn(usize, usize) -> bool>(le: &F) -> usize {
    fight(
        le,
        fight(le, fight(le, 0, 1), fight(le, 2, 3)),
        fight(le, fight(le, 4, 5), fight(le, 6, 7)),
    )
}

/// Offset of the best among `n` contiguous contenders.
///
/// ```
/// use pqueue::derank::derank_by;
/// let a = [4, 2, 7, 2];
/// assert_eq!(derank_by(a.len(), |l, r| a[l] <= a[r]), 1);
/// ```
#[inline(always)]
#[must_use]
pub fn derank_by<F: Fn(usize, usize) -> bool>(n: usize, le: F) -> usize {
    debug_assert!(n > 0, "No contenders");
    match n {
        1 => 0usize,
        2 => derank_2(&le),
        3 => derank_3(&le),
        4 => derank_4(&le),
        8 => derank_8(&le),
        _ => linear_min_index_by(n, le),
    }
}

/// Left-to-right fold keeping the best candidate.
pub fn linear_min_index_by<F: Fn(usize, usize) -> bool>(n: usize, le: F) -> usize {
    assert!(n > 0);

    let mut min_i = 0;
    for i in 1..n {
        if !le(min_i, i) {
            min_i = i;
        }
    }
    min_i
}
