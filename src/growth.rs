//! Capacity growth shared by every storage layout.
//!
//! Backing arrays never grow implicitly. Before an insertion the engine asks
//! [`grown_capacity`] for the next size and reserves it with
//! [`reserve_exact`], so a failed allocation surfaces as a [`HeapError`]
//! while the old storage stays untouched.

use std::cmp::max;

use crate::error::HeapError;

/// Capacity multiplier applied on every reallocation.
pub const GROW_FACTOR: usize = 2;
/// Smallest number of slots added by a reallocation.
pub const MIN_GROWTH: usize = 4;
/// Backing arrays are indexed with 32 bits.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// The capacity to move to when `current` slots can't hold `required` entries.
///
/// ```
/// use pqueue::growth::grown_capacity;
/// assert_eq!(grown_capacity(0, 1), Ok(4));
/// assert_eq!(grown_capacity(4, 5), Ok(8));
/// assert_eq!(grown_capacity(8, 100), Ok(100));
/// ```
pub fn grown_capacity(current: usize, required: usize) -> Result<usize, HeapError> {
    if required > MAX_CAPACITY {
        log::warn!("Refusing to grow past {MAX_CAPACITY} entries ({required} required)");
        return Err(HeapError::CapacityOverflow {
            required,
            max: MAX_CAPACITY,
        });
    }
    let doubled = current.saturating_mul(GROW_FACTOR);
    let stepped = current.saturating_add(MIN_GROWTH);
    Ok(max(max(doubled, stepped), required).min(MAX_CAPACITY))
}

/// Makes room for `target` slots in `v` without touching its contents.
pub fn reserve_exact<T>(v: &mut Vec<T>, target: usize) -> Result<(), HeapError> {
    if v.capacity() >= target {
        return Ok(());
    }
    v.try_reserve_exact(target - v.len())
        .map_err(|source| HeapError::AllocationFailed {
            required: target,
            source,
        })
}

/// Target capacity for holding `required` entries, or `None` if `capacity`
/// already suffices.
#[inline(always)]
pub(crate) fn growth_target(
    capacity: usize,
    required: usize,
) -> Result<Option<usize>, HeapError> {
    if required <= capacity && required <= MAX_CAPACITY {
        return Ok(None);
    }
    let target = grown_capacity(capacity, required)?;
    log::trace!("Growing heap storage {capacity} -> {target}");
    Ok(Some(target))
}
