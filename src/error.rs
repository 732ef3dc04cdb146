use std::collections::TryReserveError;

use thiserror::Error;

/// Caller-facing failures of queue operations.
///
/// Broken internal invariants are not represented here, they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("Invalid priority rejected")]
    InvalidPriority,
    #[error("Invalid priority found at batch index {index}")]
    InvalidBatchPriority { index: usize },
    #[error("Batch has {values} values but {priorities} priorities")]
    LengthMismatch { values: usize, priorities: usize },
    #[error("Capacity of {required} entries exceeds the maximum of {max}")]
    CapacityOverflow { required: usize, max: usize },
    #[error("Allocation for {required} entries failed: {source}")]
    AllocationFailed {
        required: usize,
        #[source]
        source: TryReserveError,
    },
}
