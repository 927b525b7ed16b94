//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena and arena-vector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The system allocator could not satisfy a chunk request.
    AllocationFailed {
        /// Size of the chunk that was requested, in bytes.
        size: usize,
        /// Alignment of the chunk that was requested.
        align: usize,
    },
    /// A byte or element count overflowed while sizing an allocation.
    CapacityOverflow {
        /// The request that could not be represented, in bytes or elements.
        requested: usize,
    },
    /// Checked indexed access past the live range of a vector.
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of live elements at the time of the access.
        len: usize,
    },
    /// An [`ArenaConfig`](crate::ArenaConfig) failed validation.
    InvalidConfig {
        /// Which constraint was violated.
        reason: &'static str,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { size, align } => {
                write!(
                    f,
                    "arena chunk allocation failed: {size} bytes at alignment {align}"
                )
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: request of {requested} cannot be sized")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index out of range: index {index}, len {len}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
