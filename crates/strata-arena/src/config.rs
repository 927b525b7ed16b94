//! Arena configuration and the chunk-sizing policy.

use crate::error::ArenaError;

/// Configuration for the arena allocator.
///
/// Controls how chunks are quantized and aligned. Validated at arena
/// construction; all values are immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Chunk sizes are multiples of this many bytes before the reservation
    /// is subtracted.
    ///
    /// Default: 32_768. Must be larger than `chunk_reserve`.
    pub chunk_quantum: usize,

    /// Bytes withheld from each chunk so that the underlying allocation,
    /// including the system allocator's own bookkeeping, lands on a
    /// multiple of `chunk_quantum`.
    ///
    /// Default: 32.
    pub chunk_reserve: usize,

    /// Minimum alignment of every chunk's base address.
    ///
    /// Default: 16. Must be a power of two no larger than `chunk_quantum`.
    /// Requests with a larger alignment get a chunk aligned to their own
    /// alignment instead.
    pub chunk_align: usize,
}

impl ArenaConfig {
    /// Default chunk quantum: 32KB.
    pub const DEFAULT_CHUNK_QUANTUM: usize = 32_768;

    /// Default per-chunk reservation for allocator bookkeeping.
    pub const DEFAULT_CHUNK_RESERVE: usize = 32;

    /// Default minimum chunk alignment.
    pub const DEFAULT_CHUNK_ALIGN: usize = 16;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            chunk_quantum: Self::DEFAULT_CHUNK_QUANTUM,
            chunk_reserve: Self::DEFAULT_CHUNK_RESERVE,
            chunk_align: Self::DEFAULT_CHUNK_ALIGN,
        }
    }

    /// Check the config's internal constraints.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.chunk_quantum <= self.chunk_reserve {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_quantum must exceed chunk_reserve",
            });
        }
        if !self.chunk_align.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_align must be a power of two",
            });
        }
        if self.chunk_align > self.chunk_quantum {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_align must not exceed chunk_quantum",
            });
        }
        Ok(())
    }

    /// Usable size of the chunk that is created for a `request`-byte
    /// allocation.
    ///
    /// Returns `quantum * k - reserve` for the smallest `k >= 1` with
    /// `quantum * k >= request + reserve`. Requests smaller than one
    /// quantum still get a full quantum-sized chunk.
    pub fn chunk_size_for(&self, request: usize) -> Result<usize, ArenaError> {
        let overflow = ArenaError::CapacityOverflow { requested: request };
        let full = request.checked_add(self.chunk_reserve).ok_or(overflow.clone())?;
        let quanta = full.div_ceil(self.chunk_quantum).max(1);
        let total = quanta
            .checked_mul(self.chunk_quantum)
            .filter(|&total| total <= isize::MAX as usize)
            .ok_or(overflow)?;
        Ok(total - self.chunk_reserve)
    }

    /// Usable size of the chunk an arena starts with.
    pub fn first_chunk_size(&self) -> usize {
        self.chunk_quantum - self.chunk_reserve
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
