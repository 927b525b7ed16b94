//! Contiguous memory chunks and the arena's chunk chain.
//!
//! A [`Chunk`] is one quantized heap buffer with bump allocation.
//! A [`ChunkList`] is the ordered chain of chunks an arena owns; when the
//! current chunk cannot fit a request, a new chunk sized for that request
//! is appended and becomes current.

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::raw::RawChunk;

/// A single contiguous memory chunk with bump allocation.
///
/// Chunks are the fundamental storage unit of the arena. Each chunk is an
/// uninitialized buffer with a cursor that only moves forward. Chunks are
/// never freed individually, only dropped with the arena that owns them.
pub struct Chunk {
    /// Backing storage, allocated to full capacity at creation.
    raw: RawChunk,
    /// Bump pointer: bytes consumed so far, including alignment padding.
    cursor: usize,
}

impl Chunk {
    /// Allocate a new chunk of `capacity` usable bytes with its base
    /// aligned to `align`.
    pub fn new(capacity: usize, align: usize) -> Result<Self, ArenaError> {
        Ok(Self {
            raw: RawChunk::new(capacity, align)?,
            cursor: 0,
        })
    }

    /// Bump-allocate a range fitting `layout` from this chunk.
    ///
    /// The cursor is first padded up to `layout.align()` (measured on the
    /// absolute address). Returns `None` if the padded request does not fit
    /// in the remaining capacity; the cursor is left untouched in that case.
    pub fn try_bump(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        let base = self.raw.base().as_ptr() as usize;
        let unaligned = base.checked_add(self.cursor)?;
        let aligned = unaligned.checked_add(layout.align() - 1)? & !(layout.align() - 1);
        let start = aligned - base;
        let end = start.checked_add(layout.size())?;
        if end > self.capacity() {
            return None;
        }
        self.cursor = end;
        Some(self.raw.at(start))
    }

    #[cfg(test)]
    pub(crate) fn base(&self) -> NonNull<u8> {
        self.raw.base()
    }

    /// Bytes consumed, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total usable capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.raw.size()
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }
}

/// The ordered chain of [`Chunk`]s owned by an arena.
///
/// Chunks are kept in allocation order; the last one is current. A chunk
/// that has been superseded is retained, with its unused tail abandoned,
/// until the list is dropped.
pub struct ChunkList {
    chunks: Vec<Chunk>,
    /// Unused tail bytes of every superseded chunk.
    abandoned: usize,
}

impl ChunkList {
    /// Create a chunk list with one pre-allocated chunk of
    /// [`ArenaConfig::first_chunk_size`] bytes.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        let first = Chunk::new(config.first_chunk_size(), config.chunk_align)?;
        Ok(Self {
            chunks: vec![first],
            abandoned: 0,
        })
    }

    /// Bump-allocate a range fitting `layout`, appending a new chunk if the
    /// current one cannot fit it.
    ///
    /// The new chunk is sized by [`ArenaConfig::chunk_size_for`] and aligned
    /// to at least `layout.align()`, so it always fits the request.
    pub fn alloc(
        &mut self,
        layout: Layout,
        config: &ArenaConfig,
    ) -> Result<NonNull<u8>, ArenaError> {
        if let Some(current) = self.chunks.last_mut() {
            if let Some(ptr) = current.try_bump(layout) {
                return Ok(ptr);
            }
        }

        let size = config.chunk_size_for(layout.size())?;
        let align = config.chunk_align.max(layout.align());
        let mut chunk = Chunk::new(size, align)?;
        let ptr = chunk
            .try_bump(layout)
            .ok_or(ArenaError::CapacityOverflow {
                requested: layout.size(),
            })?;

        let tail = self.chunks.last().map_or(0, Chunk::remaining);
        self.abandoned += tail;
        tracing::debug!(
            chunk_index = self.chunks.len(),
            chunk_size = size,
            request = layout.size(),
            abandoned_tail = tail,
            "arena chunk allocated"
        );
        self.chunks.push(chunk);
        Ok(ptr)
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Number of chunks in the chain.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Sum of all chunks' usable capacities in bytes.
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::capacity).sum()
    }

    /// Bytes handed out (plus alignment padding) across all chunks.
    pub fn used_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::used).sum()
    }

    /// Bytes left unused at the tails of superseded chunks.
    pub fn abandoned_bytes(&self) -> usize {
        self.abandoned
    }

    /// Bytes left in the current chunk.
    pub fn current_remaining(&self) -> usize {
        self.chunks.last().map_or(0, Chunk::remaining)
    }
}
