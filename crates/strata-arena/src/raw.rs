//! Low-level primitives for arena memory operations.
//!
//! The only place the arena talks to the system allocator. Every `unsafe`
//! block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::ArenaError;

/// An owned, uninitialized heap buffer.
///
/// The buffer's address is stable for the lifetime of the value; moving a
/// `RawChunk` moves the handle, not the bytes.
pub(crate) struct RawChunk {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: `RawChunk` uniquely owns its buffer, like a `Box<[u8]>`.
unsafe impl Send for RawChunk {}

impl RawChunk {
    /// Allocate `size` bytes aligned to `align`.
    ///
    /// `size` must be non-zero; chunk sizing never produces an empty chunk.
    pub(crate) fn new(size: usize, align: usize) -> Result<Self, ArenaError> {
        debug_assert!(size > 0, "chunks are never empty");
        let layout = Layout::from_size_align(size, align)
            .map_err(|_| ArenaError::CapacityOverflow { requested: size })?;
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(ptr).ok_or(ArenaError::AllocationFailed { size, align })?;
        Ok(Self { ptr, layout })
    }

    /// Base address of the buffer.
    pub(crate) fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Size of the buffer in bytes.
    pub(crate) fn size(&self) -> usize {
        self.layout.size()
    }

    /// Pointer `offset` bytes into the buffer.
    ///
    /// `offset` must not exceed `self.size()`.
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset <= self.size());
        // SAFETY: `offset <= size`, so the result is within the allocation
        // or one past its end, and is therefore non-null.
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) }
    }
}

impl Drop for RawChunk {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc::alloc` with exactly `layout`
        // and has not been freed before.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
