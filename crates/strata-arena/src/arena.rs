//! The region allocator: a chain of quantized chunks handing out raw byte
//! ranges by bump allocation, all released together when the arena drops.

use std::alloc::Layout;
use std::cell::RefCell;
use std::fmt;
use std::ptr::NonNull;

use crate::chunk::ChunkList;
use crate::config::ArenaConfig;
use crate::error::ArenaError;

/// A bump-pointer region allocator.
///
/// Allocation goes through `&self`, so any number of
/// [`ArenaVec`](crate::ArenaVec)s and other structures can borrow one arena
/// at the same time. Nothing is ever freed individually: every chunk lives
/// until the arena is dropped, and the borrow checker rejects any use of an
/// allocation after that point.
///
/// # Thread safety
///
/// An arena is a single-writer resource. It is `Send` but not `Sync`; use
/// one arena per thread.
///
/// # Example
///
/// ```
/// use std::alloc::Layout;
/// use strata_arena::Arena;
///
/// let arena = Arena::new();
/// let block = arena.allocate(Layout::new::<[u64; 4]>()).unwrap();
/// assert_eq!(block.as_ptr() as usize % 8, 0);
///
/// let point = arena.alloc((3_i32, 4.5_f64)).unwrap();
/// point.0 += 1;
/// assert_eq!(*point, (4, 4.5));
/// ```
pub struct Arena {
    config: ArenaConfig,
    chunks: RefCell<ChunkList>,
}

impl Arena {
    /// Create an arena with the default [`ArenaConfig`].
    ///
    /// # Panics
    ///
    /// Panics if the first chunk cannot be allocated.
    pub fn new() -> Self {
        match Self::with_config(ArenaConfig::new()) {
            Ok(arena) => arena,
            Err(err) => panic!("failed to create arena: {err}"),
        }
    }

    /// Create an arena with a custom configuration.
    ///
    /// Validates `config`, then allocates a first chunk of
    /// [`ArenaConfig::first_chunk_size`] bytes.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let chunks = ChunkList::new(&config)?;
        tracing::debug!(
            first_chunk_size = config.first_chunk_size(),
            quantum = config.chunk_quantum,
            "arena created"
        );
        Ok(Self {
            config,
            chunks: RefCell::new(chunks),
        })
    }

    /// Allocate an uninitialized range fitting `layout`.
    ///
    /// If the current chunk has too few bytes left (after padding to
    /// `layout.align()`), a new chunk sized by
    /// [`ArenaConfig::chunk_size_for`] becomes current and the old chunk's
    /// tail is abandoned. The returned memory stays valid until the arena is
    /// dropped.
    pub fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ArenaError> {
        self.chunks.borrow_mut().alloc(layout, &self.config)
    }

    /// Allocate `size` uninitialized bytes with no alignment guarantee.
    pub fn alloc_bytes(&self, size: usize) -> Result<NonNull<u8>, ArenaError> {
        let layout = Layout::from_size_align(size, 1)
            .map_err(|_| ArenaError::CapacityOverflow { requested: size })?;
        self.allocate(layout)
    }

    /// Move `value` into the arena and return a reference to it.
    ///
    /// The value's destructor never runs.
    #[allow(unsafe_code)]
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> Result<&mut T, ArenaError> {
        let ptr = self.allocate(Layout::new::<T>())?.cast::<T>();
        // SAFETY: `ptr` is fresh, properly aligned for `T`, large enough for
        // one `T`, and never handed out again, so the reference is unique.
        // The chunk backing it lives as long as `self`.
        unsafe {
            ptr.as_ptr().write(value);
            Ok(&mut *ptr.as_ptr())
        }
    }

    /// Copy `slice` into the arena.
    #[allow(unsafe_code)]
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> Result<&mut [T], ArenaError> {
        let layout = Layout::array::<T>(slice.len()).map_err(|_| ArenaError::CapacityOverflow {
            requested: slice.len(),
        })?;
        let ptr = self.allocate(layout)?.cast::<T>();
        // SAFETY: `ptr` is fresh and sized and aligned for `slice.len()`
        // elements; `T: Copy` so a bitwise copy is a valid initialization.
        unsafe {
            std::ptr::copy_nonoverlapping(slice.as_ptr(), ptr.as_ptr(), slice.len());
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), slice.len()))
        }
    }

    /// Copy `s` into the arena.
    #[allow(unsafe_code)]
    pub fn alloc_str(&self, s: &str) -> Result<&str, ArenaError> {
        let bytes = self.alloc_slice_copy(s.as_bytes())?;
        // SAFETY: the bytes were copied verbatim from a `str`.
        Ok(unsafe { std::str::from_utf8_unchecked(bytes) })
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of chunks owned by the arena.
    pub fn chunk_count(&self) -> usize {
        self.chunks.borrow().chunk_count()
    }

    /// Sum of all chunks' usable capacities in bytes.
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.borrow().reserved_bytes()
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used_bytes(&self) -> usize {
        self.chunks.borrow().used_bytes()
    }

    /// Bytes stranded at the tails of superseded chunks.
    pub fn abandoned_bytes(&self) -> usize {
        self.chunks.borrow().abandoned_bytes()
    }

    /// Bytes left in the current chunk.
    pub fn current_chunk_remaining(&self) -> usize {
        self.chunks.borrow().current_remaining()
    }

    /// Snapshot of the arena's memory accounting.
    pub fn stats(&self) -> ArenaStats {
        let chunks = self.chunks.borrow();
        ArenaStats {
            chunk_count: chunks.chunk_count(),
            reserved_bytes: chunks.reserved_bytes(),
            used_bytes: chunks.used_bytes(),
            abandoned_bytes: chunks.abandoned_bytes(),
            current_chunk_remaining: chunks.current_remaining(),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let chunks = self.chunks.get_mut();
        tracing::debug!(
            chunk_count = chunks.chunk_count(),
            reserved_bytes = chunks.reserved_bytes(),
            "releasing arena"
        );
    }
}

/// Point-in-time memory accounting for an [`Arena`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of chunks owned by the arena.
    pub chunk_count: usize,
    /// Sum of the chunks' usable capacities.
    pub reserved_bytes: usize,
    /// Bytes handed out, including alignment padding.
    pub used_bytes: usize,
    /// Unused tails of superseded chunks.
    pub abandoned_bytes: usize,
    /// Bytes left in the current chunk.
    pub current_chunk_remaining: usize,
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunks, {}/{} bytes used, {} abandoned, {} left in current chunk",
            self.chunk_count,
            self.used_bytes,
            self.reserved_bytes,
            self.abandoned_bytes,
            self.current_chunk_remaining
        )
    }
}
