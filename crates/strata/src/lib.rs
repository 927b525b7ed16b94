//! Strata: region allocation for short-lived, batch-freed data.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Strata sub-crates. For most users, adding `strata` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let arena = Arena::new();
//! let mut names = ArenaVec::new(&arena);
//! for name in ["index.md", "about.md", "index-2.md"] {
//!     names.push(arena.alloc_str(name).unwrap());
//! }
//!
//! let latest = names.find_if_reverse(|n| n.starts_with("index")).unwrap();
//! assert_eq!(names[latest], "index-2.md");
//!
//! let lengths = names.transform(&arena, |n| n.len());
//! assert_eq!(lengths, [8, 8, 10]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `strata-arena` | `Arena`, `ArenaVec`, chunks, configuration, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena allocator, chunk chain, and arena-backed vector (`strata-arena`).
///
/// Most users only need [`arena::Arena`] and [`arena::ArenaVec`], which are
/// also available in the [`prelude`].
pub use strata_arena as arena;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use strata_arena::{Arena, ArenaConfig, ArenaError, ArenaStats, ArenaVec};
}
