//! Chunked bump-pointer arena and arena-backed growable vector.
//!
//! Provides a region allocator that hands out raw memory from a chain of
//! quantized chunks and frees everything at once, plus a growable sequence
//! whose storage comes exclusively from such an arena. This crate is the
//! only one in the workspace that may contain `unsafe` code, confined to
//! `raw.rs`, the typed placement helpers on [`Arena`], and [`ArenaVec`]'s
//! element handling.
//!
//! # Architecture
//!
//! ```text
//! Arena (owner of all memory)
//! ├── ArenaConfig (quantum, reserve, minimum chunk alignment)
//! └── ChunkList → Chunk[] (quantum*k - reserve bytes, bump-allocated)
//!     └── RawChunk (one system allocation, freed on drop)
//!
//! ArenaVec<'a, T> ──borrows──▶ &'a Arena
//! ```
//!
//! # Memory model
//!
//! - **Bump allocation:** a request is carved from the current chunk at the
//!   cursor; if it does not fit, a new chunk sized for it becomes current
//!   and the old chunk's tail is abandoned.
//! - **No individual frees:** vectors leave their old blocks behind when
//!   they grow. All chunks are released when the arena is dropped.
//! - **Lifetimes:** every `ArenaVec` borrows its arena, so using a vector
//!   after its arena is gone does not compile.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod chunk;
pub mod config;
pub mod error;
mod raw;
pub mod vec;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use vec::ArenaVec;
