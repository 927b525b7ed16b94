//! Workload generators for the Strata benchmarks.
//!
//! - [`allocation_sizes`]: deterministic mixed-size byte requests
//! - [`fill_names`]: a vector of arena-resident file names

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_arena::{Arena, ArenaError, ArenaVec};

/// Generate `n` deterministic allocation sizes in `1..=max_size`.
///
/// Uses a fixed LCG over `seed` so that runs are comparable.
pub fn allocation_sizes(n: usize, max_size: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) as usize % max_size.max(1)) + 1
        })
        .collect()
}

/// Push `n` versioned file names (`post.md`, `post-2.md`, ...) into a new
/// vector in `arena`.
pub fn fill_names(arena: &Arena, n: usize) -> Result<ArenaVec<'_, &str>, ArenaError> {
    let mut names = ArenaVec::new(arena);
    for i in 0..n {
        let name = if i == 0 {
            arena.alloc_str("post.md")?
        } else {
            arena.alloc_str(&format!("post-{}.md", i + 1))?
        };
        names.try_push(name)?;
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_sizes_in_range() {
        let sizes = allocation_sizes(1000, 64, 42);
        assert_eq!(sizes.len(), 1000);
        assert!(sizes.iter().all(|&s| (1..=64).contains(&s)));
    }

    #[test]
    fn allocation_sizes_deterministic() {
        assert_eq!(allocation_sizes(50, 4096, 7), allocation_sizes(50, 4096, 7));
        assert_ne!(allocation_sizes(50, 4096, 7), allocation_sizes(50, 4096, 8));
    }

    #[test]
    fn fill_names_versions_in_order() {
        let arena = Arena::new();
        let names = fill_names(&arena, 3).unwrap();
        assert_eq!(names, ["post.md", "post-2.md", "post-3.md"]);
    }
}
