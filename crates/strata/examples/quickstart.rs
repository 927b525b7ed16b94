//! Strata Quickstart — an arena, a few vectors, and a teardown.
//!
//! Demonstrates:
//!   1. Creating an arena and vectors that borrow it
//!   2. Pushing past the initial capacity (growth by doubling)
//!   3. Forward and reverse predicate search
//!   4. Transforming a vector into another arena
//!   5. Reading the arena's memory accounting before it is dropped
//!
//! Run with:
//!   RUST_LOG=strata_arena=trace cargo run --example quickstart

use strata::prelude::*;

// ─── Records ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct FileRecord<'a> {
    name: &'a str,
    modified: u64,
}

fn main() -> Result<(), ArenaError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let arena = Arena::new();

    // ─── Names: growth and search ───────────────────────────────

    let mut names = ArenaVec::new(&arena);
    for name in ["asdf", "foo", "asdf", "foo", "asdf", "asdf"] {
        names.try_push(arena.alloc_str(name)?)?;
    }
    println!(
        "{} names, capacity {}: {:?}",
        names.len(),
        names.capacity(),
        names
    );
    println!(
        "first \"foo\" at {:?}, last \"foo\" at {:?}",
        names.find_if(|n| *n == "foo"),
        names.find_if_reverse(|n| *n == "foo")
    );

    // ─── Records: typed values and checked access ───────────────

    let mut files = ArenaVec::with_capacity(&arena, 4);
    for (i, name) in ["post.md", "post-2.md", "notes.txt", "post-3.md", "cover.png"]
        .into_iter()
        .enumerate()
    {
        files.try_push(FileRecord {
            name: arena.alloc_str(name)?,
            modified: 1_700_000_000 + i as u64 * 60,
        })?;
    }
    let newest_post = files
        .find_if_reverse(|f| f.name.starts_with("post"))
        .map(|i| files.get(i))
        .transpose()?;
    println!("newest post: {newest_post:?}");

    match files.get(10) {
        Ok(file) => println!("unexpected file: {file:?}"),
        Err(err) => println!("checked access: {err}"),
    }

    // ─── Transform into a second arena ──────────────────────────

    let scratch = Arena::new();
    let stamps = files.try_transform(&scratch, |f| f.modified)?;
    println!("timestamps: {stamps:?}");

    println!("main arena: {}", arena.stats());
    println!("scratch arena: {}", scratch.stats());
    Ok(())
}
