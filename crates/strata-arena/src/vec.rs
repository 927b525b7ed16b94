//! A growable, densely packed sequence whose storage lives in an [`Arena`].
//!
//! [`ArenaVec`] never frees its own block. Growth requests a block of twice
//! the capacity from the same arena, moves the live elements across, and
//! leaves the old block to the arena.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};

use crate::arena::Arena;
use crate::error::ArenaError;

/// A growable sequence backed by memory from an [`Arena`].
///
/// The vector borrows its arena for `'a`, so it cannot outlive it.
/// Capacity doubles whenever a push fills the current block, which keeps
/// `len() < capacity()` after every push.
///
/// # Example
///
/// ```
/// use strata_arena::{Arena, ArenaVec};
///
/// let arena = Arena::new();
/// let mut names = ArenaVec::new(&arena);
/// for name in ["asdf", "foo", "asdf", "foo", "asdf", "asdf"] {
///     names.push(name);
/// }
/// assert_eq!(names.find_if(|n| *n == "foo"), Some(1));
/// assert_eq!(names.find_if_reverse(|n| *n == "foo"), Some(3));
/// assert_eq!(names.capacity(), 8);
/// ```
pub struct ArenaVec<'a, T> {
    arena: &'a Arena,
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    marker: PhantomData<T>,
}

impl<'a, T> ArenaVec<'a, T> {
    /// Capacity used by [`ArenaVec::new`].
    pub const DEFAULT_CAPACITY: usize = 4;

    /// Create an empty vector with [`Self::DEFAULT_CAPACITY`] slots.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot supply the initial block.
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_capacity(arena, Self::DEFAULT_CAPACITY)
    }

    /// Create an empty vector with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot supply the initial block.
    pub fn with_capacity(arena: &'a Arena, capacity: usize) -> Self {
        match Self::try_with_capacity(arena, capacity) {
            Ok(vec) => vec,
            Err(err) => panic!("arena vector allocation failed: {err}"),
        }
    }

    /// Create an empty vector with room for `capacity` elements.
    ///
    /// A capacity of zero is raised to one, so there is always a slot for
    /// the next push.
    pub fn try_with_capacity(arena: &'a Arena, capacity: usize) -> Result<Self, ArenaError> {
        let cap = capacity.max(1);
        let ptr = arena.allocate(Self::block_layout(cap)?)?.cast::<T>();
        Ok(Self {
            arena,
            ptr,
            len: 0,
            cap,
            marker: PhantomData,
        })
    }

    /// Create a vector holding clones of `items`.
    pub fn from_slice(arena: &'a Arena, items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity(arena, items.len().saturating_add(1));
        vec.extend_from_slice(items);
        vec
    }

    fn block_layout(cap: usize) -> Result<Layout, ArenaError> {
        Layout::array::<T>(cap).map_err(|_| ArenaError::CapacityOverflow { requested: cap })
    }

    /// Append `value`.
    ///
    /// # Panics
    ///
    /// Panics if growth is needed and the arena cannot supply the new block.
    pub fn push(&mut self, value: T) {
        if let Err(err) = self.try_push(value) {
            panic!("arena vector push failed: {err}");
        }
    }

    /// Append `value`, growing first if it would fill the current block.
    ///
    /// On error the vector is unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), ArenaError> {
        if self.len + 1 == self.cap {
            self.grow()?;
        }
        // SAFETY: `len < cap`, so slot `len` lies inside the current block
        // and holds no live element.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Move the live elements into a block of twice the capacity.
    fn grow(&mut self) -> Result<(), ArenaError> {
        let new_cap = self
            .cap
            .checked_mul(2)
            .ok_or(ArenaError::CapacityOverflow {
                requested: self.cap,
            })?;
        let new_ptr = self
            .arena
            .allocate(Self::block_layout(new_cap)?)?
            .cast::<T>();
        // SAFETY: the new block is fresh, so it cannot overlap the old one,
        // and it holds `new_cap > len` elements. The old slots are never read
        // again, so this bitwise copy is a move.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len) };
        tracing::trace!(
            old_capacity = self.cap,
            new_capacity = new_cap,
            len = self.len,
            "arena vector grown"
        );
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Append clones of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        for item in items {
            self.push(item.clone());
        }
    }

    /// Append clones of every element of `items`, stopping at the first
    /// failed push.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), ArenaError>
    where
        T: Clone,
    {
        items.iter().try_for_each(|item| self.try_push(item.clone()))
    }

    /// Checked access to the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, ArenaError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArenaError::IndexOutOfRange { index, len })
    }

    /// Checked mutable access to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ArenaError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArenaError::IndexOutOfRange { index, len })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block can hold.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The arena this vector allocates from.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// First element, if any.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is aligned and non-null, and `[0, len)` is
        // initialized.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` makes the borrow unique.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Iterate over the live elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over the live elements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Index of the first element matching `pred`.
    pub fn find_if<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(pred)
    }

    /// Index of the last element matching `pred`.
    pub fn find_if_reverse<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().rposition(pred)
    }

    /// Build a new vector in `arena` holding `f` applied to every element.
    ///
    /// The source is left untouched and the result never shares its storage.
    ///
    /// # Panics
    ///
    /// Panics if `arena` cannot supply the result's block.
    pub fn transform<'b, U, F>(&self, arena: &'b Arena, f: F) -> ArenaVec<'b, U>
    where
        F: FnMut(&T) -> U,
    {
        match self.try_transform(arena, f) {
            Ok(vec) => vec,
            Err(err) => panic!("arena vector transform failed: {err}"),
        }
    }

    /// Fallible form of [`Self::transform`].
    ///
    /// The result is created with room for `len() + 1` elements so that
    /// filling it never triggers growth.
    pub fn try_transform<'b, U, F>(
        &self,
        arena: &'b Arena,
        mut f: F,
    ) -> Result<ArenaVec<'b, U>, ArenaError>
    where
        F: FnMut(&T) -> U,
    {
        let mut out = ArenaVec::try_with_capacity(arena, self.len.saturating_add(1))?;
        for item in self.iter() {
            out.try_push(f(item))?;
        }
        Ok(out)
    }
}

impl<T> Drop for ArenaVec<'_, T> {
    fn drop(&mut self) {
        // Only the elements are dropped; the block belongs to the arena.
        // SAFETY: `[0, len)` is initialized and dropped exactly once here.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Index<usize> for ArenaVec<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for ArenaVec<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> Extend<T> for ArenaVec<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'v, T> IntoIterator for &'v ArenaVec<'_, T> {
    type Item = &'v T;
    type IntoIter = std::slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, T> IntoIterator for &'v mut ArenaVec<'_, T> {
    type Item = &'v mut T;
    type IntoIter = std::slice::IterMut<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArenaVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<ArenaVec<'_, U>> for ArenaVec<'_, T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &ArenaVec<'_, U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for ArenaVec<'_, T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for ArenaVec<'_, T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for ArenaVec<'_, T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArenaVec<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Sample {
        id: u32,
        weight: f64,
    }

    #[test]
    fn new_vector_is_empty_with_default_capacity() {
        let arena = Arena::new();
        let v: ArenaVec<'_, u32> = ArenaVec::new(&arena);
        assert!(v.is_empty());
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn five_pushes_double_capacity_once() {
        let arena = Arena::new();
        let mut v = ArenaVec::with_capacity(&arena, 4);
        for id in 0..5 {
            v.push(Sample {
                id,
                weight: id as f64 * 0.5,
            });
        }
        assert_eq!(v.len(), 5);
        assert_eq!(v.capacity(), 8);
        let ids: Vec<u32> = v.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(v[4].weight, 2.0);
    }

    #[test]
    fn growth_happens_when_push_fills_block() {
        let arena = Arena::new();
        let mut v = ArenaVec::with_capacity(&arena, 4);
        v.push(1u8);
        v.push(2);
        v.push(3);
        assert_eq!(v.capacity(), 4);
        v.push(4);
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let arena = Arena::new();
        let mut v = ArenaVec::with_capacity(&arena, 0);
        assert_eq!(v.capacity(), 1);
        v.push(9i64);
        assert_eq!(v.capacity(), 2);
        assert_eq!(v, [9]);
    }

    #[test]
    fn find_scenarios() {
        let arena = Arena::new();
        let v = ArenaVec::from_slice(&arena, &["asdf", "foo", "asdf", "foo", "asdf", "asdf"]);
        assert_eq!(v.find_if(|x| *x == "foo"), Some(1));
        assert_eq!(v.find_if_reverse(|x| *x == "foo"), Some(3));
        assert_eq!(v.find_if(|x| *x == "bar"), None);
        assert_eq!(v.find_if_reverse(|x| *x == "bar"), None);
    }

    #[test]
    fn find_on_empty_is_none() {
        let arena = Arena::new();
        let v: ArenaVec<'_, i32> = ArenaVec::new(&arena);
        assert_eq!(v.find_if(|_| true), None);
        assert_eq!(v.find_if_reverse(|_| true), None);
    }

    #[test]
    fn checked_get_reports_out_of_range() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        v.push(10);
        v.push(20);
        assert_eq!(v.get(1), Ok(&20));
        assert_eq!(
            v.get(2),
            Err(ArenaError::IndexOutOfRange { index: 2, len: 2 })
        );
        *v.get_mut(0).unwrap() = 11;
        assert_eq!(v[0], 11);
        assert!(v.get_mut(5).is_err());
    }

    #[test]
    #[should_panic(expected = "index out of range: index 3, len 1")]
    fn index_past_len_panics() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        v.push(1);
        let _ = v[3];
    }

    #[test]
    fn transform_into_same_arena() {
        let arena = Arena::new();
        let v = ArenaVec::from_slice(&arena, &[1, 2, 3]);
        let doubled = v.transform(&arena, |x| x * 2);
        assert_eq!(doubled, [2, 4, 6]);
        assert_eq!(v, [1, 2, 3]);
        assert_ne!(doubled.as_slice().as_ptr() as usize, v.as_slice().as_ptr() as usize);
    }

    #[test]
    fn transform_into_other_arena_changes_type() {
        let source = Arena::new();
        let target = Arena::new();
        let v = ArenaVec::from_slice(&source, &["a", "bb", "ccc"]);
        let lens = v.transform(&target, |s| s.len());
        assert_eq!(lens, [1usize, 2, 3]);
        assert_eq!(lens.capacity(), 4);
    }

    #[test]
    fn transform_of_empty_is_empty() {
        let arena = Arena::new();
        let v: ArenaVec<'_, u8> = ArenaVec::new(&arena);
        let out = v.transform(&arena, |b| *b as u32);
        assert!(out.is_empty());
    }

    #[test]
    fn iteration_is_restartable() {
        let arena = Arena::new();
        let v = ArenaVec::from_slice(&arena, &[3, 1, 4, 1, 5]);
        let first: Vec<i32> = v.iter().copied().collect();
        let second: Vec<i32> = (&v).into_iter().copied().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![3, 1, 4, 1, 5]);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let arena = Arena::new();
        let mut v = ArenaVec::from_slice(&arena, &[1, 2, 3]);
        for x in &mut v {
            *x *= 10;
        }
        assert_eq!(v, [10, 20, 30]);
    }

    #[test]
    fn extend_pushes_in_order() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        v.extend(0..20u16);
        assert_eq!(v.len(), 20);
        assert_eq!(v.capacity(), 32);
        assert_eq!(v.first(), Some(&0));
        assert_eq!(v.last(), Some(&19));
    }

    #[test]
    fn growth_leaves_old_block_in_arena() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        for i in 0..4u64 {
            v.push(i);
        }
        // Initial block (4 * 8) plus grown block (8 * 8).
        assert_eq!(arena.used_bytes(), 32 + 64);
    }

    #[test]
    fn failed_growth_leaves_vector_unchanged() {
        let arena = Arena::new();
        let mut v = ArenaVec::from_slice(&arena, &[7u64, 8, 9]);
        let (len, cap) = (v.len, v.cap);
        let chunks = arena.chunk_count();

        // Pretend the block is one push from full at a size whose doubling
        // the system allocator cannot supply.
        v.cap = 1 << 50;
        v.len = v.cap - 1;
        let err = v.try_push(10).unwrap_err();
        assert!(matches!(err, ArenaError::AllocationFailed { .. }));
        assert_eq!(v.len(), (1 << 50) - 1);
        assert_eq!(v.capacity(), 1 << 50);
        assert_eq!(arena.chunk_count(), chunks);

        v.len = len;
        v.cap = cap;
        assert_eq!(v, [7, 8, 9]);
        v.push(10);
        assert_eq!(v, [7, 8, 9, 10]);
    }

    #[test]
    fn capacity_doubling_overflow_leaves_vector_unchanged() {
        let arena = Arena::new();
        let mut v: ArenaVec<'_, ()> = ArenaVec::new(&arena);
        // Zero-sized elements need no storage, so any length is valid.
        v.cap = usize::MAX / 2 + 1;
        v.len = v.cap - 1;
        let err = v.try_push(()).unwrap_err();
        assert!(matches!(err, ArenaError::CapacityOverflow { .. }));
        assert_eq!(v.len(), usize::MAX / 2);
        assert_eq!(v.capacity(), usize::MAX / 2 + 1);
        assert_eq!(v.as_slice().len(), usize::MAX / 2);
    }

    #[test]
    fn owned_elements_survive_growth_and_drop_once() {
        let arena = Arena::new();
        let tracker = Rc::new(Cell::new(0));
        struct Counted(Rc<Cell<u32>>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }
        {
            let mut v = ArenaVec::new(&arena);
            for _ in 0..10 {
                v.push(Counted(Rc::clone(&tracker)));
            }
            assert_eq!(tracker.get(), 0);
        }
        assert_eq!(tracker.get(), 10);
    }

    #[test]
    fn strings_survive_growth() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        for i in 0..50 {
            v.push(format!("file-{i}.md"));
        }
        assert_eq!(v[0], "file-0.md");
        assert_eq!(v[49], "file-49.md");
        assert_eq!(v.find_if(|s| s.ends_with("-7.md")), Some(7));
    }

    #[test]
    fn zero_sized_elements() {
        let arena = Arena::new();
        let mut v = ArenaVec::new(&arena);
        for _ in 0..100 {
            v.push(());
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v.capacity(), 128);
        assert_eq!(arena.used_bytes(), 0);
    }

    #[test]
    fn many_vectors_share_one_arena() {
        let arena = Arena::new();
        let mut a = ArenaVec::new(&arena);
        let mut b = ArenaVec::new(&arena);
        for i in 0..1000u32 {
            a.push(i);
            b.push(i * 3);
        }
        assert_eq!(a.len(), 1000);
        assert_eq!(b[999], 2997);
        assert!(a.iter().enumerate().all(|(i, &x)| x == i as u32));
        assert!(std::ptr::eq(a.arena(), b.arena()));
    }
}
