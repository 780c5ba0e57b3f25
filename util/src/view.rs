//! Lazy key, value and item views over container entries.
//!
//! A container exposes a raw iterator over its present entries as `(key, value)` pairs. A
//! [`View`] wraps such an iterator and projects every pair through a [`Projection`], so the same
//! traversal code serves key, value and item views alike. Views never copy the container's
//! storage and start a fresh traversal on each call of the container's `iter_*` method.
use std::{fmt, iter::FusedIterator, marker::PhantomData};

/// Maps an entry produced by a raw container iterator to the item yielded by a view.
pub trait Projection<Entry> {
    /// Item type yielded by the view.
    type Output;

    /// Projects a single entry.
    fn project(entry: Entry) -> Self::Output;
}

/// Projection yielding only the key of each entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyProjection;

/// Projection yielding only the value of each entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueProjection;

/// Projection yielding each entry as a `(key, value)` tuple.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemProjection;

impl<K, V> Projection<(K, V)> for KeyProjection {
    type Output = K;

    #[inline(always)]
    fn project((key, _): (K, V)) -> K {
        key
    }
}

impl<K, V> Projection<(K, V)> for ValueProjection {
    type Output = V;

    #[inline(always)]
    fn project((_, value): (K, V)) -> V {
        value
    }
}

impl<K, V> Projection<(K, V)> for ItemProjection {
    type Output = (K, V);

    #[inline(always)]
    fn project(entry: (K, V)) -> (K, V) {
        entry
    }
}

/// A lazy read-only projection of a container's entries.
pub struct View<I, P> {
    inner: I,
    _projection: PhantomData<fn() -> P>,
}

/// View yielding keys (or indices).
pub type Keys<I> = View<I, KeyProjection>;
/// View yielding values.
pub type Values<I> = View<I, ValueProjection>;
/// View yielding `(key, value)` pairs.
pub type Items<I> = View<I, ItemProjection>;

impl<I, P> View<I, P> {
    /// Wraps a raw entry iterator.
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            _projection: PhantomData,
        }
    }
}

impl<I: Clone, P> Clone for View<I, P> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<I: Iterator + Clone, P: Projection<I::Item>> fmt::Debug for View<I, P>
where
    P::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

macro_rules! impl_iterator {
    ($f: expr) => {
        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next().map($f)
        }
        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }
        fn count(self) -> usize {
            self.inner.count()
        }
        fn nth(&mut self, n: usize) -> Option<Self::Item> {
            self.inner.nth(n).map($f)
        }
        fn last(self) -> Option<Self::Item> {
            self.inner.last().map($f)
        }
    };
}

impl<I: Iterator, P: Projection<I::Item>> Iterator for View<I, P> {
    type Item = P::Output;

    impl_iterator!(<P as Projection<I::Item>>::project);
}

impl<I: ExactSizeIterator, P: Projection<I::Item>> ExactSizeIterator for View<I, P> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<I: FusedIterator, P: Projection<I::Item>> FusedIterator for View<I, P> {}
