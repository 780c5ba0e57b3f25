use std::{collections::btree_map, iter::FusedIterator};

use hashkit_util::view;

use crate::group::{Group, GROUP_SHIFT};

/// Iterator over the present indices of a sparse array and their values, by increasing index.
///
/// This is the raw traversal underlying the array's index, value and item views.
pub struct RawIndexed<'a, V> {
    groups: btree_map::Iter<'a, usize, Group<V>>,
    base: usize,
    mask: u64,
    values: std::slice::Iter<'a, V>,
    remaining: usize,
}

impl<'a, V> RawIndexed<'a, V> {
    pub(crate) fn new(groups: btree_map::Iter<'a, usize, Group<V>>, len: usize) -> Self {
        Self {
            groups,
            base: 0,
            mask: 0,
            values: Default::default(),
            remaining: len,
        }
    }
}

impl<V> Clone for RawIndexed<'_, V> {
    fn clone(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            base: self.base,
            mask: self.mask,
            values: self.values.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for RawIndexed<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.mask == 0 {
            let (&group_index, group) = self.groups.next()?;
            self.base = group_index << GROUP_SHIFT;
            self.mask = group.mask();
            self.values = group.values().iter();
        }
        let slot = self.mask.trailing_zeros() as usize;
        self.mask &= self.mask - 1;
        self.remaining -= 1;
        let value = self.values.next()?;
        Some((self.base + slot, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for RawIndexed<'_, V> {}
impl<V> FusedIterator for RawIndexed<'_, V> {}

/// Iterator over the present indices of a sparse array, allowing mutation of the values.
pub struct RawIndexedMut<'a, V> {
    groups: btree_map::IterMut<'a, usize, Group<V>>,
    base: usize,
    mask: u64,
    values: std::slice::IterMut<'a, V>,
    remaining: usize,
}

impl<'a, V> RawIndexedMut<'a, V> {
    pub(crate) fn new(groups: btree_map::IterMut<'a, usize, Group<V>>, len: usize) -> Self {
        Self {
            groups,
            base: 0,
            mask: 0,
            values: Default::default(),
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for RawIndexedMut<'a, V> {
    type Item = (usize, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.mask == 0 {
            let (&group_index, group) = self.groups.next()?;
            self.base = group_index << GROUP_SHIFT;
            self.mask = group.mask();
            self.values = group.values_mut().iter_mut();
        }
        let slot = self.mask.trailing_zeros() as usize;
        self.mask &= self.mask - 1;
        self.remaining -= 1;
        let value = self.values.next()?;
        Some((self.base + slot, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for RawIndexedMut<'_, V> {}
impl<V> FusedIterator for RawIndexedMut<'_, V> {}

/// View of a sparse array's present indices.
pub type Indices<'a, V> = view::Keys<RawIndexed<'a, V>>;
/// View of a sparse array's values, by increasing index.
pub type Values<'a, V> = view::Values<RawIndexed<'a, V>>;
/// Mutable view of a sparse array's values, by increasing index.
pub type ValuesMut<'a, V> = view::Values<RawIndexedMut<'a, V>>;
/// View of a sparse array's index-value pairs, by increasing index.
pub type Items<'a, V> = view::Items<RawIndexed<'a, V>>;
