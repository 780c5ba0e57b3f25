//! [SparseArray] is an index-addressable array for mostly-empty index ranges.
use std::{collections::BTreeMap, fmt};

use hashkit_util::{Error, Result};

use crate::{
    group::{Group, GROUP_MASK, GROUP_SHIFT},
    iter::{Indices, Items, RawIndexed, RawIndexedMut, Values, ValuesMut},
};

/// An array over the indices `0..capacity` in which every index is either absent or holds a value.
///
/// The index range is partitioned into groups of 64 consecutive indices. A group keeps a bitmap
/// of its present indices next to a compacted vector holding just their values, so finding a
/// value within its group takes a single popcount. Groups without any present index are not
/// allocated at all, which keeps memory use proportional to the number of touched groups rather
/// than to the capacity. Allocated groups are kept in an ordered directory, so locating an index's
/// group is logarithmic in the number of allocated groups.
///
/// Reading an absent index is an error, never a default value.
#[derive(Clone)]
pub struct SparseArray<V> {
    groups: BTreeMap<usize, Group<V>>,
    capacity: usize,
    len: usize,
}

#[inline(always)]
fn split_index(index: usize) -> (usize, u32) {
    (index >> GROUP_SHIFT, (index & GROUP_MASK) as u32)
}

fn index_not_found(index: usize) -> Error {
    Error::not_found("index not present in sparse array").with_context("index", index)
}

impl<V> SparseArray<V> {
    /// Returns an array over the indices `0..capacity` with every index absent.
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: BTreeMap::new(),
            capacity,
            len: 0,
        }
    }

    /// Returns the size of the index range.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of present indices.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no index is present.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if `index` holds a value.
    pub fn contains(&self, index: usize) -> bool {
        let (group_index, slot) = split_index(index);
        index < self.capacity
            && self
                .groups
                .get(&group_index)
                .is_some_and(|group| group.is_present(slot))
    }

    /// Returns a reference to the value at `index`.
    ///
    /// Fails with [`ErrorKind::NotFound`][hashkit_util::ErrorKind::NotFound] if `index` is absent
    /// or outside of the index range.
    pub fn get(&self, index: usize) -> Result<&V> {
        let (group_index, slot) = split_index(index);
        if index >= self.capacity {
            return Err(index_not_found(index).with_context("capacity", self.capacity));
        }
        self.groups
            .get(&group_index)
            .and_then(|group| group.get(slot))
            .ok_or_else(|| index_not_found(index))
    }

    /// Returns a mutable reference to the value at `index`.
    ///
    /// Fails with [`ErrorKind::NotFound`][hashkit_util::ErrorKind::NotFound] if `index` is absent
    /// or outside of the index range.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut V> {
        let (group_index, slot) = split_index(index);
        if index >= self.capacity {
            return Err(index_not_found(index).with_context("capacity", self.capacity));
        }
        self.groups
            .get_mut(&group_index)
            .and_then(|group| group.get_mut(slot))
            .ok_or_else(|| index_not_found(index))
    }

    /// Stores `value` at `index`, returning the previous value if the index was present.
    ///
    /// Fails with [`ErrorKind::UsageViolation`][hashkit_util::ErrorKind::UsageViolation] if
    /// `index` is outside of the index range and with
    /// [`ErrorKind::OutOfMemory`][hashkit_util::ErrorKind::OutOfMemory] if the value storage of
    /// its group cannot grow.
    pub fn set(&mut self, index: usize, value: V) -> Result<Option<V>> {
        if index >= self.capacity {
            return Err(
                Error::usage_violation("index outside of the sparse array's range")
                    .with_context("index", index)
                    .with_context("capacity", self.capacity),
            );
        }
        let (group_index, slot) = split_index(index);
        let group = self.groups.entry(group_index).or_insert_with(|| {
            log::trace!("allocating sparse group {group_index}");
            Group::default()
        });
        match group.insert(slot, value) {
            Ok(previous) => {
                if previous.is_none() {
                    self.len += 1;
                }
                Ok(previous)
            }
            Err(err) => {
                if group.is_empty() {
                    self.groups.remove(&group_index);
                }
                Err(err)
            }
        }
    }

    /// Removes the value at `index` and returns it.
    ///
    /// Frees the index's group if it holds no other value. Fails with
    /// [`ErrorKind::NotFound`][hashkit_util::ErrorKind::NotFound] if `index` is absent or outside
    /// of the index range.
    pub fn delete(&mut self, index: usize) -> Result<V> {
        let (group_index, slot) = split_index(index);
        if index >= self.capacity {
            return Err(index_not_found(index).with_context("capacity", self.capacity));
        }
        let group = self
            .groups
            .get_mut(&group_index)
            .ok_or_else(|| index_not_found(index))?;
        let value = group.remove(slot).ok_or_else(|| index_not_found(index))?;
        if group.is_empty() {
            log::trace!("freeing sparse group {group_index}");
            self.groups.remove(&group_index);
        }
        self.len -= 1;
        Ok(value)
    }

    /// Removes all values, keeping the index range.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.len = 0;
    }

    /// Changes the size of the index range.
    ///
    /// Shrinking drops the values of all indices at or above `capacity`.
    pub fn resize(&mut self, capacity: usize) {
        if capacity < self.capacity {
            let (group_index, slot) = split_index(capacity);
            let mut dropped = self.groups.split_off(&group_index);
            if slot != 0 {
                if let Some(mut group) = dropped.remove(&group_index) {
                    group.truncate(slot);
                    if !group.is_empty() {
                        self.groups.insert(group_index, group);
                    }
                }
            }
            let dropped_values: usize = dropped.values().map(Group::len).sum();
            self.len = self.groups.values().map(Group::len).sum();
            log::debug!(
                "shrinking sparse array: {} -> {} indices, {} groups freed, {} values outside dropped",
                self.capacity,
                capacity,
                dropped.len(),
                dropped_values,
            );
        } else {
            log::debug!(
                "growing sparse array: {} -> {} indices",
                self.capacity,
                capacity
            );
        }
        self.capacity = capacity;
    }

    /// Returns a view of all present indices, in increasing order.
    pub fn iter_indices(&self) -> Indices<'_, V> {
        Indices::new(self.raw_indexed())
    }

    /// Returns a view of all values, by increasing index.
    pub fn iter_values(&self) -> Values<'_, V> {
        Values::new(self.raw_indexed())
    }

    /// Returns a view of all values allowing mutation, by increasing index.
    pub fn iter_values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut::new(RawIndexedMut::new(self.groups.iter_mut(), self.len))
    }

    /// Returns a view of all index-value pairs, by increasing index.
    pub fn iter_items(&self) -> Items<'_, V> {
        Items::new(self.raw_indexed())
    }

    fn raw_indexed(&self) -> RawIndexed<'_, V> {
        RawIndexed::new(self.groups.iter(), self.len)
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        let group_limit = self.capacity.div_ceil(crate::GROUP_SIZE);
        let mut len = 0;
        for (&group_index, group) in self.groups.iter() {
            group.check();
            assert!(group_index < group_limit);
            len += group.len();
        }
        assert_eq!(len, self.len);
        if let Some(index) = self.iter_indices().last() {
            assert!(index < self.capacity);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for SparseArray<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_items()).finish()
    }
}

impl<'a, V> IntoIterator for &'a SparseArray<V> {
    type Item = (usize, &'a V);
    type IntoIter = Items<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_items()
    }
}
