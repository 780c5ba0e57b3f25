use std::iter::FusedIterator;

use hashkit_util::view;

use crate::table::Slot;

/// Iterator over the occupied buckets of a dense table, in bucket order.
///
/// This is the raw traversal underlying the table's key, value and item views.
pub struct RawEntries<'a, K, V> {
    slots: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> RawEntries<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<K, V>], occupied: usize) -> Self {
        Self {
            slots: slots.iter(),
            remaining: occupied,
        }
    }
}

impl<K, V> Clone for RawEntries<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for RawEntries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawEntries<'_, K, V> {}
impl<K, V> FusedIterator for RawEntries<'_, K, V> {}

/// Iterator over the occupied buckets of a dense table, allowing mutation of the values.
pub struct RawEntriesMut<'a, K, V> {
    slots: std::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> RawEntriesMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut [Slot<K, V>], occupied: usize) -> Self {
        Self {
            slots: slots.iter_mut(),
            remaining: occupied,
        }
    }
}

impl<'a, K, V> Iterator for RawEntriesMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((&*key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawEntriesMut<'_, K, V> {}
impl<K, V> FusedIterator for RawEntriesMut<'_, K, V> {}

/// Owning iterator over the entries of a dense table, in bucket order.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(slots: Vec<Slot<K, V>>, occupied: usize) -> Self {
        Self {
            slots: slots.into_iter(),
            remaining: occupied,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// View of a dense table's keys.
pub type Keys<'a, K, V> = view::Keys<RawEntries<'a, K, V>>;
/// View of a dense table's values.
pub type Values<'a, K, V> = view::Values<RawEntries<'a, K, V>>;
/// Mutable view of a dense table's values.
pub type ValuesMut<'a, K, V> = view::Values<RawEntriesMut<'a, K, V>>;
/// View of a dense table's key-value pairs.
pub type Items<'a, K, V> = view::Items<RawEntries<'a, K, V>>;
