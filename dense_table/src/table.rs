//! [DenseHashTable] is an open-addressing hash table with tombstone deletion.
use std::{borrow::Borrow, fmt, mem};

use hashkit_util::{
    capacity::{capacity_for, rebuild_capacity, threshold, DEFAULT_CAPACITY},
    Error, ErrorKind, Result,
};

use crate::{
    config::TableConfig,
    iter::{IntoIter, Items, Keys, RawEntries, RawEntriesMut, Values, ValuesMut},
    policy::{DefaultPolicy, KeyPolicy},
};

/// Storage unit of a [`DenseHashTable`].
#[derive(Clone)]
pub(crate) enum Slot<K, V> {
    /// Never occupied since the last rebuild; terminates probe sequences.
    Empty,
    /// Tombstone of a deleted entry; skipped by lookups, reused by insertions.
    Deleted,
    Occupied(K, V),
}

/// Result of probing for an insertion.
enum Probe {
    Found(usize),
    Vacant { pos: usize, tombstone: bool },
}

/// An open-addressing hash table.
///
/// All entries live in a single power-of-two sized vector of buckets. Collisions are resolved
/// by triangular probing: the `n`-th probe is `n * (n + 1) / 2` buckets past the home bucket,
/// which visits every bucket of a power-of-two table exactly once.
///
/// Deleting an entry leaves a tombstone behind so that probe sequences passing through the
/// deleted bucket stay intact. Insertions reuse the first tombstone on their probe path.
/// Tombstones are dropped whenever the table is rebuilt, which happens before an insertion would
/// raise the fraction of used buckets above the configured maximum load factor (see
/// [`TableConfig`]).
///
/// Hashing and key equality are provided by a [`KeyPolicy`]. Any key is insertable; there are no
/// reserved key values.
///
/// All views returned by the `iter_*` methods borrow the table, so the table cannot be modified
/// while a traversal is in progress.
#[derive(Clone)]
pub struct DenseHashTable<K, V, P = DefaultPolicy> {
    slots: Vec<Slot<K, V>>,
    occupied: usize,
    tombstones: usize,
    enlarge_threshold: usize,
    config: TableConfig,
    policy: P,
}

impl<K, V, P: Default> Default for DenseHashTable<K, V, P> {
    fn default() -> Self {
        Self::with_policy(P::default())
    }
}

impl<K, V, P: Default> DenseHashTable<K, V, P> {
    /// Returns an empty table with the default starting capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty table that holds `capacity_hint` entries before it is first rebuilt.
    ///
    /// A hint of `0` selects the default starting capacity.
    pub fn with_capacity(capacity_hint: usize) -> Result<Self> {
        Self::with_config_and_policy(capacity_hint, TableConfig::default(), P::default())
    }

    /// Returns an empty table with the given resizing parameters.
    pub fn with_config(capacity_hint: usize, config: TableConfig) -> Result<Self> {
        Self::with_config_and_policy(capacity_hint, config, P::default())
    }
}

impl<K, V, P> DenseHashTable<K, V, P> {
    /// Returns an empty table using the provided key policy.
    pub fn with_policy(policy: P) -> Self {
        let config = TableConfig::default();
        let mut slots = Vec::with_capacity(DEFAULT_CAPACITY);
        slots.resize_with(DEFAULT_CAPACITY, || Slot::Empty);
        Self {
            slots,
            occupied: 0,
            tombstones: 0,
            enlarge_threshold: threshold(DEFAULT_CAPACITY, config.max_load()),
            config,
            policy,
        }
    }

    /// Returns an empty table with the given capacity hint, resizing parameters and key policy.
    ///
    /// Fails with [`ErrorKind::ConfigInvalid`] when the configuration is invalid or when the hint
    /// cannot be satisfied by any representable capacity, and with [`ErrorKind::OutOfMemory`]
    /// when the buckets cannot be allocated.
    pub fn with_config_and_policy(
        capacity_hint: usize,
        config: TableConfig,
        policy: P,
    ) -> Result<Self> {
        config.validate()?;
        let capacity = if capacity_hint == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity_for(capacity_hint, config.max_load()).ok_or_else(|| {
                Error::config_invalid("capacity hint exceeds the largest possible table")
                    .with_context("capacity_hint", capacity_hint)
            })?
        };
        Ok(Self {
            slots: empty_slots(capacity)?,
            occupied: 0,
            tombstones: 0,
            enlarge_threshold: threshold(capacity, config.max_load()),
            config,
            policy,
        })
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones left behind by deletions since the last rebuild.
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    /// Returns the fraction of buckets that are either occupied or tombstones.
    pub fn load_factor(&self) -> f64 {
        (self.occupied + self.tombstones) as f64 / self.slots.len() as f64
    }

    /// Returns the resizing parameters.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the key policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Removes all entries, keeping the allocated buckets.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.occupied = 0;
        self.tombstones = 0;
    }

    /// Returns a view of all keys, in bucket order.
    pub fn iter_keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.raw_entries())
    }

    /// Returns a view of all values, in bucket order.
    pub fn iter_values(&self) -> Values<'_, K, V> {
        Values::new(self.raw_entries())
    }

    /// Returns a view of all values allowing mutation, in bucket order.
    pub fn iter_values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(RawEntriesMut::new(&mut self.slots, self.occupied))
    }

    /// Returns a view of all key-value pairs, in bucket order.
    pub fn iter_items(&self) -> Items<'_, K, V> {
        Items::new(self.raw_entries())
    }

    fn raw_entries(&self) -> RawEntries<'_, K, V> {
        RawEntries::new(&self.slots, self.occupied)
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns the bucket holding `key`, if present.
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        let mask = self.mask();
        let mut pos = self.policy.hash_key(key) as usize & mask;
        for probe in 1..=self.slots.len() {
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Occupied(found, _)
                    if self.policy.keys_equal(Borrow::<Q>::borrow(found), key) =>
                {
                    return Some(pos)
                }
                _ => (),
            }
            pos = (pos + probe) & mask;
        }
        None
    }

    /// Returns the bucket holding `key` or the bucket an insertion of `key` should use.
    fn probe_insert(&self, hash: u64, key: &K) -> Probe
    where
        P: KeyPolicy<K>,
    {
        let mask = self.mask();
        let mut pos = hash as usize & mask;
        let mut first_tombstone = None;
        for probe in 1..=self.slots.len() {
            match &self.slots[pos] {
                Slot::Empty => {
                    return match first_tombstone {
                        Some(pos) => Probe::Vacant {
                            pos,
                            tombstone: true,
                        },
                        None => Probe::Vacant {
                            pos,
                            tombstone: false,
                        },
                    }
                }
                Slot::Deleted => {
                    first_tombstone.get_or_insert(pos);
                }
                Slot::Occupied(found, _) => {
                    if self.policy.keys_equal(found, key) {
                        return Probe::Found(pos);
                    }
                }
            }
            pos = (pos + probe) & mask;
        }
        match first_tombstone {
            Some(pos) => Probe::Vacant {
                pos,
                tombstone: true,
            },
            None => unreachable!("dense table without empty buckets"),
        }
    }

    /// Returns the first bucket on the probe path of `hash` that is not occupied.
    fn probe_vacant(&self, hash: u64) -> usize {
        let mask = self.mask();
        let mut pos = hash as usize & mask;
        let mut probe = 1;
        while let Slot::Occupied(..) = self.slots[pos] {
            pos = (pos + probe) & mask;
            probe += 1;
        }
        pos
    }

    /// Moves all entries into a fresh set of `capacity` buckets, dropping all tombstones.
    fn rehash_into(&mut self, capacity: usize) -> Result<()>
    where
        P: KeyPolicy<K>,
    {
        debug_assert!(capacity_for(self.occupied, self.config.max_load())
            .is_some_and(|needed| needed <= capacity));

        let old_slots = mem::replace(&mut self.slots, empty_slots(capacity)?);
        log::debug!(
            "rebuilding dense table: {} -> {} buckets, {} entries, {} tombstones dropped",
            old_slots.len(),
            capacity,
            self.occupied,
            self.tombstones,
        );
        self.tombstones = 0;
        self.enlarge_threshold = threshold(capacity, self.config.max_load());

        for slot in old_slots {
            if let Slot::Occupied(key, value) = slot {
                let pos = self.probe_vacant(self.policy.hash_key(&key));
                self.slots[pos] = Slot::Occupied(key, value);
            }
        }
        Ok(())
    }

    /// Rebuilds the table so that it can hold `live` entries.
    #[cold]
    #[inline(never)]
    fn rebuild_for(&mut self, live: usize) -> Result<()>
    where
        P: KeyPolicy<K>,
    {
        let capacity = rebuild_capacity(
            self.slots.len(),
            live,
            self.config.max_load(),
            self.config.min_load(),
        )
        .ok_or_else(|| {
            Error::new(ErrorKind::OutOfMemory, "dense table capacity overflow")
                .with_context("entries", live)
        })?;
        self.rehash_into(capacity)
    }
}

impl<K, V, P: KeyPolicy<K>> DenseHashTable<K, V, P> {
    /// Inserts `value` at `key`, replacing and returning any previous value.
    ///
    /// When `key` is already present, the stored key is kept and only the value is replaced.
    /// Inserting a new key may rebuild the table first, which fails with
    /// [`ErrorKind::OutOfMemory`] if the new buckets cannot be allocated. The table is left
    /// unchanged in that case.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        let hash = self.policy.hash_key(&key);
        match self.probe_insert(hash, &key) {
            Probe::Found(pos) => {
                let Slot::Occupied(_, stored) = &mut self.slots[pos] else {
                    unreachable!()
                };
                Ok(Some(mem::replace(stored, value)))
            }
            Probe::Vacant {
                pos,
                tombstone: true,
            } => {
                self.slots[pos] = Slot::Occupied(key, value);
                self.tombstones -= 1;
                self.occupied += 1;
                Ok(None)
            }
            Probe::Vacant {
                mut pos,
                tombstone: false,
            } => {
                if self.occupied + self.tombstones + 1 > self.enlarge_threshold {
                    self.rebuild_for(self.occupied + 1)?;
                    pos = self.probe_vacant(hash);
                }
                self.slots[pos] = Slot::Occupied(key, value);
                self.occupied += 1;
                Ok(None)
            }
        }
    }

    /// Ensures that `additional` more entries can be inserted without rebuilding the table.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let used = (self.occupied + self.tombstones).saturating_add(additional);
        if used <= self.enlarge_threshold {
            return Ok(());
        }
        let live = self.occupied.saturating_add(additional);
        let capacity = capacity_for(live, self.config.max_load()).ok_or_else(|| {
            Error::new(ErrorKind::OutOfMemory, "dense table capacity overflow")
                .with_context("entries", live)
        })?;
        self.rehash_into(capacity.max(self.slots.len()))
    }

    /// Rebuilds the table with the smallest capacity that holds its current entries.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let capacity = capacity_for(self.occupied, self.config.max_load())
            .unwrap_or(self.slots.len())
            .min(self.slots.len());
        log::trace!("shrinking dense table to {capacity} buckets");
        self.rehash_into(capacity)
    }
}

impl<K, V, P> DenseHashTable<K, V, P> {
    /// Returns a reference to the value stored at `key`.
    ///
    /// Fails with [`ErrorKind::NotFound`] if `key` is not present.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        match self.find_index(key) {
            Some(pos) => match &self.slots[pos] {
                Slot::Occupied(_, value) => Ok(value),
                _ => unreachable!(),
            },
            None => Err(key_not_found()),
        }
    }

    /// Returns a mutable reference to the value stored at `key`.
    ///
    /// Fails with [`ErrorKind::NotFound`] if `key` is not present.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        match self.find_index(key) {
            Some(pos) => match &mut self.slots[pos] {
                Slot::Occupied(_, value) => Ok(value),
                _ => unreachable!(),
            },
            None => Err(key_not_found()),
        }
    }

    /// Returns references to the stored key and value matching `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        match self.find_index(key) {
            Some(pos) => match &self.slots[pos] {
                Slot::Occupied(key, value) => Ok((key, value)),
                _ => unreachable!(),
            },
            None => Err(key_not_found()),
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        self.find_index(key).is_some()
    }

    /// Removes the entry stored at `key`, returning the stored key and value.
    ///
    /// The bucket becomes a tombstone. Fails with [`ErrorKind::NotFound`] if `key` is not
    /// present.
    pub fn delete_entry<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        let pos = self.find_index(key).ok_or_else(key_not_found)?;
        let Slot::Occupied(key, value) = mem::replace(&mut self.slots[pos], Slot::Deleted) else {
            unreachable!()
        };
        self.occupied -= 1;
        self.tombstones += 1;
        Ok((key, value))
    }

    /// Removes the entry stored at `key`, returning its value.
    ///
    /// The bucket becomes a tombstone. Fails with [`ErrorKind::NotFound`] if `key` is not
    /// present.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        P: KeyPolicy<Q>,
    {
        self.delete_entry(key).map(|(_, value)| value)
    }
}

fn key_not_found() -> Error {
    Error::not_found("key not present in dense table")
}

fn empty_slots<K, V>(capacity: usize) -> Result<Vec<Slot<K, V>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|err| Error::out_of_memory(capacity, err))?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

impl<K: fmt::Debug, V: fmt::Debug, P> fmt::Debug for DenseHashTable<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_items()).finish()
    }
}

impl<'a, K, V, P> IntoIterator for &'a DenseHashTable<K, V, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Items<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_items()
    }
}

impl<K, V, P> IntoIterator for DenseHashTable<K, V, P> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.occupied)
    }
}

impl<K, V, P: KeyPolicy<K>> DenseHashTable<K, V, P> {
    /// Inserts all key-value pairs of an iterator, stopping at the first failing insertion.
    pub fn try_extend(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()> {
        let entries = entries.into_iter();
        self.reserve(entries.size_hint().0)?;
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert!(self.slots.len().is_power_of_two());
        assert!(self.occupied + self.tombstones <= self.enlarge_threshold);
        assert!(self.enlarge_threshold < self.slots.len());

        let mut occupied = 0;
        let mut tombstones = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => (),
                Slot::Deleted => tombstones += 1,
                Slot::Occupied(key, _) => {
                    occupied += 1;
                    let found = self.find_index(key);
                    assert_eq!(found, Some(index));
                }
            }
        }
        assert_eq!(occupied, self.occupied);
        assert_eq!(tombstones, self.tombstones);
    }
}
