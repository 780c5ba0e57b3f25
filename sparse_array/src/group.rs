use hashkit_util::{Error, Result};

type GroupMask = u64;

pub const GROUP_SIZE: usize = GroupMask::BITS as usize;
pub const GROUP_SHIFT: u32 = {
    assert!(GROUP_SIZE.is_power_of_two());
    GROUP_SIZE.trailing_zeros()
};
pub const GROUP_MASK: usize = GROUP_SIZE - 1;

/// A run of [`GROUP_SIZE`] consecutive indices.
///
/// Only the values of present indices are stored, ordered by index. The value of the index at
/// `slot` within the group lives at the offset given by the number of present slots below `slot`.
#[derive(Clone)]
pub struct Group<V> {
    mask: GroupMask,
    values: Vec<V>,
}

impl<V> Default for Group<V> {
    fn default() -> Self {
        Self {
            mask: 0,
            values: Vec::new(),
        }
    }
}

impl<V> Group<V> {
    #[inline(always)]
    pub fn is_present(&self, slot: u32) -> bool {
        self.mask & (1 << slot) != 0
    }

    #[inline(always)]
    fn offset(&self, slot: u32) -> usize {
        let mask_before = !(!0 << slot);
        (self.mask & mask_before).count_ones() as usize
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn mask(&self) -> GroupMask {
        self.mask
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    pub fn get(&self, slot: u32) -> Option<&V> {
        if !self.is_present(slot) {
            return None;
        }
        Some(&self.values[self.offset(slot)])
    }

    pub fn get_mut(&mut self, slot: u32) -> Option<&mut V> {
        if !self.is_present(slot) {
            return None;
        }
        let offset = self.offset(slot);
        Some(&mut self.values[offset])
    }

    /// Stores `value` at `slot`, returning the previous value if there was one.
    ///
    /// The group is unchanged when growing the value storage fails.
    pub fn insert(&mut self, slot: u32, value: V) -> Result<Option<V>> {
        let offset = self.offset(slot);
        if self.is_present(slot) {
            return Ok(Some(std::mem::replace(&mut self.values[offset], value)));
        }
        self.values
            .try_reserve(1)
            .map_err(|err| Error::out_of_memory(self.values.len() + 1, err))?;
        self.values.insert(offset, value);
        self.mask |= 1 << slot;
        Ok(None)
    }

    pub fn remove(&mut self, slot: u32) -> Option<V> {
        if !self.is_present(slot) {
            return None;
        }
        let value = self.values.remove(self.offset(slot));
        self.mask &= !(1 << slot);
        Some(value)
    }

    /// Removes all values at slots `slot..GROUP_SIZE`.
    pub fn truncate(&mut self, slot: u32) {
        let keep = self.offset(slot);
        self.values.truncate(keep);
        self.mask &= !(!0 << slot);
    }

    #[cfg(test)]
    pub fn check(&self) {
        assert_ne!(self.mask, 0);
        assert_eq!(self.values.len(), self.mask.count_ones() as usize);
    }
}
