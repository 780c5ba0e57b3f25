#![allow(missing_docs)]
use crate::{ErrorKind, SparseArray, GROUP_SIZE};
use rand::prelude::*;
use std::{collections::BTreeMap, fmt::Debug};

struct CheckedArray<V> {
    dut: SparseArray<V>,
    ref_map: BTreeMap<usize, V>,
    capacity: usize,
}

impl<V: Eq + Clone + Debug> CheckedArray<V> {
    fn new(capacity: usize) -> Self {
        CheckedArray {
            dut: SparseArray::new(capacity),
            ref_map: BTreeMap::new(),
            capacity,
        }
    }
    fn get(&self, index: usize) -> Option<&V> {
        let ref_result = self.ref_map.get(&index);
        let dut_result = self.dut.get(index);
        if let Err(err) = &dut_result {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(ref_result, dut_result.ok());
        assert_eq!(ref_result.is_some(), self.dut.contains(index));
        ref_result
    }
    fn set(&mut self, index: usize, value: V) -> Option<V> {
        let dut_result = self.dut.set(index, value.clone());
        if index >= self.capacity {
            assert_eq!(dut_result.unwrap_err().kind(), ErrorKind::UsageViolation);
            return None;
        }
        let ref_result = self.ref_map.insert(index, value);
        assert_eq!(ref_result, dut_result.unwrap());
        ref_result
    }
    fn delete(&mut self, index: usize) -> Option<V> {
        let ref_result = self.ref_map.remove(&index);
        let dut_result = self.dut.delete(index);
        if let Err(err) = &dut_result {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(ref_result, dut_result.ok());
        ref_result
    }
    fn resize(&mut self, capacity: usize) {
        self.dut.resize(capacity);
        self.ref_map.split_off(&capacity);
        self.capacity = capacity;
    }
    fn check(&self) {
        self.dut.check();
        assert_eq!(self.dut.len(), self.ref_map.len());
        assert_eq!(self.dut.capacity(), self.capacity);
        assert!(self.dut.group_count() <= self.ref_map.len());
        assert!(self
            .dut
            .iter_items()
            .eq(self.ref_map.iter().map(|(&index, value)| (index, value))));
        assert!(self.dut.iter_indices().eq(self.ref_map.keys().copied()));
        assert!(self.dut.iter_values().eq(self.ref_map.values()));
        assert_eq!(self.dut.iter_items().len(), self.ref_map.len());
    }
    fn present_or_random_index<R: Rng>(&self, random_likelihood: f64, rng: &mut R) -> usize {
        if self.ref_map.is_empty() || rng.gen_range(0.0..1.0 + random_likelihood) >= 1.0 {
            // Occasionally reach just past the end of the range.
            rng.gen_range(0..self.capacity + 8)
        } else {
            *self.ref_map.keys().choose(rng).unwrap()
        }
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn test_suite<R: Rng + SeedableRng>(capacity: usize) {
    let mut array: CheckedArray<u32> = CheckedArray::new(capacity);
    let mut rng = R::seed_from_u64(39);
    let mut max_size = 0;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Set: 2.0 => {
                let index = array.present_or_random_index(3.0, &mut rng);
                let value = rng.gen();
                array.set(index, value);
            },
            Get: 2.0 => {
                let index = array.present_or_random_index(0.5, &mut rng);
                array.get(index);
            },
            Delete: 1.5 => {
                let index = array.present_or_random_index(0.5, &mut rng);
                array.delete(index);
            },
            Mutate: 0.1 => {
                for value in array.dut.iter_values_mut() {
                    *value = value.wrapping_add(1);
                }
                for value in array.ref_map.values_mut() {
                    *value = value.wrapping_add(1);
                }
            },
            Resize: 0.02 => {
                let capacity = rng.gen_range(1..=2 * array.capacity);
                array.resize(capacity);
            },
            Check: 0.1 => array.check()
        }
        max_size = max_size.max(array.ref_map.len());
    }
    array.check();
    assert!(max_size > 0);
}

#[test]
fn test_dense_range() {
    test_suite::<rand_pcg::Pcg64>(200);
}

#[test]
fn test_sparse_range() {
    test_suite::<rand_pcg::Pcg64>(100_000);
}

#[test]
fn unaligned_shrink_keeps_lower_half_of_group() {
    let mut array = SparseArray::new(4 * GROUP_SIZE);
    for index in (0..4 * GROUP_SIZE).step_by(5) {
        array.set(index, index).unwrap();
    }
    let cut = GROUP_SIZE + 17;
    array.resize(cut);
    array.check();
    assert_eq!(array.group_count(), 2);
    assert!(array.iter_indices().all(|index| index < cut));
    assert_eq!(array.len(), (0..cut).step_by(5).count());
    assert_eq!(array.set(cut, 0).unwrap_err().kind(), ErrorKind::UsageViolation);
}

#[test]
fn aligned_shrink_frees_whole_groups() {
    let mut array = SparseArray::new(4 * GROUP_SIZE);
    array.set(GROUP_SIZE - 1, 'a').unwrap();
    array.set(GROUP_SIZE, 'b').unwrap();
    array.set(3 * GROUP_SIZE, 'c').unwrap();
    array.resize(GROUP_SIZE);
    array.check();
    assert_eq!(array.group_count(), 1);
    assert_eq!(array.len(), 1);
    assert_eq!(*array.get(GROUP_SIZE - 1).unwrap(), 'a');

    array.resize(4 * GROUP_SIZE);
    assert!(!array.contains(GROUP_SIZE));
    assert_eq!(array.get(GROUP_SIZE).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn group_is_allocated_on_first_set_and_freed_on_last_delete() {
    let mut array = SparseArray::new(1000);
    assert_eq!(array.group_count(), 0);
    array.set(130, "x").unwrap();
    array.set(131, "y").unwrap();
    assert_eq!(array.group_count(), 1);
    assert_eq!(array.delete(130).unwrap(), "x");
    assert_eq!(array.group_count(), 1);
    assert_eq!(array.delete(131).unwrap(), "y");
    assert_eq!(array.group_count(), 0);
    assert!(array.is_empty());
    array.check();
}

#[test]
fn clear_keeps_capacity() {
    let mut array = SparseArray::new(500);
    for index in 0..500 {
        array.set(index, index as u16).unwrap();
    }
    array.clear();
    array.check();
    assert!(array.is_empty());
    assert_eq!(array.group_count(), 0);
    assert_eq!(array.capacity(), 500);
    array.set(499, 1).unwrap();
    assert_eq!(array.len(), 1);
}

#[test]
fn debug_lists_present_indices() {
    let mut array = SparseArray::new(100);
    array.set(70, 'b').unwrap();
    array.set(2, 'a').unwrap();
    assert_eq!(format!("{array:?}"), "{2: 'a', 70: 'b'}");
}
