#![allow(missing_docs)]
use crate::{
    BytesPolicy, DenseHashTable, ErrorKind, IdentityPolicy, IntPolicy, IntTable, KeyPolicy,
    StrTable, TableConfig,
};
use hashbrown::HashMap;
use hashkit_util::hash::BuildHasherDefault;
use rand::prelude::*;
use std::{fmt::Debug, hash::Hash};

struct CheckedTable<K, V, P> {
    dut: DenseHashTable<K, V, P>,
    ref_map: HashMap<K, V, BuildHasherDefault>,
}

impl<K, V, P> CheckedTable<K, V, P>
where
    K: Hash + Eq + Clone + Debug,
    V: Eq + Clone + Debug,
    P: KeyPolicy<K> + Default,
{
    fn new(config: TableConfig) -> Self {
        CheckedTable {
            dut: DenseHashTable::with_config(0, config).unwrap(),
            ref_map: HashMap::default(),
        }
    }
    fn len(&self) -> usize {
        self.ref_map.len()
    }
    fn get(&self, key: &K) -> Option<&V> {
        let ref_result = self.ref_map.get(key);
        let dut_result = self.dut.get(key);
        match &dut_result {
            Ok(_) => (),
            Err(err) => assert_eq!(err.kind(), ErrorKind::NotFound),
        }
        assert_eq!(ref_result, dut_result.ok());
        assert_eq!(ref_result.is_some(), self.dut.contains(key));
        ref_result
    }
    fn set(&mut self, key: K, value: V) -> Option<V> {
        let ref_result = self.ref_map.insert(key.clone(), value.clone());
        let dut_result = self.dut.set(key, value).unwrap();
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn delete(&mut self, key: &K) -> Option<V> {
        let ref_result = self.ref_map.remove(key);
        let dut_result = self.dut.delete(key);
        if let Err(err) = &dut_result {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(ref_result, dut_result.ok());
        ref_result
    }
    fn check(&self) {
        self.dut.check();
        assert_eq!(self.ref_map.len(), self.dut.len());
        assert_eq!(self.dut.iter_items().len(), self.dut.len());
        for (key, value) in self.dut.iter_items() {
            assert_eq!(self.ref_map.get(key), Some(value));
        }
        for (key, value) in self.ref_map.iter() {
            assert_eq!(self.dut.get(key).ok(), Some(value));
        }
    }
    fn iterator_check(&self) {
        let keys: Vec<_> = self.dut.iter_keys().collect();
        let values: Vec<_> = self.dut.iter_values().collect();
        let items: Vec<_> = self.dut.iter_items().collect();
        assert_eq!(keys.len(), self.len());
        for (i, (key, value)) in items.into_iter().enumerate() {
            assert_eq!(keys[i], key);
            assert_eq!(values[i], value);
        }
    }
    fn present_or_random_key<R: Rng>(
        &self,
        random_likelihood: f64,
        rng: &mut R,
        mut rand_k: impl FnMut(&mut R) -> K,
    ) -> K {
        if self.len() == 0 || rng.gen_range(0.0..1.0 + random_likelihood) >= 1.0 {
            rand_k(rng)
        } else {
            self.ref_map.keys().choose(rng).unwrap().clone()
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

fn test_suite<K, V, P, R>(
    config: TableConfig,
    mut rand_k: impl FnMut(&mut R) -> K,
    mut rand_v: impl FnMut(&mut R) -> V,
) where
    K: Hash + Eq + Clone + Debug,
    V: Eq + Clone + Debug,
    P: KeyPolicy<K> + Default,
    R: Rng + SeedableRng,
{
    let mut table: CheckedTable<K, V, P> = CheckedTable::new(config);
    let mut rng = R::seed_from_u64(39);
    let mut max_size = 0;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Set: 2.0 => {
                let k = table.present_or_random_key(3.0, &mut rng, &mut rand_k);
                let v = rand_v(&mut rng);
                table.set(k, v);
            },
            Get: 1.0 => {
                let k = table.present_or_random_key(1.0, &mut rng, &mut rand_k);
                table.get(&k);
            },
            Delete: 1.2 => {
                let k = table.present_or_random_key(0.3, &mut rng, &mut rand_k);
                table.delete(&k);
            },
            Check: 0.1 => {
                table.check();
            }
        };
        max_size = std::cmp::max(max_size, table.len());
    }
    table.check();
    table.iterator_check();
    println!("max size {max_size}");
}

#[test]
fn test_suite_i64_u64() {
    test_suite::<i64, u64, IntPolicy, rand_pcg::Pcg64>(
        TableConfig::default(),
        |rng| rng.gen::<i64>() >> rng.gen_range(0..i64::BITS),
        |rng| rng.gen(),
    );
}

#[test]
fn test_suite_u32_identity() {
    test_suite::<u32, u32, IdentityPolicy, rand_pcg::Pcg64>(
        TableConfig::default(),
        |rng| rng.gen_range(0..512u32) << 8,
        |rng| rng.gen(),
    );
}

#[test]
fn test_suite_string_string_high_load() {
    test_suite::<String, String, BytesPolicy, rand_pcg::Pcg64>(
        TableConfig::new().with_max_load(0.9).with_min_load(0.1),
        |rng| {
            let len = rng.gen_range(0..80);
            String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
        },
        |rng| {
            let len = rng.gen_range(1..8);
            String::from_iter((0..len).map(|_| rng.gen_range('a'..'z')))
        },
    );
}

#[test]
fn test_suite_boxed_bytes() {
    test_suite::<Box<[u8]>, Box<u64>, BytesPolicy, rand_pcg::Pcg64>(
        TableConfig::default(),
        |rng| (0..rng.gen_range(0..4)).map(|_| rng.gen::<u8>() & 7).collect(),
        |rng| Box::new(rng.gen()),
    );
}

#[test]
fn overwrite_keeps_single_entry() {
    let mut table: IntTable<&str> = IntTable::new();
    assert_eq!(table.set(5, "a").unwrap(), None);
    assert_eq!(table.set(5, "b").unwrap(), Some("a"));
    assert_eq!(*table.get(&5).unwrap(), "b");
    assert_eq!(table.len(), 1);
    table.check();
}

#[test]
fn delete_then_get_fails() {
    let mut table: IntTable<&str> = IntTable::new();
    table.set(1, "x").unwrap();
    assert_eq!(table.delete(&1).unwrap(), "x");
    assert_eq!(table.get(&1).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(!table.contains(&1));
    for _ in 0..3 {
        assert_eq!(table.delete(&1).unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert_eq!(table.tombstone_count(), 1);
    table.check();
}

#[test]
fn former_sentinels_are_ordinary_keys() {
    let mut table: IntTable<u8> = IntTable::new();
    table.set(i64::MAX, 1).unwrap();
    table.set(i64::MAX - 1, 2).unwrap();
    table.set(i64::MIN, 3).unwrap();
    assert_eq!(*table.get(&i64::MAX).unwrap(), 1);
    assert_eq!(*table.get(&(i64::MAX - 1)).unwrap(), 2);
    assert_eq!(table.delete(&i64::MIN).unwrap(), 3);
    table.check();
}

#[test]
fn insert_delete_cycle_reuses_tombstone() {
    let mut table: StrTable<usize> = StrTable::new();
    let capacity = table.capacity();
    for round in 0..10_000 {
        table.set("key".to_string(), round).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.delete("key").unwrap(), round);
        assert!(table.tombstone_count() <= 1);
    }
    assert_eq!(table.capacity(), capacity);
    table.check();
}

#[test]
fn churn_of_distinct_keys_does_not_grow_table() {
    let mut table: IntTable<i64> = IntTable::new();
    let capacity = table.capacity();
    for key in 0..100_000 {
        table.set(key, key).unwrap();
        if key >= 8 {
            table.delete(&(key - 8)).unwrap();
        }
    }
    assert_eq!(table.len(), 8);
    assert_eq!(table.capacity(), capacity);
    table.check();
}

#[test]
fn rebuild_drops_tombstones() {
    // identity hashing puts key `k` into bucket `k`, so no insertion below reuses a tombstone
    let mut table: DenseHashTable<u32, u32, IdentityPolicy> = DenseHashTable::new();
    assert_eq!(table.capacity(), 32);
    for key in 0..16 {
        table.set(key, key).unwrap();
    }
    for key in 0..10 {
        table.delete(&key).unwrap();
    }
    assert_eq!(table.tombstone_count(), 10);
    table.set(20, 20).unwrap();
    assert_eq!(table.tombstone_count(), 0);
    assert_eq!(table.capacity(), 32);
    assert_eq!(table.len(), 7);
    table.check();
}

#[test]
fn reserve_avoids_rebuilds() {
    let mut table: IntTable<()> = IntTable::new();
    table.reserve(1000).unwrap();
    let capacity = table.capacity();
    assert_eq!(capacity, 2048);
    for key in 0..1000 {
        table.set(key, ()).unwrap();
    }
    assert_eq!(table.capacity(), capacity);
    table.check();
}

#[test]
fn shrink_to_fit_after_mass_delete() {
    let mut table: IntTable<i64> = IntTable::with_capacity(10_000).unwrap();
    for key in 0..10_000 {
        table.set(key, -key).unwrap();
    }
    for key in 10..10_000 {
        table.delete(&key).unwrap();
    }
    let before = table.capacity();
    table.shrink_to_fit().unwrap();
    assert!(table.capacity() < before);
    assert_eq!(table.capacity(), 32);
    assert_eq!(table.tombstone_count(), 0);
    for key in 0..10 {
        assert_eq!(*table.get(&key).unwrap(), -key);
    }
    table.check();
}

#[test]
fn clear_keeps_capacity() {
    let mut table: IntTable<String> = IntTable::new();
    for key in 0..100 {
        table.set(key, key.to_string()).unwrap();
    }
    let capacity = table.capacity();
    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.capacity(), capacity);
    assert_eq!(table.iter_items().count(), 0);
    table.check();
}

#[test]
fn values_mut_updates_in_place() {
    let mut table: IntTable<u64> = IntTable::new();
    for key in 0..50 {
        table.set(key, key as u64).unwrap();
    }
    for value in table.iter_values_mut() {
        *value *= 2;
    }
    for key in 0..50 {
        assert_eq!(*table.get(&key).unwrap(), key as u64 * 2);
    }
    *table.get_mut(&3).unwrap() = 0;
    assert_eq!(*table.get(&3).unwrap(), 0);
}

#[test]
fn owned_iteration_returns_every_entry() {
    let mut table: StrTable<usize> = StrTable::new();
    table
        .try_extend((0..200).map(|i| (format!("k{i}"), i)))
        .unwrap();
    let mut entries: Vec<_> = table.into_iter().collect();
    entries.sort_by_key(|&(_, value)| value);
    assert_eq!(entries.len(), 200);
    for (i, (key, value)) in entries.into_iter().enumerate() {
        assert_eq!(key, format!("k{i}"));
        assert_eq!(value, i);
    }
}

#[test]
fn bytes_table_borrowed_lookup() {
    let mut table: crate::BytesTable<u8> = Default::default();
    table.set(b"abc".to_vec(), 1).unwrap();
    table.set(Vec::new(), 2).unwrap();
    assert_eq!(*table.get(&b"abc"[..]).unwrap(), 1);
    assert_eq!(*table.get(&b""[..]).unwrap(), 2);
    assert!(!table.contains(&b"abd"[..]));
    let (key, value) = table.get_key_value(&b"abc"[..]).unwrap();
    assert_eq!((key.as_slice(), *value), (&b"abc"[..], 1));
}

#[test]
fn debug_formats_as_map() {
    let mut table: IntTable<&str> = IntTable::new();
    table.set(7, "seven").unwrap();
    assert_eq!(format!("{table:?}"), r#"{7: "seven"}"#);
}
