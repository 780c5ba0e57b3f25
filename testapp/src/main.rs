#![allow(missing_docs)]

use clap::Parser;
use color_eyre::eyre::ensure;
use hashbrown::HashMap;
use hashkit::{hash::BuildHasherDefault, IntTable, SparseArray, StrTable};
use quanta::Instant;
use rand::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of distinct keys used by the hash table workloads.
    #[clap(short = 'k', long, default_value = "100000")]
    keys: usize,
    /// Number of set/delete rounds over the key space.
    #[clap(short = 'r', long, default_value = "5")]
    rounds: usize,
    /// Index range of the sparse array workload.
    #[clap(short = 'c', long, default_value = "100000000")]
    sparse_capacity: usize,
    #[clap(short = 's', long, default_value = "0")]
    seed: u64,
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    hashkit_logger::setup();

    ensure!(args.keys > 0, "key count must be positive");

    let mut rng = rand_pcg::Pcg64::seed_from_u64(args.seed);

    int_table_workload(&args, &mut rng)?;
    str_table_workload(&args, &mut rng)?;
    sparse_array_workload(&args, &mut rng)?;

    Ok(())
}

fn int_table_workload(args: &Args, rng: &mut impl Rng) -> color_eyre::Result<()> {
    let start_time = Instant::now();
    let mut table: IntTable<u64> = IntTable::new();
    let mut reference: HashMap<i64, u64, BuildHasherDefault> = HashMap::default();

    for round in 0..args.rounds {
        for _ in 0..args.keys {
            let key = rng.gen_range(0..args.keys as i64);
            if rng.gen_bool(0.25) {
                ensure!(
                    table.delete(&key).ok() == reference.remove(&key),
                    "int table delete mismatch for key {key}"
                );
            } else {
                let value = rng.gen();
                ensure!(
                    table.set(key, value)? == reference.insert(key, value),
                    "int table set mismatch for key {key}"
                );
            }
        }
        log::info!(
            "int round {round}: {} entries, capacity {}, {} tombstones, load {:.3}",
            table.len(),
            table.capacity(),
            table.tombstone_count(),
            table.load_factor(),
        );
    }

    ensure!(table.len() == reference.len(), "int table length mismatch");
    for (key, value) in &table {
        ensure!(
            reference.get(key) == Some(value),
            "int table holds unexpected entry for key {key}"
        );
    }

    table.shrink_to_fit()?;
    log::info!(
        "int table done in {:.2?}, capacity {} after shrinking",
        start_time.elapsed(),
        table.capacity()
    );
    Ok(())
}

fn str_table_workload(args: &Args, rng: &mut impl Rng) -> color_eyre::Result<()> {
    let start_time = Instant::now();
    let mut table: StrTable<usize> = StrTable::with_capacity(args.keys)?;
    let initial_capacity = table.capacity();

    for i in 0..args.keys {
        table.set(format!("key-{i}"), i)?;
    }
    ensure!(
        table.capacity() == initial_capacity,
        "string table grew despite its size hint"
    );

    let mut deleted = 0;
    for i in 0..args.keys {
        if rng.gen_bool(0.5) {
            ensure!(
                table.delete(format!("key-{i}").as_str())? == i,
                "string table deleted wrong value for key-{i}"
            );
            deleted += 1;
        }
    }
    for i in 0..args.keys {
        match table.get(format!("key-{i}").as_str()) {
            Ok(&value) => ensure!(value == i, "string table value mismatch for key-{i}"),
            Err(err) => ensure!(err.is_not_found(), "unexpected lookup failure: {err}"),
        }
    }
    ensure!(
        table.len() == args.keys - deleted,
        "string table length mismatch"
    );

    log::info!(
        "string table done in {:.2?}: {} entries, {} tombstones, capacity {}",
        start_time.elapsed(),
        table.len(),
        table.tombstone_count(),
        table.capacity(),
    );
    Ok(())
}

fn sparse_array_workload(args: &Args, rng: &mut impl Rng) -> color_eyre::Result<()> {
    ensure!(args.sparse_capacity > 0, "sparse capacity must be positive");

    let start_time = Instant::now();
    let mut array: SparseArray<u32> = SparseArray::new(args.sparse_capacity);
    let mut reference: HashMap<usize, u32, BuildHasherDefault> = HashMap::default();

    for _ in 0..args.rounds {
        for _ in 0..args.keys {
            let index = rng.gen_range(0..args.sparse_capacity);
            if rng.gen_bool(0.25) {
                ensure!(
                    array.delete(index).ok() == reference.remove(&index),
                    "sparse array delete mismatch at index {index}"
                );
            } else {
                let value = rng.gen();
                ensure!(
                    array.set(index, value)? == reference.insert(index, value),
                    "sparse array set mismatch at index {index}"
                );
            }
        }
        log::info!(
            "sparse array: {} values in {} groups",
            array.len(),
            array.group_count()
        );
    }

    ensure!(array.len() == reference.len(), "sparse array length mismatch");
    let mut previous = None;
    for (index, value) in &array {
        ensure!(previous < Some(index), "sparse array iterated out of order");
        ensure!(
            reference.get(&index) == Some(value),
            "sparse array holds unexpected value at index {index}"
        );
        previous = Some(index);
    }

    log::info!("sparse array done in {:.2?}", start_time.elapsed());
    Ok(())
}
