//! Capacity and load-factor arithmetic shared by the containers.

/// Smallest bucket count of a dense table.
pub const MIN_CAPACITY: usize = 4;

/// Bucket count of a dense table constructed without a size hint.
pub const DEFAULT_CAPACITY: usize = 32;

/// Returns the number of used buckets (live plus tombstones) that a table of the given capacity
/// may hold before it has to be rebuilt.
///
/// The result is always smaller than `capacity`, so at least one bucket stays empty and every
/// probe sequence terminates.
#[inline]
pub fn threshold(capacity: usize, load: f64) -> usize {
    debug_assert!(capacity.is_power_of_two());
    ((capacity as f64 * load) as usize).min(capacity - 1)
}

/// Returns the smallest power-of-two capacity, at least [`MIN_CAPACITY`], that holds `entries`
/// used buckets without exceeding the `max_load` threshold.
///
/// Returns `None` when the required capacity does not fit into `usize`.
pub fn capacity_for(entries: usize, max_load: f64) -> Option<usize> {
    let mut capacity = MIN_CAPACITY;
    while entries > threshold(capacity, max_load) {
        capacity = capacity.checked_mul(2)?;
    }
    Some(capacity)
}

/// Picks the capacity of a rebuilt table.
///
/// `live` is the number of entries the rebuilt table must hold. The table only shrinks when the
/// live entries have dropped below the `min_load` fraction of the current capacity, otherwise it
/// keeps its size (dropping tombstones) or grows.
pub fn rebuild_capacity(current: usize, live: usize, max_load: f64, min_load: f64) -> Option<usize> {
    let needed = capacity_for(live, max_load)?;
    if needed >= current {
        return Some(needed);
    }
    if (live as f64) < current as f64 * min_load {
        Some(needed)
    } else {
        Some(current)
    }
}
