//! [SparseArray] is a memory-efficient array for index ranges where most indices are absent.
//!
//! Indices are grouped into runs of 64. Each group stores a presence bitmap and a compacted
//! vector of the present values, and groups with no present index take no memory. This makes a
//! huge index range with a few scattered values cheap. A lookup finds the index's group in an
//! ordered directory of allocated groups, logarithmic in their number, and then locates the value
//! within the group with a single popcount.
//!
//! ```
//! use sparse_array::SparseArray;
//!
//! let mut array = SparseArray::new(2_000_000);
//! array.set(1_000_000, "x").unwrap();
//! array.set(3, "y").unwrap();
//! assert_eq!(array.iter_values().copied().collect::<Vec<_>>(), ["y", "x"]);
//! assert!(array.get(4).unwrap_err().is_not_found());
//! ```

mod group;
mod iter;
mod sparse_array;

#[cfg(test)]
mod test_array;

pub use group::GROUP_SIZE;
pub use hashkit_util::{Error, ErrorKind, Result};
pub use iter::{Indices, Items, RawIndexed, RawIndexedMut, Values, ValuesMut};
pub use sparse_array::SparseArray;
