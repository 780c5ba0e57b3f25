//! Memory-efficient dense hash tables and sparse arrays
//!
//! This crate bundles the containers of the hashkit workspace:
//!
//! * [`DenseHashTable`], an open-addressing hash table with tombstone deletion and pluggable
//!   [`KeyPolicy`] hashing, together with the [`IntTable`], [`BytesTable`] and [`StrTable`]
//!   aliases.
//! * [`SparseArray`], an index-addressable array storing only the present indices of a large
//!   index range.
//!
//! Both report failures as [`Error`] values classified by [`ErrorKind`] and expose their contents
//! through the key, value and item views defined in [`view`].
//!
//! ```
//! use hashkit::{IntTable, SparseArray};
//!
//! let mut table: IntTable<&str> = IntTable::new();
//! table.set(i64::MAX, "max").unwrap();
//! assert_eq!(*table.get(&i64::MAX).unwrap(), "max");
//!
//! let mut array = SparseArray::new(1 << 30);
//! array.set(1 << 29, 1.5).unwrap();
//! assert_eq!(array.group_count(), 1);
//! ```
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

pub use dense_table::{
    BytesPolicy, BytesTable, DefaultPolicy, DenseHashTable, HasherPolicy, IdentityPolicy,
    IntPolicy, IntTable, KeyPolicy, StrTable, TableConfig,
};
pub use hashkit_util::{capacity, hash, view, Error, ErrorKind, Result};
pub use sparse_array::SparseArray;

/// Iterator types of [`DenseHashTable`].
pub mod dense {
    pub use dense_table::{IntoIter, Items, Keys, RawEntries, RawEntriesMut, Values, ValuesMut};
}

/// Iterator types of [`SparseArray`].
pub mod sparse {
    pub use sparse_array::{
        Indices, Items, RawIndexed, RawIndexedMut, Values, ValuesMut, GROUP_SIZE,
    };
}
