//! [DenseHashTable] is a memory-efficient open-addressing hash table for opaque values.
//!
//! Keys are hashed and compared through a pluggable [`KeyPolicy`]. The crate provides policies
//! for integer keys ([`IntPolicy`], [`IdentityPolicy`]), for byte string keys ([`BytesPolicy`],
//! a CityHash64 content hash) and for any `Hash + Eq` key ([`HasherPolicy`]).
//!
//! Every bucket is tagged as empty, deleted or occupied, so unlike sentinel-key designs no key
//! value is reserved. Deletion leaves a tombstone behind; tombstones are reused by insertions and
//! dropped whenever the table is rebuilt.
//!
//! ```
//! use dense_table::StrTable;
//!
//! let mut table: StrTable<u32> = StrTable::new();
//! table.set("asdf".to_string(), 123).unwrap();
//! assert_eq!(table.get("asdf").copied().unwrap(), 123);
//! assert!(table.get("qwer").unwrap_err().is_not_found());
//! ```

mod config;
mod iter;
mod policy;
mod table;

#[cfg(test)]
mod test_table;

pub use config::TableConfig;
pub use hashkit_util::{Error, ErrorKind, Result};
pub use iter::{IntoIter, Items, Keys, RawEntries, RawEntriesMut, Values, ValuesMut};
pub use policy::{BytesPolicy, DefaultPolicy, HasherPolicy, IdentityPolicy, IntPolicy, KeyPolicy};
pub use table::DenseHashTable;

/// Dense table keyed by 64-bit integers.
pub type IntTable<V> = DenseHashTable<i64, V, IntPolicy>;

/// Dense table keyed by byte strings.
pub type BytesTable<V> = DenseHashTable<Vec<u8>, V, BytesPolicy>;

/// Dense table keyed by UTF-8 strings, hashed by content like [`BytesTable`].
pub type StrTable<V> = DenseHashTable<String, V, BytesPolicy>;
