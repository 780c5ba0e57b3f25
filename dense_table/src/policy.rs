//! Key policies: the hash and equality strategy of a [`DenseHashTable`][crate::DenseHashTable].
use std::hash::{BuildHasher, Hash};

use hashkit_util::hash::{hash_bytes, mix_u64, BuildHasherDefault};

/// Hash and equality strategy for keys of type `K`.
///
/// A table with policy `P` storing keys of type `K` can be queried with any `Q` such that
/// `K: Borrow<Q>` and `P: KeyPolicy<Q>`. For this to work, the hash of a key and the hash of its
/// borrowed form must agree, as must their equality.
pub trait KeyPolicy<K: ?Sized> {
    /// Returns the 64-bit hash of a key.
    fn hash_key(&self, key: &K) -> u64;

    /// Returns `true` if both keys are equal.
    fn keys_equal(&self, a: &K, b: &K) -> bool;
}

/// Policy for integer keys using a fast mix of the key's bit pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntPolicy;

/// Policy for integer keys using the key's bit pattern directly as its hash.
///
/// This distributes consecutive keys perfectly but performs poorly for keys that share their low
/// bits, e.g. multiples of a large power of two.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityPolicy;

macro_rules! impl_int_policies {
    ($($int:ty),*) => {
        $(
            impl KeyPolicy<$int> for IntPolicy {
                #[inline(always)]
                fn hash_key(&self, key: &$int) -> u64 {
                    mix_u64(*key as u64)
                }

                #[inline(always)]
                fn keys_equal(&self, a: &$int, b: &$int) -> bool {
                    a == b
                }
            }

            impl KeyPolicy<$int> for IdentityPolicy {
                #[inline(always)]
                fn hash_key(&self, key: &$int) -> u64 {
                    *key as u64
                }

                #[inline(always)]
                fn keys_equal(&self, a: &$int, b: &$int) -> bool {
                    a == b
                }
            }
        )*
    };
}

impl_int_policies!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Policy for byte string keys using a CityHash64 content hash.
///
/// Applies to every key type that can be viewed as a byte slice, so a table keyed by `Vec<u8>`
/// or `String` can be queried with `&[u8]` or `&str` respectively.
///
/// The hash is chosen for throughput, not for resistance against crafted collisions, so tables
/// using this policy should not be keyed by untrusted input.
#[derive(Clone, Copy, Debug, Default)]
pub struct BytesPolicy;

impl<K: AsRef<[u8]> + ?Sized> KeyPolicy<K> for BytesPolicy {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        hash_bytes(key.as_ref())
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Policy for any `Hash + Eq` key, hashing through a [`BuildHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HasherPolicy<S> {
    build_hasher: S,
}

impl<S> HasherPolicy<S> {
    /// Returns a policy hashing with the given [`BuildHasher`].
    pub fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// Returns the wrapped [`BuildHasher`].
    pub fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<K: Hash + Eq + ?Sized, S: BuildHasher> KeyPolicy<K> for HasherPolicy<S> {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.build_hasher.hash_one(key)
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Policy used when none is specified: zwohash through [`HasherPolicy`].
pub type DefaultPolicy = HasherPolicy<BuildHasherDefault>;
