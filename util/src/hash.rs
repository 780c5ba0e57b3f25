//! Utilities for computing hashes.
use std::hash::BuildHasherDefault as StdBuildHasherDefault;

use zwohash::ZwoHasher;

pub use crate::city::city_hash_64;

/// The default [`BuildHasher`][std::hash::BuildHasher] used by hashkit containers.
pub type BuildHasherDefault = StdBuildHasherDefault<ZwoHasher>;

/// Fast hash of an integer's bit pattern.
///
/// A single multiply followed by folding the high half into the low half, so that the low bits
/// used for bucket selection depend on every input bit.
#[inline(always)]
pub fn mix_u64(bits: u64) -> u64 {
    let product = bits.wrapping_mul(0x2545f4914f6cdd1d);
    product ^ (product >> 32)
}

/// Content hash of a byte string, see [`city_hash_64`].
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    city_hash_64(bytes)
}
