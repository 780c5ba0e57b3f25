//! hashkit - Shared Utility Code
//!
//! Error types, key hashing, capacity arithmetic and the view iterators used by both the dense
//! hash table and the sparse array.
#![warn(missing_docs)]

mod city;

pub mod capacity;
pub mod error;
pub mod hash;
pub mod view;

pub use error::{Error, ErrorKind, Result};
