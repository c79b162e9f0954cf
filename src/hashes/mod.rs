//! Hash lookup for the presentation layer

pub mod index;

pub use index::{normalize_hash, reveal, HashEntry, HashIndex, LookupRecord};
