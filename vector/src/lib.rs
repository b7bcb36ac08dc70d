//! This crate provides a persistent, fixed-size vector tailored to sparse data.
//!
//! [`SparseVector`] stores a caller-supplied "zero" value implicitly: only the
//! elements that differ from it take up memory. Internally it is a 4-way
//! trie whose nodes are compressed with a small occupancy bitmap, similar in
//! spirit to a [hash array mapped trie](https://en.wikipedia.org/wiki/Hash_array_mapped_trie)
//! but indexed by position instead of by hash. Rather than a variable-length
//! child array, each node comes in one of five shapes according to how many
//! of its slots are occupied.
//!
//! Every modification returns a new vector. The old one stays valid and shares
//! all the untouched parts of the tree with the new one, so taking a snapshot
//! is just a `clone`.
//!
//! ```rust
//! # use sparse_trie_vector::SparseVector;
//! let v = SparseVector::new(5, 0);
//! let w = v.set(3, 42).unwrap();
//! assert_eq!(w.get(3), Ok(&42));
//! assert_eq!(v.get(3), Ok(&0));
//! assert_eq!(w.clear(3).unwrap(), v);
//! ```

// Not supported (and not planned):
// - resizing
// - iteration

mod bits;
mod node;
mod slots;
pub mod vector;

pub use bits::BRANCHING;
pub use vector::{Error, Result, SparseVector};
