use std::{ops::Index, sync::Arc};

use crate::{
    bits::{depth, BRANCHING},
    node::Node,
};

/// An error returned by the fallible [`SparseVector`] operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The index wasn't within `0..size`.
    #[error("index {index} out of range for a sparse vector of size {size}")]
    OutOfRange { index: usize, size: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A persistent vector of fixed size, in which most elements are expected to
/// be equal to some "zero" value.
///
/// Only non-zero elements are stored. They live in a trie with fan-out
/// [`BRANCHING`], so that getting or setting an element takes time and
/// allocations proportional to `log(size)`.
///
/// Vectors are never modified in place: [`set`](SparseVector::set) and
/// [`clear`](SparseVector::clear) return a new vector, which shares
/// everything except the path to the modified element with the old one.
/// Cloning is cheap (it just bumps a reference count), and vectors of `Send +
/// Sync` elements can be shared between threads.
///
/// Two vectors compare equal if they have the same size, the same zero, and
/// the same elements. Every sequence of elements has exactly one tree
/// representation, so this is checked structurally.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SparseVector<T> {
    root: Arc<Node<T>>,
    zero: T,
}

impl<T> SparseVector<T> {
    /// Creates a vector of `size` elements, all equal to `zero`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::SparseVector;
    /// let v = SparseVector::new(100, 0.0);
    /// assert_eq!(v.len(), 100);
    /// assert_eq!(v.get(99), Ok(&0.0));
    /// ```
    pub fn new(size: usize, zero: T) -> Self {
        // Sizes up to BRANCHING have depth zero and fit in a single leaf.
        let level = depth(size);
        log::trace!("new sparse vector of size {size}, depth {level}");
        SparseVector {
            root: Arc::new(Node::zeroed(level, size)),
            zero,
        }
    }

    /// The number of elements (zero or not) in this vector. This never
    /// changes.
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the size is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::SparseVector;
    /// assert!(SparseVector::new(0, 0).is_empty());
    /// // All elements are zero, but there are some.
    /// assert!(!SparseVector::new(3, 0).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of all the elements that aren't stored.
    pub fn zero(&self) -> &T {
        &self.zero
    }

    /// The height of the underlying trie: zero if everything fits in a single
    /// leaf.
    pub fn depth(&self) -> u8 {
        self.root.level()
    }

    /// The number of elements that differ from zero.
    ///
    /// This walks the tree, so it takes time proportional to the number of
    /// stored nodes.
    pub fn count_nonzero(&self) -> usize {
        self.root.count_nonzero()
    }

    /// Returns `true` if both vectors share the same root node. This implies
    /// that they're equal, but not the other way around.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::SparseVector;
    /// let v = SparseVector::new(10, 0);
    /// // Clearing an element that's already zero doesn't allocate.
    /// assert!(v.clear(5).unwrap().ptr_eq(&v));
    /// ```
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                index,
                size: self.len(),
            })
        }
    }

    /// Gets the element at `index`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::{Error, SparseVector};
    /// let v = SparseVector::new(5, 0).set(2, 7).unwrap();
    /// assert_eq!(v.get(2), Ok(&7));
    /// assert_eq!(v.get(3), Ok(&0));
    /// assert_eq!(v.get(5), Err(Error::OutOfRange { index: 5, size: 5 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(self.root.get(index).unwrap_or(&self.zero))
    }

    /// Checks the structural invariants of the underlying tree, panicking if
    /// any are violated.
    pub fn check_invariants(&self) {
        let size = self.len();
        if size <= BRANCHING {
            assert!(matches!(self.root.as_ref(), Node::Leaf { .. }));
        }
        self.root.check_invariants(depth(size), size);
    }
}

impl<T: Clone + PartialEq> SparseVector<T> {
    /// Returns a copy of this vector with the element at `index` replaced by
    /// `value`. Setting an element to zero is the same as
    /// [clearing](SparseVector::clear) it.
    ///
    /// Runs in time complexity `O(log self.len())`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::SparseVector;
    /// let v = SparseVector::new(1000, 0);
    /// let w = v.set(500, 1).unwrap();
    /// assert_eq!(w[500], 1);
    /// assert_eq!(v[500], 0);
    /// assert!(v.set(1000, 1).is_err());
    /// ```
    pub fn set(&self, index: usize, value: T) -> Result<Self> {
        // The range check comes first: an out-of-range write of zero is still
        // an error.
        self.check_index(index)?;
        if value == self.zero {
            return self.clear(index);
        }

        Ok(SparseVector {
            root: Arc::new(self.root.set(index, value)),
            zero: self.zero.clone(),
        })
    }

    /// Returns a copy of this vector with the element at `index` set to zero.
    ///
    /// If that element is already zero, the returned vector shares its whole
    /// tree with this one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_trie_vector::SparseVector;
    /// let v = SparseVector::new(20, 0);
    /// let w = v.set(13, 4).unwrap().clear(13).unwrap();
    /// assert_eq!(v, w);
    /// ```
    pub fn clear(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        Ok(SparseVector {
            root: Node::clear(&self.root, index),
            zero: self.zero.clone(),
        })
    }
}

impl<T> Index<usize> for SparseVector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Ok(elt) => elt,
            Err(e) => panic!("{e}"),
        }
    }
}
