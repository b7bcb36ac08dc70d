use std::sync::Arc;

use crate::{
    bits::{child_capacity, rank, sparse_index, BRANCHING},
    slots::Slots,
};

type Children<T> = Slots<Arc<Node<T>>>;

/// A subtree covering the index range `0..size`.
///
/// Both kinds of node split their range into (at most) `BRANCHING` parts and
/// only store the parts that aren't entirely zero. `sparsity` has bit `i` set
/// if part `i` is stored, and the stored parts are kept in order of `i`.
///
/// The zero value itself lives in the top-level vector: a node just reports
/// `None` for positions that it doesn't store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Node<T> {
    /// Holds up to `BRANCHING` elements directly. `size` is at most
    /// `BRANCHING`, but can be smaller.
    Leaf {
        size: usize,
        sparsity: u8,
        values: Slots<T>,
    },
    /// Holds up to `BRANCHING` subtrees, each at height `level - 1`. Every
    /// child except possibly the last one covers exactly
    /// `child_capacity(level)` elements; the last one gets whatever is left.
    ///
    /// Children are only created when something non-zero is written into
    /// their range, and are dropped again once they go back to all-zero.
    Trie {
        level: u8,
        size: usize,
        sparsity: u8,
        children: Children<T>,
    },
}

impl<T> Node<T> {
    /// An all-zero node of the given height. Height zero is a single leaf.
    pub fn zeroed(level: u8, size: usize) -> Self {
        if level == 0 {
            debug_assert!(size <= BRANCHING);
            Node::Leaf {
                size,
                sparsity: 0,
                values: Slots::Empty,
            }
        } else {
            Node::Trie {
                level,
                size,
                sparsity: 0,
                children: Slots::Empty,
            }
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Node::Leaf { size, .. } | Node::Trie { size, .. } => *size,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Trie { level, .. } => *level,
        }
    }

    /// Is this the canonical representation of an all-zero subtree?
    pub fn is_zero(&self) -> bool {
        match self {
            Node::Leaf { values, .. } => values.is_empty(),
            Node::Trie { children, .. } => children.is_empty(),
        }
    }

    /// The number of occupied slots in this node (not in the whole subtree).
    pub fn cardinality(&self) -> usize {
        match self {
            Node::Leaf { values, .. } => values.len(),
            Node::Trie { children, .. } => children.len(),
        }
    }

    /// The number of non-zero elements in this subtree.
    pub fn count_nonzero(&self) -> usize {
        match self {
            Node::Leaf { values, .. } => values.len(),
            Node::Trie { children, .. } => children.iter().map(|c| c.count_nonzero()).sum(),
        }
    }

    /// Gets the element at `idx`, or `None` if it's zero.
    ///
    /// `idx` must be less than `self.size()`.
    pub fn get(&self, idx: usize) -> Option<&T> {
        debug_assert!(idx < self.size());
        match self {
            Node::Leaf {
                sparsity, values, ..
            } => sparse_index(*sparsity, idx).and_then(|slot| values.get(slot)),
            Node::Trie {
                level,
                sparsity,
                children,
                ..
            } => {
                let capacity = child_capacity(*level);
                sparse_index(*sparsity, idx / capacity)
                    .and_then(|slot| children.get(slot))
                    .and_then(|child| child.get(idx % capacity))
            }
        }
    }

    /// Checks the structural invariants of this subtree, assuming that our
    /// parent expects us to be at height `level` and to cover `size` elements.
    ///
    /// Panics if any of them are violated.
    pub fn check_invariants(&self, level: u8, size: usize) {
        assert_eq!(self.level(), level);
        assert_eq!(self.size(), size);

        match self {
            Node::Leaf { size, sparsity, .. } => {
                assert!(*size <= BRANCHING);
                assert_eq!(sparsity.count_ones() as usize, self.cardinality());
                assert_eq!(*sparsity >> *size, 0, "occupied position past the end");
            }
            Node::Trie {
                level,
                size,
                sparsity,
                children,
            } => {
                let capacity = child_capacity(*level);
                let parts = size.div_ceil(capacity);
                assert!(parts <= BRANCHING, "trie too small for its size");
                assert_eq!(sparsity.count_ones() as usize, self.cardinality());
                assert_eq!(*sparsity >> parts, 0, "occupied part past the end");

                let occupied = (0..BRANCHING).filter(|&part| *sparsity & (1u8 << part) != 0);
                for (part, child) in occupied.zip(children.iter()) {
                    assert!(!child.is_zero(), "all-zero child wasn't pruned");
                    child.check_invariants(*level - 1, part_size(*size, capacity, part));
                }
            }
        }
    }
}

/// The size of the `part`th sub-range of a trie of size `size`. All but the
/// last part are full.
fn part_size(size: usize, capacity: usize, part: usize) -> usize {
    if part < size / capacity {
        capacity
    } else {
        size % capacity
    }
}

impl<T: Clone> Node<T> {
    /// Returns a copy of this subtree with `elt` at index `idx`.
    ///
    /// `idx` must be less than `self.size()`, and `elt` must not be zero
    /// (setting to zero is done by [`Node::clear`]).
    pub fn set(&self, idx: usize, elt: T) -> Self {
        debug_assert!(idx < self.size());
        match self {
            Node::Leaf {
                size,
                sparsity,
                values,
            } => match sparse_index(*sparsity, idx) {
                Some(slot) => Node::Leaf {
                    size: *size,
                    sparsity: *sparsity,
                    values: values.update(slot, |_| elt),
                },
                None => Node::Leaf {
                    size: *size,
                    sparsity: *sparsity | (1u8 << idx),
                    values: values.insert(rank(*sparsity, idx), elt),
                },
            },
            Node::Trie {
                level,
                size,
                sparsity,
                children,
            } => {
                let capacity = child_capacity(*level);
                let part = idx / capacity;
                let idx = idx % capacity;

                match sparse_index(*sparsity, part) {
                    Some(slot) => Node::Trie {
                        level: *level,
                        size: *size,
                        sparsity: *sparsity,
                        children: children.update(slot, |child| Arc::new(child.set(idx, elt))),
                    },
                    None => {
                        let child = Node::zeroed(*level - 1, part_size(*size, capacity, part));
                        Node::Trie {
                            level: *level,
                            size: *size,
                            sparsity: *sparsity | (1u8 << part),
                            children: children
                                .insert(rank(*sparsity, part), Arc::new(child.set(idx, elt))),
                        }
                    }
                }
            }
        }
    }

    /// Returns a subtree with index `idx` set to zero.
    ///
    /// If that index was already zero, returns `this` unchanged. `idx` must be
    /// less than `this.size()`.
    pub fn clear(this: &Arc<Self>, idx: usize) -> Arc<Self> {
        debug_assert!(idx < this.size());
        if this.get(idx).is_none() {
            return Arc::clone(this);
        }

        let node = match this.as_ref() {
            Node::Leaf {
                size,
                sparsity,
                values,
            } => {
                // unwrap: we checked above that `idx` is occupied.
                let slot = sparse_index(*sparsity, idx).unwrap();
                Node::Leaf {
                    size: *size,
                    sparsity: *sparsity & !(1u8 << idx),
                    values: values.remove(slot),
                }
            }
            Node::Trie {
                level,
                size,
                sparsity,
                children,
            } => {
                let capacity = child_capacity(*level);
                let part = idx / capacity;
                // unwrap: we checked above that `idx` is non-zero, so its part is present.
                let slot = sparse_index(*sparsity, part).unwrap();
                let Some(child) = children.get(slot) else {
                    unreachable!("sparsity bitmap disagrees with the number of children");
                };

                let child = Node::clear(child, idx % capacity);
                if child.is_zero() {
                    Node::Trie {
                        level: *level,
                        size: *size,
                        sparsity: *sparsity & !(1u8 << part),
                        children: children.remove(slot),
                    }
                } else {
                    Node::Trie {
                        level: *level,
                        size: *size,
                        sparsity: *sparsity,
                        children: children.update(slot, |_| child),
                    }
                }
            }
        };
        Arc::new(node)
    }
}
