//! Fixed-arity storage for the occupied positions of a node.
//!
//! A node never has more than [`BRANCHING`](crate::BRANCHING) occupied
//! positions, so instead of a length-prefixed array we keep one shape per
//! cardinality. This means a node with a single occupied slot is exactly as
//! big as its one element, and every operation below matches exhaustively on
//! the cardinality.
//!
//! Elements are kept in the order of their natural index, which is also the
//! order used by [`sparse_index`](crate::bits::sparse_index) to look them up.

/// Between zero and four elements, in rank order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Slots<E> {
    Empty,
    One(E),
    Two(E, E),
    Three(E, E, E),
    Four(E, E, E, E),
}

impl<E> Slots<E> {
    pub fn len(&self) -> usize {
        match self {
            Slots::Empty => 0,
            Slots::One(..) => 1,
            Slots::Two(..) => 2,
            Slots::Three(..) => 3,
            Slots::Four(..) => 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slots::Empty)
    }

    pub fn get(&self, slot: usize) -> Option<&E> {
        match (self, slot) {
            (Slots::One(e0), 0) => Some(e0),
            (Slots::Two(e0, _), 0) => Some(e0),
            (Slots::Two(_, e1), 1) => Some(e1),
            (Slots::Three(e0, _, _), 0) => Some(e0),
            (Slots::Three(_, e1, _), 1) => Some(e1),
            (Slots::Three(_, _, e2), 2) => Some(e2),
            (Slots::Four(e0, _, _, _), 0) => Some(e0),
            (Slots::Four(_, e1, _, _), 1) => Some(e1),
            (Slots::Four(_, _, e2, _), 2) => Some(e2),
            (Slots::Four(_, _, _, e3), 3) => Some(e3),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        (0..self.len()).filter_map(move |slot| self.get(slot))
    }
}

impl<E: Clone> Slots<E> {
    /// Returns a copy of these slots in which the element at `slot` is
    /// replaced by `f` applied to it. The other elements are cloned.
    ///
    /// Panics if `slot` isn't occupied.
    pub fn update(&self, slot: usize, f: impl FnOnce(&E) -> E) -> Self {
        use Slots::*;

        match (self, slot) {
            (One(e0), 0) => One(f(e0)),
            (Two(e0, e1), 0) => Two(f(e0), e1.clone()),
            (Two(e0, e1), 1) => Two(e0.clone(), f(e1)),
            (Three(e0, e1, e2), 0) => Three(f(e0), e1.clone(), e2.clone()),
            (Three(e0, e1, e2), 1) => Three(e0.clone(), f(e1), e2.clone()),
            (Three(e0, e1, e2), 2) => Three(e0.clone(), e1.clone(), f(e2)),
            (Four(e0, e1, e2, e3), 0) => Four(f(e0), e1.clone(), e2.clone(), e3.clone()),
            (Four(e0, e1, e2, e3), 1) => Four(e0.clone(), f(e1), e2.clone(), e3.clone()),
            (Four(e0, e1, e2, e3), 2) => Four(e0.clone(), e1.clone(), f(e2), e3.clone()),
            (Four(e0, e1, e2, e3), 3) => Four(e0.clone(), e1.clone(), e2.clone(), f(e3)),
            _ => invariant_violation("update", self.len(), slot),
        }
    }

    /// Returns a copy of these slots with `elt` inserted at `slot`. The
    /// elements that were at `slot` and above move up by one.
    ///
    /// Panics if we're already full, or if `slot > self.len()`.
    pub fn insert(&self, slot: usize, elt: E) -> Self {
        use Slots::*;

        match (self, slot) {
            (Empty, 0) => One(elt),
            (One(e0), 0) => Two(elt, e0.clone()),
            (One(e0), 1) => Two(e0.clone(), elt),
            (Two(e0, e1), 0) => Three(elt, e0.clone(), e1.clone()),
            (Two(e0, e1), 1) => Three(e0.clone(), elt, e1.clone()),
            (Two(e0, e1), 2) => Three(e0.clone(), e1.clone(), elt),
            (Three(e0, e1, e2), 0) => Four(elt, e0.clone(), e1.clone(), e2.clone()),
            (Three(e0, e1, e2), 1) => Four(e0.clone(), elt, e1.clone(), e2.clone()),
            (Three(e0, e1, e2), 2) => Four(e0.clone(), e1.clone(), elt, e2.clone()),
            (Three(e0, e1, e2), 3) => Four(e0.clone(), e1.clone(), e2.clone(), elt),
            _ => invariant_violation("insert into", self.len(), slot),
        }
    }

    /// Returns a copy of these slots without the element at `slot`. The
    /// elements above it move down by one.
    ///
    /// Panics if `slot` isn't occupied.
    pub fn remove(&self, slot: usize) -> Self {
        use Slots::*;

        match (self, slot) {
            (One(_), 0) => Empty,
            (Two(_, e1), 0) => One(e1.clone()),
            (Two(e0, _), 1) => One(e0.clone()),
            (Three(_, e1, e2), 0) => Two(e1.clone(), e2.clone()),
            (Three(e0, _, e2), 1) => Two(e0.clone(), e2.clone()),
            (Three(e0, e1, _), 2) => Two(e0.clone(), e1.clone()),
            (Four(_, e1, e2, e3), 0) => Three(e1.clone(), e2.clone(), e3.clone()),
            (Four(e0, _, e2, e3), 1) => Three(e0.clone(), e2.clone(), e3.clone()),
            (Four(e0, e1, _, e3), 2) => Three(e0.clone(), e1.clone(), e3.clone()),
            (Four(e0, e1, e2, _), 3) => Three(e0.clone(), e1.clone(), e2.clone()),
            _ => invariant_violation("remove from", self.len(), slot),
        }
    }
}

// Callers look slots up through the occupancy bitmap, so reaching this means
// a node's bitmap and its cardinality disagree.
#[cold]
fn invariant_violation(op: &str, len: usize, slot: usize) -> ! {
    log::error!("sparse vector node corrupted: cannot {op} slot {slot} of a node with {len} slots");
    panic!("cannot {op} slot {slot} of a node with {len} occupied slots");
}
