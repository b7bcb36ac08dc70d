//! Bitmap and tree-shape arithmetic shared by all the node kinds.

/// The fan-out of every node in the tree, leaves included.
pub const BRANCHING: usize = 4;

/// The occupancy bitmap of a node with all of its `BRANCHING` slots in use.
pub(crate) const FULL: u8 = (1 << BRANCHING) - 1;

/// A node at height `level` (where the leaves are at height zero) splits its
/// index range into sub-ranges of this many elements.
pub(crate) fn child_capacity(level: u8) -> usize {
    BRANCHING.pow(u32::from(level))
}

/// Maps a natural index within a node (in `0..BRANCHING`) to the slot that
/// stores it, given the node's occupancy bitmap. Returns `None` if that
/// position isn't occupied.
///
/// Occupied positions are stored in increasing order, so the slot is the
/// number of occupied positions below `natural`.
#[inline]
pub(crate) fn sparse_index(bitmap: u8, natural: usize) -> Option<usize> {
    debug_assert!(natural < BRANCHING);

    // A full node isn't compressed at all.
    if bitmap == FULL {
        return Some(natural);
    }

    if bitmap & (1u8 << natural) == 0 {
        None
    } else {
        Some(rank(bitmap, natural))
    }
}

/// The number of occupied positions strictly below `natural`. For an
/// unoccupied position, this is the slot it would be inserted at.
#[inline]
pub(crate) fn rank(bitmap: u8, natural: usize) -> usize {
    (bitmap & ((1u8 << natural) - 1)).count_ones() as usize
}

/// The height of the root needed to hold `size` elements: zero if they fit in
/// a single leaf, otherwise the smallest `level` such that
/// `BRANCHING^(level + 1) >= size`.
pub(crate) fn depth(size: usize) -> u8 {
    // Sizes zero through B have depth zero, B + 1 through B^2 have depth 1, etc.
    // The unwrap is fine unless someone has a usize that's more than 256 bits.
    size.saturating_sub(1).max(1).ilog(BRANCHING).try_into().unwrap()
}
