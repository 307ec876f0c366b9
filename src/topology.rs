//! Rank arithmetic for the virtual process tree.
//!
//! The tree is never materialized: a participant's place in it follows
//! entirely from its rank. [`topmost_level`] tells a participant the depth at
//! which it enters the sort, and [`helper_rank`] names the participant (if
//! any) that takes the right half of a split at a given depth. Every
//! transport shares these two functions, so in-process and multi-process
//! groups agree on the same topology.

use crate::transport::Rank;

/// The depth at which `rank` enters the process tree.
///
/// This is the smallest `level` with `2^level > rank`, i.e. the bit length
/// of `rank`. The root (rank 0) enters at level 0.
pub fn topmost_level(rank: Rank) -> u32 {
    usize::BITS - rank.leading_zeros()
}

/// The rank that helps `rank` with a split at `level`, if the group has one.
///
/// A helper sits at `rank + 2^level`; it exists only if that rank is part of
/// the group. Returns `None` both when the group is exhausted and when the
/// arithmetic would overflow, so callers can keep deepening `level` without
/// any bound checks of their own.
pub fn helper_rank(rank: Rank, level: u32, max_rank: Rank) -> Option<Rank> {
    let helper = 1usize
        .checked_shl(level)
        .and_then(|stride| rank.checked_add(stride))?;

    (helper <= max_rank).then_some(helper)
}
