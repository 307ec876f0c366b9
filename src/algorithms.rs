//! The serial sorting building blocks.
//!
//! Insertion sort handles short ranges, a top-down mergesort sits above it,
//! and both the serial and the distributed sort funnel through the same
//! [`merging::merge`] primitive, so the tie-breaking rule is identical at
//! every level of the process tree.

pub mod insertionsort;
pub mod mergesort;
pub mod merging;
