//! The message-passing seam between participants.
//!
//! The distribution protocol only ever talks to a [`Communicator`], so the
//! same recursive procedure runs unchanged on top of the in-process
//! [`channels`] transport or any future inter-process one. The vocabulary is
//! deliberately small: ranked peers, tagged payloads, blocking receives and
//! a non-consuming probe.

pub mod channels;

/// Zero-based identity of a participant within its group.
pub type Rank = usize;

/// Label that matches a send with the receive of the same logical exchange.
pub type Tag = u32;

/// Origin and size of a pending message, as reported by
/// [`Communicator::probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incoming {
    /// Rank of the sender.
    pub source: Rank,
    /// Number of elements in the payload.
    pub len: usize,
}

/// Errors surfaced by a transport endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The counterpart of an exchange no longer exists.
    #[error("rank {rank} dropped out of the group mid-exchange")]
    Disconnected { rank: Rank },

    /// Nothing can arrive anymore because every peer endpoint is gone.
    #[error("all peers disconnected while waiting for a message tagged {tag}")]
    Orphaned { tag: Tag },

    /// The destination rank is not part of this group.
    #[error("rank {dest} does not exist in a group of {group_size}")]
    UnknownRank { dest: Rank, group_size: usize },
}

/// Point-to-point message passing within one group of participants.
///
/// Sends are non-blocking: they post the payload and return, moving its
/// ownership into the transfer. Receives block until a message from exactly
/// `source` with exactly `tag` is available; messages for other exchanges
/// are never lost while waiting. [`probe`](Communicator::probe) blocks until
/// any message with `tag` is pending and describes it without consuming it.
pub trait Communicator<T> {
    /// Own rank within the group.
    fn rank(&self) -> Rank;

    /// Number of participants in the group.
    fn group_size(&self) -> usize;

    /// Highest rank in the group.
    fn max_rank(&self) -> Rank {
        self.group_size() - 1
    }

    /// Post `payload` to `dest` and return without waiting for delivery.
    fn send(&mut self, dest: Rank, tag: Tag, payload: Vec<T>) -> Result<(), TransportError>;

    /// Wait for the next message from `source` tagged `tag` and take it.
    fn recv(&mut self, source: Rank, tag: Tag) -> Result<Vec<T>, TransportError>;

    /// Wait until any message tagged `tag` is pending and describe it.
    fn probe(&mut self, tag: Tag) -> Result<Incoming, TransportError>;
}
