//! In-process transport: one endpoint per participant thread, connected
//! all-to-all through [`std::sync::mpsc`] channels.

use std::collections::VecDeque;
use std::sync::mpsc;

use super::{Communicator, Incoming, Rank, Tag, TransportError};

/// A message in flight between two endpoints.
struct Envelope<T> {
    source: Rank,
    tag: Tag,
    payload: Vec<T>,
}

/// Messages posted and taken by an endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// Messages this endpoint posted.
    pub sent: usize,
    /// Messages this endpoint took delivery of.
    pub received: usize,
}

impl std::ops::AddAssign for Counters {
    fn add_assign(&mut self, other: Self) {
        self.sent += other.sent;
        self.received += other.received;
    }
}

/// One participant's connection to its group.
///
/// Messages that have arrived but matched no receive yet wait in an
/// arrival-ordered stash, so receiving from one `(source, tag)` pair never
/// drops messages that belong to a different exchange.
pub struct Endpoint<T> {
    rank: Rank,
    peers: Vec<mpsc::Sender<Envelope<T>>>,
    inbox: mpsc::Receiver<Envelope<T>>,
    stash: VecDeque<Envelope<T>>,
    counters: Counters,
}

/// Create a fully connected group of `size` endpoints, ranked by index.
///
/// Endpoints can move to other threads; dropping one makes later sends to
/// its rank fail with [`TransportError::Disconnected`].
pub fn group<T>(size: usize) -> Vec<Endpoint<T>> {
    let (peers, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();

    inboxes
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| Endpoint {
            rank,
            peers: peers.clone(),
            inbox,
            stash: VecDeque::new(),
            counters: Counters::default(),
        })
        .collect()
}

impl<T> Endpoint<T> {
    /// Message totals of this endpoint so far.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Position of the first stashed message matching `source` and `tag`.
    fn stashed(&self, source: Rank, tag: Tag) -> Option<usize> {
        self.stash
            .iter()
            .position(|envelope| envelope.source == source && envelope.tag == tag)
    }
}

impl<T> Communicator<T> for Endpoint<T> {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn group_size(&self) -> usize {
        self.peers.len()
    }

    fn send(&mut self, dest: Rank, tag: Tag, payload: Vec<T>) -> Result<(), TransportError> {
        let peer = self.peers.get(dest).ok_or(TransportError::UnknownRank {
            dest,
            group_size: self.peers.len(),
        })?;

        let envelope = Envelope {
            source: self.rank,
            tag,
            payload,
        };
        peer.send(envelope)
            .map_err(|_| TransportError::Disconnected { rank: dest })?;

        self.counters.sent += 1;
        Ok(())
    }

    fn recv(&mut self, source: Rank, tag: Tag) -> Result<Vec<T>, TransportError> {
        loop {
            if let Some(at) = self.stashed(source, tag) {
                let envelope = self.stash.remove(at).unwrap();
                self.counters.received += 1;
                return Ok(envelope.payload);
            }

            let envelope = self
                .inbox
                .recv()
                .map_err(|_| TransportError::Disconnected { rank: source })?;
            log::trace!(
                "rank {rank}: stashing message from rank {source} (tag {tag})",
                rank = self.rank,
                source = envelope.source,
                tag = envelope.tag,
            );
            self.stash.push_back(envelope);
        }
    }

    fn probe(&mut self, tag: Tag) -> Result<Incoming, TransportError> {
        loop {
            if let Some(envelope) = self.stash.iter().find(|envelope| envelope.tag == tag) {
                return Ok(Incoming {
                    source: envelope.source,
                    len: envelope.payload.len(),
                });
            }

            let envelope = self
                .inbox
                .recv()
                .map_err(|_| TransportError::Orphaned { tag })?;
            self.stash.push_back(envelope);
        }
    }
}
