//! The distribution protocol: how sub-arrays travel down the virtual
//! process tree, get sorted, and come back merged.
//!
//! Every participant runs the same recursion in [`merge_sort_parallel`].
//! Splitting hands the right half of the working vector to the helper rank
//! for the current level and keeps only the left half, so a sub-array in
//! flight is owned by exactly one participant at any moment. Helpers are
//! released even when their share of the work is empty; a helper that was
//! never contacted would block forever.

use crate::algorithms::{mergesort, merging};
use crate::topology;
use crate::transport::channels;
use crate::transport::{Communicator, Rank, Tag, TransportError};

/// The tag shared by every exchange of a single sort.
pub const SORT_TAG: Tag = 123;

/// Errors that end a sort early.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// [`run_root`] was called by a participant other than rank 0.
    #[error("the sort must be entered at rank 0, not rank {rank}")]
    NotRoot { rank: Rank },

    /// A group with no participants cannot sort anything.
    #[error("the participant group is empty")]
    EmptyGroup,

    /// A helper thread ended with an error or panicked.
    #[error("helper rank {rank} failed")]
    HelperFailed { rank: Rank },

    /// The transport gave up mid-sort.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Sort `a` as the node at `level` of the process tree.
///
/// If the group still holds an idle participant for this level, the right
/// half of `a` moves out to it and the recursion continues on the left half
/// one level deeper; otherwise the whole of `a` is sorted serially. The sent
/// half is owned by the helper until its reply lands, at which point it is
/// appended back and the two sorted halves are merged.
///
/// `tmp` must be at least as long as `a` and is only written during merges.
pub fn merge_sort_parallel<T, C>(
    comm: &mut C,
    a: &mut Vec<T>,
    tmp: &mut Vec<T>,
    level: u32,
    tag: Tag,
) -> Result<(), TransportError>
where
    T: Ord + Clone,
    C: Communicator<T>,
{
    let rank = comm.rank();
    let Some(helper) = topology::helper_rank(rank, level, comm.max_rank()) else {
        mergesort::merge_sort_serial(a, tmp);
        return Ok(());
    };

    let right = a.split_off(a.len() / 2);
    let right_len = right.len();
    log::debug!("rank {rank}: level {level}, delegating {right_len} elements to rank {helper}");
    comm.send(helper, tag, right)?;

    merge_sort_parallel(comm, a, tmp, level + 1, tag)?;

    let mut sorted_right = comm.recv(helper, tag)?;
    debug_assert_eq!(
        sorted_right.len(),
        right_len,
        "A helper must return exactly the half it was handed"
    );

    a.append(&mut sorted_right);
    merging::merge(a, tmp);

    Ok(())
}

/// The life of a non-root participant: wait for one piece of work, sort it
/// as the root of its own subtree, reply to whoever sent it, and finish.
///
/// The size of the incoming sub-array depends on the splits above, so the
/// payload is probed before it is received.
pub fn run_helper<T, C>(comm: &mut C, tag: Tag) -> Result<(), TransportError>
where
    T: Ord + Clone,
    C: Communicator<T>,
{
    let rank = comm.rank();
    let level = topology::topmost_level(rank);

    let incoming = comm.probe(tag)?;
    let parent = incoming.source;
    log::debug!(
        "rank {rank}: entering at level {level} with {len} elements from rank {parent}",
        len = incoming.len
    );

    let mut a = comm.recv(parent, tag)?;
    let mut tmp = a.clone();
    merge_sort_parallel(comm, &mut a, &mut tmp, level, tag)?;

    log::debug!("rank {rank}: returning {len} sorted elements", len = a.len());
    comm.send(parent, tag, a)
}

/// Enter the protocol as the root of the whole sort. `a` is sorted in place.
pub fn run_root<T, C>(
    comm: &mut C,
    a: &mut Vec<T>,
    tmp: &mut Vec<T>,
    tag: Tag,
) -> Result<(), ProtocolError>
where
    T: Ord + Clone,
    C: Communicator<T>,
{
    let rank = comm.rank();
    if rank != 0 {
        return Err(ProtocolError::NotRoot { rank });
    }

    merge_sort_parallel(comm, a, tmp, 0, tag)?;
    Ok(())
}

/// Sort `array` across an in-process group of `participants`, with rank 0 on
/// the calling thread and one spawned thread per helper.
///
/// Each call builds a fresh channel group carrying exactly this one sort; a
/// group is never reused, so a single tag cannot collide across sorts. An
/// empty array degenerates to the lone root, spawning no helpers and sending
/// no messages. Returns the message totals summed over all participants.
pub fn run_group<T>(
    array: &mut Vec<T>,
    tmp: &mut Vec<T>,
    participants: usize,
    tag: Tag,
) -> Result<channels::Counters, ProtocolError>
where
    T: Ord + Clone + Send + 'static,
{
    if participants == 0 {
        return Err(ProtocolError::EmptyGroup);
    }
    let participants = if array.is_empty() { 1 } else { participants };

    let mut endpoints = channels::group::<T>(participants);
    let mut root = endpoints.remove(0);

    let helpers: Vec<_> = endpoints
        .into_iter()
        .map(|mut endpoint| {
            std::thread::spawn(move || -> Result<channels::Counters, TransportError> {
                run_helper(&mut endpoint, tag)?;
                Ok(endpoint.counters())
            })
        })
        .collect();

    run_root(&mut root, array, tmp, tag)?;

    let mut totals = root.counters();
    for (offset, handle) in helpers.into_iter().enumerate() {
        let rank = offset + 1;
        match handle.join() {
            Ok(Ok(counters)) => totals += counters,
            Ok(Err(error)) => {
                log::error!("helper rank {rank} failed: {error}");
                return Err(ProtocolError::HelperFailed { rank });
            }
            Err(_) => return Err(ProtocolError::HelperFailed { rank }),
        }
    }

    log::debug!(
        "group of {participants} done: {sent} messages sent, {received} received",
        sent = totals.sent,
        received = totals.received
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{self, IndexedOrdered};

    const RUNS: usize = 20;

    /// Drive a full distributed sort and return the result with its message
    /// totals.
    fn sort_group(mut values: Vec<u64>, participants: usize) -> (Vec<u64>, channels::Counters) {
        let mut tmp = values.clone();
        let counters = run_group(&mut values, &mut tmp, participants, SORT_TAG).unwrap();
        (values, counters)
    }

    #[test]
    fn single_element_single_participant() {
        let (values, counters) = sort_group(vec![7], 1);
        assert_eq!(values, [7]);
        assert_eq!(counters, channels::Counters::default());
    }

    #[test]
    fn lone_participant_sends_nothing() {
        let (values, counters) = sort_group(vec![5, 3, 4, 1, 2], 1);
        assert_eq!(values, [1, 2, 3, 4, 5]);
        assert_eq!(counters, channels::Counters::default());
    }

    #[test]
    fn two_participants_split_once() {
        let (values, counters) = sort_group(vec![5, 3, 4, 1, 2], 2);
        assert_eq!(values, [1, 2, 3, 4, 5]);
        assert_eq!(counters.sent, 2);
        assert_eq!(counters.received, 2);
    }

    #[test]
    fn one_split_per_extra_participant() {
        // Every extra participant takes exactly one delegated half, and each
        // delegation is one send down plus one reply up.
        for participants in 1..=8 {
            let mut rng = test::test_rng();
            let values = test::shuffled_values(&mut rng, 64);
            let (_, counters) = sort_group(values, participants);
            assert_eq!(counters.sent, 2 * (participants - 1));
            assert_eq!(counters.received, 2 * (participants - 1));
        }
    }

    #[test]
    fn four_participants_eight_elements() {
        let (values, counters) = sort_group(vec![8, 6, 7, 5, 3, 1, 2, 4], 4);
        assert_eq!(values, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(counters.sent, 6);
        assert_eq!(counters.received, 6);
    }

    #[test]
    fn empty_array_sends_nothing() {
        let (values, counters) = sort_group(Vec::new(), 4);
        assert!(values.is_empty());
        assert_eq!(counters, channels::Counters::default());
    }

    #[test]
    fn sorted_input_stays_sorted() {
        let (values, _) = sort_group((0..100).collect(), 3);
        assert_eq!(values, (0..100).collect::<Vec<u64>>());
    }

    #[test]
    fn more_participants_than_elements() {
        let (values, _) = sort_group(vec![2, 1], 8);
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn random_arrays_across_group_sizes() {
        let mut rng = test::test_rng();
        for participants in 1..=8 {
            for size in [0, 1, 2, 5, 31, 32, 33, 100, 257] {
                let values = test::duplicate_values(&mut rng, size);
                let mut expected = values.clone();
                expected.sort();

                let (values, _) = sort_group(values, participants);
                assert_eq!(
                    values, expected,
                    "Wrong result for {size} elements across {participants} participants"
                );
            }
        }
    }

    #[test]
    fn random_large_group() {
        let mut rng = test::test_rng();
        for _ in 0..RUNS {
            let values = test::duplicate_values(&mut rng, 10_000);
            let mut expected = values.clone();
            expected.sort();

            let (values, _) = sort_group(values, 16);
            assert_eq!(values, expected);
        }
    }

    #[test]
    fn distributed_sort_is_stable() {
        let mut rng = test::test_rng();
        for participants in 1..=6 {
            let values = test::duplicate_values(&mut rng, 1000);
            let mut ordered: Vec<_> = IndexedOrdered::map_iter(values.into_iter()).collect();
            let mut tmp = ordered.clone();

            run_group(&mut ordered, &mut tmp, participants, SORT_TAG).unwrap();
            assert!(
                IndexedOrdered::is_stable_sorted(&ordered),
                "Not stable across {participants} participants"
            );
        }
    }

    #[test]
    fn zero_participants_is_an_error() {
        let mut values = vec![1u64];
        let mut tmp = values.clone();
        let result = run_group(&mut values, &mut tmp, 0, SORT_TAG);
        assert!(matches!(result, Err(ProtocolError::EmptyGroup)));
    }

    #[test]
    fn only_rank_zero_may_run_the_root() {
        let mut endpoints = channels::group::<u64>(2);
        let mut second = endpoints.pop().unwrap();

        let mut values = vec![1u64];
        let mut tmp = values.clone();
        let result = run_root(&mut second, &mut values, &mut tmp, SORT_TAG);
        assert!(matches!(result, Err(ProtocolError::NotRoot { rank: 1 })));
    }
}
