//! The serial mergesort run by every participant on its own sub-array

use super::{insertionsort, merging};

/// Below or at this length the recursion hands over to insertion sort.
pub const INSERTION_THRESHOLD: usize = 32;

/// Sort `a` in place with top-down mergesort, merging through `tmp`.
///
/// `tmp` must be at least as long as `a`; its contents are irrelevant on
/// entry and unspecified afterwards. Stable, like every sort in this crate.
pub fn merge_sort_serial<T: Ord + Clone>(a: &mut [T], tmp: &mut [T]) {
    if a.len() <= INSERTION_THRESHOLD {
        insertionsort::insertion_sort(a);
        return;
    }

    let mid = a.len() / 2;
    merge_sort_serial(&mut a[..mid], tmp);
    merge_sort_serial(&mut a[mid..], tmp);
    merging::merge(a, tmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test;

    const RUNS: usize = 100;
    const TEST_SIZE: usize = 10_000;

    fn sort<T: Ord + Clone>(values: &mut [T]) {
        let mut tmp = values.to_vec();
        merge_sort_serial(values, &mut tmp);
    }

    #[test]
    fn empty() {
        test::test_empty(sort);
    }

    #[test]
    fn around_the_insertion_threshold() {
        let mut rng = test::test_rng();
        for size in INSERTION_THRESHOLD - 1..=INSERTION_THRESHOLD + 1 {
            let mut values = test::shuffled_values(&mut rng, size);
            sort(&mut values);
            assert!(values.is_sorted(), "Size {size} was not sorted");
        }
    }

    #[test]
    fn sorted_input_stays_sorted() {
        let mut values: Vec<u64> = (0..1000).collect();
        sort(&mut values);
        assert_eq!(values, (0..1000).collect::<Vec<u64>>());
    }

    #[test]
    fn random() {
        test::test_random_sorted::<RUNS, TEST_SIZE>(sort);
    }

    #[test]
    fn random_preserves_elements() {
        let mut rng = test::test_rng();
        for _ in 0..RUNS {
            let mut values = test::duplicate_values(&mut rng, TEST_SIZE);
            let mut expected = values.clone();
            expected.sort();

            sort(&mut values);
            assert_eq!(values, expected);
        }
    }

    #[test]
    fn random_stable() {
        test::test_random_stable_sorted::<RUNS, TEST_SIZE>(sort);
    }
}
