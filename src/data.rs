use std::fmt;

use rand::rngs::StdRng;
use rand::{distr::Distribution, seq::SliceRandom as _};

/// A trait for generalizing sorting data creation
pub trait Data<T: Sized + Ord + fmt::Debug> {
    /// Initialize a vector of the given size
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<T>;
}

/// Uniform values bounded by the array length, so duplicates appear as soon
/// as the array is non-trivial
#[derive(Debug)]
pub struct UniformData;

impl Data<u64> for UniformData {
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<u64> {
        if size == 0 {
            return Vec::new();
        }

        rand::distr::Uniform::new(0, size as u64)
            .unwrap()
            .sample_iter(rng)
            .take(size)
            .collect()
    }
}

/// Every value of `0..size` exactly once, shuffled
#[derive(Debug)]
pub struct PermutationData;

impl Data<u64> for PermutationData {
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<u64> {
        let mut values: Vec<u64> = (0..size as u64).collect();
        values.shuffle(rng);
        values
    }
}

/// Zipf-distributed values: heavily skewed towards small keys with long runs
/// of duplicates
#[derive(Debug)]
pub struct ZipfData;

impl Data<u64> for ZipfData {
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<u64> {
        if size == 0 {
            return Vec::new();
        }

        // Samples lie in 1..=size, shifted down to start at 0
        rand_distr::Zipf::new(size as f64, 1.1)
            .unwrap()
            .sample_iter(rng)
            .take(size)
            .map(|value| value as u64 - 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(crate::test::TEST_SEED)
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(UniformData::initialize(0, &mut rng()).is_empty());
        assert!(PermutationData::initialize(0, &mut rng()).is_empty());
        assert!(ZipfData::initialize(0, &mut rng()).is_empty());
    }

    #[test]
    fn uniform_respects_the_bound() {
        let values = UniformData::initialize(1000, &mut rng());
        assert_eq!(values.len(), 1000);
        assert!(values.iter().all(|&value| value < 1000));
    }

    #[test]
    fn permutation_contains_every_value_once() {
        let mut values = PermutationData::initialize(1000, &mut rng());
        values.sort();
        assert_eq!(values, (0..1000).collect::<Vec<u64>>());
    }

    #[test]
    fn zipf_respects_the_bound() {
        let values = ZipfData::initialize(1000, &mut rng());
        assert_eq!(values.len(), 1000);
        assert!(values.iter().all(|&value| value < 1000));
    }
}
