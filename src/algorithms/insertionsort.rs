//! The insertion sort used at the bottom of the recursion

/// Sort `slice` in place using insertion sort.
///
/// Stable, and quadratic in the worst case, but with so little overhead that
/// it wins below [`super::mergesort::INSERTION_THRESHOLD`] elements.
pub fn insertion_sort<T: Ord>(slice: &mut [T]) {
    for i in 1..slice.len() {
        for j in (0..i).rev() {
            if slice[j + 1] < slice[j] {
                slice.swap(j + 1, j);
            } else {
                break;
            }
        }
    }
}
