//! The merge primitive shared by the serial and the distributed sort

/// Merge the sorted halves `a[..len / 2]` and `a[len / 2..]` through `tmp`.
///
/// The merged result is written back into `a`; `tmp` holds it transiently
/// and must be at least as long as `a`. Ties go to the left half, so merging
/// stable-sorted halves keeps the result stable.
pub fn merge<T: Ord + Clone>(a: &mut [T], tmp: &mut [T]) {
    assert!(
        tmp.len() >= a.len(),
        "Scratch needs at least the size of the merged slice"
    );

    let mid = a.len() / 2;
    let tmp = &mut tmp[..a.len()];

    let mut left = 0;
    let mut right = mid;
    let mut out = 0;

    while left < mid && right < a.len() {
        // Take from the right only on a strict win, ties keep the left first
        if a[right] < a[left] {
            tmp[out] = a[right].clone();
            right += 1;
        } else {
            tmp[out] = a[left].clone();
            left += 1;
        }
        out += 1;
    }

    while left < mid {
        tmp[out] = a[left].clone();
        left += 1;
        out += 1;
    }

    while right < a.len() {
        tmp[out] = a[right].clone();
        right += 1;
        out += 1;
    }

    a.clone_from_slice(tmp);
}
