/// Byte at `depth` of the element at the median position of `keys`.
///
/// The choice is positional, not a median of values. `keys` must not be empty.
pub(crate) fn pivot<K: AsRef<[u8]>>(keys: &[K], depth: usize) -> u8 {
    let median = (keys.len() - 1) / 2;
    keys[median].as_ref()[depth]
}

/// Three way partition of `keys` on the byte at `depth`.
///
/// Elements are reordered in place into less than, equal to and greater than `pivot` zones.
/// Returns the inclusive bounds `(min_equal, max_equal)` of the equal zone. When no element
/// equals the pivot `max_equal` is `min_equal - 1`, hence the signed result.
pub(crate) fn partition<K: AsRef<[u8]>>(keys: &mut [K], depth: usize, pivot: u8) -> (usize, isize) {
    let mut low = 0;
    let mut high = keys.len() as isize - 1;
    let mut i = 0;

    while i as isize <= high {
        let current = keys[i].as_ref()[depth];
        if current < pivot {
            keys.swap(i, low);
            low += 1;
            i += 1;
        } else if current > pivot {
            keys.swap(i, high as usize);
            high -= 1;
        } else {
            i += 1;
        }
    }

    (low, high)
}

/// Splits `keys` into the less, equal and greater zones found by [partition].
pub(crate) fn split_zones<K: AsRef<[u8]>>(keys: &mut [K], depth: usize) -> (&mut [K], &mut [K], &mut [K]) {
    let pivot = pivot(keys, depth);
    let (min_equal, max_equal) = partition(keys, depth, pivot);
    let equal_end = (max_equal + 1) as usize;
    let (less, rest) = keys.split_at_mut(min_equal);
    let (equal, greater) = rest.split_at_mut(equal_end - min_equal);
    (less, equal, greater)
}

/// Half-open bounds of the less, equal and greater zones relative to the partitioned slice.
pub(crate) fn zone_bounds(min_equal: usize, max_equal: isize, len: usize) -> [(usize, usize); 3] {
    let equal_end = (max_equal + 1) as usize;
    [(0, min_equal), (min_equal, equal_end), (equal_end, len)]
}
