use crate::partition::split_zones;

/// Sorts `keys` on the byte positions `depth..max_key_length` on the current thread.
///
/// Only the equal zone advances to the next byte position, the less and greater zones are
/// partitioned again on the same position. The larger of the two side zones is handled by the
/// loop rather than by recursion.
pub(crate) fn sort_range<K: AsRef<[u8]>>(mut keys: &mut [K], depth: usize, max_key_length: usize) {
    loop {
        if is_terminal(keys.len(), depth, max_key_length) {
            return;
        }

        let (less, equal, greater) = split_zones(keys, depth);
        sort_range(equal, depth + 1, max_key_length);
        if less.len() < greater.len() {
            sort_range(less, depth, max_key_length);
            keys = greater;
        } else {
            sort_range(greater, depth, max_key_length);
            keys = less;
        }
    }
}

/// A range of at most one key, or a range probed past the key length, needs no work.
pub(crate) fn is_terminal(len: usize, depth: usize, max_key_length: usize) -> bool {
    len < 2 || depth >= max_key_length
}
