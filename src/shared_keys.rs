use std::marker::PhantomData;
use std::ops::Range;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

/// A lifetime erased view of the caller's key slice, shared by every task of one parallel sort.
///
/// Tasks get mutable access to a sub-range only through [SharedKeys::claim], which refuses a
/// range overlapping one that is currently claimed. The view must not outlive the slice it was
/// created from: the parallel sorter blocks until all tasks are gone before it returns.
pub(crate) struct SharedKeys<K> {
    ptr: *mut K,
    len: usize,
    claims: Mutex<Claims>,
    _keys: PhantomData<K>,
}

#[derive(Default)]
struct Claims {
    active: Vec<Range<usize>>,
    peak: usize,
}

// Tasks only ever reach the keys through disjoint claims, so sending the view across threads
// is sending the keys themselves.
unsafe impl<K: Send> Send for SharedKeys<K> {}
unsafe impl<K: Send> Sync for SharedKeys<K> {}

impl<K> SharedKeys<K> {
    /// # Safety
    /// `keys` must stay borrowed and untouched by the caller for as long as this view or any
    /// [ClaimedRange] obtained from it exists.
    pub(crate) unsafe fn new(keys: &mut [K]) -> SharedKeys<K> {
        SharedKeys {
            ptr: keys.as_mut_ptr(),
            len: keys.len(),
            claims: Mutex::new(Claims::default()),
            _keys: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Exclusive access to `range` until the returned claim is dropped.
    pub(crate) fn claim(&self, range: Range<usize>) -> Result<ClaimedRange<'_, K>, anyhow::Error> {
        if range.start > range.end || range.end > self.len {
            return Err(anyhow!("Claimed range {:?} is outside of 0..{}", range, self.len));
        }

        let mut claims = self.lock_claims();
        if let Some(active) = claims.active.iter().find(|active| overlaps(active, &range)) {
            return Err(
                anyhow!(
                    "Claimed range {:?} overlaps active range {:?}, thread: {}",
                    range,
                    active,
                    std::thread::current().name().unwrap_or("unnamed"),
                )
            );
        }
        claims.active.push(range.clone());
        claims.peak = claims.peak.max(claims.active.len());

        Ok(
            ClaimedRange {
                keys: self,
                range,
            }
        )
    }

    /// Largest number of ranges claimed at the same time.
    pub(crate) fn peak_claims(&self) -> usize {
        self.lock_claims().peak
    }

    fn release(&self, range: &Range<usize>) {
        let mut claims = self.lock_claims();
        if let Some(position) = claims.active.iter().position(|active| active == range) {
            claims.active.swap_remove(position);
        }
    }

    fn lock_claims(&self) -> MutexGuard<'_, Claims> {
        self.claims.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    // empty ranges touch nothing
    a.start < a.end && b.start < b.end && a.start < b.end && b.start < a.end
}

pub(crate) struct ClaimedRange<'a, K> {
    keys: &'a SharedKeys<K>,
    range: Range<usize>,
}

impl<'a, K> ClaimedRange<'a, K> {
    pub(crate) fn as_mut_slice(&mut self) -> &mut [K] {
        // the range is in bounds and no other claim overlaps it
        unsafe {
            std::slice::from_raw_parts_mut(self.keys.ptr.add(self.range.start), self.range.len())
        }
    }
}

impl<'a, K> Drop for ClaimedRange<'a, K> {
    fn drop(&mut self) {
        self.keys.release(&self.range);
    }
}
