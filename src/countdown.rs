use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Counts work items that exist but have not finished yet.
///
/// The counter starts at the number of work items owned by the creating thread, usually one
/// for the top level call. Every submitted task adds a count before it is submitted and signals
/// once when it is done. [CountdownEvent::wait] blocks until the count reaches zero.
pub(crate) struct CountdownEvent {
    count: Mutex<usize>,
    condvar: Condvar,
}

impl CountdownEvent {
    pub(crate) fn new(initial: usize) -> CountdownEvent {
        CountdownEvent {
            count: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn add_count(&self, n: usize) {
        *self.lock() += n;
    }

    pub(crate) fn signal(&self) {
        let mut count = self.lock();
        if *count == 0 {
            log::error!("CountdownEvent signaled more times than counted, thread: {}", std::thread::current().name().unwrap_or("unnamed"));
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.condvar.notify_all();
        }
    }

    pub(crate) fn wait(&self) {
        let guard = self.lock();
        let _guard = self.condvar
            .wait_while(guard, |count| *count > 0)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
    }

    pub(crate) fn current_count(&self) -> usize {
        *self.lock()
    }

    // a poisoned lock still holds a consistent counter
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One unit of pending work, signaled when dropped.
///
/// Dropping also happens when the owning task is discarded or unwinds, so the count always
/// returns to zero.
pub(crate) struct Pending {
    countdown: Arc<CountdownEvent>,
}

impl Pending {
    /// Adds a count to `countdown` and returns the unit that releases it.
    pub(crate) fn register(countdown: &Arc<CountdownEvent>) -> Pending {
        countdown.add_count(1);
        Pending {
            countdown: countdown.clone(),
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.countdown.signal();
    }
}

/// The unit held by the top level call. Dropping it signals and then waits for every
/// outstanding task, including when the top level call unwinds.
pub(crate) struct RootCompletion<'a> {
    countdown: &'a CountdownEvent,
}

impl<'a> RootCompletion<'a> {
    pub(crate) fn new(countdown: &'a CountdownEvent) -> RootCompletion<'a> {
        RootCompletion {
            countdown,
        }
    }
}

impl<'a> Drop for RootCompletion<'a> {
    fn drop(&mut self) {
        self.countdown.signal();
        self.countdown.wait();
    }
}
