use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{anyhow, Context};
use command_executor::shutdown_mode::ShutdownMode;
use command_executor::thread_pool::ThreadPool;
use command_executor::thread_pool_builder::ThreadPoolBuilder;

use crate::config::{check_fan_out_depth, Config};
use crate::countdown::{CountdownEvent, Pending, RootCompletion};
use crate::partition::{partition, pivot, zone_bounds};
use crate::sequential::{is_terminal, sort_range};
use crate::shared_keys::SharedKeys;
use crate::sort::validate_keys;
use crate::sort_command::{SortCommand, SortTask};

/// What a parallel sort did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    dispatched_tasks: usize,
    deepest_dispatch: usize,
    peak_active_claims: usize,
}

impl SortStats {
    /// Number of sub-problems submitted to the worker pool.
    pub fn dispatched_tasks(&self) -> usize {
        self.dispatched_tasks
    }

    /// Deepest tree depth of a call that submitted its sub-problems, zero when nothing was
    /// submitted.
    pub fn deepest_dispatch(&self) -> usize {
        self.deepest_dispatch
    }

    /// Largest number of key ranges that were being mutated at the same time.
    pub fn peak_active_claims(&self) -> usize {
        self.peak_active_claims
    }
}

/// State shared by all tasks of one parallel sort.
pub(crate) struct SortContext<K> {
    keys: SharedKeys<K>,
    max_key_length: usize,
    fan_out_depth: usize,
    pool: Arc<ThreadPool>,
    countdown: Arc<CountdownEvent>,
    dispatched_tasks: AtomicUsize,
    deepest_dispatch: AtomicUsize,
    error: Mutex<Option<anyhow::Error>>,
}

impl<K: AsRef<[u8]> + Send + 'static> SortContext<K> {
    /// Partitions the task's range and issues the three zones. Past the fan-out depth the whole
    /// sub-tree runs inline.
    pub(crate) fn perform_sort(self: &Arc<Self>, task: &SortTask) -> Result<(), anyhow::Error> {
        if is_terminal(task.range().len(), task.depth(), self.max_key_length) {
            return Ok(());
        }

        let mut claim = self.keys.claim(task.range().clone())?;
        if task.tree_depth() > self.fan_out_depth {
            sort_range(claim.as_mut_slice(), task.depth(), self.max_key_length);
            return Ok(());
        }

        let keys = claim.as_mut_slice();
        let pivot = pivot(keys, task.depth());
        let (min_equal, max_equal) = partition(keys, task.depth(), pivot);
        let [less, equal, greater] = zone_bounds(min_equal, max_equal, keys.len());
        // the zones are handed over, this task no longer touches its range
        drop(claim);

        self.deepest_dispatch.fetch_max(task.tree_depth(), Ordering::Relaxed);
        self.dispatch(task.child(less, task.depth()));
        self.dispatch(task.child(equal, task.depth() + 1));
        self.dispatch(task.child(greater, task.depth()));
        Ok(())
    }

    fn dispatch(self: &Arc<Self>, task: SortTask) {
        if is_terminal(task.range().len(), task.depth(), self.max_key_length) {
            return;
        }

        log::debug!(
            "Dispatch range {:?}, depth: {}, tree depth: {}, thread: {}",
            task.range(),
            task.depth(),
            task.tree_depth(),
            thread::current().name().unwrap_or("unnamed")
        );
        self.dispatched_tasks.fetch_add(1, Ordering::Relaxed);
        // counted before the task becomes visible to the workers
        let pending = Pending::register(&self.countdown);
        let sort_command = Box::new(SortCommand::new(task, self.clone(), pending));
        self.pool.submit(sort_command);
    }

    pub(crate) fn record_error(&self, error: anyhow::Error) {
        log::error!("Parallel sort task failed: {:#}", error);
        let mut slot = self.error.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    fn take_error(&self) -> Option<anyhow::Error> {
        self.error.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take()
    }

    fn stats(&self) -> SortStats {
        SortStats {
            dispatched_tasks: self.dispatched_tasks.load(Ordering::Relaxed),
            deepest_dispatch: self.deepest_dispatch.load(Ordering::Relaxed),
            peak_active_claims: self.keys.peak_claims(),
        }
    }
}

/// A parallel MSD radix sorter owning its worker pool.
///
/// The pool is created once and reused by every call to [ParallelSorter::sort]. Call
/// [ParallelSorter::shutdown] when done to stop the worker threads and see shutdown errors.
/// A sorter that is dropped stops its worker threads as well.
///
/// # Examples
/// ```
/// use radix_name_sort::sort::RadixSort;
///
/// fn sort_twice(first: &mut Vec<String>, second: &mut Vec<String>) -> Result<(), anyhow::Error> {
///     let mut radix_sort = RadixSort::new();
///     radix_sort.with_tasks(4);
///     let mut sorter = radix_sort.parallel_sorter()?;
///     sorter.sort(first)?;
///     sorter.sort(second)?;
///     sorter.shutdown()
/// }
/// ```
pub struct ParallelSorter {
    config: Config,
    // taken on shutdown
    pool: Option<Arc<ThreadPool>>,
}

impl ParallelSorter {
    pub(crate) fn new(config: Config) -> Result<ParallelSorter, anyhow::Error> {
        log::info!(
            "Start sorting pool, tasks: {}, queue size: {}, fan-out depth: {}",
            config.tasks(),
            config.queue_size(),
            config.fan_out_depth()
        );
        let mut thread_pool_builder = ThreadPoolBuilder::new();
        let sorting_pool = thread_pool_builder
            .with_name("radix-sort".to_string())
            .with_tasks(config.tasks())
            .with_queue_size(config.queue_size())
            .with_shutdown_mode(ShutdownMode::CompletePending)
            .build()
            .with_context(|| anyhow!("Failed to build sorting pool, tasks: {}", config.tasks()))?;

        Ok(
            ParallelSorter {
                config,
                pool: Some(Arc::new(sorting_pool)),
            }
        )
    }

    /// Sort `keys` in place, blocking until every submitted sub-problem has finished.
    ///
    /// All keys must have the same length. Keys are compared on their first `max_key_length`
    /// bytes when one is configured, on their whole length otherwise.
    pub fn sort<K: AsRef<[u8]> + Send + 'static>(&mut self, keys: &mut [K]) -> Result<SortStats, anyhow::Error> {
        self.sort_with(keys, self.config.max_key_length(), self.config.fan_out_depth())
    }

    /// True when the pool queue can hold every task a sort at `fan_out_depth` may issue.
    pub(crate) fn accepts_fan_out_depth(&self, fan_out_depth: usize) -> bool {
        check_fan_out_depth(fan_out_depth, self.config.queue_size()).is_ok()
    }

    /// Sort with settings given per call instead of the configured ones.
    pub(crate) fn sort_with<K: AsRef<[u8]> + Send + 'static>(
        &mut self,
        keys: &mut [K],
        max_key_length: Option<usize>,
        fan_out_depth: usize,
    ) -> Result<SortStats, anyhow::Error> {
        check_fan_out_depth(fan_out_depth, self.config.queue_size())?;
        let pool = self.pool
            .clone()
            .ok_or_else(|| anyhow!("Sorting pool is shut down"))?;
        if keys.is_empty() {
            return Ok(SortStats::default());
        }
        let max_key_length = validate_keys(keys, max_key_length)?;
        log::info!(
            "Start parallel sort, keys: {}, max key length: {}, fan-out depth: {}",
            keys.len(),
            max_key_length,
            fan_out_depth
        );

        let countdown = Arc::new(CountdownEvent::new(1));
        let context = Arc::new(
            SortContext {
                // the completion barrier below outlives every task holding the view
                keys: unsafe { SharedKeys::new(keys) },
                max_key_length,
                fan_out_depth,
                pool,
                countdown: countdown.clone(),
                dispatched_tasks: AtomicUsize::new(0),
                deepest_dispatch: AtomicUsize::new(0),
                error: Mutex::new(None),
            }
        );

        {
            let _root = RootCompletion::new(&countdown);
            if let Err(e) = context.perform_sort(&SortTask::root(context.keys.len())) {
                context.record_error(e);
            }
        }
        debug_assert_eq!(countdown.current_count(), 0);

        let stats = context.stats();
        if let Some(e) = context.take_error() {
            return Err(e.context("Parallel sort failed"));
        }
        log::info!(
            "Finish parallel sort, dispatched tasks: {}, deepest dispatch: {}",
            stats.dispatched_tasks(),
            stats.deepest_dispatch()
        );
        Ok(stats)
    }

    /// Stop accepting work, complete pending work and join the worker threads.
    pub fn shutdown(mut self) -> Result<(), anyhow::Error> {
        match self.pool.take() {
            None => Ok(()),
            Some(pool) => stop_pool(pool),
        }
    }
}

impl Drop for ParallelSorter {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            if let Err(e) = stop_pool(pool) {
                log::error!("Failed to shut down dropped sorting pool: {:#}", e);
            }
        }
    }
}

fn stop_pool(pool: Arc<ThreadPool>) -> Result<(), anyhow::Error> {
    log::info!("Shutting down sorting pool");
    let mut sorting_pool = Arc::try_unwrap(pool)
        .map_err(|_| anyhow!("Sorting pool is still referenced by a running sort"))?;
    sorting_pool.shutdown();
    sorting_pool.join()?;
    Ok(())
}
