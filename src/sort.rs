use std::sync::Mutex;

use anyhow::anyhow;

use crate::config::Config;
use crate::parallel::{ParallelSorter, SortStats};
use crate::sequential::sort_range;

/// Fan-out depth used unless configured otherwise.
pub const DEFAULT_FAN_OUT_DEPTH: usize = 8;

/// Sort a slice of equal length keys on the current thread.
///
/// Keys are compared byte by byte over their whole length.
///
/// # Examples
/// ```
/// use radix_name_sort::sort::sort_sequential;
///
/// let mut names = vec!["bob", "ann", "amy"];
/// sort_sequential(&mut names).unwrap();
/// assert_eq!(names, vec!["amy", "ann", "bob"]);
/// ```
pub fn sort_sequential<K: AsRef<[u8]>>(keys: &mut [K]) -> Result<(), anyhow::Error> {
    RadixSort::new().sort_sequential(keys)
}

/// Sort a slice of equal length keys with the process wide worker pool.
///
/// Keys are compared on their first `max_key_length` bytes. Calls up to `fan_out_depth_limit`
/// levels below the top level call hand their sub-problems to the pool, deeper calls run inline.
/// The pool uses all system cores. It is created by the first call and kept for later calls, and
/// replaced by a larger one when a call asks for a deeper fan-out than its queue can hold.
/// Concurrent calls take turns on the pool. Use [RadixSort::parallel_sorter] for a pool owned by
/// the caller.
///
/// # Examples
/// ```
/// use radix_name_sort::sort::sort_parallel;
///
/// let mut names = vec!["aa".to_string(), "ab".to_string(), "aa".to_string()];
/// sort_parallel(&mut names, 2, 8).unwrap();
/// assert_eq!(names, vec!["aa", "aa", "ab"]);
/// ```
pub fn sort_parallel<K: AsRef<[u8]> + Send + 'static>(
    keys: &mut [K],
    max_key_length: usize,
    fan_out_depth_limit: usize,
) -> Result<SortStats, anyhow::Error> {
    let mut shared = SHARED_SORTER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let reusable = matches!(shared.as_ref(), Some(sorter) if sorter.accepts_fan_out_depth(fan_out_depth_limit));
    if !reusable {
        let mut radix_sort = RadixSort::new();
        radix_sort.with_fan_out_depth(fan_out_depth_limit.max(DEFAULT_FAN_OUT_DEPTH));
        let sorter = radix_sort.parallel_sorter()?;
        if let Some(previous) = shared.replace(sorter) {
            if let Err(e) = previous.shutdown() {
                log::warn!("Failed to shut down replaced sorting pool: {:#}", e);
            }
        }
    }

    match shared.as_mut() {
        Some(sorter) => {
            sorter.sort_with(keys, Some(max_key_length), fan_out_depth_limit)
        }
        None => {
            Err(anyhow!("Shared sorting pool is not available"))
        }
    }
}

static SHARED_SORTER: Mutex<Option<ParallelSorter>> = Mutex::new(None);

/// Definition of a three way MSD radix sort over fixed length keys.
///
/// # Examples
/// ```
/// use radix_name_sort::sort::RadixSort;
///
/// fn sort_names(names: &mut Vec<String>) -> Result<(), anyhow::Error> {
///     let mut radix_sort = RadixSort::new();
///     // number of worker threads, the default is to use all available cores
///     radix_sort.with_tasks(2);
///     // calls at most this many levels below the top level call are submitted to the pool
///     radix_sort.with_fan_out_depth(6);
///     radix_sort.sort_parallel(names)?;
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RadixSort {
    tasks: usize,
    fan_out_depth: usize,
    queue_size: Option<usize>,
    max_key_length: Option<usize>,
}

impl RadixSort {
    /// Create a default RadixSort definition.
    ///
    /// * all system cores are used by the parallel sort
    /// * the fan-out depth is [DEFAULT_FAN_OUT_DEPTH]
    /// * the pool queue holds every task a sort may issue
    /// * keys are compared over their whole length
    pub fn new() -> RadixSort {
        RadixSort {
            tasks: 0,
            fan_out_depth: DEFAULT_FAN_OUT_DEPTH,
            queue_size: None,
            max_key_length: None,
        }
    }

    /// Set the number of worker threads. The default is zero which will result in using all
    /// system cores
    pub fn with_tasks(&mut self, tasks: usize) {
        self.tasks = tasks;
    }

    /// Set the fan-out depth. Zero runs the parallel sort on the calling thread.
    pub fn with_fan_out_depth(&mut self, fan_out_depth: usize) {
        self.fan_out_depth = fan_out_depth;
    }

    /// Set the pool queue size. It must hold every task one sort may issue at the configured
    /// fan-out depth, otherwise creating the pool fails.
    pub fn with_queue_size(&mut self, queue_size: usize) {
        self.queue_size = Some(queue_size);
    }

    /// Compare keys on their first `max_key_length` bytes only.
    pub fn with_max_key_length(&mut self, max_key_length: usize) {
        self.max_key_length = Some(max_key_length);
    }

    /// Sort `keys` in place on the current thread.
    ///
    /// Only the max key length applies, the pool settings are not used.
    pub fn sort_sequential<K: AsRef<[u8]>>(&self, keys: &mut [K]) -> Result<(), anyhow::Error> {
        if self.max_key_length == Some(0) {
            return Err(anyhow!("Max key length must be positive"));
        }
        if keys.is_empty() {
            return Ok(());
        }
        let max_key_length = validate_keys(keys, self.max_key_length)?;
        log::debug!("Start sequential sort, keys: {}, max key length: {}", keys.len(), max_key_length);
        sort_range(keys, 0, max_key_length);
        log::debug!("Finish sequential sort");
        Ok(())
    }

    /// Sort `keys` in place with a worker pool created for this call.
    pub fn sort_parallel<K: AsRef<[u8]> + Send + 'static>(&self, keys: &mut [K]) -> Result<SortStats, anyhow::Error> {
        let mut sorter = self.parallel_sorter()?;
        let stats = match sorter.sort(keys) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(shutdown_error) = sorter.shutdown() {
                    log::error!("Failed to shut down sorting pool: {:#}", shutdown_error);
                }
                return Err(e);
            }
        };
        sorter.shutdown()?;
        Ok(stats)
    }

    /// Create a parallel sorter whose pool can be reused across sorts.
    pub fn parallel_sorter(&self) -> Result<ParallelSorter, anyhow::Error> {
        ParallelSorter::new(self.create_config()?)
    }

    fn create_config(&self) -> Result<Config, anyhow::Error> {
        let mut tasks = self.tasks;
        if self.tasks == 0 {
            tasks = num_cpus::get();
        }

        Config::new(
            tasks,
            self.fan_out_depth,
            self.queue_size,
            self.max_key_length,
        )
    }
}

impl Default for RadixSort {
    fn default() -> Self {
        RadixSort::new()
    }
}

/// Checks that all keys have the same length and that the compared prefix fits in it.
///
/// Returns the number of leading bytes to compare. `keys` must not be empty.
pub(crate) fn validate_keys<K: AsRef<[u8]>>(keys: &[K], max_key_length: Option<usize>) -> Result<usize, anyhow::Error> {
    let key_length = keys[0].as_ref().len();
    if let Some((index, key)) = keys.iter().enumerate().find(|(_, key)| key.as_ref().len() != key_length) {
        return Err(
            anyhow!(
                "Key at index {} has length {} but the first key has length {}, pad all keys to the same length",
                index,
                key.as_ref().len(),
                key_length,
            )
        );
    }

    let max_key_length = max_key_length.unwrap_or(key_length);
    if max_key_length == 0 {
        return Err(anyhow!("Max key length must be positive"));
    }

    if max_key_length > key_length {
        return Err(
            anyhow!(
                "Max key length {} exceeds the key length {}",
                max_key_length,
                key_length,
            )
        );
    }
    Ok(max_key_length)
}

#[cfg(test)]
mod tests {
    use crate::sort::{sort_parallel, sort_sequential, validate_keys, RadixSort};

    #[test]
    fn test_validate_uniform_keys() -> Result<(), anyhow::Error> {
        assert_eq!(validate_keys(&["abc", "def"], None)?, 3);
        assert_eq!(validate_keys(&["abc", "def"], Some(2))?, 2);
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let error = validate_keys(&["abc", "de", "fgh"], None).unwrap_err();
        assert!(error.to_string().contains("index 1"));
        assert!(validate_keys(&["", ""], None).is_err());
        assert!(validate_keys(&["abc"], Some(4)).is_err());
    }

    #[test]
    fn test_sequential_boundaries() -> Result<(), anyhow::Error> {
        let mut empty: Vec<&str> = vec![];
        sort_sequential(&mut empty)?;
        assert!(empty.is_empty());

        let mut single = vec!["solo"];
        sort_sequential(&mut single)?;
        assert_eq!(single, vec!["solo"]);

        let mut same = vec!["eve", "eve", "eve"];
        sort_sequential(&mut same)?;
        assert_eq!(same, vec!["eve", "eve", "eve"]);
        Ok(())
    }

    #[test]
    fn test_sequential_with_max_key_length() -> Result<(), anyhow::Error> {
        let mut radix_sort = RadixSort::new();
        radix_sort.with_max_key_length(1);
        let mut names = vec!["bz", "ay"];
        radix_sort.sort_sequential(&mut names)?;
        assert_eq!(names, vec!["ay", "bz"]);

        radix_sort.with_max_key_length(3);
        assert!(radix_sort.sort_sequential(&mut names).is_err());
        Ok(())
    }

    #[test]
    fn test_sequential_ignores_pool_settings() -> Result<(), anyhow::Error> {
        let mut radix_sort = RadixSort::new();
        radix_sort.with_queue_size(1);
        let mut names = vec!["bob", "amy"];
        radix_sort.sort_sequential(&mut names)?;
        assert_eq!(names, vec!["amy", "bob"]);

        radix_sort.with_fan_out_depth(13);
        let mut names = vec!["cat", "bat", "ant"];
        radix_sort.sort_sequential(&mut names)?;
        assert_eq!(names, vec!["ant", "bat", "cat"]);

        assert!(radix_sort.parallel_sorter().is_err());
        Ok(())
    }

    #[test]
    fn test_parallel_returns_sort_error() {
        let mut radix_sort = RadixSort::new();
        radix_sort.with_tasks(2);
        let mut names = vec!["bob".to_string(), "al".to_string()];
        let error = radix_sort.sort_parallel(&mut names).unwrap_err();
        assert!(error.to_string().contains("index 1"));
    }

    #[test]
    fn test_shared_pool_is_reused_and_grown() -> Result<(), anyhow::Error> {
        let mut first = vec!["bob".to_string(), "ann".to_string(), "amy".to_string()];
        sort_parallel(&mut first, 3, 8)?;
        assert_eq!(first, vec!["amy", "ann", "bob"]);

        let mut deeper: Vec<String> = (0..300u32).rev().map(|i| format!("{:04}", i)).collect();
        let stats = sort_parallel(&mut deeper, 4, 10)?;
        assert!(deeper.windows(2).all(|w| w[0] <= w[1]));
        assert!(stats.deepest_dispatch() <= 10);

        let mut again = vec!["dd".to_string(), "cc".to_string()];
        sort_parallel(&mut again, 2, 2)?;
        assert_eq!(again, vec!["cc", "dd"]);

        assert!(sort_parallel(&mut again, 2, 13).is_err());
        assert_eq!(again, vec!["cc", "dd"]);
        Ok(())
    }
}
