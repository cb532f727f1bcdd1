//! This crate implements a three way MSD radix sort (radix quicksort) for large collections of
//! fixed length strings such as person names, in a sequential and a parallel flavour sharing the
//! same partitioning.
//!
//! Keys are partitioned into less than, equal to and greater than zones on one byte position at a
//! time. Only the equal zone moves on to the next position. The parallel sort hands the
//! sub-problems of the top levels of this recursion to a worker pool and runs deeper levels
//! inline, then blocks until every submitted sub-problem has completed.
//!
//! All keys of one sort must have the same length. The [names] module prepares name lists for
//! that, and [baseline] provides a comparison sort to measure against.
//!
//! # Examples
//! ```
//! use radix_name_sort::sort::RadixSort;
//!
//! fn sort_names(names: &mut Vec<String>) -> Result<(), anyhow::Error> {
//!     let mut radix_sort = RadixSort::new();
//!
//!     // set number of worker threads. The default is to use all available cores.
//!     radix_sort.with_tasks(2);
//!
//!     // sub-problems up to this many levels below the top level call are submitted to the
//!     // pool, deeper ones are sorted by the thread that reached them.
//!     radix_sort.with_fan_out_depth(8);
//!
//!     let stats = radix_sort.sort_parallel(names)?;
//!     log::info!("dispatched {} tasks", stats.dispatched_tasks());
//!     Ok(())
//! }
//! ```
//!

pub(crate) mod config;
pub(crate) mod countdown;
pub(crate) mod partition;
pub(crate) mod sequential;
pub(crate) mod shared_keys;
pub(crate) mod sort_command;

pub mod sort;
pub mod parallel;
pub mod names;
pub mod baseline;
