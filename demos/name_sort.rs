use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Error};
use radix_name_sort::baseline::sort_by_surname;
use radix_name_sort::names;
use radix_name_sort::names::NameFile;
use radix_name_sort::sort::{RadixSort, DEFAULT_FAN_OUT_DEPTH};
use simple_logger::SimpleLogger;

fn output_path(sorter: &str, input_path: &Path) -> Result<PathBuf, Error> {
    let dir = PathBuf::from("./target/name-sort").join(sorter);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| anyhow!("{}", dir.to_string_lossy()))?;
    }
    let file_name = input_path
        .file_name()
        .ok_or_else(|| anyhow!("Not a file: {}", input_path.to_string_lossy()))?;
    Ok(dir.join(file_name))
}

fn prepare(people: &mut [String]) -> usize {
    names::swap_name_fields(people);
    let longest = names::longest(people);
    names::pad_to_length(people, longest);
    longest
}

fn restore(people: &mut [String]) {
    names::trim_padding(people);
    names::swap_name_fields(people);
}

fn run_baseline(people: &[String], input_path: &Path) -> Result<(), Error> {
    let stop_watch = Instant::now();
    let sorted = sort_by_surname(people);
    log::info!("Baseline comparison sort, elapsed: {:?}", stop_watch.elapsed());

    let path = output_path("baseline", input_path)?;
    names::write_names(&path, &sorted, path.parent().unwrap_or(Path::new(".")))
}

fn run_sequential(people: &[String], input_path: &Path) -> Result<(), Error> {
    let mut keys = people.to_vec();
    prepare(&mut keys);

    let stop_watch = Instant::now();
    RadixSort::new().sort_sequential(&mut keys)?;
    log::info!("Sequential radix sort, elapsed: {:?}", stop_watch.elapsed());

    restore(&mut keys);
    let path = output_path("sequential", input_path)?;
    names::write_names(&path, &keys, path.parent().unwrap_or(Path::new(".")))
}

fn run_parallel(people: &[String], input_path: &Path) -> Result<(), Error> {
    let mut keys = people.to_vec();
    let longest = prepare(&mut keys);

    let mut radix_sort = RadixSort::new();
    radix_sort.with_max_key_length(longest);
    radix_sort.with_fan_out_depth(DEFAULT_FAN_OUT_DEPTH);
    let mut sorter = radix_sort.parallel_sorter()?;

    // the first sort pays for warming up the pool
    for round in 1..=2 {
        let mut round_keys = keys.clone();
        let stop_watch = Instant::now();
        let stats = sorter.sort(&mut round_keys)?;
        log::info!(
            "Parallel radix sort round {}, elapsed: {:?}, dispatched tasks: {}",
            round,
            stop_watch.elapsed(),
            stats.dispatched_tasks()
        );
        if round == 2 {
            keys = round_keys;
        }
    }
    sorter.shutdown()?;

    restore(&mut keys);
    let path = output_path("parallel", input_path)?;
    names::write_names(&path, &keys, path.parent().unwrap_or(Path::new(".")))
}

// cargo run -r --example name_sort -- ./tests/fixtures/names.txt
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().init().unwrap();

    let mut input_paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if input_paths.is_empty() {
        input_paths.push(PathBuf::from("./tests/fixtures/names.txt"));
    }

    for input_path in &input_paths {
        let people = NameFile::new(input_path.clone()).read()?;
        log::info!("Running sorting for {}: {} names", input_path.to_string_lossy(), people.len());
        run_baseline(&people, input_path)?;
        run_sequential(&people, input_path)?;
        run_parallel(&people, input_path)?;
    }

    Ok(())
}
