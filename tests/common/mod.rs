use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::io::{BufRead, BufReader};
use std::fs::File;
use data_encoding::HEXLOWER;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simple_logger::SimpleLogger;

pub fn setup() {
    // only the first test to get here installs the logger
    let _ = SimpleLogger::new().with_level(log::LevelFilter::Warn).init();

    let results_dir_path = PathBuf::from_str("./target/results/").unwrap();
    if !results_dir_path.exists() {
        fs::create_dir_all(&results_dir_path).unwrap_or_else(|_|
            panic!("Failed to create results directory: {:?}", results_dir_path)
        );
    } else {
        println!("Results directory exists at {:?}", results_dir_path);
    }
}

#[allow(dead_code)]
pub fn read_lines(path: PathBuf) -> Result<Vec<String>, anyhow::Error> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().map(|x| x.unwrap()).collect();
    Ok(lines)
}

#[allow(dead_code)]
pub fn temp_file_name(dir: &str) -> PathBuf {
    let mut result = PathBuf::from(dir);
    let name = HEXLOWER.encode(&rand::random::<[u8; 16]>());
    result.push(name);
    result
}

/// `count` keys of `length` lowercase letters drawn from the first `alphabet` letters.
#[allow(dead_code)]
pub fn random_keys(count: usize, length: usize, alphabet: u8, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (0..length)
                .map(|_| rng.gen_range(b'a'..b'a' + alphabet) as char)
                .collect()
        })
        .collect()
}

#[allow(dead_code)]
pub fn is_sorted(keys: &[String]) -> bool {
    keys.windows(2).all(|w| w[0] <= w[1])
}
