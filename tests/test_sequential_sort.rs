use radix_name_sort::sort::{sort_sequential, RadixSort};

mod common;

#[test]
fn test_sequential_sort_names() -> Result<(), anyhow::Error> {
    common::setup();
    let mut names = vec!["bob".to_string(), "ann".to_string(), "amy".to_string()];
    sort_sequential(&mut names)?;
    assert_eq!(names, vec!["amy", "ann", "bob"]);
    Ok(())
}

#[test]
fn test_sequential_sort_duplicates() -> Result<(), anyhow::Error> {
    common::setup();
    let mut names = vec!["aa".to_string(), "ab".to_string(), "aa".to_string()];
    sort_sequential(&mut names)?;
    assert_eq!(names, vec!["aa", "aa", "ab"]);
    Ok(())
}

#[test]
fn test_sequential_sort_random() -> Result<(), anyhow::Error> {
    common::setup();
    let mut keys = common::random_keys(10_000, 12, 26, 7);
    let mut expected = keys.clone();
    expected.sort();
    sort_sequential(&mut keys)?;
    assert_eq!(keys, expected);
    Ok(())
}

#[test]
fn test_sequential_sort_is_idempotent() -> Result<(), anyhow::Error> {
    common::setup();
    let mut keys = common::random_keys(2_000, 6, 4, 11);
    sort_sequential(&mut keys)?;
    let sorted = keys.clone();
    sort_sequential(&mut keys)?;
    assert_eq!(keys, sorted);
    Ok(())
}

#[test]
fn test_sequential_sort_all_equal() -> Result<(), anyhow::Error> {
    common::setup();
    let mut keys = vec!["same-key".to_string(); 5_000];
    sort_sequential(&mut keys)?;
    assert!(keys.iter().all(|key| key == "same-key"));
    Ok(())
}

#[test]
fn test_sequential_sort_prefix() -> Result<(), anyhow::Error> {
    common::setup();
    let mut keys = common::random_keys(1_000, 8, 26, 3);
    let mut radix_sort = RadixSort::new();
    radix_sort.with_max_key_length(2);
    radix_sort.sort_sequential(&mut keys)?;
    assert!(keys.windows(2).all(|w| w[0][..2] <= w[1][..2]));
    Ok(())
}

#[test]
fn test_sequential_sort_rejects_ragged_keys() -> Result<(), anyhow::Error> {
    common::setup();
    let mut keys = vec!["abc".to_string(), "abcd".to_string()];
    let result = sort_sequential(&mut keys);
    assert!(result.is_err());
    assert_eq!(keys, vec!["abc", "abcd"]);
    Ok(())
}
