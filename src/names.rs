//! Preparation of name lists for the radix sorts: reading, reordering fields, padding and
//! writing results.
//!
//! The radix sorts need keys of one length in the order they are to be compared. A list of
//! `"first last"` names sorted by surname is prepared by swapping the fields and padding every
//! name to the longest one, then restored after sorting.
//!
//! # Examples
//! ```
//! use radix_name_sort::names;
//! use radix_name_sort::sort::sort_sequential;
//!
//! let mut people = vec!["Mary Smith".to_string(), "Al Jones".to_string()];
//! names::swap_name_fields(&mut people);
//! let longest = names::longest(&people);
//! names::pad_to_length(&mut people, longest);
//! sort_sequential(&mut people).unwrap();
//! names::trim_padding(&mut people);
//! names::swap_name_fields(&mut people);
//! assert_eq!(people, vec!["Al Jones", "Mary Smith"]);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use regex::Regex;
use tempfile::Builder;

/// A text file with one name per line.
pub struct NameFile {
    path: PathBuf,
    ignore_empty: bool,
    ignore_lines: Option<Regex>,
}

impl NameFile {
    /// Create a NameFile definition for `path`.
    ///
    /// * empty lines are read as empty names
    /// * lines starting with '#' are ignored
    pub fn new(path: PathBuf) -> NameFile {
        NameFile {
            path,
            ignore_empty: false,
            ignore_lines: Regex::new("^#").ok(),
        }
    }

    /// Skip empty lines.
    pub fn with_ignore_empty(&mut self) {
        self.ignore_empty = true;
    }

    /// Skip every line matching `r`.
    pub fn with_ignore_lines(&mut self, r: Regex) {
        self.ignore_lines = Some(r)
    }

    /// Read all names, trailing whitespace removed.
    pub fn read(&self) -> Result<Vec<String>, anyhow::Error> {
        let file = File::open(&self.path)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        let mut reader = BufReader::new(file);
        let mut names = Vec::new();
        let mut line = String::new();
        while reader.read_line(&mut line).with_context(|| anyhow!("path: {}", self.path.display()))? != 0 {
            let name = line.trim_end();
            if self.ignore_empty && name.trim().is_empty() {
                line.clear();
                continue;
            }

            if let Some(r) = &self.ignore_lines {
                if r.is_match(name.trim()) {
                    line.clear();
                    continue;
                }
            }
            names.push(name.to_string());
            line.clear();
        }
        log::info!("Read {} names from {}", names.len(), self.path.display());
        Ok(names)
    }
}

/// Swap `"first last"` into `"last first"` so names compare by surname.
///
/// Nothing happens unless the first name has two fields. Applying it again restores the original
/// order. Names with a single field are kept as they are.
pub fn swap_name_fields(names: &mut [String]) {
    let has_two_fields = names
        .first()
        .map(|name| name.split_whitespace().count() > 1)
        .unwrap_or(false);
    if !has_two_fields {
        return;
    }

    for name in names.iter_mut() {
        let fields: Vec<&str> = name.split_whitespace().collect();
        if fields.len() == 2 {
            *name = format!("{} {}", fields[1], fields[0]);
        }
    }
}

/// Length in bytes of the longest name.
pub fn longest(names: &[String]) -> usize {
    names.iter().map(|name| name.len()).max().unwrap_or(0)
}

/// Right pad every name with spaces to `length` bytes. Longer names are left alone.
pub fn pad_to_length(names: &mut [String], length: usize) {
    for name in names.iter_mut() {
        while name.len() < length {
            name.push(' ');
        }
    }
}

/// Remove the padding added by [pad_to_length].
pub fn trim_padding(names: &mut [String]) {
    for name in names.iter_mut() {
        let trimmed = name.trim_end().len();
        name.truncate(trimmed);
    }
}

/// Write one name per line to `path`.
///
/// The names are written to a temporary file in `tmp` first and moved to `path` when complete,
/// `tmp` should be on the same file system as `path`.
pub fn write_names(path: &Path, names: &[String], tmp: &Path) -> Result<(), anyhow::Error> {
    let tmp_file = Builder::new()
        .prefix("names-")
        .suffix(".sorting")
        .tempfile_in(tmp)
        .with_context(|| anyhow!("Failed to create new temp file in {}", tmp.display()))?;

    {
        let mut writer = BufWriter::new(tmp_file.as_file());
        for name in names {
            writeln!(writer, "{}", name)?;
        }
        writer.flush()?;
    }

    tmp_file.persist(path)
        .with_context(|| anyhow!("Persist names to {}", path.display()))?;
    log::info!("Wrote {} names to {}", names.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::names::{longest, pad_to_length, swap_name_fields, trim_padding};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_swap_name_fields() {
        let mut people = names(&["Ann Lee", "Bob Stone", "Cher"]);
        swap_name_fields(&mut people);
        assert_eq!(people, names(&["Lee Ann", "Stone Bob", "Cher"]));
        swap_name_fields(&mut people);
        assert_eq!(people, names(&["Ann Lee", "Bob Stone", "Cher"]));
    }

    #[test]
    fn test_swap_skipped_for_single_field_lists() {
        let mut people = names(&["Cher", "Ann Lee"]);
        swap_name_fields(&mut people);
        assert_eq!(people, names(&["Cher", "Ann Lee"]));
    }

    #[test]
    fn test_pad_and_trim() {
        let mut people = names(&["Al", "Maria", "Bo"]);
        let length = longest(&people);
        assert_eq!(length, 5);
        pad_to_length(&mut people, length);
        assert!(people.iter().all(|name| name.len() == 5));
        assert_eq!(people[0], "Al   ");
        trim_padding(&mut people);
        assert_eq!(people, names(&["Al", "Maria", "Bo"]));
    }

    #[test]
    fn test_longest_of_nothing() {
        assert_eq!(longest(&[]), 0);
    }
}
