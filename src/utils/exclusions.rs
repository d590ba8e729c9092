//! Exclusion and error list reading.
//!
//! Exclusion lists are the per-status file lists a previous run wrote
//! (`processed_files.log` and friends). Feeding them back skips files that
//! were already handled; error lists also seed rebuilt reports.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read file names from an exclusion list.
///
/// # File Format
/// - One file name per line
/// - Anything after the first tab is ignored (error lists carry the message there)
/// - Blank lines and lines starting with `#` are ignored
///
/// # Errors
/// Returns `Error::ExclusionListRead` if the file cannot be read.
pub fn read_exclusion_list(path: &Path) -> Result<HashSet<String>> {
    Ok(read_entries(path)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

/// Read an `error_files.log` into file name and error message pairs.
///
/// A name listed twice keeps its first message.
pub fn read_error_list(path: &Path) -> Result<HashMap<String, String>> {
    let mut errors = HashMap::new();
    for (name, message) in read_entries(path)? {
        errors.entry(name).or_insert(message);
    }
    Ok(errors)
}

/// Read and merge several error lists.
pub fn read_error_lists(paths: &[impl AsRef<Path>]) -> Result<HashMap<String, String>> {
    let mut errors = HashMap::new();
    for path in paths {
        for (name, message) in read_error_list(path.as_ref())? {
            errors.entry(name).or_insert(message);
        }
    }
    Ok(errors)
}

fn read_entries(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path).map_err(|e| Error::ExclusionListRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::ExclusionListRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (name, message) = line.split_once('\t').unwrap_or((line.as_str(), ""));
        let name = name.trim();
        if !name.is_empty() && !name.starts_with('#') {
            entries.push((name.to_string(), message.trim().to_string()));
        }
    }

    Ok(entries)
}

/// Read and union several exclusion lists.
pub fn read_exclusion_lists(paths: &[impl AsRef<Path>]) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for path in paths {
        names.extend(read_exclusion_list(path.as_ref())?);
    }
    Ok(names)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_exclusion_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a.wav").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# header").unwrap();
        writeln!(file, "b.wav\tfailed to decode audio").unwrap();

        let names = read_exclusion_list(file.path()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.wav"));
        assert!(names.contains("b.wav"));
    }

    #[test]
    fn test_read_exclusion_lists_union() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "a.wav").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "a.wav\nc.wav").unwrap();

        let names = read_exclusion_lists(&[first.path(), second.path()]).unwrap();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_read_error_list_keeps_messages() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "spk1/a.wav\tfailed to open audio file").unwrap();
        writeln!(first, "b.wav").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "spk1/a.wav\tlater message").unwrap();

        let errors = read_error_lists(&[first.path(), second.path()]).unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["spk1/a.wav"], "failed to open audio file");
        assert_eq!(errors["b.wav"], "");
    }

    #[test]
    fn test_missing_list_fails() {
        let err = read_exclusion_list(Path::new("nonexistent.log")).unwrap_err();
        assert!(matches!(err, Error::ExclusionListRead { .. }));
    }
}
