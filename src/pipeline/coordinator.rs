//! Input discovery for a corpus run.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// An audio file of the corpus and the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InputFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Path relative to the input directory it was found in, `/`-separated
    /// (`spk1/a.wav`). A file passed directly is named by its file name.
    pub name: String,
}

impl InputFile {
    /// Input named by its file name alone.
    pub fn from_path(path: &Path) -> Self {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        Self {
            path: path.to_path_buf(),
            name,
        }
    }

    /// Input found under `root`, named by its path relative to it.
    pub fn under_root(root: &Path, path: &Path) -> Self {
        let Ok(relative) = path.strip_prefix(root) else {
            return Self::from_path(path);
        };
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return Self::from_path(path);
        }
        Self {
            path: path.to_path_buf(),
            name: parts.join("/"),
        }
    }

    /// Name without the extension; prefixes every segment id of the file.
    pub fn file_id(&self) -> String {
        let (dir, base) = self
            .name
            .rsplit_once('/')
            .unwrap_or(("", self.name.as_str()));
        let stem = Path::new(base)
            .file_stem()
            .map_or_else(|| base.to_string(), |s| s.to_string_lossy().into_owned());
        if dir.is_empty() {
            stem
        } else {
            format!("{dir}/{stem}")
        }
    }
}

/// Collect input files from paths (files and directories).
///
/// Directories are walked recursively. Only files whose extension matches
/// one of `extensions` (case-insensitive) are kept. The result is sorted so
/// runs over the same corpus visit files in the same order.
///
/// # Errors
///
/// Returns `Error::DuplicateInput` when two files would share a file id,
/// e.g. `a.wav` and `a.flac` in one directory, or `x.wav` in two input
/// directories.
pub fn collect_input_files(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if has_extension(path, extensions) {
                files.push(InputFile::from_path(path));
            } else {
                debug!("Ignoring non-audio file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_audio_files_recursive(path, extensions, &mut found)?;
            files.extend(found.iter().map(|f| InputFile::under_root(path, f)));
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    check_unique_ids(&files)?;
    Ok(files)
}

fn check_unique_ids(files: &[InputFile]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(files.len());
    for file in files {
        let id = file.file_id();
        if let Some(first) = seen.insert(id.clone(), &file.path) {
            return Err(Error::DuplicateInput {
                name: id,
                first: first.to_path_buf(),
                second: file.path.clone(),
            });
        }
    }
    Ok(())
}

/// Drop files whose name appears in `excluded`.
///
/// Names are compared as written to the per-status file lists, i.e.
/// relative to the input directory.
pub fn apply_exclusions(files: Vec<InputFile>, excluded: &HashSet<String>) -> Vec<InputFile> {
    if excluded.is_empty() {
        return files;
    }

    let before = files.len();
    let kept: Vec<InputFile> = files
        .into_iter()
        .filter(|file| !excluded.contains(&file.name))
        .collect();

    debug!("Excluded {} file(s)", before - kept.len());
    kept
}

fn collect_audio_files_recursive(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, extensions, files)?;
        } else if has_extension(&path, extensions) {
            files.push(path);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension().is_some_and(|ext| {
        extensions
            .iter()
            .any(|wanted| ext.eq_ignore_ascii_case(OsStr::new(wanted)))
    })
}
