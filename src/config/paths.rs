//! Locating the configuration file.

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Per-user configuration directory.
///
/// `~/.config/corpus-vad/` on Linux, `~/Library/Application Support/corpus-vad/`
/// on macOS and `%APPDATA%\corpus-vad\` on Windows.
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Default location of the configuration file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Configuration file a command operates on: `explicit` when given
/// (`--config` or `CORPUS_VAD_CONFIG`), otherwise the default location.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit.map_or_else(config_file_path, |path| Ok(path.to_path_buf()))
}
