//! Platform-specific paths for user presets.
//!
//! # Directory Structure
//!
//! - **User presets**: `~/.config/ekko/presets/` (Linux), `~/Library/Application Support/ekko/presets/` (macOS), `%APPDATA%\ekko\presets\` (Windows)
//! - **User config**: `~/.config/ekko/` (Linux), `~/Library/Application Support/ekko/` (macOS), `%APPDATA%\ekko\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use ekko_config::paths;
//!
//! let presets_dir = paths::user_presets_dir();
//! println!("User presets: {:?}", presets_dir);
//!
//! if let Some(path) = paths::find_preset("tape_room") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::{ConfigError, FileOp};

/// Application name used for directory paths.
const APP_NAME: &str = "ekko";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific presets directory.
///
/// Returns a path relative to the working directory if the platform config
/// directory cannot be determined.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Returns the user-specific configuration directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Find a preset file by name or path.
///
/// Searches in the following order:
/// 1. `name` as a path, if it names an existing file
/// 2. The user presets directory, adding `.toml` when missing
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

fn find_preset_in(name: &str, presets_dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = presets_dir.join(filename);
    user_path.is_file().then_some(user_path)
}

/// Ensure the user presets directory exists, creating it if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| ConfigError::io(FileOp::CreateDir, &dir, e))?;
    }

    Ok(dir)
}

/// List all preset files in the user presets directory, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use ekko_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/tape_room.toml"));
/// assert_eq!(name, Some("tape_room".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
