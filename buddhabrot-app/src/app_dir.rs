//! Directory where the executable lives. The default config file and output
//! images are stored next to the binary.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub(crate) fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default location of the JSON config file.
pub(crate) fn default_config_path() -> PathBuf {
    exe_directory().join("buddhabrot.json")
}

/// Default directory for rendered frames.
pub(crate) fn images_directory() -> PathBuf {
    exe_directory().join("images")
}
