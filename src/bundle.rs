//! Source bundle and destination root discovery
//!
//! The bundle is a directory with fixed asset subdirectories plus the
//! settings template and the global-instructions document. The destination
//! is the user-level configuration root, `~/.claude` by default.

use std::path::{Path, PathBuf};

/// Asset categories installed from the bundle, in pipeline order.
pub const ASSET_CATEGORIES: [&str; 5] = ["agents", "skills", "commands", "hooks", "principles"];

/// The user's settings document inside the configuration root.
pub const SETTINGS_FILE: &str = "settings.json";

/// The bundled settings template, merged into [`SETTINGS_FILE`].
pub const SETTINGS_TEMPLATE: &str = "settings.template.json";

/// The global-instructions document, present in both bundle and destination.
pub const GLOBAL_INSTRUCTIONS: &str = "CLAUDE.md";

/// Resolve the bundle directory: `CCSETUP_CONFIG_DIR` if set, otherwise
/// `config/` next to the executable's directory.
pub fn default_config_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = std::env::var("CCSETUP_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let exe = std::env::current_exe()
        .map_err(|e| format!("Could not locate the running executable: {}", e))?;
    let bin_dir = exe
        .parent()
        .ok_or_else(|| "Executable has no parent directory".to_string())?;
    Ok(bin_dir.join("..").join("config"))
}

/// Resolve the destination configuration root: `CCSETUP_CLAUDE_DIR` if set,
/// otherwise `~/.claude`.
pub fn default_claude_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = std::env::var("CCSETUP_CLAUDE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".claude"))
        .ok_or_else(|| "Could not determine home directory".to_string())
}

/// Shorten a path for display by replacing the home prefix with `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
