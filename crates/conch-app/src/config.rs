//! Application configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use conch_types::Result;

/// Settings for the interactive shell, loaded from `conch.toml` when one is
/// present in the working directory. Every field has a default, so a partial
/// (or absent) file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backing file for the persistent key/value store.
    pub cache_file: PathBuf,
    /// Text placed between the cwd and the cursor in the prompt.
    pub prompt: String,
    /// Print the greeting banner on startup.
    pub show_welcome: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from("conch_cache.json"),
            prompt: " > ".to_string(),
            show_welcome: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. A file that exists but fails to parse is an
    /// error; silently ignoring it would hide typos.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        Ok(config)
    }
}
