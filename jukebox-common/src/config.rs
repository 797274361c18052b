//! Player configuration loading and music root resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Player configuration persisted as TOML
///
/// Holds the music library root the (external) scanner indexes. The
/// controller itself never reads the library; it only hands resolved song
/// locations to the audio engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Root folder of the music library
    pub music_root: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            music_root: default_music_root(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any failure
    ///
    /// Missing or malformed config files must not prevent startup.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not load config from {}: {} (using defaults)", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Music root resolution priority order:
/// 1. Explicit override (CLI argument or embedding caller)
/// 2. Environment variable
/// 3. TOML config file `music_root` key (explicit path, or discovered in
///    the platform's standard locations)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_music_root(
    override_arg: Option<&str>,
    env_var_name: &str,
    config_path: Option<&Path>,
) -> PathBuf {
    // Priority 1: explicit override
    if let Some(path) = override_arg {
        debug!("Music root from explicit override: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        debug!("Music root from {}: {}", env_var_name, path);
        return PathBuf::from(path);
    }

    // Priority 3: config file, explicitly given or discovered
    let config_file = config_path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file().ok());
    if let Some(path) = config_file {
        match PlayerConfig::load(&path) {
            Ok(config) => {
                debug!("Music root from {}: {}", path.display(), config.music_root.display());
                return config.music_root;
            }
            Err(e) => {
                debug!("Config file {} unusable: {}", path.display(), e);
            }
        }
    }

    // Priority 4: compiled default
    let fallback = default_music_root();
    debug!("Music root from compiled default: {}", fallback.display());
    fallback
}

/// Locate an existing configuration file for the platform
///
/// Prefers the user config directory; on Linux a system-wide file under
/// /etc is accepted as a fallback.
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("jukebox").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/jukebox/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default music root (the user's Music folder)
pub fn default_music_root() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join("Music")))
        .unwrap_or_else(|| PathBuf::from("./music"))
}
