use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{rlog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Write debug-level entries to the log.
    #[serde(default)]
    pub debug: bool,
    /// Task collection used when `--file` is not given.
    pub tasks_file: Option<String>,
    /// Persist accepted moves back to the task file.
    #[serde(default = "default_write_back")]
    pub write_back: bool,
}

fn default_write_back() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            tasks_file: None,
            write_back: default_write_back(),
        }
    }
}

impl Config {
    pub fn roadmap_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".roadmap"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::roadmap_dir()?.join("roadmap.toml"))
    }

    /// Task file from the config, or `~/.roadmap/tasks.json`.
    pub fn tasks_path(&self) -> Result<PathBuf> {
        match &self.tasks_file {
            Some(file) => Ok(expand_tilde(file)),
            None => Ok(Self::roadmap_dir()?.join("tasks.json")),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        rlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            rlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        rlog_debug!(
            "Config loaded: debug={}, tasks_file={:?}, write_back={}",
            config.debug,
            config.tasks_file,
            config.write_back
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                rlog_debug!("Creating config directory: {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        rlog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
