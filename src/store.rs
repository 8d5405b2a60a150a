//! JSON persistence for a task collection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::task::Task;
use crate::{rlog_debug, Result};

/// On-disk shape of a task file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskFile {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Load a task file. A missing file is an empty collection.
    pub fn load(path: &Path) -> Result<Self> {
        rlog_debug!("TaskFile::load path={}", path.display());

        if !path.exists() {
            rlog_debug!("Task file not found, returning empty collection");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let file: TaskFile = serde_json::from_str(&contents)?;
        rlog_debug!("Task file loaded: {} tasks", file.tasks.len());
        Ok(file)
    }

    /// Write through a temp file and rename it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                rlog_debug!("Creating task directory: {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }

        let temp_path = temp_path_for(path);
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, path)?;
        rlog_debug!("Task file saved: {} ({} tasks)", path.display(), self.tasks.len());

        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
