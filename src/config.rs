use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::balance::DEFAULT_THRESHOLD;
use crate::error::DraftError;
use crate::partition::DEFAULT_SHAFTS;
use crate::report::OutputFormat;
use crate::search::{SearchConfig, DEFAULT_TRIALS};

/// Persisted defaults for the command line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub trials: usize,
    pub shafts: usize,
    pub threshold: f64,
    pub time_limit_secs: Option<f64>,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            shafts: DEFAULT_SHAFTS,
            threshold: DEFAULT_THRESHOLD,
            time_limit_secs: None,
            format: OutputFormat::Table,
        }
    }
}

impl TryFrom<&Config> for SearchConfig {
    type Error = DraftError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        let time_limit = cfg
            .time_limit_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|e| {
                    DraftError::InvalidConfig(format!("time limit {secs}s: {e}"))
                })
            })
            .transpose()?;

        let search = Self {
            trials: cfg.trials,
            shafts: cfg.shafts,
            threshold: cfg.threshold,
            time_limit,
        };
        search.validate()?;
        Ok(search)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "shaftdraft") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("shaftdraft_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!(
                    "ignoring unreadable config {}: {e}",
                    self.path.display()
                ),
            },
            Err(e) => log::debug!("no config at {}: {e}", self.path.display()),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
