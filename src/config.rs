use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;

use crate::aggregate::DEFAULT_BUCKET_DAYS;
use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::filter::{Recency, RecencyAnchor};
use crate::normalize::TimestampFormat;
use crate::pipeline::{ChartKind, PipelineConfig};

/// Chart defaults, overridable from the command line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub chart: ChartKind,
    /// Trailing window in months; None keeps all history
    pub months: Option<u32>,
    pub anchor: RecencyAnchor,
    pub exclude_failing: bool,
    pub bucket_days: u32,
    pub split_by_player: bool,
    pub strict_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart: ChartKind::AccuracyByLevel,
            months: None,
            anchor: RecencyAnchor::Now,
            exclude_failing: true,
            bucket_days: DEFAULT_BUCKET_DAYS as u32,
            split_by_player: true,
            strict_timestamps: false,
        }
    }
}

impl Config {
    pub fn recency(&self) -> Option<Recency> {
        self.months.map(|months| Recency {
            months,
            anchor: self.anchor,
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let width = TimeDelta::days(i64::from(self.bucket_days.max(1)));
        PipelineConfig {
            group_by: self.chart.group_by(width),
            metric: self.chart.metric(),
            split_by_player: self.split_by_player,
            exclude_failing: self.exclude_failing,
            recency: self.recency(),
        }
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        if self.strict_timestamps {
            TimestampFormat::export()
        } else {
            TimestampFormat::Lenient
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("scorelog_config.json"));
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
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring {}: {e}", self.path.display());
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        let io_err = |source: std::io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}
