//! Paths every stage reads and writes.
//!
//! Defaults mirror the datalake layout (`dados/` → `datalake/{bronze,silver,gold}`
//! → `database/movies.db`). An optional `pipeline.toml` in the project root
//! overrides any of them; relative entries resolve against the root.

use std::path::{Path, PathBuf};

use config::Config;
use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_FILE: &str = "pipeline.toml";

/// Resolved locations handed to each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub raw_dir: PathBuf,
    pub bronze_dir: PathBuf,
    /// Staged file the normalization stage parses.
    pub bronze_source: PathBuf,
    pub silver_table: PathBuf,
    pub gold_dir: PathBuf,
    pub database: PathBuf,
    pub log_file: PathBuf,
}

impl Layout {
    pub fn under(root: &Path) -> Self {
        PipelineConfig::default().resolve(root)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub bronze_dir: PathBuf,
    pub bronze_file: String,
    pub silver_dir: PathBuf,
    pub silver_file: String,
    pub gold_dir: PathBuf,
    pub database: PathBuf,
    pub log_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            raw_dir: PathBuf::from("dados"),
            bronze_dir: PathBuf::from("datalake/bronze"),
            bronze_file: "movies.csv".to_string(),
            silver_dir: PathBuf::from("datalake/silver"),
            silver_file: "movies_processed.parquet".to_string(),
            gold_dir: PathBuf::from("datalake/gold"),
            database: PathBuf::from("database/movies.db"),
            log_file: PathBuf::from("pipeline.log"),
        }
    }
}

impl PipelineConfig {
    /// Reads `pipeline.toml` from `root` if present, defaults otherwise.
    pub fn load(root: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(config::File::from(root.join(CONFIG_FILE)).required(false))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn resolve(&self, root: &Path) -> Layout {
        let bronze_dir = root.join(&self.bronze_dir);
        let silver_dir = root.join(&self.silver_dir);
        Layout {
            raw_dir: root.join(&self.raw_dir),
            bronze_source: bronze_dir.join(&self.bronze_file),
            bronze_dir,
            silver_table: silver_dir.join(&self.silver_file),
            gold_dir: root.join(&self.gold_dir),
            database: root.join(&self.database),
            log_file: root.join(&self.log_file),
        }
    }
}
