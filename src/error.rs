use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use arrow_schema::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("expected input {} is missing", .path.display())]
    MissingInput { path: PathBuf },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parquet error on {}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },

    #[error("arrow error on {}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("{}: column '{column}' missing or not {expected}", .path.display())]
    Schema {
        path: PathBuf,
        column: &'static str,
        expected: &'static str,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl PipelineError {
    /// Maps an I/O error on `path`, turning `NotFound` into `MissingInput`.
    pub fn input(path: &Path) -> impl FnOnce(io::Error) -> PipelineError + '_ {
        move |source| {
            if source.kind() == io::ErrorKind::NotFound {
                PipelineError::MissingInput {
                    path: path.to_path_buf(),
                }
            } else {
                PipelineError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        }
    }

    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> PipelineError + '_ {
        move |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parquet(path: &Path) -> impl FnOnce(ParquetError) -> PipelineError + '_ {
        move |source| PipelineError::Parquet {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn arrow(path: &Path) -> impl FnOnce(ArrowError) -> PipelineError + '_ {
        move |source| PipelineError::Arrow {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, PipelineError::MissingInput { .. })
    }
}

/// The four stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    Normalization,
    Classification,
    Persistence,
}

impl Stage {
    pub fn layer(self) -> &'static str {
        match self {
            Stage::Ingestion => "bronze",
            Stage::Normalization => "silver",
            Stage::Classification => "gold",
            Stage::Persistence => "database",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingestion => "ingestion",
            Stage::Normalization => "normalization",
            Stage::Classification => "classification",
            Stage::Persistence => "persistence",
        };
        write!(f, "{} ({})", name, self.layer())
    }
}

/// A stage that aborted the run, with its cause.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}
