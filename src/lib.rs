//! Movie listing pipeline.
//!
//! Four stages, each reading only the artifact its predecessor wrote:
//!   1. ingest    - copy raw files into `datalake/bronze`
//!   2. normalize - parse `<id>;(<title>, <year>)` records into the silver table
//!   3. classify  - split the silver table into one gold table per category
//!   4. persist   - replace one SQLite table per gold table

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod table;

pub use config::{Layout, PipelineConfig};
pub use error::{PipelineError, Stage, StageFailure};
pub use model::{Category, Movie};
pub use pipeline::{Pipeline, RunSummary, StageReport};
