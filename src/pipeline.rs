//! Runs bronze → silver → gold → database in order, stopping at the first
//! stage that fails. A rerun always starts again from ingestion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Layout;
use crate::error::{Result, Stage, StageFailure};
use crate::model::Category;
use crate::persist::PersistReport;
use crate::{classify, ingest, normalize, persist};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub files_copied: usize,
    pub records: usize,
    pub categories: BTreeMap<Category, usize>,
    pub persisted: PersistReport,
}

/// What a single stage produced when run on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageReport {
    Ingested(ingest::IngestReport),
    Normalized(usize),
    Classified(BTreeMap<Category, usize>),
    Persisted(PersistReport),
}

pub struct Pipeline {
    layout: Layout,
}

impl Pipeline {
    pub fn new(layout: Layout) -> Self {
        Pipeline { layout }
    }

    pub fn run(&self) -> std::result::Result<RunSummary, StageFailure> {
        let started_at = Utc::now();
        info!(started_at = %started_at.to_rfc3339(), "starting data pipeline");

        let ingested = self.stage(Stage::Ingestion, || ingest::run(&self.layout))?;
        let records = self.stage(Stage::Normalization, || normalize::run(&self.layout))?;
        let categories = self.stage(Stage::Classification, || classify::run(&self.layout))?;
        let persisted = self.stage(Stage::Persistence, || persist::run(&self.layout))?;

        let summary = RunSummary {
            started_at,
            files_copied: ingested.copied.len(),
            records,
            categories,
            persisted,
        };
        info!(
            files = summary.files_copied,
            records = summary.records,
            tables = summary.persisted.written.len(),
            skipped = summary.persisted.skipped.len(),
            elapsed_ms = (Utc::now() - started_at).num_milliseconds(),
            "data pipeline finished"
        );
        Ok(summary)
    }

    pub fn run_stage(&self, stage: Stage) -> std::result::Result<StageReport, StageFailure> {
        self.stage(stage, || {
            Ok(match stage {
                Stage::Ingestion => StageReport::Ingested(ingest::run(&self.layout)?),
                Stage::Normalization => StageReport::Normalized(normalize::run(&self.layout)?),
                Stage::Classification => StageReport::Classified(classify::run(&self.layout)?),
                Stage::Persistence => StageReport::Persisted(persist::run(&self.layout)?),
            })
        })
    }

    fn stage<T>(
        &self,
        stage: Stage,
        body: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, StageFailure> {
        info!(%stage, "--- running stage ---");
        match body() {
            Ok(out) => {
                info!(%stage, "stage completed");
                Ok(out)
            }
            Err(error) => {
                error!(%stage, %error, "stage failed");
                Err(StageFailure { stage, error })
            }
        }
    }
}
