use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use movie_pipeline::{logging, Pipeline, PipelineConfig, Stage, StageReport};

#[derive(Parser)]
#[command(name = "movie_pipeline", about = "Movie listing pipeline: bronze -> silver -> gold -> SQLite")]
struct Cli {
    /// Project root holding dados/, datalake/ and database/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run all four stages (default)
    Run,
    /// Copy raw files into the bronze layer
    Ingest,
    /// Parse the staged listing into the silver table
    Normalize,
    /// Split the silver table into gold category tables
    Classify,
    /// Load gold category tables into SQLite
    Persist,
}

impl Commands {
    fn stage(self) -> Option<Stage> {
        match self {
            Commands::Run => None,
            Commands::Ingest => Some(Stage::Ingestion),
            Commands::Normalize => Some(Stage::Normalization),
            Commands::Classify => Some(Stage::Classification),
            Commands::Persist => Some(Stage::Persistence),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.root)?;
    let layout = config.resolve(&cli.root);
    logging::init(&layout.log_file)?;
    info!(root = %cli.root.display(), config = ?config, "configuration loaded");

    let pipeline = Pipeline::new(layout);
    match cli.command.unwrap_or(Commands::Run).stage() {
        None => {
            let summary = pipeline.run()?;
            for (category, count) in &summary.categories {
                info!(%category, records = count, "category");
            }
            for (artifact, cause) in &summary.persisted.skipped {
                info!(artifact = %artifact.display(), cause = %cause, "skipped");
            }
            info!("data pipeline completed successfully");
        }
        Some(stage) => match pipeline.run_stage(stage)? {
            StageReport::Ingested(r) => info!(files = r.copied.len(), "ingest done"),
            StageReport::Normalized(n) => info!(records = n, "normalize done"),
            StageReport::Classified(c) => info!(categories = c.len(), "classify done"),
            StageReport::Persisted(p) => info!(
                tables = p.written.len(),
                skipped = p.skipped.len(),
                "persist done"
            ),
        },
    }
    Ok(())
}
