//! Gold layer: assign each record one category and write a table per category.
//!
//! Rules are checked in priority order and the first hit wins:
//! documentary cues, then animation cues, then sequel/series markers.
//! Anything left over is a plain movie.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Layout;
use crate::error::{PipelineError, Result};
use crate::model::{Category, Movie};
use crate::table;

fn rules() -> &'static [(Category, Regex)] {
    static RULES: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            (
                Category::Documentary,
                Regex::new(r"(?i)documentary|nature|review|live|bonus").unwrap(),
            ),
            (
                Category::Animation,
                Regex::new(r"(?i)man|cartoon|animated").unwrap(),
            ),
            (
                Category::SequelSeries,
                Regex::new(r"(?i)\b(?:2|3|4|II|III|IV)\b|part|volume").unwrap(),
            ),
        ]
    })
}

pub fn categorize(title: &str) -> Category {
    rules()
        .iter()
        .find(|(_, re)| re.is_match(title))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Movie)
}

/// Groups records by category, keeping input order inside each group.
/// Categories with no records are absent from the result.
pub fn classify(table: Vec<Movie>) -> BTreeMap<Category, Vec<Movie>> {
    table
        .into_iter()
        .into_group_map_by(|movie| categorize(&movie.title))
        .into_iter()
        .collect()
}

pub fn run(layout: &Layout) -> Result<BTreeMap<Category, usize>> {
    let movies = table::read(&layout.silver_table)?;
    info!(records = movies.len(), source = %layout.silver_table.display(), "silver table loaded");
    if let Some((min, max)) = movies.iter().map(|m| m.year).minmax().into_option() {
        info!(from = min, to = max, "year range");
    }

    let groups = classify(movies);

    let gold = &layout.gold_dir;
    fs::create_dir_all(gold).map_err(PipelineError::io(gold))?;
    clear_artifacts(layout)?;

    let mut counts = BTreeMap::new();
    for (category, movies) in &groups {
        let path = gold.join(category.artifact_name());
        table::write(&path, movies)?;
        info!(%category, path = %path.display(), records = movies.len(), "category table saved");
        counts.insert(*category, movies.len());
    }
    if groups.is_empty() {
        warn!("silver table is empty, no category tables written");
    }
    Ok(counts)
}

fn clear_artifacts(layout: &Layout) -> Result<()> {
    for path in artifacts(layout)? {
        fs::remove_file(&path).map_err(PipelineError::io(&path))?;
        debug!(path = %path.display(), "removed stale category table");
    }
    Ok(())
}

/// Category tables currently present in the gold directory, sorted by name.
/// A missing directory holds no tables.
pub fn artifacts(layout: &Layout) -> Result<Vec<PathBuf>> {
    let gold = &layout.gold_dir;
    let entries = match fs::read_dir(gold) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PipelineError::io(gold)(e)),
    };
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(PipelineError::io(gold))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
