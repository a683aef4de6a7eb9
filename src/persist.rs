//! Load every gold category table into SQLite, one relational table each.
//!
//! A bad artifact is logged and skipped; the rest still load. The connection
//! is opened once and closed whatever happens.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::classify;
use crate::config::Layout;
use crate::db;
use crate::error::Result;
use crate::model::table_name;
use crate::table;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// `(table, rows)` for every table replaced.
    pub written: Vec<(String, usize)>,
    /// `(artifact, cause)` for every artifact left out.
    pub skipped: Vec<(PathBuf, String)>,
}

pub fn run(layout: &Layout) -> Result<PersistReport> {
    let conn = db::connect(&layout.database)?;
    let outcome = persist_all(&conn, layout);
    db::close(conn);
    outcome
}

fn persist_all(conn: &Connection, layout: &Layout) -> Result<PersistReport> {
    let artifacts = classify::artifacts(layout)?;
    let mut report = PersistReport::default();
    if artifacts.is_empty() {
        warn!(gold_dir = %layout.gold_dir.display(), "no category tables found, nothing to persist");
        return Ok(report);
    }

    for path in artifacts {
        let Some(name) = artifact_table_name(&path) else {
            continue;
        };
        match persist_one(conn, &path, &name) {
            Ok(rows) => {
                info!(table = %name, rows, "table replaced");
                report.written.push((name, rows));
            }
            Err(e) => {
                error!(artifact = %path.display(), error = %e, "skipping artifact");
                report.skipped.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

fn persist_one(conn: &Connection, path: &Path, name: &str) -> Result<usize> {
    let movies = table::read(path)?;
    info!(artifact = %path.display(), table = name, "loading category table");
    db::replace_table(conn, name, &movies)
}

fn artifact_table_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| table_name(&stem.to_string_lossy()))
        .filter(|name| !name.is_empty())
}
