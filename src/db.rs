//! SQLite store - connection, table replacement, reads.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::model::Movie;
use crate::table::{ID_COLUMN, TITLE_COLUMN, YEAR_COLUMN};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(PipelineError::io(parent))?;
    }
    let conn = Connection::open(path)?;
    info!(database = %path.display(), "connected to SQLite");
    Ok(conn)
}

pub fn close(conn: Connection) {
    match conn.close() {
        Ok(()) => info!("SQLite connection closed"),
        Err((_conn, e)) => warn!(error = %e, "SQLite connection did not close cleanly"),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Drops `table` if present and recreates it holding exactly `movies`.
/// Runs in one transaction, so a failure leaves the previous contents.
pub fn replace_table(conn: &Connection, table: &str, movies: &[Movie]) -> Result<usize> {
    let ident = quote_ident(table);
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {ident};
         CREATE TABLE {ident} ({ID_COLUMN} INTEGER, {TITLE_COLUMN} TEXT, {YEAR_COLUMN} INTEGER);"
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {ident} ({ID_COLUMN}, {TITLE_COLUMN}, {YEAR_COLUMN}) VALUES (?1, ?2, ?3)"
        ))?;
        for movie in movies {
            stmt.execute(params![movie.id, movie.title, movie.year])?;
        }
    }
    tx.commit()?;
    Ok(movies.len())
}

/// Rows of `table` in insertion order.
pub fn fetch_table(conn: &Connection, table: &str) -> Result<Vec<Movie>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ID_COLUMN}, {TITLE_COLUMN}, {YEAR_COLUMN} FROM {} ORDER BY rowid",
        quote_ident(table)
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Movie {
                id: row.get(0)?,
                title: row.get(1)?,
                year: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}
