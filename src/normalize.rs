//! Silver layer: extract `<id>;(<title>, <year>)` records from the staged listing.
//!
//! Text that does not match the grammar is skipped, never reported.

use std::fs;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Layout;
use crate::error::{PipelineError, Result};
use crate::model::Movie;
use crate::table;

const PREVIEW_ROWS: usize = 5;

fn record_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+);\(([^,]+), ([0-9]{4})\)").unwrap())
}

/// Every non-overlapping match, left to right, with the title trimmed.
pub fn normalize(raw: &str) -> Vec<Movie> {
    record_re()
        .captures_iter(raw)
        .filter_map(|caps| {
            let id = caps.get(1)?.as_str().parse::<i64>().ok()?;
            let title = caps.get(2)?.as_str().trim();
            let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
            Some(Movie::new(id, title, year))
        })
        .collect()
}

pub fn run(layout: &Layout) -> Result<usize> {
    let source = &layout.bronze_source;
    let raw = fs::read_to_string(source).map_err(PipelineError::input(source))?;
    info!(source = %source.display(), bytes = raw.len(), "raw listing read");

    let movies = normalize(&raw);
    info!(records = movies.len(), columns = 3, "normalized table built");
    for movie in movies.iter().take(PREVIEW_ROWS) {
        debug!(id = movie.id, title = %movie.title, year = movie.year, "preview");
    }

    table::write(&layout.silver_table, &movies)?;
    info!(path = %layout.silver_table.display(), records = movies.len(), "silver table saved");
    Ok(movies.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extracts_well_formed_entries_in_order() {
        let movies =
            normalize("1;(Documentary Special, 2020) 2;(Action Man II, 2015) 3;(Random Flick, 1999)");
        assert_eq!(
            movies,
            vec![
                Movie::new(1, "Documentary Special", 2020),
                Movie::new(2, "Action Man II", 2015),
                Movie::new(3, "Random Flick", 1999),
            ]
        );
    }

    #[test]
    fn trims_title_whitespace() {
        assert_eq!(normalize("42;(  Heat   , 1995)"), vec![Movie::new(42, "Heat", 1995)]);
    }

    #[test]
    fn skips_malformed_entries() {
        let raw = "x;(No Id, 2000) 5;(Short Year, 99) 6;(No Space,2001) 7;Missing Parens, 2002 \
                   8;(Good One, 2003) 9;(Bad, Year, 2004)";
        assert_eq!(normalize(raw), vec![Movie::new(8, "Good One", 2003)]);
    }

    #[test]
    fn ignores_extraneous_text() {
        let raw = "header line\nid;(title, year)\n10;(Alien, 1979)\ntrailer";
        assert_eq!(normalize(raw), vec![Movie::new(10, "Alien", 1979)]);
    }

    #[test]
    fn only_ascii_digits_count() {
        // ARABIC-INDIC DIGIT ONE glued to the id
        assert_eq!(
            normalize("\u{0661}2;(Heat, 1995)"),
            vec![Movie::new(2, "Heat", 1995)]
        );
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(normalize("").is_empty());
    }

    #[test]
    fn id_overflow_drops_record() {
        let raw = "99999999999999999999;(Too Big, 2000) 2;(Fine, 2001)";
        assert_eq!(normalize(raw), vec![Movie::new(2, "Fine", 2001)]);
    }

    #[test]
    fn run_writes_silver_table() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(&layout.bronze_dir).unwrap();
        fs::write(&layout.bronze_source, "1;(Heat, 1995) junk 2;(Ronin, 1998)").unwrap();

        assert_eq!(run(&layout).unwrap(), 2);
        assert_eq!(
            table::read(&layout.silver_table).unwrap(),
            vec![Movie::new(1, "Heat", 1995), Movie::new(2, "Ronin", 1998)]
        );
    }

    #[test]
    fn run_without_staged_listing_fails() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        assert!(run(&layout).unwrap_err().is_missing_input());
        assert!(!layout.silver_table.exists());
    }
}
