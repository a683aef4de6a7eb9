//! Bronze layer: copy raw source files into the staging area, byte for byte.

use std::fs;

use tracing::{debug, info, warn};

use crate::config::Layout;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub copied: Vec<String>,
}

pub fn run(layout: &Layout) -> Result<IngestReport> {
    let bronze = &layout.bronze_dir;
    fs::create_dir_all(bronze).map_err(PipelineError::io(bronze))?;

    info!(raw_dir = %layout.raw_dir.display(), bronze_dir = %bronze.display(), "ingesting raw files");

    let entries = fs::read_dir(&layout.raw_dir).map_err(PipelineError::input(&layout.raw_dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(PipelineError::io(&layout.raw_dir))?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(PipelineError::io(&path))?;
        if metadata.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-file entry");
        }
    }
    files.sort();

    if files.is_empty() {
        warn!(raw_dir = %layout.raw_dir.display(), "no files found in raw directory");
        return Ok(IngestReport::default());
    }

    let mut report = IngestReport::default();
    for src in files {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dest = bronze.join(name);
        fs::copy(&src, &dest).map_err(PipelineError::io(&src))?;
        info!(file = %name.to_string_lossy(), dest = %dest.display(), "copied");
        report.copied.push(name.to_string_lossy().into_owned());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn copies_every_file_unchanged() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(&layout.raw_dir).unwrap();
        let bytes: Vec<u8> = (0u8..=255).collect();
        fs::write(layout.raw_dir.join("movies.csv"), "1;(Heat, 1995)").unwrap();
        fs::write(layout.raw_dir.join("blob.bin"), &bytes).unwrap();
        fs::write(layout.raw_dir.join("README"), "no extension").unwrap();

        let report = run(&layout).unwrap();

        assert_eq!(report.copied, vec!["README", "blob.bin", "movies.csv"]);
        assert_eq!(fs::read(layout.bronze_dir.join("blob.bin")).unwrap(), bytes);
        assert_eq!(
            fs::read_to_string(layout.bronze_dir.join("movies.csv")).unwrap(),
            "1;(Heat, 1995)"
        );
    }

    #[test]
    fn overwrites_previously_staged_file() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(&layout.raw_dir).unwrap();
        fs::create_dir_all(&layout.bronze_dir).unwrap();
        fs::write(layout.bronze_dir.join("movies.csv"), "stale contents, much longer").unwrap();
        fs::write(layout.raw_dir.join("movies.csv"), "fresh").unwrap();

        run(&layout).unwrap();

        assert_eq!(
            fs::read_to_string(layout.bronze_dir.join("movies.csv")).unwrap(),
            "fresh"
        );
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_source_files() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(&layout.raw_dir).unwrap();
        let real = dir.path().join("real.csv");
        fs::write(&real, "1;(Heat, 1995)").unwrap();
        std::os::unix::fs::symlink(&real, layout.raw_dir.join("movies.csv")).unwrap();

        let report = run(&layout).unwrap();

        assert_eq!(report.copied, vec!["movies.csv"]);
        let staged = layout.bronze_dir.join("movies.csv");
        assert!(!fs::symlink_metadata(&staged).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(staged).unwrap(), "1;(Heat, 1995)");
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(&layout.raw_dir).unwrap();
        fs::create_dir_all(layout.raw_dir.join("subdir")).unwrap();

        let report = run(&layout).unwrap();

        assert!(report.copied.is_empty());
        assert!(Path::new(&layout.bronze_dir).is_dir());
        assert_eq!(fs::read_dir(&layout.bronze_dir).unwrap().count(), 0);
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        assert!(run(&layout).unwrap_err().is_missing_input());
    }
}
