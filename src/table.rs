//! Columnar artifact codec shared by the silver and gold layers.
//!
//! Schema: `id` int64, `filme` utf8, `ano` int32, all non-null.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::types::{Int32Type, Int64Type};
use arrow_array::{Int32Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::model::Movie;

pub const ID_COLUMN: &str = "id";
pub const TITLE_COLUMN: &str = "filme";
pub const YEAR_COLUMN: &str = "ano";

pub fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(ID_COLUMN, DataType::Int64, false),
        Field::new(TITLE_COLUMN, DataType::Utf8, false),
        Field::new(YEAR_COLUMN, DataType::Int32, false),
    ]))
}

fn to_batch(movies: &[Movie], path: &Path) -> Result<RecordBatch> {
    let ids = Int64Array::from(movies.iter().map(|m| m.id).collect::<Vec<_>>());
    let titles = StringArray::from(movies.iter().map(|m| m.title.as_str()).collect::<Vec<_>>());
    let years = Int32Array::from(movies.iter().map(|m| m.year).collect::<Vec<_>>());
    RecordBatch::try_new(
        schema(),
        vec![Arc::new(ids), Arc::new(titles), Arc::new(years)],
    )
    .map_err(PipelineError::arrow(path))
}

/// Writes `movies` to `path`, replacing any existing file, and syncs it to disk.
pub fn write(path: &Path, movies: &[Movie]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(PipelineError::io(parent))?;
    }
    let batch = to_batch(movies, path)?;
    let file = File::create(path).map_err(PipelineError::io(path))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).map_err(PipelineError::parquet(path))?;
    writer.write(&batch).map_err(PipelineError::parquet(path))?;
    let file = writer.into_inner().map_err(PipelineError::parquet(path))?;
    file.sync_all().map_err(PipelineError::io(path))?;
    debug!(path = %path.display(), rows = movies.len(), "table written");
    Ok(())
}

/// Reads every row back in file order. Rows holding a null are dropped.
pub fn read(path: &Path) -> Result<Vec<Movie>> {
    let file = File::open(path).map_err(PipelineError::input(path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(PipelineError::parquet(path))?
        .build()
        .map_err(PipelineError::parquet(path))?;

    let mut movies = Vec::new();
    for batch in reader {
        let batch = batch.map_err(PipelineError::arrow(path))?;
        let ids = batch
            .column_by_name(ID_COLUMN)
            .and_then(|c| c.as_primitive_opt::<Int64Type>())
            .ok_or_else(|| schema_error(path, ID_COLUMN, "int64"))?;
        let titles = batch
            .column_by_name(TITLE_COLUMN)
            .and_then(|c| c.as_string_opt::<i32>())
            .ok_or_else(|| schema_error(path, TITLE_COLUMN, "utf8"))?;
        let years = batch
            .column_by_name(YEAR_COLUMN)
            .and_then(|c| c.as_primitive_opt::<Int32Type>())
            .ok_or_else(|| schema_error(path, YEAR_COLUMN, "int32"))?;

        for ((id, title), year) in ids.iter().zip(titles.iter()).zip(years.iter()) {
            if let (Some(id), Some(title), Some(year)) = (id, title, year) {
                movies.push(Movie::new(id, title, year));
            }
        }
    }
    Ok(movies)
}

fn schema_error(path: &Path, column: &'static str, expected: &'static str) -> PipelineError {
    PipelineError::Schema {
        path: path.to_path_buf(),
        column,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserves_rows_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/movies.parquet");
        let movies = vec![
            Movie::new(7, "Zulu Dawn", 1979),
            Movie::new(3, "Amélie", 2001),
        ];
        write(&path, &movies).unwrap();
        assert_eq!(read(&path).unwrap(), movies);
    }

    #[test]
    fn empty_table_is_still_a_valid_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        write(&path, &[]).unwrap();
        assert!(read(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_missing_input() {
        let dir = tempdir().unwrap();
        let err = read(&dir.path().join("absent.parquet")).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn non_parquet_bytes_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.parquet");
        fs::write(&path, b"not a parquet file").unwrap();
        assert!(matches!(read(&path), Err(PipelineError::Parquet { .. })));
    }

    #[test]
    fn wrong_column_type_is_a_schema_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.parquet");
        let odd = Arc::new(Schema::new(vec![
            Field::new(ID_COLUMN, DataType::Utf8, false),
            Field::new(TITLE_COLUMN, DataType::Utf8, false),
            Field::new(YEAR_COLUMN, DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            odd.clone(),
            vec![
                Arc::new(StringArray::from(vec!["x"])),
                Arc::new(StringArray::from(vec!["Title"])),
                Arc::new(Int32Array::from(vec![2000])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), odd, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = read(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { column: ID_COLUMN, .. }));
    }
}
