//! CSV persistence for aggregated results.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::error::PersistError;
use super::filename::results_path;
use super::flatten::Table;

/// Writes `items` as a CSV file named after the query, start page and result count.
///
/// The output directory is created when missing. Zero items produce an
/// empty file.
///
/// # Errors
///
/// Returns [`PersistError`] when the directory or file cannot be written.
#[instrument(skip_all, fields(query = query, items = items.len(), output_dir = %output_dir.display(), start_page = start_page, result_count = result_count))]
pub async fn save_results(
    items: &[Map<String, Value>],
    query: &str,
    output_dir: &Path,
    start_page: usize,
    result_count: usize,
) -> Result<PathBuf, PersistError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| PersistError::io(output_dir, e))?;

    let path = results_path(output_dir, query, start_page, result_count);
    write_table(&path, &Table::from_items(items)).await?;
    Ok(path)
}

/// Writes a table as UTF-8 CSV with a header row.
///
/// # Errors
///
/// Returns [`PersistError`] when encoding or writing fails.
pub async fn write_table(path: &Path, table: &Table) -> Result<(), PersistError> {
    let bytes = encode_table(table).map_err(|e| PersistError::csv(path, e))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| PersistError::io(path, e))?;
    debug!(path = %path.display(), rows = table.rows.len(), "table written");
    Ok(())
}

fn encode_table(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if table.header.is_empty() {
        // Items with no columns still get one (blank) line each.
        if !table.rows.is_empty() {
            writer.write_record([""])?;
            for _ in &table.rows {
                writer.write_record([""])?;
            }
        }
    } else {
        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Reads every value of `column` from a CSV file, in row order.
///
/// Rows shorter than the header yield an empty value.
///
/// # Errors
///
/// Returns [`PersistError`] when the file cannot be read or parsed, or
/// [`PersistError::MissingColumn`] when the header lacks `column`.
pub async fn read_column(path: &Path, column: &str) -> Result<Vec<String>, PersistError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PersistError::io(path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes.as_slice());

    let index = reader
        .headers()
        .map_err(|e| PersistError::csv(path, e))?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| PersistError::missing_column(path, column))?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PersistError::csv(path, e))?;
        values.push(record.get(index).unwrap_or_default().to_string());
    }
    Ok(values)
}
