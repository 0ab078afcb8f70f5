//! CSV loading for the raw student table.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use polars::prelude::{CsvReadOptions, DataFrame, DataType, Schema, SerReader};
use tracing::{debug, warn};

use cademy_model::schema::{CONTACT_INFO, DOB, MAILING_ADDRESS, NUMERIC_COLUMNS};

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Rows sampled by Polars when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads the header row of a CSV file.
///
/// Strips a UTF-8 BOM and honours double-quoted names.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let bytes = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    if bytes == 0 || line.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    Ok(parse_header_line(line))
}

/// Splits a header line into trimmed column names, handling quoted values.
fn parse_header_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Raw columns always read as text; the pipeline validates them per record.
fn text_columns() -> impl Iterator<Item = &'static str> {
    [DOB, CONTACT_INFO, MAILING_ADDRESS]
        .into_iter()
        .chain(NUMERIC_COLUMNS)
}

/// Schema overwrite forcing [`text_columns`] present in the header to String.
fn text_schema(headers: &[String]) -> Schema {
    let mut schema = Schema::with_capacity(headers.len());
    for name in text_columns() {
        if headers.iter().any(|header| header == name) {
            schema.with_column(name.into(), DataType::String);
        }
    }
    schema
}

/// Reads the raw student table into a Polars DataFrame.
///
/// Date, contact, address and numeric columns are read as text and coerced
/// later by the pipeline; other column types are inferred from the first
/// rows.
pub fn read_student_table(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let headers = read_csv_headers(path)?;
    debug!(
        path = %path.display(),
        columns = headers.len(),
        "read csv header"
    );

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_schema_overwrite(Some(Arc::new(text_schema(&headers))))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.height() == 0 {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }
    if df.width() != headers.len() {
        warn!(
            path = %path.display(),
            header_columns = headers.len(),
            frame_columns = df.width(),
            "header and parsed column counts differ"
        );
    }

    Ok(df)
}
