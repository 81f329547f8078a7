//! CSV dataset reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::{Dataset, DatasetSchema, Record};
use crate::IoError;

/// Reads a profile dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required; it must contain every column the schema names
///   (extra columns are ignored)
/// - Feature cells are kept as strings; outcome and hit-flag cells must
///   be booleans (`0`/`1`/`true`/`false`, case-insensitive)
/// - All rows must have the same number of columns as the header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | A schema column is absent from the header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidBoolean`] | Outcome cell is not a recognizable boolean |
pub struct DatasetReader {
    path: PathBuf,
    schema: DatasetSchema,
}

impl DatasetReader {
    /// Create a new reader for the given CSV file path and schema.
    pub fn new(path: &Path, schema: DatasetSchema) -> Self {
        Self {
            path: path.to_path_buf(),
            schema,
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) allows rows with varying column counts so that our
        // own InconsistentRowLength check fires instead of a low-level
        // CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let resolve = |column: &str| -> Result<usize, IoError> {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                })
        };

        let feature_indices: Vec<usize> = self
            .schema
            .feature_columns()
            .iter()
            .map(|c| resolve(c))
            .collect::<Result<_, _>>()?;
        let hit_index = resolve(self.schema.hit_column())?;
        let refusal_index = resolve(self.schema.refusal_column())?;
        let flag_indices: Vec<usize> = self
            .schema
            .hit_flag_columns()
            .iter()
            .map(|c| resolve(c))
            .collect::<Result<_, _>>()?;

        let mut records = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if row.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: row.len(),
                });
            }

            let features: Vec<String> = feature_indices
                .iter()
                .map(|&i| row.get(i).unwrap_or("").to_string())
                .collect();

            let parse_bool = |col_index: usize, column: &str| -> Result<bool, IoError> {
                let raw = row.get(col_index).unwrap_or("");
                match raw.trim().to_ascii_lowercase().as_str() {
                    "0" | "false" => Ok(false),
                    "1" | "true" => Ok(true),
                    _ => Err(IoError::InvalidBoolean {
                        path: self.path.clone(),
                        row_index,
                        column: column.to_string(),
                        raw: raw.to_string(),
                    }),
                }
            };

            let hit = parse_bool(hit_index, self.schema.hit_column())?;
            let refused = parse_bool(refusal_index, self.schema.refusal_column())?;
            let hit_flags: Vec<bool> = flag_indices
                .iter()
                .zip(self.schema.hit_flag_columns())
                .map(|(&i, column)| parse_bool(i, column))
                .collect::<Result<_, _>>()?;

            records.push(Record {
                features,
                hit,
                refused,
                hit_flags,
            });
        }

        if records.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_records = records.len(),
            n_features = self.schema.feature_columns().len(),
            "dataset loaded"
        );

        Ok(Dataset::new(self.schema.clone(), records))
    }
}
