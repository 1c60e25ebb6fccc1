use std::env;
use std::fs::File;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::score::PickRow;

/// Explicit sheet layout: one identity column plus a fixed ordered list of
/// pick columns. The number of pick columns is a contest parameter (observed
/// 1-7), not something sniffed out of the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    pub name_column: String,
    pub pick_columns: Vec<String>,
}

impl SheetSchema {
    pub fn with_pick_count(count: usize) -> Self {
        Self {
            name_column: "Name".to_string(),
            pick_columns: (1..=count.max(1)).map(|n| format!("Ranking {n}")).collect(),
        }
    }

    /// Default schema with the `POOL_PICK_COLUMNS` override applied.
    pub fn from_env() -> Self {
        let count = env::var("POOL_PICK_COLUMNS")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(5)
            .clamp(1, 7);
        Self::with_pick_count(count)
    }
}

/// Structural sheet problems are fatal for the whole batch; a sheet that
/// parses always yields every row (blank cells and duplicate identities are
/// the scorer's concern).
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open pick sheet: {0}")]
    Io(#[from] io::Error),
    #[error("failed to read pick sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("pick sheet is missing required column \"{0}\"")]
    MissingColumn(String),
    #[error("pick sheet row {row} is missing required fields")]
    MalformedRow { row: usize },
}

pub fn read_picks_csv(path: &Path, schema: &SheetSchema) -> Result<Vec<PickRow>, SheetError> {
    let file = File::open(path)?;
    parse_picks_csv(file, schema)
}

pub fn parse_picks_csv<R: io::Read>(
    reader: R,
    schema: &SheetSchema,
) -> Result<Vec<PickRow>, SheetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let name_idx = column_index(&headers, &schema.name_column)
        .ok_or_else(|| SheetError::MissingColumn(schema.name_column.clone()))?;
    let pick_indices = schema
        .pick_columns
        .iter()
        .map(|column| {
            column_index(&headers, column).ok_or_else(|| SheetError::MissingColumn(column.clone()))
        })
        .collect::<Result<Vec<usize>, SheetError>>()?;

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        // 1-based, counting the header line the way the sheet shows it.
        let row = idx + 2;
        let record = record?;
        let id = record
            .get(name_idx)
            .ok_or(SheetError::MalformedRow { row })?
            .to_string();
        let picks = pick_indices
            .iter()
            .map(|&col| {
                record
                    .get(col)
                    .map(str::to_string)
                    .ok_or(SheetError::MalformedRow { row })
            })
            .collect::<Result<Vec<String>, SheetError>>()?;
        rows.push(PickRow { id, picks });
    }
    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(column))
}
