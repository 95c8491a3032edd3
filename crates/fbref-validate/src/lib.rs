use std::collections::HashSet;

use anyhow::{Context, Result};
use fbref_model::{Dataset, TeamTable, TEAM_COLUMN};
use thiserror::Error;

/// A consistency finding. None of these stop a scrape; they are reported so
/// drifting page layouts get noticed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("row {0} has no team")]
    MissingTeam(usize),

    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "team '{team}' columns differ from the first table: missing [{}], extra [{}]",
        .missing.join(", "),
        .extra.join(", ")
    )]
    ColumnDrift {
        team: String,
        missing: Vec<String>,
        extra: Vec<String>,
    },
}

/// Check a consolidated dataset. Rows are numbered from 1.
pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationError> {
    let mut errors = check_header(&dataset.columns);
    let team_idx = dataset.column_index(TEAM_COLUMN);

    for (i, row) in dataset.rows.iter().enumerate() {
        if row.len() != dataset.columns.len() {
            errors.push(ValidationError::RowWidth {
                row: i + 1,
                expected: dataset.columns.len(),
                found: row.len(),
            });
        }
        if let Some(idx) = team_idx {
            let team = row.get(idx).and_then(|c| c.as_deref()).unwrap_or_default();
            if team.trim().is_empty() {
                errors.push(ValidationError::MissingTeam(i + 1));
            }
        }
    }

    log_findings(&errors);
    errors
}

/// Compare every team table's columns against the first table's.
pub fn column_drift(tables: &[TeamTable]) -> Vec<ValidationError> {
    let Some(first) = tables.first() else {
        return Vec::new();
    };
    let reference: HashSet<&str> = first.columns.iter().map(String::as_str).collect();

    let mut errors = Vec::new();
    for table in &tables[1..] {
        let columns: HashSet<&str> = table.columns.iter().map(String::as_str).collect();
        let missing: Vec<String> = first
            .columns
            .iter()
            .filter(|c| !columns.contains(c.as_str()))
            .cloned()
            .collect();
        let extra: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !reference.contains(c.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            errors.push(ValidationError::ColumnDrift {
                team: table.team.clone(),
                missing,
                extra,
            });
        }
    }

    log_findings(&errors);
    errors
}

/// Re-read a written stats CSV and check it the same way as a dataset.
pub fn validate_csv(path: &str) -> Result<Vec<ValidationError>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {path}"))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {path}"))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut errors = check_header(&columns);
    let team_idx = columns.iter().position(|c| c == TEAM_COLUMN);
    let mut rows = 0;

    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {} of {path}", i + 1))?;
        rows += 1;
        if record.len() != columns.len() {
            errors.push(ValidationError::RowWidth {
                row: i + 1,
                expected: columns.len(),
                found: record.len(),
            });
        }
        if let Some(idx) = team_idx {
            if record.get(idx).unwrap_or_default().trim().is_empty() {
                errors.push(ValidationError::MissingTeam(i + 1));
            }
        }
    }

    tracing::info!(path, rows, columns = columns.len(), "Checked CSV");
    log_findings(&errors);
    Ok(errors)
}

fn check_header(columns: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !columns.iter().any(|c| c == TEAM_COLUMN) {
        errors.push(ValidationError::MissingColumn(TEAM_COLUMN.into()));
    }
    let mut seen = HashSet::new();
    for c in columns {
        if !seen.insert(c.as_str()) {
            errors.push(ValidationError::DuplicateColumn(c.clone()));
        }
    }
    errors
}

fn log_findings(errors: &[ValidationError]) {
    for e in errors {
        tracing::warn!("{e}");
    }
}
