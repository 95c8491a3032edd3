use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column appended to every team table, holding the team identity.
pub const TEAM_COLUMN: &str = "Team";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("header level {level} has {found} cells, expected {expected}")]
    RaggedHeader {
        level: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A table as parsed from HTML: one or more header levels plus data rows.
///
/// All header levels and all rows have the same width; spans have already
/// been expanded by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct RawTable {
    header: Vec<Vec<String>>,
    rows: Vec<Vec<String>>,
}

/// Unchecked wire form of [`RawTable`]; deserialization goes through
/// [`RawTable::new`] so the width invariant holds.
#[derive(Deserialize)]
struct TableParts {
    header: Vec<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl TryFrom<TableParts> for RawTable {
    type Error = TableError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        RawTable::new(parts.header, parts.rows)
    }
}

impl RawTable {
    pub fn new(header: Vec<Vec<String>>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let width = header
            .first()
            .or_else(|| rows.first())
            .map_or(0, Vec::len);

        for (level, cells) in header.iter().enumerate() {
            if cells.len() != width {
                return Err(TableError::RaggedHeader {
                    level,
                    expected: width,
                    found: cells.len(),
                });
            }
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(TableError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }

        Ok(Self { header, rows })
    }

    /// Build a table from possibly uneven levels and rows, padding every one
    /// with empty cells to the widest.
    pub fn padded(mut header: Vec<Vec<String>>, mut rows: Vec<Vec<String>>) -> Self {
        let width = header
            .iter()
            .chain(rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        for cells in header.iter_mut().chain(rows.iter_mut()) {
            cells.resize(width, String::new());
        }
        Self { header, rows }
    }

    pub fn width(&self) -> usize {
        self.header
            .first()
            .or_else(|| self.rows.first())
            .map_or(0, Vec::len)
    }

    pub fn header_levels(&self) -> usize {
        self.header.len()
    }

    pub fn is_multi_level(&self) -> bool {
        self.header.len() > 1
    }

    pub fn header(&self) -> &[Vec<String>] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Collapse the header to a single row.
    ///
    /// Each column takes its most specific (deepest) label that is not a
    /// placeholder. Columns with no usable label become `Unnamed: <index>`.
    /// Duplicate names get `.1`, `.2`, ... suffixes in first-seen order.
    pub fn flatten_header(&self) -> Vec<String> {
        let names = (0..self.width())
            .map(|col| {
                self.header
                    .iter()
                    .rev()
                    .map(|level| level[col].trim())
                    .find(|label| !is_placeholder(label))
                    .map_or_else(|| format!("Unnamed: {col}"), str::to_string)
            })
            .collect();
        dedupe_names(names)
    }

    /// Flatten the header and tag every row with `team`.
    ///
    /// An existing `Team` column is overwritten rather than duplicated.
    pub fn into_team_table(self, team: &str) -> TeamTable {
        let mut columns = self.flatten_header();
        let mut rows = self.rows;

        match columns.iter().position(|c| c == TEAM_COLUMN) {
            Some(idx) => {
                for row in &mut rows {
                    row[idx] = team.to_string();
                }
            }
            None => {
                columns.push(TEAM_COLUMN.to_string());
                for row in &mut rows {
                    row.push(team.to_string());
                }
            }
        }

        TeamTable {
            team: team.to_string(),
            columns,
            rows,
        }
    }
}

/// A team's stats table with a single-level header and a `Team` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamTable {
    pub team: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TeamTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Blank labels and the `Unnamed: ...` filler dataframe readers emit for
/// empty header cells.
pub fn is_placeholder(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label.starts_with("Unnamed:")
}

fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        let mut n = next_suffix.get(&name).copied().unwrap_or(0);
        let mut candidate = if n == 0 {
            name.clone()
        } else {
            format!("{name}.{n}")
        };
        // Skip suffixes that collide with a literal column name.
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        next_suffix.insert(name, n + 1);
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = RawTable::new(
            vec![strings(&["Player", "Gls"])],
            vec![strings(&["Saka", "16"]), strings(&["Rice"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_padded_evens_out_levels_and_rows() {
        let table = RawTable::padded(
            vec![strings(&["Player", "Gls"]), strings(&["Player"])],
            vec![strings(&["Saka"]), strings(&["Rice", "7", "extra"])],
        );
        assert_eq!(table.width(), 3);
        assert!(table.header().iter().chain(table.rows()).all(|r| r.len() == 3));
        assert_eq!(table.rows()[0], strings(&["Saka", "", ""]));
        assert_eq!(table.flatten_header(), strings(&["Player", "Gls", "Unnamed: 2"]));
    }

    #[test]
    fn test_deserialize_rejects_ragged_header() {
        let err = serde_json::from_str::<RawTable>(
            r#"{"header":[["Player","Gls"],["Player"]],"rows":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("header level 1 has 1 cells"));
    }

    #[test]
    fn test_deserialize_checked_table_flattens() {
        let table: RawTable = serde_json::from_str(
            r#"{"header":[["","Performance"],["Player","Gls"]],"rows":[["Saka","16"]]}"#,
        )
        .unwrap();
        assert_eq!(table.flatten_header(), strings(&["Player", "Gls"]));
    }

    #[test]
    fn test_flatten_single_level() {
        let table = RawTable::new(vec![strings(&["Player", "Gls"])], vec![]).unwrap();
        assert!(!table.is_multi_level());
        assert_eq!(table.flatten_header(), strings(&["Player", "Gls"]));
    }

    #[test]
    fn test_flatten_prefers_most_specific_label() {
        let table = RawTable::new(
            vec![
                strings(&["", "Playing Time", "Playing Time", "Custom"]),
                strings(&["Player", "MP", "Min", ""]),
            ],
            vec![strings(&["Saka", "38", "3000", "x"])],
        )
        .unwrap();
        assert!(table.is_multi_level());
        assert_eq!(
            table.flatten_header(),
            strings(&["Player", "MP", "Min", "Custom"])
        );
    }

    #[test]
    fn test_flatten_skips_unnamed_placeholders() {
        let table = RawTable::new(
            vec![
                strings(&["Unnamed: 0_level_0", ""]),
                strings(&["Unnamed: 0_level_1", "  "]),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(table.flatten_header(), strings(&["Unnamed: 0", "Unnamed: 1"]));
    }

    #[test]
    fn test_flatten_dedupes_repeated_labels() {
        let table = RawTable::new(
            vec![
                strings(&["Performance", "Per 90 Minutes", "Per 90 Minutes"]),
                strings(&["Gls", "Gls", "Gls"]),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(table.flatten_header(), strings(&["Gls", "Gls.1", "Gls.2"]));
    }

    #[test]
    fn test_dedupe_avoids_literal_collisions() {
        let names = dedupe_names(strings(&["Gls.1", "Gls", "Gls"]));
        assert_eq!(names, strings(&["Gls.1", "Gls", "Gls.2"]));
    }

    #[test]
    fn test_headerless_table_gets_unnamed_columns() {
        let table = RawTable::new(vec![], vec![strings(&["a", "b"])]).unwrap();
        assert_eq!(table.flatten_header(), strings(&["Unnamed: 0", "Unnamed: 1"]));
    }

    #[test]
    fn test_into_team_table_appends_team_column() {
        let table = RawTable::new(
            vec![strings(&["Player", "Gls"])],
            vec![strings(&["Saka", "16"]), strings(&["Ødegaard", "8"])],
        )
        .unwrap();
        let team = table.into_team_table("Arsenal");
        assert_eq!(team.columns, strings(&["Player", "Gls", "Team"]));
        assert_eq!(team.len(), 2);
        assert!(team.rows.iter().all(|r| r[2] == "Arsenal"));
    }

    #[test]
    fn test_into_team_table_overwrites_existing_team_column() {
        let table = RawTable::new(
            vec![strings(&["Player", "Team"])],
            vec![strings(&["Saka", "ARS"])],
        )
        .unwrap();
        let team = table.into_team_table("Arsenal");
        assert_eq!(team.columns, strings(&["Player", "Team"]));
        assert_eq!(team.rows[0], strings(&["Saka", "Arsenal"]));
    }
}
