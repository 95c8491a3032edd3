use std::collections::HashMap;

use serde::Serialize;

use crate::table::TeamTable;

/// Row-wise union of every team table.
///
/// Columns are the superset of all input columns in first-seen order. A
/// cell is `None` when the row's source table had no such column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Append all rows of `tables` in order, reconciling columns by name.
    pub fn concat(tables: Vec<TeamTable>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for table in &tables {
            for name in &table.columns {
                if !index.contains_key(name) {
                    index.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
        }

        let total: usize = tables.iter().map(TeamTable::len).sum();
        let mut rows = Vec::with_capacity(total);

        for table in tables {
            let positions: Vec<usize> = table.columns.iter().map(|c| index[c]).collect();
            for row in table.rows {
                let mut out = vec![None; columns.len()];
                for (cell, &pos) in row.into_iter().zip(&positions) {
                    out[pos] = Some(cell);
                }
                rows.push(out);
            }
        }

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom. `None` if the column is unknown.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|c| c.as_deref()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, columns: &[&str], rows: &[&[&str]]) -> TeamTable {
        TeamTable {
            team: name.to_string(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_concat_unions_columns_in_first_seen_order() {
        let a = team(
            "A",
            &["Player", "Goals", "Team"],
            &[&["p1", "1", "A"], &["p2", "2", "A"]],
        );
        let b = team(
            "B",
            &["Player", "Goals", "Assists", "Team"],
            &[&["p3", "3", "7", "B"]],
        );

        let ds = Dataset::concat(vec![a, b]);

        assert_eq!(ds.columns, vec!["Player", "Goals", "Team", "Assists"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("Assists").unwrap(), vec![None, None, Some("7")]);
        assert_eq!(ds.column("Team").unwrap(), vec![Some("A"), Some("A"), Some("B")]);
        assert_eq!(
            ds.rows[2],
            vec![
                Some("p3".to_string()),
                Some("3".to_string()),
                Some("B".to_string()),
                Some("7".to_string()),
            ]
        );
    }

    #[test]
    fn test_concat_fills_columns_missing_from_later_tables() {
        let a = team("A", &["Player", "xG", "Team"], &[&["p1", "0.4", "A"]]);
        let b = team("B", &["Player", "Team"], &[&["p2", "B"]]);

        let ds = Dataset::concat(vec![a, b]);

        assert_eq!(ds.column("xG").unwrap(), vec![Some("0.4"), None]);
    }

    #[test]
    fn test_concat_empty() {
        let ds = Dataset::concat(vec![]);
        assert!(ds.is_empty());
        assert!(ds.columns.is_empty());
        assert_eq!(ds.column("Team"), None);
    }
}
