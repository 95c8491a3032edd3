use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fbref_model::Dataset;
use serde::Serialize;

use crate::error::ScrapeError;

/// Write the dataset as CSV: header row, no index column, absent cells as
/// empty fields.
///
/// Creates the parent directory if it doesn't exist.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), ScrapeError> {
    create_parent(path)?;
    let file = fs::File::create(path).map_err(|e| ScrapeError::write(path, e))?;
    write_csv_to(dataset, file).map_err(|e| ScrapeError::write(path, e))?;
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns.len(),
        "Wrote stats CSV"
    );
    Ok(())
}

pub fn write_csv_to<W: io::Write>(dataset: &Dataset, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Keep a copy of fetched HTML so a page can be re-examined without
/// re-fetching.
pub fn cache_html(dir: &Path, name: &str, html: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.html", sanitize(name)));
    fs::write(&path, html)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(path)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ScrapeError> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| ScrapeError::write(path, e))?;
    fs::write(path, json).map_err(|e| ScrapeError::write(path, e))?;
    tracing::info!(path = %path.display(), "Wrote JSON");
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ScrapeError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| ScrapeError::write(dir, e))
        }
        _ => Ok(()),
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "page".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_shape() {
        let dataset = Dataset {
            columns: vec!["Player".into(), "Min".into(), "Team".into(), "Ast".into()],
            rows: vec![
                vec![Some("Bukayo Saka".into()), Some("2,890".into()), Some("Arsenal".into()), None],
                vec![Some("Cole Palmer".into()), Some("2,600".into()), Some("Chelsea".into()), Some("9".into())],
            ],
        };
        let mut buf = Vec::new();
        write_csv_to(&dataset, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Player,Min,Team,Ast\n\
             Bukayo Saka,\"2,890\",Arsenal,\n\
             Cole Palmer,\"2,600\",Chelsea,9\n"
        );
    }

    #[test]
    fn test_write_csv_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("stats.csv");
        let dataset = Dataset {
            columns: vec!["Team".into()],
            rows: vec![vec![Some("Arsenal".into())]],
        };
        write_csv(&dataset, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Team\nArsenal\n");
    }

    #[test]
    fn test_cache_html_sanitizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_html(dir.path(), "Arsenal-Stats?x=1", "<html></html>").unwrap();
        assert_eq!(path.file_name().unwrap(), "Arsenal-Stats_x_1.html");
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
