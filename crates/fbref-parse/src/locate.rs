use scraper::{ElementRef, Html, Selector};

/// Class fbref puts on its sortable stats tables.
pub const STATS_TABLE_MARKER: &str = "stats_table";

/// Outcome of a table search on one page.
#[derive(Debug, Clone, Copy)]
pub struct TableSearch<'a> {
    /// Selected table, if any.
    pub table: Option<ElementRef<'a>>,
    /// Tables carrying the marker class.
    pub marker_matches: usize,
    /// Tables of any kind.
    pub total_tables: usize,
}

impl TableSearch<'_> {
    /// True when the table was picked by the fallback rather than the marker.
    pub fn used_fallback(&self) -> bool {
        self.marker_matches == 0 && self.table.is_some()
    }
}

/// Find the first `<table>` with class `marker`; fall back to the first
/// table of any kind. Later matches are never preferred.
pub fn locate<'a>(document: &'a Html, marker: &str) -> TableSearch<'a> {
    let table_sel = Selector::parse("table").expect("valid selector");

    let mut first_marked = None;
    let mut first_any = None;
    let mut marker_matches = 0;
    let mut total_tables = 0;

    for table in document.select(&table_sel) {
        total_tables += 1;
        if first_any.is_none() {
            first_any = Some(table);
        }
        if table.value().classes().any(|c| c == marker) {
            marker_matches += 1;
            if first_marked.is_none() {
                first_marked = Some(table);
            }
        }
    }

    tracing::debug!(marker, marker_matches, total_tables, "Table search");

    TableSearch {
        table: first_marked.or(first_any),
        marker_matches,
        total_tables,
    }
}
