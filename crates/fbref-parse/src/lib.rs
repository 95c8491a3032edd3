use fbref_model::{RawTable, TeamLink};
use scraper::Html;

pub mod links;
pub mod locate;
pub mod normalize;
pub mod table;

pub use links::{extract_team_links, SITE_ORIGIN, SQUAD_PATH_MARKER};
pub use locate::{locate, TableSearch, STATS_TABLE_MARKER};

/// How many tables a page had, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub marker_matches: usize,
    pub total_tables: usize,
}

/// What was pulled out of one page: table counts plus the extracted value,
/// `None` when the page had no table at all.
#[derive(Debug, Clone)]
pub struct PageExtract<T> {
    pub counts: TableCounts,
    pub value: Option<T>,
}

/// Locate the league table and collect the team links inside it.
pub fn league_team_links(
    html: &str,
    marker: &str,
    origin: &str,
    pattern: &str,
) -> PageExtract<Vec<TeamLink>> {
    let document = Html::parse_document(html);
    let search = locate(&document, marker);
    PageExtract {
        counts: counts(&search),
        value: search
            .table
            .map(|table| extract_team_links(table, origin, pattern)),
    }
}

/// Locate a team page's stats table and parse it.
pub fn team_stats_table(html: &str, marker: &str) -> PageExtract<RawTable> {
    let document = Html::parse_document(html);
    let search = locate(&document, marker);
    PageExtract {
        counts: counts(&search),
        value: search.table.map(table::parse_table),
    }
}

fn counts(search: &TableSearch<'_>) -> TableCounts {
    if search.used_fallback() {
        tracing::debug!(
            total = search.total_tables,
            "No marker table, using first available table"
        );
    }
    TableCounts {
        marker_matches: search.marker_matches,
        total_tables: search.total_tables,
    }
}
