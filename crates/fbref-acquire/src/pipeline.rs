//! League page → team links → per-team tables → one CSV.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fbref_model::{Dataset, TeamLink, TeamTable};
use fbref_parse::normalize::snippet;
use serde::Serialize;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::output;
use crate::source::PageSource;

/// Characters of league markup included when no table is found.
const SNIPPET_CHARS: usize = 500;

/// Summary of one scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub league_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub teams_found: usize,
    pub teams_scraped: usize,
    pub skipped: Vec<String>,
    pub rows: usize,
    pub columns: usize,
    /// `None` when nothing was scraped and no file was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Tables collected from the team pages, plus the teams that had none.
#[derive(Debug, Default)]
pub struct TeamExtraction {
    pub tables: Vec<TeamTable>,
    pub skipped: Vec<String>,
}

/// Run the whole scrape against `source`.
///
/// The league page must contain a table; team pages without one are
/// skipped. Nothing is written unless at least one team table was found.
pub async fn run<S: PageSource>(
    source: &mut S,
    config: &ScrapeConfig,
) -> Result<RunReport, ScrapeError> {
    let started_at = Utc::now();

    let links = discover_team_links(source, config).await?;
    let teams_found = links.len();

    let TeamExtraction { tables, skipped } = extract_team_tables(source, &links, config).await?;
    let teams_scraped = tables.len();

    let mut report = RunReport {
        league_url: config.league_url.clone(),
        started_at,
        finished_at: started_at,
        teams_found,
        teams_scraped,
        skipped,
        rows: 0,
        columns: 0,
        output: None,
    };

    if tables.is_empty() {
        tracing::warn!("No team data was successfully scraped");
        report.finished_at = Utc::now();
        return Ok(report);
    }

    fbref_validate::column_drift(&tables);
    let dataset = Dataset::concat(tables);
    fbref_validate::validate_dataset(&dataset);

    output::write_csv(&dataset, &config.output)?;

    tracing::info!(
        teams = teams_scraped,
        path = %config.output.display(),
        "Successfully scraped data for {teams_scraped} teams"
    );
    tracing::info!(rows = dataset.len(), "Total rows of data: {}", dataset.len());

    report.rows = dataset.len();
    report.columns = dataset.columns.len();
    report.output = Some(config.output.clone());
    report.finished_at = Utc::now();
    Ok(report)
}

/// Run the scrape and close `source` afterwards, whether the run succeeded
/// or not.
pub async fn run_and_close<S: PageSource>(
    mut source: S,
    config: &ScrapeConfig,
) -> Result<RunReport, ScrapeError> {
    let result = run(&mut source, config).await;
    if let Err(e) = &result {
        tracing::debug!(error = %e, "Run failed, closing page source");
    }
    source.close().await;
    result
}

/// Render the league page and collect team links from its table.
pub async fn discover_team_links<S: PageSource>(
    source: &mut S,
    config: &ScrapeConfig,
) -> Result<Vec<TeamLink>, ScrapeError> {
    let url = config.league_url.as_str();
    tracing::info!(url, "Fetching league page");
    let html = source.render(url, &config.league_wait()).await?;
    cache_page(config, "league", &html);

    let page = fbref_parse::league_team_links(
        &html,
        &config.table_marker,
        &config.origin,
        &config.link_pattern,
    );
    tracing::info!(
        marker = %config.table_marker,
        marker_tables = page.counts.marker_matches,
        total_tables = page.counts.total_tables,
        "Found {} tables with class '{}'",
        page.counts.marker_matches,
        config.table_marker
    );

    let Some(links) = page.value else {
        return Err(ScrapeError::LeagueTableNotFound {
            url: url.to_string(),
            snippet: snippet(&html, SNIPPET_CHARS).to_string(),
        });
    };

    tracing::info!(count = links.len(), "Found {} team links", links.len());
    Ok(links)
}

/// Visit every team page in order and collect its stats table.
pub async fn extract_team_tables<S: PageSource>(
    source: &mut S,
    links: &[TeamLink],
    config: &ScrapeConfig,
) -> Result<TeamExtraction, ScrapeError> {
    let mut extraction = TeamExtraction::default();
    let wait = config.team_wait();

    for (i, link) in links.iter().enumerate() {
        let team = link.identity();
        tracing::info!(
            index = i + 1,
            total = links.len(),
            team = %team,
            "Processing team {}/{}: {team}",
            i + 1,
            links.len()
        );

        let html = source.render(link.as_str(), &wait).await?;
        cache_page(config, link.slug(), &html);

        let page = fbref_parse::team_stats_table(&html, &config.table_marker);

        let Some(raw) = page.value else {
            tracing::warn!(team = %team, url = %link, "No stats table found for {team}, skipping");
            extraction.skipped.push(team);
            continue;
        };

        if raw.is_multi_level() {
            tracing::debug!(team = %team, levels = raw.header_levels(), "Flattening multi-level header");
        }
        let table = raw.into_team_table(&team);
        tracing::debug!(team = %team, rows = table.len(), columns = table.columns.len(), "Extracted team table");
        extraction.tables.push(table);

        if i + 1 < links.len() && !config.team_delay.is_zero() {
            tokio::time::sleep(config.team_delay).await;
        }
    }

    Ok(extraction)
}

/// Best effort: a failed cache write never aborts the run.
fn cache_page(config: &ScrapeConfig, name: &str, html: &str) {
    if let Some(dir) = &config.cache_dir {
        if let Err(e) = output::cache_html(dir, name, html) {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to cache HTML");
        }
    }
}
