use fbref_model::TeamLink;
use scraper::{ElementRef, Selector};

pub const SITE_ORIGIN: &str = "https://fbref.com";

/// Path fragment shared by every squad page link.
pub const SQUAD_PATH_MARKER: &str = "/squads/";

/// Collect team page links from a located table.
///
/// Keeps every `href` containing `pattern`, in document order, duplicates
/// included. Relative targets are prefixed with `origin`; absolute and
/// scheme-relative (`//host/...`) targets survive only if they resolve under
/// `origin`.
pub fn extract_team_links(table: ElementRef<'_>, origin: &str, pattern: &str) -> Vec<TeamLink> {
    let a_sel = Selector::parse("a[href]").expect("valid selector");
    let origin = origin.trim_end_matches('/');

    table
        .select(&a_sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(pattern))
        .filter_map(|href| resolve(href, origin))
        .map(TeamLink::new)
        .collect()
}

fn resolve(href: &str, origin: &str) -> Option<String> {
    // Scheme-relative: `//host/path`.
    if let Some(rest) = href.strip_prefix("//") {
        return resolve(&format!("https://{rest}"), origin);
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        if href.starts_with(origin) {
            return Some(href.to_string());
        }
        tracing::debug!(href, "Skipping off-site team link");
        return None;
    }
    if href.starts_with('/') {
        Some(format!("{origin}{href}"))
    } else {
        Some(format!("{origin}/{href}"))
    }
}
