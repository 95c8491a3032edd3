use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Trailing pattern fbref appends to squad page slugs (e.g. "Arsenal-Stats").
pub const TEAM_SUFFIX_PATTERN: &str = "-Stats$";

/// An absolute URL pointing at one team's stats page.
///
/// Produced by the link extractor, consumed once by the team table extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamLink(String);

impl TeamLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last non-empty path segment, ignoring any query string or fragment.
    pub fn slug(&self) -> &str {
        let path = self.0.split(|c| c == '?' || c == '#').next().unwrap_or_default();
        path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
    }

    /// Short team name used to tag every row scraped from this page.
    ///
    /// `https://fbref.com/en/squads/abc123/Arsenal-Stats` → `Arsenal`.
    pub fn identity(&self) -> String {
        suffix_regex().replace(self.slug(), "").into_owned()
    }
}

impl fmt::Display for TeamLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn suffix_regex() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(TEAM_SUFFIX_PATTERN).expect("valid regex"))
}
