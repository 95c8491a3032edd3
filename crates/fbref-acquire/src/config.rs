use std::path::PathBuf;
use std::time::Duration;

use fbref_parse::{SITE_ORIGIN, SQUAD_PATH_MARKER, STATS_TABLE_MARKER};

pub const DEFAULT_LEAGUE_URL: &str = "https://fbref.com/en/comps/9/Premier-League-Stats";
pub const DEFAULT_OUTPUT: &str = "stats.csv";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_LEAGUE_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_TEAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_MS: u64 = 250;
/// Courtesy pause between team pages.
pub const DEFAULT_TEAM_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Headless Chromium; runs page scripts.
    #[default]
    Browser,
    /// Plain HTTP GET; no rendering.
    Http,
}

/// Settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub league_url: String,
    /// Prefix for relative team links.
    pub origin: String,
    /// CSS class identifying stats tables.
    pub table_marker: String,
    /// Substring a link must contain to count as a team page.
    pub link_pattern: String,
    pub user_agent: String,
    /// Element whose presence means the page has rendered. `None` waits for
    /// a table carrying `table_marker`.
    pub ready_selector: Option<String>,
    pub league_timeout: Duration,
    pub team_timeout: Duration,
    pub poll_interval: Duration,
    pub team_delay: Duration,
    pub output: PathBuf,
    pub source: SourceKind,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    /// Directory for raw HTML copies of every fetched page.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            league_url: DEFAULT_LEAGUE_URL.to_string(),
            origin: SITE_ORIGIN.to_string(),
            table_marker: STATS_TABLE_MARKER.to_string(),
            link_pattern: SQUAD_PATH_MARKER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ready_selector: None,
            league_timeout: Duration::from_secs(DEFAULT_LEAGUE_TIMEOUT_SECS),
            team_timeout: Duration::from_secs(DEFAULT_TEAM_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            team_delay: Duration::from_millis(DEFAULT_TEAM_DELAY_MS),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source: SourceKind::default(),
            headless: true,
            chrome_executable: None,
            cache_dir: None,
        }
    }
}

impl ScrapeConfig {
    pub fn league_wait(&self) -> WaitPolicy {
        self.wait(self.league_timeout)
    }

    pub fn team_wait(&self) -> WaitPolicy {
        self.wait(self.team_timeout)
    }

    pub fn ready_selector(&self) -> String {
        self.ready_selector
            .clone()
            .unwrap_or_else(|| format!("table.{}", self.table_marker))
    }

    fn wait(&self, timeout: Duration) -> WaitPolicy {
        WaitPolicy {
            selector: self.ready_selector(),
            timeout,
            poll: self.poll_interval,
        }
    }
}

/// How long a page source may wait for `selector` to appear before handing
/// back whatever markup it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    pub selector: String,
    pub timeout: Duration,
    pub poll: Duration,
}
