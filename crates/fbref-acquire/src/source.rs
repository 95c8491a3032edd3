use std::time::Duration;

use crate::config::WaitPolicy;
use crate::error::ScrapeError;

/// Something that turns a URL into page markup.
///
/// Implementations are used strictly one request at a time.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn render(&mut self, url: &str, wait: &WaitPolicy) -> Result<String, ScrapeError>;

    /// Release whatever the source holds open. Sources without external
    /// resources keep the default no-op.
    async fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Fetches raw server HTML over HTTP. Client-side scripts never run, so
/// tables injected by JavaScript will be missing.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn render(&mut self, url: &str, _wait: &WaitPolicy) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::navigation(url, format!("HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;
        tracing::debug!(url, bytes = html.len(), "Received HTML");
        Ok(html)
    }
}
