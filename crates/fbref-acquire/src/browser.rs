//! Headless Chromium session driven over the DevTools protocol.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::{ScrapeConfig, WaitPolicy};
use crate::error::ScrapeError;
use crate::source::PageSource;

/// One browser process with a single tab, reused for every page.
///
/// Call [`BrowserSession::close`] when done. If the session is dropped
/// without it (early return, panic), the CDP handler is stopped and the
/// browser process is killed on drop.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl BrowserSession {
    pub async fn launch(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let browser_config = browser_config(config)?;

        let (mut browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // The handler must keep being polled for the browser to respond.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "CDP handler error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(ScrapeError::Launch(format!("failed to open tab: {e}")));
            }
        };

        tracing::info!(headless = config.headless, "Browser ready");
        Ok(Self {
            browser,
            page,
            handler,
            closed: false,
        })
    }

    /// Shut the browser down and wait for the process to exit.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "Waiting for browser exit failed");
        }
        self.handler.abort();
        self.closed = true;
        tracing::info!("Browser closed");
    }

    /// Poll for `wait.selector` until it matches or the timeout passes.
    async fn wait_until_ready(&self, wait: &WaitPolicy) -> bool {
        let deadline = Instant::now() + wait.timeout;
        loop {
            if self.page.find_element(wait.selector.as_str()).await.is_ok() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(wait.poll).await;
        }
    }
}

impl PageSource for BrowserSession {
    async fn render(&mut self, url: &str, wait: &WaitPolicy) -> Result<String, ScrapeError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;

        let started = Instant::now();
        if self.wait_until_ready(wait).await {
            tracing::debug!(url, elapsed_ms = started.elapsed().as_millis() as u64, "Page ready");
        } else {
            tracing::warn!(
                url,
                selector = %wait.selector,
                timeout_secs = wait.timeout.as_secs(),
                "Page not ready before timeout, using current markup"
            );
        }

        self.page
            .content()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))
    }

    async fn close(self) {
        BrowserSession::close(self).await;
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Browser session dropped without close, killing browser");
        }
        self.handler.abort();
    }
}

/// Command-line switches passed to Chromium.
pub fn launch_args(config: &ScrapeConfig) -> Vec<String> {
    vec![
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--no-first-run".to_string(),
        "--mute-audio".to_string(),
        format!("--user-agent={}", config.user_agent),
    ]
}

fn browser_config(config: &ScrapeConfig) -> Result<BrowserConfig, ScrapeError> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .window_size(1920, 1080)
        .args(launch_args(config));

    if !config.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    builder
        .build()
        .map_err(|e| ScrapeError::Launch(format!("invalid browser config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_args_carry_user_agent() {
        let config = ScrapeConfig {
            user_agent: "test-agent/1.0".into(),
            ..ScrapeConfig::default()
        };
        let args = launch_args(&config);
        assert!(args.contains(&"--user-agent=test-agent/1.0".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
    }
}
