//! Fetch fbref league and team pages and turn them into one stats CSV.

pub mod browser;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod source;

pub use browser::BrowserSession;
pub use config::{ScrapeConfig, SourceKind, WaitPolicy};
pub use error::ScrapeError;
pub use pipeline::{run, run_and_close, RunReport};
pub use source::{HttpSource, PageSource};
