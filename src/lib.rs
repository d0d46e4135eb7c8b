//! # arxiv-daily
//!
//! Fetch the newest arXiv submissions for a subject category, parse the Atom
//! feed into paper records and browse them from the terminal.
//!
//! ## Architecture
//!
//! - [`feed`]: transport, incremental feed parser and the fetch pipeline
//! - [`models`]: paper records, categories and feed queries
//! - [`view`]: list/detail presentation state
//! - [`translate`]: abstract translation through a chat-completions API or Youdao
//! - [`ui`]: terminal rendering
//! - [`utils`]: HTTP client, time and display helpers
//! - [`config`]: configuration management

pub mod config;
pub mod feed;
pub mod models;
pub mod translate;
pub mod ui;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use feed::{ArxivTransport, FeedPipeline, FeedTransport, FetchError};
pub use models::{FeedQuery, PaperRecord};
pub use view::PaperListView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
