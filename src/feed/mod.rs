//! Daily feed ingestion: transport, parsing and the fetch pipeline.
//!
//! The [`FeedTransport`] trait is the seam between the pipeline and the
//! network. [`ArxivTransport`] talks to the real arXiv query API and
//! [`MockTransport`] serves canned bodies or failures in tests.
//!
//! ```rust,no_run
//! use arxiv_daily::feed::{ArxivTransport, FeedPipeline};
//! use arxiv_daily::models::FeedQuery;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = FeedPipeline::new(ArxivTransport::new()?);
//! let papers = pipeline.fetch(&FeedQuery::new("cs.CL").max_results(5)).await?;
//! for paper in &papers {
//!     println!("{}", paper.title());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod parser;
mod pipeline;
mod transport;

pub use mock::MockTransport;
pub use parser::{normalize_text, parse};
pub use pipeline::FeedPipeline;
pub use transport::{ArxivTransport, ARXIV_API_URL};

use async_trait::async_trait;

use crate::models::FeedQuery;

/// Fetches the raw body of a feed request.
///
/// Implementations make exactly one request per call: no retries and no
/// caching at this layer.
#[async_trait]
pub trait FeedTransport: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Fetch the raw feed text for a query
    async fn fetch_feed(&self, query: &FeedQuery) -> Result<String, FetchError>;
}

/// Errors that can occur while fetching a feed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The query is outside the bounds the feed accepts
    #[error("Invalid request: {0}")]
    InvalidQuery(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("Feed returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response had no content
    #[error("Feed returned an empty response")]
    EmptyBody,

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_builder() {
            FetchError::Client(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
