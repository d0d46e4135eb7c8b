//! Fetch-then-parse pipeline.

use std::sync::Arc;

use crate::feed::{parse, FeedTransport, FetchError};
use crate::models::{FeedQuery, PaperRecord};

/// Parser signature used by the pipeline
pub type ParseFn = fn(&str) -> Vec<PaperRecord>;

/// One fetch is one task: validate, request, parse.
///
/// The transport call is the only await point. Parsing runs inline once the
/// body has arrived and is skipped entirely when the transport fails.
#[derive(Debug, Clone)]
pub struct FeedPipeline {
    transport: Arc<dyn FeedTransport>,
    parser: ParseFn,
}

impl FeedPipeline {
    pub fn new(transport: impl FeedTransport + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn FeedTransport>) -> Self {
        Self {
            transport,
            parser: parse,
        }
    }

    /// Replace the parser (for testing)
    pub fn with_parser(mut self, parser: ParseFn) -> Self {
        self.parser = parser;
        self
    }

    pub fn transport(&self) -> &Arc<dyn FeedTransport> {
        &self.transport
    }

    /// Fetch and parse the feed for a query
    pub async fn fetch(&self, query: &FeedQuery) -> Result<Vec<PaperRecord>, FetchError> {
        query.validate()?;

        let body = self.transport.fetch_feed(query).await.map_err(|e| {
            tracing::warn!(
                transport = self.transport.name(),
                category = %query.category,
                "Feed fetch failed: {}",
                e
            );
            e
        })?;

        let records = (self.parser)(&body);
        tracing::debug!(
            transport = self.transport.name(),
            category = %query.category,
            requested = query.max_results,
            parsed = records.len(),
            "Parsed feed"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &str = r#"<feed>
  <entry><id>1</id><title>First</title></entry>
  <entry><id>2</id><title>Second</title></entry>
</feed>"#;

    static PARSE_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting_parser(raw: &str) -> Vec<PaperRecord> {
        PARSE_CALLS.fetch_add(1, Ordering::SeqCst);
        parse(raw)
    }

    #[tokio::test]
    async fn test_fetch_parses_body() {
        let transport = Arc::new(MockTransport::with_body(BODY));
        let pipeline = FeedPipeline::from_arc(transport.clone());

        let records = pipeline.fetch(&FeedQuery::new("cs.AI")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "First");
        assert_eq!(records[1].title(), "Second");
        assert_eq!(transport.requests()[0].category, "cs.AI");
    }

    #[tokio::test]
    async fn test_transport_failure_skips_parser() {
        let before = PARSE_CALLS.load(Ordering::SeqCst);
        let pipeline = FeedPipeline::new(MockTransport::failing(FetchError::Timeout(
            "operation timed out".into(),
        )))
        .with_parser(counting_parser);

        let err = pipeline.fetch(&FeedQuery::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
        assert_eq!(PARSE_CALLS.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_invalid_query_never_reaches_transport() {
        let transport = Arc::new(MockTransport::with_body(BODY));
        let pipeline = FeedPipeline::from_arc(transport.clone());

        let err = pipeline
            .fetch(&FeedQuery::new("cs.CV").max_results(0))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidQuery(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_feed_without_entries_is_not_an_error() {
        let pipeline = FeedPipeline::new(MockTransport::with_body("<feed></feed>"));
        let records = pipeline.fetch(&FeedQuery::default()).await.unwrap();
        assert!(records.is_empty());
    }
}
