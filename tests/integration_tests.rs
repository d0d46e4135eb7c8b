//! Integration tests for arxiv-daily
//!
//! These tests drive the full fetch path (HTTP transport, parser, list view)
//! against a local mock server.

use arxiv_daily::feed::{ArxivTransport, FeedPipeline, FetchError, MockTransport};
use arxiv_daily::models::FeedQuery;
use arxiv_daily::utils::HttpClient;
use arxiv_daily::view::{Listing, PaperListView};
use mockito::{Matcher, Server};
use std::sync::Arc;

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=cat:cs.CV</title>
  <entry>
    <id>http://arxiv.org/abs/2406.00001v1</id>
    <published>2024-06-14T17:59:59Z</published>
    <title>Seeing Further:
      Long-Range Vision Transformers</title>
    <summary>  We study long-range attention.
  Results are strong.
</summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/2406.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2406.00001v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2406.00002v1</id>
    <published>2024-06-13T09:00:00Z</published>
    <title>Robust Depth &amp; Flow</title>
    <summary>Short.</summary>
    <author><name>Grace Hopper</name></author>
  </entry>
</feed>"#;

fn transport_for(server: &Server) -> ArxivTransport {
    ArxivTransport::with_client(
        Arc::new(HttpClient::new().unwrap()),
        format!("{}/api/query", server.url()),
    )
}

#[tokio::test]
async fn test_fetch_and_display_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search_query".into(), "cat:cs.CV".into()),
            Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
            Matcher::UrlEncoded("sortOrder".into(), "descending".into()),
            Matcher::UrlEncoded("max_results".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(SAMPLE_FEED)
        .expect(1)
        .create_async()
        .await;

    let pipeline = FeedPipeline::new(transport_for(&server));
    let records = pipeline
        .fetch(&FeedQuery::new("cs.CV").max_results(2))
        .await
        .unwrap();
    mock.assert_async().await;

    let mut view = PaperListView::new();
    view.replace(records);

    assert_eq!(
        view.listing(),
        Listing::Titles(vec![
            "Seeing Further: Long-Range Vision Transformers",
            "Robust Depth & Flow",
        ])
    );

    let first = view.select(0).unwrap();
    assert_eq!(first.id(), "http://arxiv.org/abs/2406.00001v1");
    assert_eq!(first.authors(), ["Ada Lovelace", "Alan Turing"]);
    assert_eq!(
        first.abstract_text(),
        "We study long-range attention. Results are strong."
    );
    assert_eq!(first.published_date(), "2024-06-14T17:59:59Z");
    assert_eq!(first.pdf_url(), "http://arxiv.org/pdf/2406.00001v1");

    let second = view.detail(1).unwrap();
    assert_eq!(second.authors, "Grace Hopper");
    assert_eq!(second.pdf_url, None);
}

#[tokio::test]
async fn test_single_entry_example() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            "<feed><entry><id>http://x/1</id><title>  A\nStudy\n</title>\
             <summary>Abstract text.</summary>\
             <published>2024-01-01T00:00:00Z</published>\
             <author><name>Jane Doe</name></author>\
             <link rel=\"related\" title=\"pdf\" href=\"http://x/1.pdf\"/>\
             </entry></feed>",
        )
        .create_async()
        .await;

    let records = FeedPipeline::new(transport_for(&server))
        .fetch(&FeedQuery::new("cs.AI").max_results(1))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), "http://x/1");
    assert_eq!(records[0].title(), "A Study");
    assert_eq!(records[0].authors(), ["Jane Doe"]);
    assert_eq!(records[0].abstract_text(), "Abstract text.");
    assert_eq!(records[0].published_date(), "2024-01-01T00:00:00Z");
    assert_eq!(records[0].pdf_url(), "http://x/1.pdf");
}

#[tokio::test]
async fn test_server_error_leaves_view_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let mut view = PaperListView::new();
    match FeedPipeline::new(transport_for(&server))
        .fetch(&FeedQuery::default())
        .await
    {
        Ok(records) => view.replace(records),
        Err(e) => {
            assert!(matches!(e, FetchError::Status { status: 500, .. }));
            view.clear();
        }
    }
    assert_eq!(view.listing(), Listing::NoResults);
}

#[tokio::test]
async fn test_truncated_feed_keeps_complete_entries() {
    let cut = SAMPLE_FEED
        .find("<title>Robust")
        .expect("second entry title");
    let pipeline = FeedPipeline::new(MockTransport::with_body(&SAMPLE_FEED[..cut]));

    let records = pipeline.fetch(&FeedQuery::default()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), "http://arxiv.org/abs/2406.00001v1");
}

#[tokio::test]
async fn test_refetch_replaces_previous_results() {
    let transport = Arc::new(MockTransport::with_body(SAMPLE_FEED));
    let pipeline = FeedPipeline::from_arc(transport.clone());
    let mut view = PaperListView::new();

    view.replace(pipeline.fetch(&view.query()).await.unwrap());
    assert_eq!(view.len(), 2);

    transport.set_body("<feed></feed>");
    view.set_category("cs.RO");
    view.replace(pipeline.fetch(&view.query()).await.unwrap());
    assert_eq!(view.listing(), Listing::NoResults);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].category, "cs.CV");
    assert_eq!(requests[1].category, "cs.RO");
}
