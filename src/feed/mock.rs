//! Mock transport for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::feed::{FeedTransport, FetchError};
use crate::models::FeedQuery;

/// A mock transport that returns a predefined body or failure.
#[derive(Debug, Default)]
pub struct MockTransport {
    response: Mutex<Option<Result<String, FetchError>>>,
    requests: Mutex<Vec<FeedQuery>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every request with `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_body(body);
        mock
    }

    /// Mock that fails every request with `error`.
    pub fn failing(error: FetchError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    /// Set the body to return.
    pub fn set_body(&self, body: impl Into<String>) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Ok(body.into()));
    }

    /// Set the failure to return.
    pub fn set_error(&self, error: FetchError) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Err(error));
    }

    /// Queries received so far, oldest first.
    pub fn requests(&self) -> Vec<FeedQuery> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(query.clone());
        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(response) => response.clone(),
            None => Err(FetchError::EmptyBody),
        }
    }
}
