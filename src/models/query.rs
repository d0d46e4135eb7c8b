//! Feed request parameters.

use serde::{Deserialize, Serialize};

use crate::feed::FetchError;
use crate::models::DEFAULT_CATEGORY;

/// Largest result count the picker offers
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Result count used when none was chosen
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Parameters of one daily-feed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Category code for the `cat:` filter
    pub category: String,

    /// Pagination offset
    pub start: usize,

    /// Number of entries to request
    pub max_results: usize,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            start: 0,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl FeedQuery {
    /// Create a query for a category with default paging
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set pagination offset
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Check the query against the bounds the feed accepts
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.category.trim().is_empty() {
            return Err(FetchError::InvalidQuery(
                "category code must not be empty".to_string(),
            ));
        }
        if self.category.chars().any(char::is_whitespace) {
            return Err(FetchError::InvalidQuery(format!(
                "category code '{}' must not contain whitespace",
                self.category
            )));
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(FetchError::InvalidQuery(format!(
                "result count must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, self.max_results
            )));
        }
        Ok(())
    }
}
