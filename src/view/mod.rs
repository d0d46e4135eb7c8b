//! Presentation adapter between fetched records and the screen.
//!
//! [`PaperListView`] owns the current result sequence and the UI state that
//! survives re-renders: chosen category, chosen result count and scroll
//! position. Rows are addressed by position only; a position is valid until
//! the next [`PaperListView::replace`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    Category, FeedQuery, PaperRecord, CATEGORIES, DEFAULT_CATEGORY, DEFAULT_MAX_RESULTS,
    MAX_RESULTS_LIMIT,
};
use crate::utils::published_label;

/// What the list area should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<'a> {
    /// Explicit empty state, also shown after a failed fetch
    NoResults,
    /// Display titles in record order
    Titles(Vec<&'a str>),
}

/// Everything the detail screen shows for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperDetail {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub published: String,
    /// "3 days ago" style label, when the date parses
    pub published_relative: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub pdf_url: Option<String>,
}

/// List state for the daily feed screen
#[derive(Debug, Clone)]
pub struct PaperListView {
    records: Vec<PaperRecord>,
    category_index: usize,
    result_count: usize,
    scroll_position: usize,
}

impl Default for PaperListView {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            category_index: Category::index_of(DEFAULT_CATEGORY).unwrap_or(0),
            result_count: DEFAULT_MAX_RESULTS,
            scroll_position: 0,
        }
    }
}

impl PaperListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new result sequence and scroll back to the top
    pub fn replace(&mut self, records: Vec<PaperRecord>) {
        self.records = records;
        self.scroll_position = 0;
    }

    /// Drop the current results, e.g. after a failed fetch
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn listing(&self) -> Listing<'_> {
        if self.records.is_empty() {
            Listing::NoResults
        } else {
            Listing::Titles(self.records.iter().map(PaperRecord::title).collect())
        }
    }

    /// Record at a 0-based list position
    pub fn select(&self, position: usize) -> Option<&PaperRecord> {
        self.records.get(position)
    }

    /// Detail screen data for a position
    pub fn detail(&self, position: usize) -> Option<PaperDetail> {
        self.detail_at(position, Utc::now())
    }

    /// Same as [`detail`](Self::detail) with an explicit clock
    pub fn detail_at(&self, position: usize, now: DateTime<Utc>) -> Option<PaperDetail> {
        let record = self.select(position)?;
        Some(PaperDetail {
            id: record.id().to_string(),
            title: record.title().to_string(),
            authors: record.author_line(),
            published: record.published_date().to_string(),
            published_relative: published_label(record.published_date(), now),
            abstract_text: record.abstract_text().to_string(),
            pdf_url: record.has_pdf().then(|| record.pdf_url().to_string()),
        })
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    /// Set the scroll position, clamped to the last row
    pub fn set_scroll_position(&mut self, position: usize) {
        self.scroll_position = position.min(self.records.len().saturating_sub(1));
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn category(&self) -> &'static Category {
        &CATEGORIES[self.category_index]
    }

    /// Choose a category by its index in [`CATEGORIES`]; out-of-range
    /// indices are ignored
    pub fn set_category_index(&mut self, index: usize) -> bool {
        if index < CATEGORIES.len() {
            self.category_index = index;
            true
        } else {
            false
        }
    }

    /// Choose a category by code; unknown codes are ignored
    pub fn set_category(&mut self, code: &str) -> bool {
        match Category::index_of(code) {
            Some(index) => self.set_category_index(index),
            None => false,
        }
    }

    pub fn result_count(&self) -> usize {
        self.result_count
    }

    /// Choose the result count, clamped to the offered range
    pub fn set_result_count(&mut self, count: usize) {
        self.result_count = count.clamp(1, MAX_RESULTS_LIMIT);
    }

    /// Query for the current selection
    pub fn query(&self) -> FeedQuery {
        FeedQuery::new(self.category().code).max_results(self.result_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperRecordBuilder;
    use chrono::TimeZone;

    fn record(n: usize) -> PaperRecord {
        PaperRecordBuilder::new(format!("http://arxiv.org/abs/2401.0000{}v1", n))
            .title(format!("Paper {}", n))
            .authors(["Ada Lovelace", "Alan Turing"])
            .abstract_text("An abstract.")
            .published_date("2024-06-12T12:00:00Z")
            .build()
    }

    #[test]
    fn test_empty_view_shows_no_results() {
        let view = PaperListView::new();
        assert_eq!(view.listing(), Listing::NoResults);
        assert!(view.select(0).is_none());
        assert!(view.detail(0).is_none());
    }

    #[test]
    fn test_listing_preserves_order() {
        let mut view = PaperListView::new();
        view.replace((1..=3).map(record).collect());
        assert_eq!(
            view.listing(),
            Listing::Titles(vec!["Paper 1", "Paper 2", "Paper 3"])
        );
        assert_eq!(view.select(1).map(PaperRecord::title), Some("Paper 2"));
        assert!(view.select(3).is_none());
    }

    #[test]
    fn test_replace_is_full_replacement_and_resets_scroll() {
        let mut view = PaperListView::new();
        view.replace((1..=5).map(record).collect());
        view.set_scroll_position(4);
        assert_eq!(view.scroll_position(), 4);

        view.replace(vec![record(9)]);
        assert_eq!(view.len(), 1);
        assert_eq!(view.scroll_position(), 0);
        assert_eq!(view.listing(), Listing::Titles(vec!["Paper 9"]));

        view.clear();
        assert_eq!(view.listing(), Listing::NoResults);
    }

    #[test]
    fn test_scroll_position_is_clamped() {
        let mut view = PaperListView::new();
        view.set_scroll_position(7);
        assert_eq!(view.scroll_position(), 0);

        view.replace((1..=3).map(record).collect());
        view.set_scroll_position(50);
        assert_eq!(view.scroll_position(), 2);
    }

    #[test]
    fn test_detail() {
        let mut view = PaperListView::new();
        let with_pdf = PaperRecordBuilder::new("http://arxiv.org/abs/2401.00001v1")
            .title("With PDF")
            .author("Grace Hopper")
            .published_date("2024-06-14T12:00:00Z")
            .pdf_url("http://arxiv.org/pdf/2401.00001v1")
            .build();
        view.replace(vec![record(1), with_pdf]);

        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        let first = view.detail_at(0, now).unwrap();
        assert_eq!(first.authors, "Ada Lovelace, Alan Turing");
        assert_eq!(first.published_relative.as_deref(), Some("3 days ago"));
        assert_eq!(first.pdf_url, None);

        let second = view.detail_at(1, now).unwrap();
        assert_eq!(second.title, "With PDF");
        assert_eq!(second.published_relative.as_deref(), Some("yesterday"));
        assert_eq!(
            second.pdf_url.as_deref(),
            Some("http://arxiv.org/pdf/2401.00001v1")
        );
    }

    #[test]
    fn test_unparseable_date_has_no_relative_label() {
        let mut view = PaperListView::new();
        view.replace(vec![PaperRecordBuilder::new("x")
            .published_date("sometime")
            .build()]);
        let detail = view.detail(0).unwrap();
        assert_eq!(detail.published, "sometime");
        assert!(detail.published_relative.is_none());
    }

    #[test]
    fn test_selection_state_builds_query() {
        let mut view = PaperListView::new();
        assert_eq!(view.category().code, "cs.CV");
        assert_eq!(view.result_count(), 10);

        assert!(view.set_category("stat"));
        assert!(!view.set_category("astro-ph"));
        assert!(!view.set_category_index(CATEGORIES.len()));
        view.set_result_count(500);

        let query = view.query();
        assert_eq!(query.category, "stat");
        assert_eq!(query.max_results, 100);

        view.set_result_count(0);
        assert_eq!(view.result_count(), 1);
    }
}
