//! Core data models for feed requests and parsed papers.

mod category;
mod paper;
mod query;

pub use category::{Category, CATEGORIES, DEFAULT_CATEGORY};
pub use paper::{PaperRecord, PaperRecordBuilder};
pub use query::{FeedQuery, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};
