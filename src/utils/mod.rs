//! Utility modules shared by the library and the CLI.
//!
//! - [`HttpClient`]: shared reqwest client with configured timeouts
//! - [`format_relative`]: "3 days ago" style labels for publication dates
//! - [`truncate_with_ellipsis`]: unicode-aware truncation for table cells
//!
//! # Relative dates
//!
//! ```rust
//! use arxiv_daily::utils::{format_relative, parse_published};
//!
//! let then = parse_published("2024-06-14T12:00:00Z").unwrap();
//! let now = parse_published("2024-06-15T12:00:00Z").unwrap();
//! assert_eq!(format_relative(then, now), "yesterday");
//! ```

mod display;
mod http;
mod time;

pub use display::{
    display_width, is_terminal, listing_columns, terminal_width, truncate_at_word,
    truncate_with_ellipsis,
};
pub use http::{HttpClient, HttpSettings};
pub use time::{format_relative, from_timestamp, parse_published, published_label};
