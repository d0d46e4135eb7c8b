//! CLI UI utilities for terminal output.
//!
//! Colored status lines, the paper listing table, the detail screen and a
//! spinner shown while a fetch is in flight.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::CATEGORIES;
use crate::translate::Translation;
use crate::utils::{listing_columns, truncate_at_word, truncate_with_ellipsis};
use crate::view::{Listing, PaperDetail, PaperListView};

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// A status message prefixed with its colored icon
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a styled status message to stdout.
pub fn print_status(status: Status, msg: &str) {
    println!("{}", status_line(status, msg));
}

/// Print a styled status message to stderr.
pub fn eprint_status(status: Status, msg: &str) {
    eprintln!("{}", status_line(status, msg));
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Message shown in place of an empty list
pub const NO_RESULTS: &str = "No papers found";

/// Build the listing table for the current results.
///
/// Returns `None` for the no-results state.
pub fn listing_table(view: &PaperListView, terminal_width: usize) -> Option<Table> {
    let titles = match view.listing() {
        Listing::NoResults => return None,
        Listing::Titles(titles) => titles,
    };
    let (title_width, authors_width, _) = listing_columns(terminal_width);

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec!["#", "Title", "Authors", "Published"]);

    for (position, title) in titles.into_iter().enumerate() {
        let Some(record) = view.select(position) else {
            continue;
        };
        let published: String = record.published_date().chars().take(10).collect();
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(truncate_at_word(title, title_width)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&record.author_line(), authors_width)),
            Cell::new(published),
        ]);
    }
    Some(table)
}

/// Print the listing, or the explicit no-results state
pub fn print_listing(view: &PaperListView, terminal_width: usize) {
    match listing_table(view, terminal_width) {
        Some(table) => println!("{table}"),
        None => print_status(Status::Info, NO_RESULTS),
    }
}

/// One line per record: `N. Title (authors)`
pub fn plain_listing(view: &PaperListView) -> String {
    match view.listing() {
        Listing::NoResults => NO_RESULTS.to_string(),
        Listing::Titles(titles) => titles
            .iter()
            .enumerate()
            .map(|(i, title)| match view.select(i) {
                Some(record) if !record.authors().is_empty() => {
                    format!("{}. {} ({})", i + 1, title, record.author_line())
                }
                _ => format!("{}. {}", i + 1, title),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print the detail screen for one paper
pub fn print_detail(detail: &PaperDetail, translation: Option<&Translation>) {
    println!();
    println!("{}", detail.title.blue().bold());
    println!("{}", "─".repeat(detail.title.chars().count().clamp(10, 80)).dimmed());

    if !detail.authors.is_empty() {
        println!("{} {}", "Authors:".bold(), detail.authors);
    }
    match &detail.published_relative {
        Some(relative) => println!(
            "{} {} ({})",
            "Published:".bold(),
            detail.published,
            relative.yellow()
        ),
        None if !detail.published.is_empty() => {
            println!("{} {}", "Published:".bold(), detail.published)
        }
        None => {}
    }
    println!("{} {}", "Link:".bold(), detail.id.cyan());
    if let Some(pdf) = &detail.pdf_url {
        println!("{} {}", "PDF:".bold(), pdf.cyan());
    }

    print_section("Abstract");
    println!("{}", detail.abstract_text);

    if let Some(translation) = translation {
        print_section(&format!("Translation ({})", translation.model));
        println!("{}", translation.text);
        if translation.truncated {
            print_status(Status::Warning, "Abstract was truncated before translating");
        }
    }
}

/// Detail screen as plain text
pub fn plain_detail(detail: &PaperDetail, translation: Option<&Translation>) -> String {
    let mut out = vec![format!("Title: {}", detail.title)];
    if !detail.authors.is_empty() {
        out.push(format!("Authors: {}", detail.authors));
    }
    if !detail.published.is_empty() {
        out.push(format!("Published: {}", detail.published));
    }
    out.push(format!("Link: {}", detail.id));
    if let Some(pdf) = &detail.pdf_url {
        out.push(format!("PDF: {}", pdf));
    }
    out.push(String::new());
    out.push(detail.abstract_text.clone());
    if let Some(translation) = translation {
        out.push(String::new());
        out.push(translation.text.clone());
    }
    out.join("\n")
}

/// Table of the built-in categories
pub fn categories_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_header(vec!["#", "Code", "Name"]);
    for (i, category) in CATEGORIES.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(category.code).add_attribute(Attribute::Bold),
            Cell::new(category.name),
        ]);
    }
    table
}

/// A loading spinner with message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for pipes and `--quiet`
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Remove the spinner from the screen.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
