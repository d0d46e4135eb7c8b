//! Terminal display helpers for CLI output.
//!
//! Widths here are display columns, not bytes: CJK titles and translated
//! abstracts take two columns per character.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| Terminal {
        width: terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH),
        is_tty: io::stdout().is_terminal(),
    })
}

#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/// Display width of `text` in terminal columns
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Truncate text to fit within `max_width` columns, appending `...` if cut.
///
/// ```
/// use arxiv_daily::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut kept = String::new();
    for c in text.chars() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }
    format!("{}...", kept)
}

/// Like [`truncate_with_ellipsis`], but prefers cutting at the last space
/// that fits.
pub fn truncate_at_word(text: &str, max_width: usize) -> String {
    let cut = truncate_with_ellipsis(text, max_width);
    if display_width(text) <= max_width {
        return cut;
    }

    let kept = cut.strip_suffix("...").unwrap_or(&cut);
    if text[kept.len()..].starts_with(' ') {
        return cut;
    }
    match kept.rfind(' ') {
        Some(space) if space > 0 => format!("{}...", kept[..space].trim_end()),
        _ => cut,
    }
}

/// Column widths for the paper listing: (title, authors, published).
///
/// The index column and table borders are taken off the top; the title gets
/// two thirds of what remains.
pub fn listing_columns(terminal_width: usize) -> (usize, usize, usize) {
    const INDEX: usize = 4;
    const PUBLISHED: usize = 12;
    const BORDERS: usize = 13;

    let rest = terminal_width
        .saturating_sub(INDEX + PUBLISHED + BORDERS)
        .max(40);
    let title = rest * 2 / 3;
    (title, rest - title, PUBLISHED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_basic() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_with_ellipsis_empty() {
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 0), "");
        assert_eq!(truncate_with_ellipsis("Hello", 1), "...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character is two columns wide
        assert_eq!(display_width("视觉模型"), 8);
        assert_eq!(truncate_with_ellipsis("视觉模型研究", 9), "视觉模...");
    }

    #[test]
    fn test_truncate_at_word() {
        assert_eq!(truncate_at_word("The quick brown fox", 10), "The...");
        assert_eq!(truncate_at_word("The quick brown fox", 12), "The quick...");
        assert_eq!(truncate_at_word("The quick brown fox", 14), "The quick...");
        assert_eq!(truncate_at_word("Short", 14), "Short");
        assert_eq!(truncate_at_word("Unbreakable", 8), "Unbre...");
    }

    #[test]
    fn test_truncate_at_word_keeps_dots_in_text() {
        assert_eq!(truncate_at_word("A b... cde", 9), "A b......");
        assert_eq!(truncate_at_word("Hmm... ok", 0), "");
    }

    #[test]
    fn test_listing_columns() {
        let (title, authors, published) = listing_columns(100);
        assert_eq!(published, 12);
        assert!(title > authors);
        assert_eq!(title + authors, 100 - 4 - 12 - 13);

        // Narrow terminals still get usable columns
        let (title, authors, _) = listing_columns(20);
        assert_eq!(title + authors, 40);
    }
}
