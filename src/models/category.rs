//! arXiv subject categories offered by the daily feed.

use serde::Serialize;

/// A subject category in the arXiv taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Taxonomy code used in the `cat:` search filter
    pub code: &'static str,
    /// Human-readable name
    pub name: &'static str,
}

/// Categories shown in the picker, in display order.
pub const CATEGORIES: &[Category] = &[
    Category {
        code: "cs.CV",
        name: "Computer Vision",
    },
    Category {
        code: "cs.LG",
        name: "Machine Learning",
    },
    Category {
        code: "cs.AI",
        name: "Artificial Intelligence",
    },
    Category {
        code: "cs.CL",
        name: "Computation and Language",
    },
    Category {
        code: "cs.RO",
        name: "Robotics",
    },
    Category {
        code: "q-bio.QM",
        name: "Quantitative Methods",
    },
    Category {
        code: "physics",
        name: "Physics",
    },
    Category {
        code: "math",
        name: "Mathematics",
    },
    Category {
        code: "stat",
        name: "Statistics",
    },
];

/// Code used when nothing else was chosen
pub const DEFAULT_CATEGORY: &str = "cs.CV";

impl Category {
    /// Look up a known category by code (case-insensitive)
    pub fn find(code: &str) -> Option<&'static Category> {
        CATEGORIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Category at a picker position
    pub fn at(index: usize) -> Option<&'static Category> {
        CATEGORIES.get(index)
    }

    /// Picker position of a code, if it is a known category
    pub fn index_of(code: &str) -> Option<usize> {
        CATEGORIES
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_category() {
        assert_eq!(Category::find("cs.LG").unwrap().name, "Machine Learning");
        assert_eq!(Category::find("CS.lg").unwrap().code, "cs.LG");
        assert!(Category::find("cs.XX").is_none());
    }

    #[test]
    fn test_default_is_first() {
        assert_eq!(Category::at(0).unwrap().code, DEFAULT_CATEGORY);
        assert_eq!(Category::index_of(DEFAULT_CATEGORY), Some(0));
        assert_eq!(Category::index_of("stat"), Some(CATEGORIES.len() - 1));
    }

    #[test]
    fn test_display() {
        let cat = Category::find("math").unwrap();
        assert_eq!(cat.to_string(), "Mathematics (math)");
    }
}
