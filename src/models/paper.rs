//! Paper record produced by the feed parser.

use serde::Serialize;

/// A paper parsed from one feed entry.
///
/// Records are immutable once built: fields are private and only readable
/// through accessors. Use [`PaperRecordBuilder`] to construct one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaperRecord {
    id: String,
    title: String,
    authors: Vec<String>,
    #[serde(rename = "abstract")]
    abstract_text: String,
    published_date: String,
    pdf_url: String,
}

impl PaperRecord {
    /// Feed-provided identifier (an abstract-page URL for arXiv)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Normalized title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author names in feed order
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    /// Normalized abstract
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    /// Publication date exactly as the feed wrote it
    pub fn published_date(&self) -> &str {
        &self.published_date
    }

    /// Direct PDF link, empty when the entry had none
    pub fn pdf_url(&self) -> &str {
        &self.pdf_url
    }

    /// Check if the record carries a PDF link
    pub fn has_pdf(&self) -> bool {
        !self.pdf_url.is_empty()
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Builder for [`PaperRecord`]
#[derive(Debug, Clone, Default)]
pub struct PaperRecordBuilder {
    record: PaperRecord,
}

impl PaperRecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            record: PaperRecord {
                id: id.into(),
                ..Default::default()
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.record.title = title.into();
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.record.authors.push(name.into());
        self
    }

    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.record.abstract_text = abstract_text.into();
        self
    }

    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.record.published_date = date.into();
        self
    }

    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.record.pdf_url = url.into();
        self
    }

    pub fn build(self) -> PaperRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = PaperRecordBuilder::new("http://arxiv.org/abs/2301.12345v1")
            .title("Test Paper")
            .authors(["John Doe", "Jane Smith"])
            .abstract_text("This is a test abstract.")
            .published_date("2023-01-15T10:00:00Z")
            .pdf_url("http://arxiv.org/pdf/2301.12345v1")
            .build();

        assert_eq!(record.id(), "http://arxiv.org/abs/2301.12345v1");
        assert_eq!(record.title(), "Test Paper");
        assert_eq!(record.authors(), ["John Doe", "Jane Smith"]);
        assert_eq!(record.author_line(), "John Doe, Jane Smith");
        assert!(record.has_pdf());
    }

    #[test]
    fn test_default_fields_are_empty() {
        let record = PaperRecordBuilder::new("x").build();
        assert!(record.authors().is_empty());
        assert_eq!(record.pdf_url(), "");
        assert!(!record.has_pdf());
    }

    #[test]
    fn test_serializes_abstract_key() {
        let record = PaperRecordBuilder::new("id").abstract_text("text").build();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "text");
        assert!(json["authors"].as_array().unwrap().is_empty());
    }
}
