//! Atom feed parser for arXiv query results.
//!
//! Parsing happens in two layers:
//!
//! - [`FeedEvents`] turns the quick-xml event stream into the handful of
//!   structural [`FeedEvent`]s the daily feed cares about.
//! - [`Reducer`] folds those events through an explicit state machine
//!   (idle, inside an entry, capturing one field of the entry) and emits a
//!   [`PaperRecord`] only when an `entry` element closes.
//!
//! Malformed or truncated markup never fails the parse. Mismatched end tags
//! are tolerated. Reading stops at the first syntax error or at end of input,
//! the open entry (if any) is dropped, and every entry that did close is
//! returned in feed order.

use std::borrow::Cow;
use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::models::{PaperRecord, PaperRecordBuilder};

/// Parse a raw feed body into paper records, in feed order.
pub fn parse(raw: &str) -> Vec<PaperRecord> {
    FeedEvents::new(raw)
        .fold(Reducer::default(), Reducer::step)
        .finish()
}

/// Collapse line breaks (with the whitespace around them) into single spaces
/// and trim the result.
///
/// `normalize_text(normalize_text(s)) == normalize_text(s)` for every input.
pub fn normalize_text(text: &str) -> String {
    static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();
    let re = LINE_BREAKS.get_or_init(|| {
        Regex::new(r"[ \t]*(?:\r\n|\r|\n)\s*").expect("line break pattern is valid")
    });
    re.replace_all(text, " ").trim().to_string()
}

/// Element names the parser reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Entry,
    Author,
    Title,
    Summary,
    Published,
    Id,
    Name,
    Link,
    Other,
}

impl Tag {
    /// Names are matched as written; prefixed elements such as `arxiv:doi`
    /// fall through to `Other`.
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"entry" => Tag::Entry,
            b"author" => Tag::Author,
            b"title" => Tag::Title,
            b"summary" => Tag::Summary,
            b"published" => Tag::Published,
            b"id" => Tag::Id,
            b"name" => Tag::Name,
            b"link" => Tag::Link,
            _ => Tag::Other,
        }
    }
}

/// Attributes of a `link` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttrs {
    pub rel: Option<String>,
    pub title: Option<String>,
    pub href: Option<String>,
}

impl LinkAttrs {
    fn from_element(e: &BytesStart<'_>) -> Self {
        let mut attrs = LinkAttrs::default();
        for attr in e.attributes().filter_map(|a| a.ok()) {
            let value = attr
                .unescape_value()
                .map(Cow::into_owned)
                .unwrap_or_else(|_| String::from_utf8_lossy(attr.value.as_ref()).into_owned());
            match attr.key.as_ref() {
                b"rel" => attrs.rel = Some(value),
                b"title" => attrs.title = Some(value),
                b"href" => attrs.href = Some(value),
                _ => {}
            }
        }
        attrs
    }

    /// `rel="related"` together with `title="pdf"`
    fn is_pdf(&self) -> bool {
        self.rel.as_deref() == Some("related") && self.title.as_deref() == Some("pdf")
    }
}

/// Structural event consumed by the [`Reducer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Start(Tag),
    End(Tag),
    /// A `link` element (self-closing or not); the attributes are all that matters
    Link(LinkAttrs),
    Text(String),
}

/// Iterator of [`FeedEvent`]s over a raw feed body.
///
/// Ends at end of input or at the first XML syntax error. End tags are not
/// checked against their start tags.
pub struct FeedEvents<'a> {
    reader: Reader<&'a [u8]>,
    pending: Option<FeedEvent>,
    done: bool,
}

impl<'a> FeedEvents<'a> {
    pub fn new(raw: &'a str) -> Self {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().check_end_names = false;
        Self {
            reader,
            pending: None,
            done: false,
        }
    }

    fn convert(&mut self, event: Event<'_>) -> Option<FeedEvent> {
        match event {
            Event::Start(e) => match Tag::from_name(e.name().as_ref()) {
                Tag::Link => Some(FeedEvent::Link(LinkAttrs::from_element(&e))),
                tag => Some(FeedEvent::Start(tag)),
            },
            Event::Empty(e) => match Tag::from_name(e.name().as_ref()) {
                Tag::Link => Some(FeedEvent::Link(LinkAttrs::from_element(&e))),
                Tag::Other => None,
                tag => {
                    // `<title/>` behaves like an open tag immediately closed
                    self.pending = Some(FeedEvent::End(tag));
                    Some(FeedEvent::Start(tag))
                }
            },
            Event::End(e) => Some(FeedEvent::End(Tag::from_name(e.name().as_ref()))),
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                Some(FeedEvent::Text(text))
            }
            Event::CData(e) => Some(FeedEvent::Text(
                String::from_utf8_lossy(&e.into_inner()).into_owned(),
            )),
            _ => None,
        }
    }
}

impl Iterator for FeedEvents<'_> {
    type Item = FeedEvent;

    fn next(&mut self) -> Option<FeedEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        while !self.done {
            match self.reader.read_event() {
                Ok(Event::Eof) => self.done = true,
                Ok(event) => {
                    if let Some(converted) = self.convert(event) {
                        return Some(converted);
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        position = self.reader.buffer_position(),
                        "Stopping feed parse at malformed markup: {}",
                        e
                    );
                    self.done = true;
                }
            }
        }

        None
    }
}

/// Text-carried field of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Published,
    Id,
    AuthorName,
}

impl Field {
    fn from_tag(tag: Tag, in_author: bool) -> Option<Self> {
        match tag {
            Tag::Title => Some(Field::Title),
            Tag::Summary => Some(Field::Summary),
            Tag::Published => Some(Field::Published),
            Tag::Id => Some(Field::Id),
            Tag::Name if in_author => Some(Field::AuthorName),
            _ => None,
        }
    }

    fn tag(self) -> Tag {
        match self {
            Field::Title => Tag::Title,
            Field::Summary => Tag::Summary,
            Field::Published => Tag::Published,
            Field::Id => Tag::Id,
            Field::AuthorName => Tag::Name,
        }
    }
}

/// Field currently receiving text. `text` stays `None` until a text event
/// arrives, so `<name/>` never adds an empty author.
#[derive(Debug)]
struct Capture {
    field: Field,
    text: Option<String>,
}

/// In-progress entry
#[derive(Debug, Default)]
struct Draft {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    pdf_url: String,
    in_author: bool,
}

impl Draft {
    fn assign(&mut self, field: Field, text: String) {
        match field {
            Field::Title => self.title = normalize_text(&text),
            Field::Summary => self.summary = normalize_text(&text),
            Field::Published => self.published = text,
            Field::Id => self.id = text,
            Field::AuthorName => self.authors.push(text),
        }
    }

    fn commit(&mut self, capture: Capture) {
        if let Some(text) = capture.text {
            self.assign(capture.field, text);
        }
    }

    fn into_record(self) -> PaperRecord {
        PaperRecordBuilder::new(self.id)
            .title(self.title)
            .authors(self.authors)
            .abstract_text(self.summary)
            .published_date(self.published)
            .pdf_url(self.pdf_url)
            .build()
    }
}

/// Parser state
#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    InEntry {
        draft: Draft,
        capturing: Option<Capture>,
    },
}

/// Explicit fold state: current state plus the records emitted so far.
#[derive(Debug, Default)]
pub struct Reducer {
    state: State,
    records: Vec<PaperRecord>,
}

impl Reducer {
    /// Advance by one event
    pub fn step(mut self, event: FeedEvent) -> Self {
        self.state = match (self.state, event) {
            (State::Idle, FeedEvent::Start(Tag::Entry)) => State::InEntry {
                draft: Draft::default(),
                capturing: None,
            },
            (State::Idle, _) => State::Idle,

            (
                State::InEntry {
                    mut draft,
                    capturing,
                },
                FeedEvent::End(Tag::Entry),
            ) => {
                if let Some(capture) = capturing {
                    draft.commit(capture);
                }
                self.records.push(draft.into_record());
                State::Idle
            }

            (State::InEntry { mut draft, capturing }, FeedEvent::Start(tag)) => {
                if tag == Tag::Author {
                    draft.in_author = true;
                }
                match Field::from_tag(tag, draft.in_author) {
                    Some(field) => {
                        if let Some(previous) = capturing {
                            draft.commit(previous);
                        }
                        State::InEntry {
                            draft,
                            capturing: Some(Capture { field, text: None }),
                        }
                    }
                    None => State::InEntry { draft, capturing },
                }
            }

            (State::InEntry { mut draft, capturing }, FeedEvent::End(tag)) => {
                if tag == Tag::Author {
                    draft.in_author = false;
                }
                match capturing {
                    Some(capture) if capture.field.tag() == tag => {
                        draft.commit(capture);
                        State::InEntry {
                            draft,
                            capturing: None,
                        }
                    }
                    other => State::InEntry {
                        draft,
                        capturing: other,
                    },
                }
            }

            (State::InEntry { draft, capturing }, FeedEvent::Text(text)) => {
                let capturing = capturing.map(|mut capture| {
                    capture.text.get_or_insert_with(String::new).push_str(&text);
                    capture
                });
                State::InEntry { draft, capturing }
            }

            (State::InEntry { mut draft, capturing }, FeedEvent::Link(link)) => {
                if link.is_pdf() {
                    draft.pdf_url = link.href.unwrap_or_default();
                }
                State::InEntry { draft, capturing }
            }
        };
        self
    }

    /// Records completed so far; an entry still open is discarded.
    pub fn finish(self) -> Vec<PaperRecord> {
        self.records
    }
}
