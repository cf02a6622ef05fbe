//! Query highlighting for result labels
//!
//! The query is always treated as literal text: it is escaped before the
//! matcher is built, so `.` or `(` in user input match themselves.

use regex::{Regex, RegexBuilder};

/// One run of label text, either part of a query match or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub is_match: bool,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            is_match: false,
        }
    }

    pub fn matched(text: &'a str) -> Self {
        Self {
            text,
            is_match: true,
        }
    }
}

/// Compiled case-insensitive literal matcher for one query.
///
/// Build once per render and reuse for every row.
#[derive(Debug, Clone)]
pub struct Highlighter {
    matcher: Option<Regex>,
}

impl Highlighter {
    pub fn new(query: &str) -> Self {
        if query.is_empty() {
            return Self { matcher: None };
        }

        let matcher = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| tracing::warn!("highlight disabled for query {:?}: {}", query, e))
            .ok();

        Self { matcher }
    }

    /// Split `text` into alternating unmatched/matched runs covering all of it
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let Some(matcher) = &self.matcher else {
            return vec![Segment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in matcher.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::matched(m.as_str()));
            last = m.end();
        }

        if last < text.len() || segments.is_empty() {
            segments.push(Segment::plain(&text[last..]));
        }

        segments
    }
}

/// Highlight every case-insensitive occurrence of `query` in `text`
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    Highlighter::new(query).segments(text)
}
