//! Rule-based extractors for the supported invoice layout.
//!
//! Every header field and every line shape is a named rule that can be
//! tested on its own. Rules for the same target are tried in order and the
//! first one that produces a value wins.

pub mod header;
pub mod items;
pub mod patterns;

pub use header::{HeaderField, HeaderRule};
pub use items::{ItemRowRule, LineRule, DEFAULT_LINE_RULES};
pub use patterns::{CUSTOMER_NAME, VENDOR_NAME};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value produced by a rule, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
    /// Byte range of the full match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Run `rules` in order and return the first match.
pub fn first_match<R: FieldExtractor>(rules: &[R], text: &str) -> Option<R::Output> {
    rules.iter().find_map(|rule| rule.extract(text))
}
