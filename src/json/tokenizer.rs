//! JSON reader over text that is already in memory.

use super::scanner::JsonScanner;
use crate::options::ReaderOptions;
use crate::source::StrSource;

/// Reads JSON from a `&str` without copying it.
///
/// Construction is free and [`reset`](JsonTokenizer::reset) rewinds to the
/// start, so one tokenizer can be walked several times.
///
/// # Examples
///
/// ```rust
/// use streamtok::{JsonDeserializer, JsonTokenizer, StreamTokenizer};
///
/// let mut tok = JsonTokenizer::new(r#"{"id": 7, "name": "Joe"}"#);
/// tok.enter_object().unwrap();
/// assert!(tok.find_item("name").unwrap());
/// assert_eq!(tok.value().unwrap().as_deref(), Some("Joe"));
///
/// tok.reset();
/// tok.enter_object().unwrap();
/// assert!(tok.find_item("id").unwrap());
/// assert_eq!(tok.value_i64().unwrap(), Some(7));
/// ```
pub struct JsonTokenizer<'a> {
    scanner: JsonScanner<StrSource<'a>>,
}

impl<'a> JsonTokenizer<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self::with_options(text, ReaderOptions::default())
    }

    #[must_use]
    pub fn with_options(text: &'a str, options: ReaderOptions) -> Self {
        JsonTokenizer {
            scanner: JsonScanner::new(StrSource::new(text), options.throw_if_not_found),
        }
    }

    /// Rewinds to the start of the text with no scope open.
    pub fn reset(&mut self) {
        self.scanner.src.reset();
        self.scanner.clear();
    }
}

super::forward_json_deserializer!(['a] JsonTokenizer<'a>);
