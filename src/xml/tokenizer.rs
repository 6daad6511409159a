//! XML reader over text that is already in memory.

use super::scanner::XmlScanner;
use crate::options::ReaderOptions;
use crate::source::StrSource;

/// Searches XML in a `&str` by tag and attribute name.
///
/// # Examples
///
/// ```rust
/// use streamtok::{XmlDeserializer, XmlTokenizer};
///
/// let mut xml = XmlTokenizer::new("<x dd = 4 cc = '3'><yy/></x>");
/// assert!(xml.find_tag("x").unwrap());
/// assert_eq!(xml.attribute_value("dd").unwrap().as_deref(), Some("4"));
/// assert_eq!(xml.attribute_value("cc").unwrap().as_deref(), Some("3"));
/// assert_eq!(xml.find_element_value("yy").unwrap().as_deref(), Some(""));
///
/// xml.reset();
/// assert!(xml.find_tag_next().unwrap());
/// assert_eq!(xml.tag_name(), Some("x"));
/// ```
pub struct XmlTokenizer<'a> {
    scanner: XmlScanner<StrSource<'a>>,
}

impl<'a> XmlTokenizer<'a> {
    #[must_use]
    pub fn new(xml: &'a str) -> Self {
        Self::with_options(xml, ReaderOptions::default())
    }

    #[must_use]
    pub fn with_options(xml: &'a str, options: ReaderOptions) -> Self {
        XmlTokenizer {
            scanner: XmlScanner::new(StrSource::new(xml), options.throw_if_not_found),
        }
    }

    /// Rewinds to the start. The not-found policy is kept.
    pub fn reset(&mut self) {
        self.scanner.src.reset();
        self.scanner.clear();
    }
}

super::forward_xml_deserializer!(['a] XmlTokenizer<'a>);
