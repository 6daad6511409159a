//! XML reader over a byte stream.

use std::io::Read;

use super::scanner::XmlScanner;
use crate::options::ReaderOptions;
use crate::source::StreamSource;

/// Searches XML read from any [`Read`] through a bounded lookahead window.
///
/// Tag names and the `<![CDATA[` opener have to fit in the window; element
/// text, attribute values and skipped runs stream through at any length.
///
/// # Examples
///
/// ```rust
/// use streamtok::{XmlDeserializer, XmlReader};
///
/// let input = "<x><y b='2'>2</y><y b='3'>3</y><z/></x>".as_bytes();
/// let mut xml = XmlReader::new(input);
/// assert!(xml.find_tag("y").unwrap());
/// assert_eq!(xml.attribute_value("b").unwrap().as_deref(), Some("2"));
/// assert!(xml.find_tag("y").unwrap());
/// assert_eq!(xml.attribute_value("b").unwrap().as_deref(), Some("3"));
/// ```
pub struct XmlReader<R> {
    scanner: XmlScanner<StreamSource<R>>,
}

impl<R: Read> XmlReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReaderOptions::default())
    }

    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        XmlReader {
            scanner: XmlScanner::new(
                StreamSource::new(reader, options.window()),
                options.throw_if_not_found,
            ),
        }
    }

    /// Returns the underlying reader. Buffered but unread input is dropped.
    pub fn into_inner(self) -> R {
        self.scanner.src.into_inner()
    }
}

super::forward_xml_deserializer!([R: Read] XmlReader<R>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, XmlDeserializer};

    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    const CDATA_DOC: &str =
        "<y b='2'><z a='1'> z-content </z> <![CDATA[<y-content/> ]]>]]&gt;<![CDATA[ END ]]>\t</y>";

    #[test]
    fn test_cdata_document_over_small_window() {
        let input = Trickle {
            data: CDATA_DOC.as_bytes(),
            chunk: 2,
        };
        let mut xml = XmlReader::with_options(input, ReaderOptions::new().with_buffer_size(16));
        assert!(xml.find_tag("y").unwrap());
        assert_eq!(xml.attribute_value("b").unwrap().as_deref(), Some("2"));
        assert!(xml.find_tag("z").unwrap());
        assert_eq!(xml.attribute_value("a").unwrap().as_deref(), Some("1"));
        assert_eq!(xml.element_value().unwrap().as_deref(), Some("z-content"));
        assert_eq!(
            xml.element_value_of("y").unwrap().as_deref(),
            Some("<y-content/> ]]> END")
        );
    }

    #[test]
    fn test_find_tag_in_over_stream() {
        let mut xml = XmlReader::new("<x><y b='2'>2</y><y b='3'>3</y><z/></x>".as_bytes());
        let tags = ["z", "y"];
        assert!(xml.find_tag("x").unwrap());
        let mut count = 0;
        while let Some(i) = xml.find_tag_in(&tags).unwrap() {
            if i == 0 {
                break;
            }
            let b = xml.attribute_value("b").unwrap();
            assert_eq!(b, xml.element_value().unwrap());
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_long_text_streams_through() {
        let text = "t".repeat(500);
        let doc = format!("<r><v>{}</v></r>", text);
        let mut xml = XmlReader::with_options(doc.as_bytes(), ReaderOptions::new().with_buffer_size(16));
        assert_eq!(xml.find_element_value("v").unwrap(), Some(text));
    }

    #[test]
    fn test_tag_name_longer_than_window() {
        let name = "n".repeat(30);
        let doc = format!("<{0}>1</{0}>", name);
        let mut xml = XmlReader::with_options(doc.as_bytes(), ReaderOptions::new().with_buffer_size(16));
        assert!(matches!(
            xml.find_tag(&name),
            Err(Error::CapacityExceeded { capacity: 16, .. })
        ));
    }
}
