//! # streamtok
//!
//! Forward-only, low-allocation readers and writers for JSON and XML, and a
//! transcoder that turns JSON into XML while it is being read.
//!
//! ## What it does
//!
//! Nothing here builds a document tree. A reader is a cursor: you ask it to
//! enter a scope, find an item by name and hand you its value, and it moves
//! forward through the text to do so. A writer is the mirror image: open a
//! scope, add values, close it. Memory use is bounded by nesting depth, plus
//! a fixed lookahead window for the stream readers.
//!
//! ## Key Features
//!
//! - **Two sources per format**: [`JsonTokenizer`] and [`XmlTokenizer`] read
//!   a `&str` and can be reset; [`JsonReader`] and [`XmlReader`] read any
//!   [`std::io::Read`] through a bounded window and are one-shot
//! - **Two sinks per format**: [`JsonWriter`] and [`XmlWriter`] write through
//!   to any [`std::io::Write`]; [`JsonBuffer`] and [`XmlBuffer`] collect in
//!   memory
//! - **Shared contracts**: callers depend on [`StreamTokenizer`],
//!   [`JsonDeserializer`], [`XmlDeserializer`], [`JsonSerializer`] and
//!   [`XmlSerializer`], never on a concrete reader or writer
//! - **Lenient input**: bare names and values are accepted, and truncated
//!   input ends a search instead of failing it
//! - **Two miss policies**: a missed `find_*` returns `false`/`None`, or
//!   [`Error::NotFound`] when [`ReaderOptions::throw_if_not_found`] is set
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! streamtok = "0.1"
//! ```
//!
//! ### Reading JSON
//!
//! ```rust
//! use streamtok::{JsonDeserializer, JsonTokenizer, StreamTokenizer};
//!
//! let mut json = JsonTokenizer::new(r#"{"user":{"id":7,"tags":["a","b"]},"ok":true}"#);
//! json.enter_object().unwrap();
//! assert!(json.find_item("user").unwrap());
//! json.enter_object().unwrap();
//! assert!(json.find_item("id").unwrap());
//! assert_eq!(json.value_i64().unwrap(), Some(7));
//! json.leave_object().unwrap();
//! assert!(json.find_item("ok").unwrap());
//! assert_eq!(json.value().unwrap().as_deref(), Some("true"));
//! ```
//!
//! ### Reading XML
//!
//! ```rust
//! use streamtok::{XmlDeserializer, XmlTokenizer};
//!
//! let mut xml = XmlTokenizer::new("<order id='9'><line>two &amp; three</line></order>");
//! assert!(xml.find_tag("order").unwrap());
//! assert_eq!(xml.attribute_value("id").unwrap().as_deref(), Some("9"));
//! assert_eq!(xml.find_element_value("line").unwrap().as_deref(), Some("two & three"));
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use streamtok::{JsonBuffer, JsonSerializer, XmlBuffer, XmlSerializer};
//!
//! let mut json = JsonBuffer::default();
//! json.open_object(None).unwrap();
//! json.add_item("name", "Joe").unwrap();
//! json.add_array(Some("scores"), [1, 2]).unwrap();
//! json.close_all().unwrap();
//! assert_eq!(json.to_json(), r#"{"name":"Joe","scores":[1,2]}"#);
//!
//! let mut xml = XmlBuffer::default();
//! xml.open_tag_with("user", &[("id", "7")]).unwrap();
//! xml.add_tag("name", Some("Joe")).unwrap();
//! xml.close_tag("user").unwrap();
//! assert_eq!(xml.to_xml(), r#"<user id="7"><name>Joe</name></user>"#);
//! ```
//!
//! ### JSON to XML
//!
//! ```rust
//! let xml = streamtok::json_to_xml(r#"{"list":[{"x":1},{"x":2}]}"#, false).unwrap();
//! assert_eq!(xml, "<list><array><x>1</x></array><array><x>2</x></array></list>");
//! ```
//!
//! ## Stream window
//!
//! Stream readers keep at most [`ReaderOptions::buffer_size`] unread bytes.
//! Values and element text stream through it at any length, but a single
//! name, keyword or tag name must fit; one that does not fails with
//! [`Error::CapacityExceeded`].
//!
//! ## Logging
//!
//! Searches log through [`tracing`] at `debug`, buffer growth and stream
//! refills at `trace`. No subscriber is installed.

pub mod buffer;
pub mod date;
pub mod error;
pub mod json;
pub mod options;
mod source;
pub mod tokenizer;
pub mod transform;
pub mod value;
pub mod xml;

pub use buffer::ByteBuffer;
pub use error::{Error, Result};
pub use json::{JsonBuffer, JsonDeserializer, JsonReader, JsonSerializer, JsonTokenizer, JsonWriter, Scope};
pub use options::{ReaderOptions, WriterOptions};
pub use tokenizer::StreamTokenizer;
pub use transform::{copy_json, JsonXmlTransformer};
pub use value::Value;
pub use xml::{Attributes, XmlBuffer, XmlDeserializer, XmlReader, XmlSerializer, XmlTokenizer, XmlWriter};

use std::io::{Read, Write};

/// Converts a JSON document to XML.
///
/// With `use_attributes`, scalar members become attributes until their parent
/// gets its first child tag. See [`JsonXmlTransformer`].
///
/// # Examples
///
/// ```rust
/// let xml = streamtok::json_to_xml(r#"{"p":{"name":"Jack","age":40}}"#, true).unwrap();
/// assert_eq!(xml, r#"<p name="Jack" age="40"/>"#);
/// ```
///
/// # Errors
///
/// Infallible for in-memory input; the `Result` mirrors
/// [`json_to_xml_stream`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json_to_xml(json: &str, use_attributes: bool) -> Result<String> {
    let mut reader = JsonTokenizer::new(json);
    let mut xml = XmlBuffer::default();
    JsonXmlTransformer::new()
        .with_attributes(use_attributes)
        .transform(&mut reader, &mut xml)?;
    Ok(xml.to_xml())
}

/// Converts JSON read from `reader` to XML written to `writer`, holding no
/// more than the configured window of input at once. Returns the writer.
///
/// # Examples
///
/// ```rust
/// use streamtok::ReaderOptions;
///
/// let input = r#"[{"id":1},{"id":2}]"#.as_bytes();
/// let out = streamtok::json_to_xml_stream(input, Vec::new(), ReaderOptions::default(), true).unwrap();
/// assert_eq!(out, br#"<array id="1"/><array id="2"/>"#);
/// ```
///
/// # Errors
///
/// Read or write failures, and [`Error::CapacityExceeded`] for a name longer
/// than the window.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json_to_xml_stream<R, W>(reader: R, writer: W, options: ReaderOptions, use_attributes: bool) -> Result<W>
where
    R: Read,
    W: Write,
{
    let mut json = JsonReader::with_options(reader, options);
    let mut xml = XmlWriter::new(writer);
    JsonXmlTransformer::new()
        .with_attributes(use_attributes)
        .transform(&mut json, &mut xml)?;
    xml.flush()?;
    Ok(xml.into_inner())
}

/// Re-renders a JSON document: compact by default, indented with
/// [`WriterOptions::pretty`].
///
/// # Examples
///
/// ```rust
/// use streamtok::WriterOptions;
///
/// let compact = streamtok::reformat_json("{ a : [1, 2] }", WriterOptions::default()).unwrap();
/// assert_eq!(compact, r#"{"a":[1,2]}"#);
/// ```
///
/// # Errors
///
/// Infallible for in-memory input; kept as `Result` like the other helpers.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn reformat_json(json: &str, options: WriterOptions) -> Result<String> {
    let mut reader = JsonTokenizer::new(json);
    let mut out = JsonBuffer::with_options(ByteBuffer::new(), options);
    copy_json(&mut reader, &mut out)?;
    Ok(out.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_to_xml_modes() {
        let json = r#"{"list":[{"x":1,"y":2},{"x":3,"y":4}]}"#;
        assert_eq!(
            json_to_xml(json, true).unwrap(),
            r#"<list><array x="1" y="2"/><array x="3" y="4"/></list>"#
        );
        assert_eq!(
            json_to_xml(json, false).unwrap(),
            "<list><array><x>1</x><y>2</y></array><array><x>3</x><y>4</y></array></list>"
        );
    }

    #[test]
    fn test_json_to_xml_stream_small_window() {
        let json = r#"{"rows":[{"name":"a&b"},{"name":"c"}]}"#;
        let out = json_to_xml_stream(
            json.as_bytes(),
            Vec::new(),
            ReaderOptions::new().with_buffer_size(16),
            false,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<rows><array><name>a&amp;b</name></array><array><name>c</name></array></rows>"
        );
    }

    #[test]
    fn test_reformat_pretty() {
        let pretty = reformat_json(r#"{"a":{"b":[1]}}"#, WriterOptions::pretty()).unwrap();
        assert_eq!(pretty, "{\n\t\"a\" : {\n\t\t\"b\" : [1]\n\t}\n}");
    }

    #[test]
    fn test_contracts_are_object_safe() {
        let mut json = JsonTokenizer::new(r#"{"k":[1]}"#);
        let reader: &mut dyn JsonDeserializer = &mut json;
        let mut xml = XmlBuffer::default();
        let writer: &mut dyn XmlSerializer = &mut xml;
        JsonXmlTransformer::new().transform(reader, writer).unwrap();
        assert_eq!(xml.to_xml(), "<k><array>1</array></k>");
    }
}
