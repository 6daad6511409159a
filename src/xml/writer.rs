//! XML writers: straight to a sink, or into a [`ByteBuffer`].

use std::io::Write;

use super::{encode_cdata, write_encoded, XmlSerializer, CDATA_END, CDATA_START, DOCTYPE_START, MAX_INDENT};
use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::options::WriterOptions;

const TABS: [u8; MAX_INDENT] = [b'\t'; MAX_INDENT];

/// Writes XML through to any [`Write`] as calls arrive.
///
/// With line wrapping every tag goes on its own line, indented by one tab per
/// open level up to [`MAX_INDENT`](super::MAX_INDENT).
///
/// # Examples
///
/// ```rust
/// use streamtok::{XmlSerializer, XmlWriter};
///
/// let mut out = Vec::new();
/// let mut writer = XmlWriter::new(&mut out);
/// writer.open_tag_with("person", &[("id", "123")]).unwrap();
/// writer.add_tag("first", Some("Keith&")).unwrap();
/// writer.add_tag("country", None).unwrap();
/// writer.close_tag("person").unwrap();
/// assert_eq!(
///     out,
///     br#"<person id="123"><first>Keith&amp;</first><country/></person>"#
/// );
/// ```
#[derive(Debug)]
pub struct XmlWriter<W> {
    out: W,
    options: WriterOptions,
    indent: usize,
    tag_open: bool,
}

/// XML writer accumulating into memory.
pub type XmlBuffer = XmlWriter<ByteBuffer>;

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    pub fn with_options(out: W, options: WriterOptions) -> Self {
        XmlWriter {
            out,
            options,
            indent: 0,
            tag_open: false,
        }
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn pad(&mut self) -> Result<()> {
        if self.options.line_wrapping {
            self.out.write_all(&TABS[..self.indent.min(MAX_INDENT)])?;
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        if self.options.line_wrapping {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes the `>` of an open start tag.
    fn finish_start_tag(&mut self) -> Result<()> {
        if self.tag_open {
            self.out.write_all(b">")?;
            self.newline()?;
            self.tag_open = false;
        }
        Ok(())
    }

    /// Finishes the start tag before a value, or pads a closing tag onto its
    /// own line.
    fn before_close(&mut self) -> Result<()> {
        self.indent = self.indent.saturating_sub(1);
        if self.tag_open {
            self.out.write_all(b">")?;
        } else {
            self.pad()?;
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) -> Result<()> {
        write!(self.out, "</{}>", name)?;
        self.newline()?;
        self.tag_open = false;
        Ok(())
    }

    fn self_close(&mut self) -> Result<()> {
        self.out.write_all(b"/>")?;
        self.newline()?;
        self.tag_open = false;
        Ok(())
    }
}

impl XmlWriter<ByteBuffer> {
    /// The XML written so far.
    #[must_use]
    pub fn to_xml(&self) -> String {
        self.out.to_string_lossy().into_owned()
    }

    pub fn clear(&mut self) {
        self.out.clear();
        self.indent = 0;
        self.tag_open = false;
    }
}

impl Default for XmlWriter<ByteBuffer> {
    fn default() -> Self {
        XmlWriter::new(ByteBuffer::new())
    }
}

impl<W: Write> XmlSerializer for XmlWriter<W> {
    fn is_line_wrapping(&self) -> bool {
        self.options.line_wrapping
    }

    fn set_line_wrapping(&mut self, line_wrapping: bool) {
        self.options.line_wrapping = line_wrapping;
    }

    fn is_tag_open(&self) -> bool {
        self.tag_open
    }

    fn open_tag(&mut self, name: &str) -> Result<()> {
        self.finish_start_tag()?;
        self.pad()?;
        self.indent += 1;
        write!(self.out, "<{}", name)?;
        self.tag_open = true;
        Ok(())
    }

    fn add_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        if !self.tag_open {
            return Err(Error::invalid_state(&format!(
                "attribute {name:?} outside an open start tag"
            )));
        }
        write!(self.out, " {}", name)?;
        if let Some(value) = value {
            self.out.write_all(b"=\"")?;
            write_encoded(&mut self.out, value)?;
            self.out.write_all(b"\"")?;
        }
        Ok(())
    }

    fn self_close_tag(&mut self) -> Result<()> {
        if !self.tag_open {
            return Err(Error::invalid_state("no open start tag to self-close"));
        }
        self.indent = self.indent.saturating_sub(1);
        self.self_close()
    }

    fn close_tag(&mut self, name: &str) -> Result<()> {
        self.before_close()?;
        self.end_tag(name)
    }

    fn close_tag_value(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            self.indent = self.indent.saturating_sub(1);
            return self.self_close();
        };
        self.before_close()?;
        write_encoded(&mut self.out, value)?;
        self.end_tag(name)
    }

    fn close_tag_cdata(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            self.indent = self.indent.saturating_sub(1);
            return self.self_close();
        };
        self.before_close()?;
        self.out.write_all(CDATA_START.as_bytes())?;
        self.out.write_all(encode_cdata(value).as_bytes())?;
        self.out.write_all(CDATA_END.as_bytes())?;
        self.end_tag(name)
    }

    fn add_comment(&mut self, comment: &str) -> Result<()> {
        self.finish_start_tag()?;
        self.pad()?;
        write!(self.out, "<!-- {} -->", comment)?;
        self.newline()
    }

    fn add_xml_declaration(&mut self, version: Option<&str>, encoding: Option<&str>) -> Result<()> {
        self.out.write_all(b"<?xml version=\"")?;
        write_encoded(&mut self.out, version.unwrap_or("1.0"))?;
        self.out.write_all(b"\"")?;
        if let Some(encoding) = encoding.filter(|e| !e.is_empty()) {
            self.out.write_all(b" encoding=\"")?;
            write_encoded(&mut self.out, encoding)?;
            self.out.write_all(b"\"")?;
        }
        self.out.write_all(b"?>")?;
        self.newline()
    }

    fn add_doctype_declaration(&mut self, declare: &str) -> Result<()> {
        write!(self.out, "{}{}>", DOCTYPE_START, declare)?;
        self.newline()
    }

    fn add_prepared_xml(&mut self, xml: &str) -> Result<()> {
        self.finish_start_tag()?;
        self.out.write_all(xml.as_bytes())?;
        Ok(())
    }
}
