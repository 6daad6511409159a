//! Cursor logic shared by [`XmlTokenizer`](super::XmlTokenizer) and
//! [`XmlReader`](super::XmlReader).

use super::{
    decode_value, Attributes, CDATA_END, CDATA_START, COMMENT_END, COMMENT_START, ELEMENT_START,
    PROCESS_END, PROCESS_START,
};
use crate::error::{Error, Result};
use crate::source::Source;

/// True when `name` starts `offset` bytes ahead and is followed by a byte
/// that may end a tag name.
fn names_tag<S: Source>(src: &mut S, offset: usize, name: &str) -> Result<bool> {
    if name.is_empty() || !src.matches_at(offset, name.as_bytes())? {
        return Ok(false);
    }
    Ok(src
        .peek_at(offset + name.len())?
        .is_some_and(|b| ELEMENT_START.contains(&b)))
}

fn decoded(raw: &[u8]) -> String {
    decode_value(&String::from_utf8_lossy(raw)).into_owned()
}

pub(crate) struct XmlScanner<S> {
    pub(crate) src: S,
    tag: Option<String>,
    /// The cursor sits on the `<` of the current tag.
    at_start: bool,
    self_closing: bool,
    attrs: Attributes,
    attrs_valid: bool,
    pub(crate) throw_if_not_found: bool,
}

impl<S: Source> XmlScanner<S> {
    pub(crate) fn new(src: S, throw_if_not_found: bool) -> Self {
        XmlScanner {
            src,
            tag: None,
            at_start: false,
            self_closing: false,
            attrs: Attributes::new(),
            attrs_valid: false,
            throw_if_not_found,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.tag = None;
        self.at_start = false;
        self.self_closing = false;
        self.attrs.clear();
        self.attrs_valid = false;
    }

    pub(crate) fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.src.index()
    }

    fn set_tag(&mut self, tag: Option<String>, at_start: bool) {
        self.tag = tag;
        self.at_start = at_start;
        self.self_closing = false;
        self.attrs_valid = false;
    }

    /// Reads bytes up to one of `stops`, leaving the stop unconsumed.
    fn take_until(&mut self, stops: &[u8]) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        while let Some(b) = self.src.peek()? {
            if stops.contains(&b) {
                break;
            }
            raw.push(b);
            self.src.bump(1);
        }
        Ok(raw)
    }

    /// Consumes the start tag under the cursor, caching its attributes and
    /// whether it closed itself.
    fn skip_start_tag(&mut self) -> Result<()> {
        if !self.at_start {
            return Ok(());
        }
        self.at_start = false;
        let name_len = self.tag.as_ref().map_or(0, String::len);
        self.src.bump(1 + name_len);
        self.attrs.clear();
        self.attrs_valid = true;
        loop {
            self.src.skip_whitespace()?;
            match self.src.peek()? {
                None => return Ok(()),
                Some(b'>') => {
                    self.src.bump(1);
                    return Ok(());
                }
                Some(b'/') => {
                    self.src.bump(1);
                    if self.src.peek()? == Some(b'>') {
                        self.src.bump(1);
                        self.self_closing = true;
                        return Ok(());
                    }
                }
                Some(_) => self.attribute()?,
            }
        }
    }

    /// Parses one `name`, `name=value`, `name='value'` or `name="value"`.
    fn attribute(&mut self) -> Result<()> {
        let name = self.take_until(b"= \t\r\n/>")?;
        if name.is_empty() {
            // a stray `=`
            self.src.bump(1);
            return Ok(());
        }
        self.src.skip_whitespace()?;
        let mut value = String::new();
        if self.src.peek()? == Some(b'=') {
            self.src.bump(1);
            self.src.skip_whitespace()?;
            let raw = match self.src.peek()? {
                Some(quote @ (b'\'' | b'"')) => {
                    self.src.bump(1);
                    let raw = self.take_until(&[quote])?;
                    self.src.bump(1);
                    raw
                }
                _ => self.take_until(ELEMENT_START)?,
            };
            value = decoded(&raw).trim().to_string();
        }
        self.attrs
            .insert(String::from_utf8_lossy(&name).into_owned(), value);
        Ok(())
    }

    /// Moves to the next `<` that is not a CDATA section, comment or
    /// processing instruction.
    fn find_tag_start(&mut self) -> Result<bool> {
        loop {
            while let Some(b) = self.src.peek()? {
                if b == b'<' {
                    break;
                }
                self.src.bump(1);
            }
            if self.src.peek()?.is_none() {
                return Ok(false);
            }
            if self.src.matches_at(0, CDATA_START.as_bytes())? {
                self.src.bump(CDATA_START.len());
                self.src.skip_past(CDATA_END.as_bytes())?;
            } else if self.src.matches_at(0, COMMENT_START.as_bytes())? {
                self.src.bump(COMMENT_START.len());
                self.src.skip_past(COMMENT_END.as_bytes())?;
            } else if self.src.matches_at(0, PROCESS_START.as_bytes())? {
                self.src.bump(PROCESS_START.len());
                self.src.skip_past(PROCESS_END.as_bytes())?;
            } else {
                return Ok(true);
            }
        }
    }

    /// Moves to the next start tag of any name, stepping over closing tags
    /// and `<!` declarations.
    pub(crate) fn find_tag_next(&mut self) -> Result<bool> {
        self.skip_start_tag()?;
        while self.find_tag_start()? {
            if matches!(self.src.peek_at(1)?, Some(b'/' | b'!')) {
                self.src.bump(1);
                continue;
            }
            let mut raw = Vec::new();
            while let Some(b) = self.src.peek_at(1 + raw.len())? {
                if ELEMENT_START.contains(&b) {
                    break;
                }
                raw.push(b);
            }
            if raw.is_empty() {
                self.src.bump(1);
                continue;
            }
            self.set_tag(Some(String::from_utf8_lossy(&raw).into_owned()), true);
            return Ok(true);
        }
        self.set_tag(None, false);
        Ok(false)
    }

    fn find_matching(&mut self, names: &[&str]) -> Result<Option<usize>> {
        self.skip_start_tag()?;
        while self.find_tag_start()? {
            for (i, name) in names.iter().enumerate() {
                if names_tag(&mut self.src, 1, name)? {
                    self.set_tag(Some((*name).to_string()), true);
                    tracing::debug!(tag = *name, index = ?self.src.index(), "found xml tag");
                    return Ok(Some(i));
                }
            }
            self.src.bump(1);
        }
        self.set_tag(None, false);
        tracing::debug!(names = ?names, "xml tag not found");
        if self.throw_if_not_found {
            return Err(Error::not_found(names.iter().copied()));
        }
        Ok(None)
    }

    pub(crate) fn find_tag(&mut self, name: &str) -> Result<bool> {
        Ok(self.find_matching(&[name])?.is_some())
    }

    pub(crate) fn find_tag_in(&mut self, names: &[&str]) -> Result<Option<usize>> {
        self.find_matching(names)
    }

    pub(crate) fn attributes(&mut self) -> Result<Option<&Attributes>> {
        if self.tag.is_none() {
            return Ok(None);
        }
        if !self.attrs_valid {
            if self.at_start {
                self.skip_start_tag()?;
            } else {
                self.attrs.clear();
                self.attrs_valid = true;
            }
        }
        Ok(Some(&self.attrs))
    }

    pub(crate) fn element_value(&mut self) -> Result<Option<String>> {
        let Some(tag) = self.tag.clone() else {
            return Ok(None);
        };
        self.skip_start_tag()?;
        if self.self_closing {
            self.set_tag(None, false);
            return Ok(Some(String::new()));
        }

        let mut out = String::new();
        let mut text = Vec::new();
        let mut depth = 0usize;
        // inside a nested start tag of the same name, up to its `>`
        let mut nested_start = false;
        while let Some(b) = self.src.peek()? {
            if b != b'<' {
                if nested_start && b == b'>' {
                    if text.last() != Some(&b'/') {
                        depth += 1;
                    }
                    nested_start = false;
                }
                text.push(b);
                self.src.bump(1);
                continue;
            }
            if self.src.matches_at(0, CDATA_START.as_bytes())? {
                out.push_str(&decoded(&text));
                text.clear();
                self.src.bump(CDATA_START.len());
                let mut cdata = Vec::new();
                self.src.copy_until(CDATA_END.as_bytes(), &mut cdata)?;
                out.push_str(&String::from_utf8_lossy(&cdata));
            } else if self.src.matches_at(0, COMMENT_START.as_bytes())? {
                self.src.bump(COMMENT_START.len());
                self.src.skip_past(COMMENT_END.as_bytes())?;
            } else if self.src.matches_at(0, PROCESS_START.as_bytes())? {
                self.src.bump(PROCESS_START.len());
                self.src.skip_past(PROCESS_END.as_bytes())?;
            } else if self.src.peek_at(1)? == Some(b'/') && names_tag(&mut self.src, 2, &tag)? {
                if depth == 0 {
                    self.src.skip_past(b">")?;
                    break;
                }
                depth -= 1;
                text.push(b);
                self.src.bump(1);
            } else {
                if !nested_start && names_tag(&mut self.src, 1, &tag)? {
                    nested_start = true;
                }
                text.push(b);
                self.src.bump(1);
            }
        }
        out.push_str(&decoded(&text));
        self.set_tag(None, false);
        Ok(Some(out.trim().to_string()))
    }

    pub(crate) fn element_value_of(&mut self, name: &str) -> Result<Option<String>> {
        if self.tag.as_deref() != Some(name) {
            self.skip_start_tag()?;
            self.src.skip_whitespace()?;
            let at_start = self.src.peek()? == Some(b'<') && names_tag(&mut self.src, 1, name)?;
            self.set_tag(Some(name.to_string()), at_start);
        }
        self.element_value()
    }
}
