//! XML reading and writing.
//!
//! The readers are searchers rather than parsers: they hop from tag to tag by
//! name, read the attributes of the tag they stopped at, and pull the text of
//! an element. CDATA sections, comments and processing instructions are never
//! mistaken for tags.
//!
//! - [`XmlTokenizer`] over a `&str`, rewindable with `reset`
//! - [`XmlReader`] over any [`std::io::Read`], through a bounded window
//! - [`XmlWriter`] and [`XmlBuffer`] for output
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{XmlDeserializer, XmlTokenizer};
//!
//! let mut xml = XmlTokenizer::new("<x c='3'><y b='2'><z a='1'>content</z></y></x>");
//! assert!(xml.find_tag("y").unwrap());
//! assert_eq!(xml.attribute_value("b").unwrap().as_deref(), Some("2"));
//! assert!(xml.find_tag("z").unwrap());
//! assert_eq!(xml.element_value().unwrap().as_deref(), Some("content"));
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use crate::error::Result;
use crate::tokenizer::StreamTokenizer;

pub mod attributes;
pub mod reader;
pub(crate) mod scanner;
pub mod tokenizer;
pub mod writer;

pub use attributes::Attributes;
pub use reader::XmlReader;
pub use tokenizer::XmlTokenizer;
pub use writer::{XmlBuffer, XmlWriter};

/// Bytes that may follow a tag name.
pub(crate) const ELEMENT_START: &[u8] = b"/> \t\r\n";

pub const CDATA_START: &str = "<![CDATA[";
pub const CDATA_END: &str = "]]>";
/// Replacement for `]]>` inside CDATA content: end the section, write the
/// escaped marker and reopen.
pub const CDATA_END_REPLACE: &str = "]]>]]&gt;<![CDATA[";
pub const COMMENT_START: &str = "<!--";
pub const COMMENT_END: &str = "-->";
pub const PROCESS_START: &str = "<?";
pub const PROCESS_END: &str = "?>";
pub const DOCTYPE_START: &str = "<!DOCTYPE ";

/// Most tabs written in front of a line when wrapping.
pub const MAX_INDENT: usize = 32;

const NAMED_ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// XML specific reading on top of [`StreamTokenizer`].
///
/// Tag searches look at every start tag ahead of the cursor, at any depth.
/// Attributes are only available while the cursor has not moved past the
/// start tag that was found; read them before the element value.
pub trait XmlDeserializer: StreamTokenizer {
    /// Name of the tag last found, or set by
    /// [`element_value_of`](Self::element_value_of).
    fn tag_name(&self) -> Option<&str>;

    /// Moves to the next start tag of any name.
    fn find_tag_next(&mut self) -> Result<bool>;

    /// Moves to the next start tag called `name`.
    ///
    /// A miss returns `Ok(false)`, or [`Error::NotFound`](crate::Error::NotFound)
    /// in strict mode.
    fn find_tag(&mut self, name: &str) -> Result<bool>;

    /// Moves to the next start tag called any of `names`, returning the index
    /// of the name found.
    fn find_tag_in(&mut self, names: &[&str]) -> Result<Option<usize>>;

    /// Attributes of the current tag, parsed on first use.
    fn attributes(&mut self) -> Result<Option<&Attributes>>;

    /// Decoded value of one attribute of the current tag.
    fn attribute_value(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self
            .attributes()?
            .and_then(|attrs| attrs.get(name))
            .map(str::to_owned))
    }

    /// Text of the current element with entities decoded, CDATA appended
    /// as is, and surrounding whitespace trimmed. Nested elements of the same
    /// name are balanced; other markup is kept. A self-closing tag yields an
    /// empty string. Consumes through the closing tag.
    fn element_value(&mut self) -> Result<Option<String>>;

    /// [`element_value`](Self::element_value) for an element called `name`
    /// whose start tag is at the cursor or already behind it.
    ///
    /// ```rust
    /// use streamtok::{XmlDeserializer, XmlTokenizer};
    ///
    /// let mut xml = XmlTokenizer::new("<a><b>2</b><c>3</c>1</a>");
    /// xml.find_tag("a").unwrap();
    /// let b = xml.element_value_of("b").unwrap().unwrap();
    /// let c = xml.element_value_of("c").unwrap().unwrap();
    /// let a = xml.element_value_of("a").unwrap().unwrap();
    /// assert_eq!([b, c, a], ["2", "3", "1"]);
    /// ```
    fn element_value_of(&mut self, name: &str) -> Result<Option<String>>;

    /// Finds the tag called `name` and reads its value.
    fn find_element_value(&mut self, name: &str) -> Result<Option<String>> {
        if self.find_tag(name)? {
            self.element_value()
        } else {
            Ok(None)
        }
    }
}

/// Forward-only XML writing.
///
/// A start tag stays open after [`open_tag`](Self::open_tag) so attributes
/// can be added; the next child, value or close finishes it.
pub trait XmlSerializer {
    fn is_line_wrapping(&self) -> bool;

    fn set_line_wrapping(&mut self, line_wrapping: bool);

    /// True while the current start tag still lacks its `>` or `/>`.
    fn is_tag_open(&self) -> bool;

    fn open_tag(&mut self, name: &str) -> Result<()>;

    fn open_tag_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.open_tag(name)?;
        for (key, value) in attrs {
            self.add_attribute(key, Some(value))?;
        }
        Ok(())
    }

    /// Adds an attribute to the open start tag. `None` writes the bare name.
    fn add_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// Finishes the open start tag as `/>`.
    fn self_close_tag(&mut self) -> Result<()>;

    fn close_tag(&mut self, name: &str) -> Result<()>;

    /// Writes `value` and the closing tag; `None` self-closes instead.
    fn close_tag_value(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// Like [`close_tag_value`](Self::close_tag_value) with the value in CDATA.
    fn close_tag_cdata(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// `<name>value</name>`, or `<name/>` for `None`.
    fn add_tag(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.open_tag(name)?;
        self.close_tag_value(name, value)
    }

    fn add_tag_with(&mut self, name: &str, value: Option<&str>, attrs: &[(&str, &str)]) -> Result<()> {
        self.open_tag_with(name, attrs)?;
        self.close_tag_value(name, value)
    }

    fn add_tag_cdata(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.open_tag(name)?;
        self.close_tag_cdata(name, value)
    }

    fn add_tag_cdata_with(
        &mut self,
        name: &str,
        value: Option<&str>,
        attrs: &[(&str, &str)],
    ) -> Result<()> {
        self.open_tag_with(name, attrs)?;
        self.close_tag_cdata(name, value)
    }

    /// `<!-- comment -->`
    fn add_comment(&mut self, comment: &str) -> Result<()>;

    /// `<?xml version="1.0" encoding="..."?>`. The version defaults to 1.0 and
    /// an empty encoding is left out.
    fn add_xml_declaration(&mut self, version: Option<&str>, encoding: Option<&str>) -> Result<()>;

    /// `<!DOCTYPE declare>`
    fn add_doctype_declaration(&mut self, declare: &str) -> Result<()>;

    /// Writes `xml` unchecked.
    fn add_prepared_xml(&mut self, xml: &str) -> Result<()>;
}

const fn escape_for(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escapes `& < > " '` for element text or attribute values.
///
/// ```rust
/// use streamtok::xml::encode_value;
///
/// assert_eq!(encode_value("\"&<>'"), "&quot;&amp;&lt;&gt;&#39;");
/// ```
#[must_use]
pub fn encode_value(value: &str) -> Cow<'_, str> {
    if !value.chars().any(|c| escape_for(c).is_some()) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + value.len() / 3 + 1);
    for c in value.chars() {
        match escape_for(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub(crate) fn write_encoded<W: Write + ?Sized>(out: &mut W, value: &str) -> io::Result<()> {
    let mut start = 0;
    for (i, c) in value.char_indices() {
        if let Some(escaped) = escape_for(c) {
            out.write_all(value[start..i].as_bytes())?;
            out.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
    }
    out.write_all(value[start..].as_bytes())
}

/// Decodes a numeric reference body such as `38` or `x26`.
fn numeric_reference(body: &str) -> Option<char> {
    let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => body.parse().ok()?,
        None => return None,
    };
    char::from_u32(code)
}

/// Reverses [`encode_value`]: the five named entities plus decimal and
/// hexadecimal character references. Anything else starting with `&` is kept
/// as written.
///
/// ```rust
/// use streamtok::xml::decode_value;
///
/// assert_eq!(decode_value("a&amp;&lt;&gt;&quot;&#39;&apos;b"), "a&<>\"''b");
/// assert_eq!(decode_value("&#x26;&#38;"), "&&");
/// assert_eq!(decode_value("a&ampb"), "a&ampb");
/// ```
#[must_use]
pub fn decode_value(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        if let Some((entity, c)) = NAMED_ENTITIES.iter().find(|(e, _)| rest.starts_with(e)) {
            out.push(*c);
            rest = &rest[entity.len()..];
            continue;
        }
        let reference = rest
            .strip_prefix("&#")
            .and_then(|tail| tail.find(';').map(|semi| (semi, numeric_reference(&tail[..semi]))));
        match reference {
            Some((semi, Some(c))) => {
                out.push(c);
                rest = &rest[semi + 3..];
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Makes `value` safe inside a CDATA section by splitting every `]]>`.
///
/// ```rust
/// use streamtok::xml::encode_cdata;
///
/// assert_eq!(encode_cdata("a]]>b"), "a]]>]]&gt;<![CDATA[b");
/// ```
#[must_use]
pub fn encode_cdata(value: &str) -> Cow<'_, str> {
    if value.contains(CDATA_END) {
        Cow::Owned(value.replace(CDATA_END, CDATA_END_REPLACE))
    } else {
        Cow::Borrowed(value)
    }
}

/// Escapes like [`encode_value`] but lets the markup of the allowed `tags`
/// through, so user text can keep simple formatting such as `<b>` while
/// anything else stays inert. A tag is only allowed without attributes.
///
/// ```rust
/// use streamtok::xml::encode_except_tags_in;
///
/// let tags = ["b", "br"];
/// assert_eq!(
///     encode_except_tags_in("<b>bold</b><br/><script>", &tags),
///     "<b>bold</b><br/>&lt;script&gt;"
/// );
/// assert_eq!(encode_except_tags_in("<b class=x>", &tags), "&lt;b class=x&gt;");
/// ```
#[must_use]
pub fn encode_except_tags_in<'a>(value: &'a str, tags: &[&str]) -> Cow<'a, str> {
    let escape = |i: usize, c: char| {
        let kept = matches!(c, '<' | '>') && is_tag_in(value, i, tags);
        escape_for(c).filter(|_| !kept)
    };
    if !value.char_indices().any(|(i, c)| escape(i, c).is_some()) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + value.len() / 3 + 1);
    for (i, c) in value.char_indices() {
        match escape(i, c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// True when the `<` or `>` at `pos` belongs to one of `tags`, written
/// without attributes.
#[must_use]
pub fn is_tag_in(xml: &str, pos: usize, tags: &[&str]) -> bool {
    index_of_tag_in(xml, pos, tags, false).is_some()
}

/// Index into `tags` of the tag that the markup at `pos` opens or closes.
///
/// When `pos` is not on a `<`, the nearest `<` before it is used. Names must
/// match whole, so `br` is not taken for `b`. Unless `allow_attributes` is
/// set, only `/` and whitespace may sit between the name and the `>`.
///
/// ```rust
/// use streamtok::xml::index_of_tag_in;
///
/// let tags = ["b", "br", "i"];
/// assert_eq!(index_of_tag_in("<br/>", 0, &tags, false), Some(1));
/// assert_eq!(index_of_tag_in("x</i>", 4, &tags, false), Some(2));
/// assert_eq!(index_of_tag_in("<i id=1>", 0, &tags, false), None);
/// assert_eq!(index_of_tag_in("<i id=1>", 0, &tags, true), Some(2));
/// ```
#[must_use]
pub fn index_of_tag_in(xml: &str, pos: usize, tags: &[&str], allow_attributes: bool) -> Option<usize> {
    let bytes = xml.as_bytes();
    let start = if bytes.get(pos) == Some(&b'<') {
        pos
    } else {
        bytes[..pos.min(bytes.len())].iter().rposition(|&b| b == b'<')?
    };
    let name_at = start + if bytes.get(start + 1) == Some(&b'/') { 2 } else { 1 };
    let rest = &bytes[name_at..];
    let found = tags.iter().position(|tag| {
        !tag.is_empty()
            && rest.starts_with(tag.as_bytes())
            && rest.get(tag.len()).is_some_and(|&b| !is_name_byte(b))
    })?;
    if !allow_attributes {
        let after = &rest[tags[found].len()..];
        let end = after
            .iter()
            .find(|&&b| !matches!(b, b'/' | b' ' | b'\t' | b'\r' | b'\n'));
        if end != Some(&b'>') {
            return None;
        }
    }
    Some(found)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b':') || !b.is_ascii()
}

/// Returns the position after an entity starting at `pos`, or `pos` itself
/// when none starts there.
///
/// Only the shape is checked: `&#99999;`, `&#xFFFF;` or `&name;` with the `;`
/// within nine bytes of the `&`.
///
/// ```rust
/// use streamtok::xml::skip_if_entity_at;
///
/// let text = "&#39;&lt;script&#bad;";
/// assert_eq!(skip_if_entity_at(text, 0), 5);
/// assert_eq!(skip_if_entity_at(text, 5), 9);
/// assert_eq!(skip_if_entity_at(text, 15), 15);
/// ```
#[must_use]
pub fn skip_if_entity_at(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'&') || pos + 3 >= bytes.len() {
        return pos;
    }
    let mut i = pos + 1;
    let mut numeric = false;
    let mut hex = false;
    if bytes[i] == b'#' {
        numeric = true;
        i += 1;
        if bytes.get(i) == Some(&b'x') {
            hex = true;
            i += 1;
        }
    }
    let end = bytes.len().min(pos + 9);
    let mut c = bytes.get(i).copied().unwrap_or(0);
    while i < end {
        c = bytes[i];
        let keep_going = match c {
            b';' => false,
            b'0'..=b'9' => true,
            _ if hex => c.is_ascii_hexdigit(),
            _ if numeric => false,
            _ => c.is_ascii_alphabetic(),
        };
        if !keep_going {
            break;
        }
        i += 1;
    }
    if c == b';' && i < end {
        i + 1
    } else {
        pos
    }
}

/// Reads `encoding` from a leading `<?xml ...?>` declaration.
///
/// ```rust
/// use streamtok::xml::character_encoding;
///
/// assert_eq!(character_encoding(r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#), Some("UTF-8"));
/// assert_eq!(character_encoding("<a/>"), None);
/// ```
#[must_use]
pub fn character_encoding(xml: &str) -> Option<&str> {
    if !xml.starts_with("<?xml ") {
        return None;
    }
    let decl = &xml[..xml.find(PROCESS_END)?];
    let start = decl.rfind(" encoding=")? + " encoding=".len();
    let quote = decl[start..].chars().next()?;
    let value = &decl[start + quote.len_utf8()..];
    value.find(quote).map(|end| &value[..end])
}

/// Implements [`StreamTokenizer`] and [`XmlDeserializer`] for a wrapper
/// holding a `scanner` field.
macro_rules! forward_xml_deserializer {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> $crate::tokenizer::StreamTokenizer for $ty {
            fn find_item_next(&mut self) -> $crate::Result<bool> {
                self.scanner.find_tag_next()
            }

            fn find_item(&mut self, name: &str) -> $crate::Result<bool> {
                self.scanner.find_tag(name)
            }

            fn find_item_in(&mut self, names: &[&str]) -> $crate::Result<Option<usize>> {
                self.scanner.find_tag_in(names)
            }

            fn name(&self) -> Option<&str> {
                self.scanner.tag_name()
            }

            fn value(&mut self) -> $crate::Result<Option<String>> {
                self.scanner.element_value()
            }

            fn index(&self) -> Option<usize> {
                self.scanner.index()
            }

            fn is_throw_if_not_found(&self) -> bool {
                self.scanner.throw_if_not_found
            }

            fn set_throw_if_not_found(&mut self, throw_if_not_found: bool) {
                self.scanner.throw_if_not_found = throw_if_not_found;
            }
        }

        impl<$($gen)*> $crate::xml::XmlDeserializer for $ty {
            fn tag_name(&self) -> Option<&str> {
                self.scanner.tag_name()
            }

            fn find_tag_next(&mut self) -> $crate::Result<bool> {
                self.scanner.find_tag_next()
            }

            fn find_tag(&mut self, name: &str) -> $crate::Result<bool> {
                self.scanner.find_tag(name)
            }

            fn find_tag_in(&mut self, names: &[&str]) -> $crate::Result<Option<usize>> {
                self.scanner.find_tag_in(names)
            }

            fn attributes(&mut self) -> $crate::Result<Option<&$crate::xml::Attributes>> {
                self.scanner.attributes()
            }

            fn element_value(&mut self) -> $crate::Result<Option<String>> {
                self.scanner.element_value()
            }

            fn element_value_of(&mut self, name: &str) -> $crate::Result<Option<String>> {
                self.scanner.element_value_of(name)
            }
        }
    };
}

pub(crate) use forward_xml_deserializer;
