//! JSON reading and writing.
//!
//! Two readers implement [`JsonDeserializer`]:
//!
//! - [`JsonTokenizer`] over a `&str`, rewindable with `reset`
//! - [`JsonReader`] over any [`std::io::Read`], through a bounded window
//!
//! One writer type implements [`JsonSerializer`]: [`JsonWriter`] writes
//! through to any [`std::io::Write`], and [`JsonBuffer`] is the same writer
//! over an in-memory [`ByteBuffer`](crate::ByteBuffer).
//!
//! The readers are lenient. Names may be bare or quoted, values may be bare
//! runs of text, and a `:` or `,` in front of a value is skipped.
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{JsonDeserializer, JsonTokenizer, StreamTokenizer};
//!
//! let mut tok = JsonTokenizer::new("{ x : [1,2], y : 3 }");
//! assert!(tok.enter_object().unwrap());
//! assert!(tok.find_item_next().unwrap());
//! assert_eq!(tok.name(), Some("x"));
//! assert!(tok.enter_array().unwrap());
//! assert_eq!(tok.value_i32().unwrap(), Some(1));
//! assert_eq!(tok.value_i32().unwrap(), Some(2));
//! assert!(tok.leave_array().unwrap());
//! assert!(tok.find_item("y").unwrap());
//! assert_eq!(tok.value_i32().unwrap(), Some(3));
//! assert!(!tok.find_item_next().unwrap());
//! assert!(tok.leave_object().unwrap());
//! assert_eq!(tok.nest_level(), 0);
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use crate::error::Result;
use crate::tokenizer::StreamTokenizer;
use crate::value::Value;

pub mod reader;
pub(crate) mod scanner;
pub mod tokenizer;
pub mod writer;

pub use reader::JsonReader;
pub use tokenizer::JsonTokenizer;
pub use writer::{JsonBuffer, JsonWriter};

/// Bare literals that are values rather than text.
pub const KEYWORDS: [&str; 3] = ["null", "false", "true"];

/// Bytes that end a bare name.
pub(crate) const NON_NAME: &[u8] = b":,{}[]\\\" \t\r\n\x0c\x08";

/// Bytes that end a bare value.
pub(crate) const NON_VALUE: &[u8] = b":,{}[] \t\r\n\x0c\x08";

/// Bytes that cannot start a value.
pub(crate) const NON_STARTER: &[u8] = b":,{}[]";

/// The kind of a nested JSON scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Object,
    Array,
}

impl Scope {
    pub(crate) fn from_open(byte: u8) -> Option<Scope> {
        match byte {
            b'{' => Some(Scope::Object),
            b'[' => Some(Scope::Array),
            _ => None,
        }
    }

    #[must_use]
    pub const fn open_char(self) -> char {
        match self {
            Scope::Object => '{',
            Scope::Array => '[',
        }
    }

    #[must_use]
    pub const fn close_char(self) -> char {
        match self {
            Scope::Object => '}',
            Scope::Array => ']',
        }
    }
}

/// JSON specific reading on top of [`StreamTokenizer`].
///
/// `enter_*` skip one pending `:` or `,`, then push a scope if the next byte
/// opens one of the requested kind. `leave_*` skip forward to the end of the
/// innermost open scope; they fail without moving when that scope is of
/// another kind or when nothing is open.
pub trait JsonDeserializer: StreamTokenizer {
    /// Number of open scopes.
    fn nest_level(&self) -> usize;

    /// Kind of the innermost open scope.
    fn nest_scope(&self) -> Option<Scope>;

    /// Next non-whitespace byte, without consuming it.
    fn this_byte(&mut self) -> Result<Option<u8>>;

    /// The byte most recently consumed.
    fn last_byte(&self) -> Option<u8>;

    fn enter_object(&mut self) -> Result<bool>;

    fn enter_array(&mut self) -> Result<bool>;

    fn enter_either(&mut self) -> Result<Option<Scope>>;

    fn leave_object(&mut self) -> Result<bool>;

    fn leave_array(&mut self) -> Result<bool>;

    fn leave_either(&mut self) -> Result<Option<Scope>>;

    /// Consumes the current value, keeping the quoted, keyword and bare
    /// distinction: keywords become `Null`/`Bool`, quoted text `String`, and
    /// bare runs `Raw`.
    fn value_scalar(&mut self) -> Result<Option<Value<'static>>>;
}

/// Forward-only JSON writing.
///
/// Each open scope carries a marker that flips from "opening" to "has
/// content" with the first value; a `,` goes in front of every later value
/// at that level.
pub trait JsonSerializer {
    fn nest_level(&self) -> usize;

    fn nest_scope(&self) -> Option<Scope>;

    fn is_line_wrapping(&self) -> bool;

    fn set_line_wrapping(&mut self, line_wrapping: bool);

    /// Opens an object, named when written inside an object.
    fn open_object(&mut self, name: Option<&str>) -> Result<()>;

    /// Opens an array, named when written inside an object.
    fn open_array(&mut self, name: Option<&str>) -> Result<()>;

    /// Writes a value, named inside objects and unnamed inside arrays.
    fn add_value(&mut self, name: Option<&str>, value: Value<'_>) -> Result<()>;

    /// Closes the innermost scope.
    fn close_level(&mut self) -> Result<()>;

    /// Closes every open scope.
    fn close_all(&mut self) -> Result<()> {
        while self.nest_level() > 0 {
            self.close_level()?;
        }
        Ok(())
    }

    fn add_item<'v>(&mut self, name: &str, value: impl Into<Value<'v>>) -> Result<()>
    where
        Self: Sized,
    {
        self.add_value(Some(name), value.into())
    }

    /// Writes an array element.
    fn add_element<'v>(&mut self, value: impl Into<Value<'v>>) -> Result<()>
    where
        Self: Sized,
    {
        self.add_value(None, value.into())
    }

    /// Opens an array, writes every item into it and closes it.
    fn add_array<'v, I>(&mut self, name: Option<&str>, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value<'v>>,
        Self: Sized,
    {
        self.open_array(name)?;
        for item in items {
            self.add_value(None, item.into())?;
        }
        self.close_level()
    }
}

const fn escape_for(c: char, escape_slash: bool) -> Option<&'static str> {
    match c {
        '\\' => Some("\\\\"),
        '"' => Some("\\\""),
        '\t' => Some("\\t"),
        '\r' => Some("\\r"),
        '\n' => Some("\\n"),
        '\u{0c}' => Some("\\f"),
        '\u{08}' => Some("\\b"),
        '/' if escape_slash => Some("\\/"),
        _ => None,
    }
}

const fn unescape(byte: u8) -> Option<char> {
    match byte {
        b'\\' => Some('\\'),
        b'"' => Some('"'),
        b't' => Some('\t'),
        b'r' => Some('\r'),
        b'n' => Some('\n'),
        b'f' => Some('\u{0c}'),
        b'b' => Some('\u{08}'),
        b'/' => Some('/'),
        _ => None,
    }
}

/// Escapes `\ " tab cr lf formfeed backspace` for use inside a JSON string.
///
/// # Examples
///
/// ```rust
/// use streamtok::json::encode_value;
///
/// assert_eq!(encode_value("a\"b\n"), "a\\\"b\\n");
/// assert_eq!(encode_value("plain"), "plain");
/// ```
#[must_use]
pub fn encode_value(value: &str) -> Cow<'_, str> {
    encode_value_and_slash(value, false)
}

/// [`encode_value`], optionally also escaping `/`.
#[must_use]
pub fn encode_value_and_slash(value: &str, escape_slash: bool) -> Cow<'_, str> {
    if !value.chars().any(|c| escape_for(c, escape_slash).is_some()) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match escape_for(c, escape_slash) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub(crate) fn write_encoded<W: Write + ?Sized>(
    out: &mut W,
    value: &str,
    escape_slash: bool,
) -> io::Result<()> {
    let mut start = 0;
    for (i, c) in value.char_indices() {
        if let Some(escaped) = escape_for(c, escape_slash) {
            out.write_all(value[start..i].as_bytes())?;
            out.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
    }
    out.write_all(value[start..].as_bytes())
}

/// Accumulates decoded text, pairing UTF-16 surrogates from `\u` escapes.
struct Unescaped {
    out: String,
    high: Option<u16>,
}

impl Unescaped {
    fn flush(&mut self) {
        if self.high.take().is_some() {
            self.out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    fn push_str(&mut self, s: &str) {
        if !s.is_empty() {
            self.flush();
            self.out.push_str(s);
        }
    }

    fn push_char(&mut self, c: char) {
        self.flush();
        self.out.push(c);
    }

    fn push_unit(&mut self, unit: u16) {
        match unit {
            0xD800..=0xDBFF => {
                self.flush();
                self.high = Some(unit);
            }
            0xDC00..=0xDFFF => {
                let c = self
                    .high
                    .take()
                    .map(|high| 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00))
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.out.push(c);
            }
            _ => self.push_char(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}

/// Reverses [`encode_value`], also accepting `\/` and `\uXXXX`.
///
/// Unknown escapes keep their backslash. A `\u` without four hex digits is
/// kept as written. Unpaired surrogates become U+FFFD.
///
/// # Examples
///
/// ```rust
/// use streamtok::json::decode_value;
///
/// assert_eq!(decode_value(r"tab\there"), "tab\there");
/// assert_eq!(decode_value(r"\u00e9\ud83d\ude00"), "é😀");
/// assert_eq!(decode_value(r"cut \u12"), r"cut \u12");
/// ```
#[must_use]
pub fn decode_value(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }
    let bytes = value.as_bytes();
    let mut text = Unescaped {
        out: String::with_capacity(value.len()),
        high: None,
    };
    let mut start = 0;
    while let Some(rel) = value[start..].find('\\') {
        let at = start + rel;
        text.push_str(&value[start..at]);
        match bytes.get(at + 1) {
            None => {
                text.push_str("\\");
                start = at + 1;
            }
            Some(b'u') => {
                let unit = value
                    .get(at + 2..at + 6)
                    .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|hex| u16::from_str_radix(hex, 16).ok());
                match unit {
                    Some(unit) => {
                        text.push_unit(unit);
                        start = at + 6;
                    }
                    None => {
                        text.push_str("\\u");
                        start = at + 2;
                    }
                }
            }
            Some(&b) => match unescape(b) {
                Some(c) => {
                    text.push_char(c);
                    start = at + 2;
                }
                None => {
                    text.push_str("\\");
                    start = at + 1;
                }
            },
        }
    }
    text.push_str(&value[start..]);
    Cow::Owned(text.finish())
}

/// Implements [`StreamTokenizer`] and [`JsonDeserializer`] for a wrapper
/// holding a `scanner` field.
macro_rules! forward_json_deserializer {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> $crate::tokenizer::StreamTokenizer for $ty {
            fn find_item_next(&mut self) -> $crate::Result<bool> {
                self.scanner.find_item_next()
            }

            fn find_item(&mut self, name: &str) -> $crate::Result<bool> {
                self.scanner.find_item(name)
            }

            fn find_item_in(&mut self, names: &[&str]) -> $crate::Result<Option<usize>> {
                self.scanner.find_item_in(names)
            }

            fn name(&self) -> Option<&str> {
                self.scanner.name()
            }

            fn value(&mut self) -> $crate::Result<Option<String>> {
                self.scanner.value()
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

        impl<$($gen)*> $crate::json::JsonDeserializer for $ty {
            fn nest_level(&self) -> usize {
                self.scanner.nest_level()
            }

            fn nest_scope(&self) -> Option<$crate::json::Scope> {
                self.scanner.nest_scope()
            }

            fn this_byte(&mut self) -> $crate::Result<Option<u8>> {
                self.scanner.this_byte()
            }

            fn last_byte(&self) -> Option<u8> {
                self.scanner.last_byte()
            }

            fn enter_object(&mut self) -> $crate::Result<bool> {
                Ok(self.scanner.enter(Some($crate::json::Scope::Object))?.is_some())
            }

            fn enter_array(&mut self) -> $crate::Result<bool> {
                Ok(self.scanner.enter(Some($crate::json::Scope::Array))?.is_some())
            }

            fn enter_either(&mut self) -> $crate::Result<Option<$crate::json::Scope>> {
                self.scanner.enter(None)
            }

            fn leave_object(&mut self) -> $crate::Result<bool> {
                Ok(self.scanner.leave(Some($crate::json::Scope::Object))?.is_some())
            }

            fn leave_array(&mut self) -> $crate::Result<bool> {
                Ok(self.scanner.leave(Some($crate::json::Scope::Array))?.is_some())
            }

            fn leave_either(&mut self) -> $crate::Result<Option<$crate::json::Scope>> {
                self.scanner.leave(None)
            }

            fn value_scalar(&mut self) -> $crate::Result<Option<$crate::Value<'static>>> {
                self.scanner.value_scalar()
            }
        }
    };
}

pub(crate) use forward_json_deserializer;
