//! Re-rendering JSON on the fly, without building a tree.
//!
//! [`JsonXmlTransformer`] drives any [`JsonDeserializer`] into any
//! [`XmlSerializer`]; [`copy_json`] drives one into a [`JsonSerializer`].
//! Both keep one small frame per open scope and nothing else.
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{JsonTokenizer, JsonXmlTransformer, XmlBuffer};
//!
//! let mut json = JsonTokenizer::new(r#"{"list":[{"x":1,"y":2},{"x":3,"y":4}]}"#);
//! let mut xml = XmlBuffer::default();
//! JsonXmlTransformer::new()
//!     .with_attributes(true)
//!     .transform(&mut json, &mut xml)
//!     .unwrap();
//! assert_eq!(
//!     xml.to_xml(),
//!     r#"<list><array x="1" y="2"/><array x="3" y="4"/></list>"#
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::json::{JsonDeserializer, JsonSerializer, Scope};
use crate::value::Value;
use crate::xml::XmlSerializer;

/// Tag written for every array element.
pub const ARRAY_TAG: &str = "array";

/// One open JSON scope on the way through the transform.
#[derive(Debug)]
enum Frame {
    /// The outermost scope, which writes no tag.
    Root(Scope),
    /// A scope found under a name, written as that tag.
    Named(String, Scope),
    /// A scope found inside an array, written as the array tag.
    Element(Scope),
}

impl Frame {
    fn scope(&self) -> Scope {
        match self {
            Frame::Root(scope) | Frame::Named(_, scope) | Frame::Element(scope) => *scope,
        }
    }
}

/// Converts JSON into XML as it is read.
///
/// Each named member becomes a tag of that name. Arrays have no names of
/// their own, so each element is written as an `<array>` tag (see
/// [`with_array_tag`](Self::with_array_tag)) inside the tag of the array's
/// name. The root scope writes no tag; `null` becomes a self-closing tag.
///
/// With attributes enabled, a scalar member becomes an attribute while its
/// parent's start tag is still open, i.e. until the first nested tag is
/// written. Null members are left out in that case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonXmlTransformer {
    pub use_attributes: bool,
    pub array_tag: String,
}

impl Default for JsonXmlTransformer {
    fn default() -> Self {
        JsonXmlTransformer {
            use_attributes: false,
            array_tag: ARRAY_TAG.to_string(),
        }
    }
}

impl JsonXmlTransformer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attributes(mut self, use_attributes: bool) -> Self {
        self.use_attributes = use_attributes;
        self
    }

    #[must_use]
    pub fn with_array_tag(mut self, array_tag: impl Into<String>) -> Self {
        self.array_tag = array_tag.into();
        self
    }

    /// Reads one JSON object or array from `json` and writes it to `xml`.
    ///
    /// Input that does not start with a scope writes nothing. Truncated input
    /// has its open tags closed.
    ///
    /// # Errors
    ///
    /// Read and write errors of either side.
    pub fn transform<D, S>(&self, json: &mut D, xml: &mut S) -> Result<()>
    where
        D: JsonDeserializer + ?Sized,
        S: XmlSerializer + ?Sized,
    {
        let Some(root) = json.enter_either()? else {
            return Ok(());
        };
        tracing::debug!(use_attributes = self.use_attributes, ?root, "json to xml started");
        let mut frames = vec![Frame::Root(root)];
        while let Some(frame) = frames.last() {
            if frame.scope() == Scope::Array {
                if let Some(scope) = json.enter_either()? {
                    xml.open_tag(&self.array_tag)?;
                    frames.push(Frame::Element(scope));
                } else if let Some(value) = json.value_scalar()? {
                    xml.add_tag(&self.array_tag, text_of(&value).as_deref())?;
                } else {
                    json.leave_array()?;
                    self.close(frames.pop(), xml)?;
                }
            } else if json.find_item_next()? {
                let name = json.name().unwrap_or_default().to_string();
                if let Some(scope) = json.enter_either()? {
                    xml.open_tag(&name)?;
                    frames.push(Frame::Named(name, scope));
                    continue;
                }
                let text = json.value_scalar()?.and_then(|v| text_of(&v));
                if self.use_attributes && xml.is_tag_open() {
                    if let Some(text) = text {
                        xml.add_attribute(&name, Some(&text))?;
                    }
                } else {
                    xml.add_tag(&name, text.as_deref())?;
                }
            } else {
                json.leave_object()?;
                self.close(frames.pop(), xml)?;
            }
        }
        tracing::debug!(remaining_depth = json.nest_level(), "json to xml finished");
        Ok(())
    }

    fn close<S: XmlSerializer + ?Sized>(&self, frame: Option<Frame>, xml: &mut S) -> Result<()> {
        let name = match &frame {
            None | Some(Frame::Root(_)) => return Ok(()),
            Some(Frame::Named(name, _)) => name.as_str(),
            Some(Frame::Element(_)) => self.array_tag.as_str(),
        };
        if xml.is_tag_open() {
            xml.self_close_tag()
        } else {
            xml.close_tag(name)
        }
    }
}

fn text_of(value: &Value<'_>) -> Option<String> {
    (!value.is_null()).then(|| value.to_string())
}

fn open<S: JsonSerializer + ?Sized>(out: &mut S, scope: Scope, name: Option<&str>) -> Result<()> {
    match scope {
        Scope::Object => out.open_object(name),
        Scope::Array => out.open_array(name),
    }
}

/// Bare tokens are written as read when they are JSON numbers. Any other bare
/// word is quoted.
fn quote_words(value: Value<'_>) -> Value<'_> {
    match value {
        Value::Raw(text) if !is_json_number(&text) => Value::String(text),
        other => other,
    }
}

fn is_json_number(text: &str) -> bool {
    fn digits(s: &[u8]) -> usize {
        s.iter().take_while(|b| b.is_ascii_digit()).count()
    }
    let s = text.as_bytes();
    let s = s.strip_prefix(b"-").unwrap_or(s);
    let int = digits(s);
    if int == 0 || (int > 1 && s[0] == b'0') {
        return false;
    }
    let mut s = &s[int..];
    if let Some(frac) = s.strip_prefix(b".") {
        let n = digits(frac);
        if n == 0 {
            return false;
        }
        s = &frac[n..];
    }
    if let Some(exp) = s.strip_prefix(b"e").or_else(|| s.strip_prefix(b"E")) {
        let exp = exp
            .strip_prefix(b"+")
            .or_else(|| exp.strip_prefix(b"-"))
            .unwrap_or(exp);
        let n = digits(exp);
        if n == 0 {
            return false;
        }
        s = &exp[n..];
    }
    s.is_empty()
}

/// Copies one JSON object or array from `json` to `out`.
///
/// Quoted strings and keywords keep their kind, and numbers are written
/// exactly as read. Other bare words, which the readers accept as lenient
/// strings, are quoted so the output is valid JSON. Whitespace is dropped, or
/// re-created when `out` wraps lines.
///
/// ```rust
/// use streamtok::{copy_json, JsonBuffer, JsonTokenizer};
///
/// let mut json = JsonTokenizer::new(r#"{ "a" : [ 1 , 2.50 ], b : "x\ty" }"#);
/// let mut out = JsonBuffer::default();
/// copy_json(&mut json, &mut out).unwrap();
/// assert_eq!(out.to_json(), r#"{"a":[1,2.50],"b":"x\ty"}"#);
/// ```
///
/// # Errors
///
/// Read and write errors of either side.
pub fn copy_json<D, S>(json: &mut D, out: &mut S) -> Result<()>
where
    D: JsonDeserializer + ?Sized,
    S: JsonSerializer + ?Sized,
{
    let Some(root) = json.enter_either()? else {
        return Ok(());
    };
    let out_base = out.nest_level();
    let base = json.nest_level() - 1;
    open(out, root, None)?;
    while json.nest_level() > base {
        match json.nest_scope() {
            Some(Scope::Array) => {
                if let Some(scope) = json.enter_either()? {
                    open(out, scope, None)?;
                } else if let Some(value) = json.value_scalar()? {
                    out.add_value(None, quote_words(value))?;
                } else if json.leave_array()? {
                    out.close_level()?;
                } else {
                    break;
                }
            }
            Some(Scope::Object) => {
                if json.find_item_next()? {
                    let name = json.name().unwrap_or_default().to_string();
                    if let Some(scope) = json.enter_either()? {
                        open(out, scope, Some(&name))?;
                    } else {
                        let value = json.value_scalar()?.unwrap_or(Value::Null);
                        out.add_value(Some(&name), quote_words(value))?;
                    }
                } else if json.leave_object()? {
                    out.close_level()?;
                } else {
                    break;
                }
            }
            None => break,
        }
    }
    while out.nest_level() > out_base {
        out.close_level()?;
    }
    Ok(())
}
