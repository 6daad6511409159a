//! JSON writers: straight to a sink, or into a [`ByteBuffer`].

use std::io::Write;

use super::{write_encoded, JsonSerializer, Scope};
use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::options::WriterOptions;
use crate::value::Value;

/// One open scope and whether anything was written into it yet.
#[derive(Clone, Copy, Debug)]
struct Level {
    scope: Scope,
    has_content: bool,
}

/// Writes JSON through to any [`Write`] as calls arrive.
///
/// # Examples
///
/// ```rust
/// use streamtok::{JsonSerializer, JsonWriter};
///
/// let mut out = Vec::new();
/// let mut writer = JsonWriter::new(&mut out);
/// writer.open_object(None).unwrap();
/// writer.add_item("id", 7).unwrap();
/// writer.add_array(Some("tags"), ["a", "b"]).unwrap();
/// writer.close_level().unwrap();
/// assert_eq!(out, br#"{"id":7,"tags":["a","b"]}"#);
/// ```
#[derive(Debug)]
pub struct JsonWriter<W> {
    out: W,
    nest: Vec<Level>,
    options: WriterOptions,
}

/// JSON writer accumulating into memory.
///
/// # Examples
///
/// ```rust
/// use streamtok::{JsonBuffer, JsonSerializer};
///
/// let mut buf = JsonBuffer::default();
/// buf.open_array(None).unwrap();
/// buf.add_element("x").unwrap();
/// buf.add_element(()).unwrap();
/// buf.close_level().unwrap();
/// assert_eq!(buf.to_json(), r#"["x",null]"#);
/// ```
pub type JsonBuffer = JsonWriter<ByteBuffer>;

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    pub fn with_options(out: W, options: WriterOptions) -> Self {
        JsonWriter {
            out,
            nest: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Returns the sink. Open scopes stay unclosed.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> Result<()> {
        self.out.write_all(b"\n")?;
        for _ in 0..depth {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    /// Writes the separator and name in front of a value or an opened scope.
    fn begin_item(&mut self, name: Option<&str>) -> Result<()> {
        match (self.nest.last().map(|l| l.scope), name) {
            (Some(Scope::Array), Some(name)) => {
                return Err(Error::invalid_state(&format!(
                    "named item {name:?} inside an array"
                )))
            }
            (Some(Scope::Object), None) => {
                return Err(Error::invalid_state("unnamed item inside an object"))
            }
            _ => {}
        }
        if let Some(level) = self.nest.last_mut() {
            if level.has_content {
                self.out.write_all(b",")?;
            } else {
                level.has_content = true;
            }
        }
        if let Some(name) = name {
            if self.options.line_wrapping {
                self.write_indent(self.nest.len())?;
            }
            self.out.write_all(b"\"")?;
            write_encoded(&mut self.out, name, self.options.escape_slash)?;
            let colon: &[u8] = if self.options.line_wrapping {
                b"\" : "
            } else {
                b"\":"
            };
            self.out.write_all(colon)?;
        }
        Ok(())
    }

    fn open(&mut self, scope: Scope, name: Option<&str>) -> Result<()> {
        self.begin_item(name)?;
        let mut open = [0u8; 4];
        self.out
            .write_all(scope.open_char().encode_utf8(&mut open).as_bytes())?;
        self.nest.push(Level {
            scope,
            has_content: false,
        });
        Ok(())
    }

    fn write_value(&mut self, value: &Value<'_>) -> Result<()> {
        match value {
            Value::Null => self.out.write_all(b"null")?,
            Value::Float(x) if !x.is_finite() => self.out.write_all(b"null")?,
            Value::String(s) => {
                self.out.write_all(b"\"")?;
                write_encoded(&mut self.out, s, self.options.escape_slash)?;
                self.out.write_all(b"\"")?;
            }
            Value::Date(d) => write!(self.out, "\"{}\"", d.to_rfc3339())?,
            Value::Raw(s) => self.out.write_all(s.as_bytes())?,
            literal => write!(self.out, "{}", literal)?,
        }
        Ok(())
    }
}

impl JsonWriter<ByteBuffer> {
    /// The JSON written so far.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.out.to_string_lossy().into_owned()
    }

    /// Discards all output and open scopes.
    pub fn clear(&mut self) {
        self.out.clear();
        self.nest.clear();
    }
}

impl Default for JsonWriter<ByteBuffer> {
    fn default() -> Self {
        JsonWriter::new(ByteBuffer::new())
    }
}

impl<W: Write> JsonSerializer for JsonWriter<W> {
    fn nest_level(&self) -> usize {
        self.nest.len()
    }

    fn nest_scope(&self) -> Option<Scope> {
        self.nest.last().map(|l| l.scope)
    }

    fn is_line_wrapping(&self) -> bool {
        self.options.line_wrapping
    }

    fn set_line_wrapping(&mut self, line_wrapping: bool) {
        self.options.line_wrapping = line_wrapping;
    }

    fn open_object(&mut self, name: Option<&str>) -> Result<()> {
        self.open(Scope::Object, name)
    }

    fn open_array(&mut self, name: Option<&str>) -> Result<()> {
        self.open(Scope::Array, name)
    }

    fn add_value(&mut self, name: Option<&str>, value: Value<'_>) -> Result<()> {
        if name.is_none() && self.nest_scope() != Some(Scope::Array) {
            return Err(Error::invalid_state("unnamed value outside an array"));
        }
        self.begin_item(name)?;
        self.write_value(&value)
    }

    fn close_level(&mut self) -> Result<()> {
        let level = self
            .nest
            .pop()
            .ok_or_else(|| Error::invalid_state("no open scope to close"))?;
        if self.options.line_wrapping && level.scope == Scope::Object && level.has_content {
            self.write_indent(self.nest.len())?;
        }
        let mut close = [0u8; 4];
        self.out
            .write_all(level.scope.close_char().encode_utf8(&mut close).as_bytes())?;
        Ok(())
    }
}
