//! Cursor logic shared by [`JsonTokenizer`](super::JsonTokenizer) and
//! [`JsonReader`](super::JsonReader).

use std::borrow::Cow;

use super::{decode_value, Scope, KEYWORDS, NON_NAME, NON_STARTER, NON_VALUE};
use crate::error::{Error, Result};
use crate::source::Source;
use crate::value::Value;

/// How a scalar was spelled in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Spelling {
    Quoted,
    Keyword,
    Bare,
}

pub(crate) struct JsonScanner<S> {
    pub(crate) src: S,
    nest: Vec<Scope>,
    name: Option<String>,
    pub(crate) throw_if_not_found: bool,
}

impl<S: Source> JsonScanner<S> {
    pub(crate) fn new(src: S, throw_if_not_found: bool) -> Self {
        JsonScanner {
            src,
            nest: Vec::new(),
            name: None,
            throw_if_not_found,
        }
    }

    /// Forgets every open scope and the current name.
    pub(crate) fn clear(&mut self) {
        self.nest.clear();
        self.name = None;
    }

    pub(crate) fn nest_level(&self) -> usize {
        self.nest.len()
    }

    pub(crate) fn nest_scope(&self) -> Option<Scope> {
        self.nest.last().copied()
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.src.index()
    }

    pub(crate) fn this_byte(&mut self) -> Result<Option<u8>> {
        self.src.skip_whitespace()?;
        self.src.peek()
    }

    pub(crate) fn last_byte(&self) -> Option<u8> {
        self.src.last()
    }

    /// Consumes a keyword when one starts here and is followed by a name
    /// terminator or the end of input.
    fn keyword(&mut self) -> Result<Option<&'static str>> {
        self.src.skip_whitespace()?;
        for keyword in KEYWORDS {
            if !self.src.matches_at(0, keyword.as_bytes())? {
                continue;
            }
            match self.src.peek_at(keyword.len())? {
                Some(b) if !NON_NAME.contains(&b) => continue,
                _ => {
                    self.src.bump(keyword.len());
                    return Ok(Some(keyword));
                }
            }
        }
        Ok(None)
    }

    /// Reads a quoted or bare name. The whole name has to fit in the lookahead
    /// window of a stream source.
    fn item_name(&mut self) -> Result<Option<String>> {
        if let Some(keyword) = self.keyword()? {
            return Ok(Some(keyword.to_string()));
        }
        let quoted = match self.src.peek()? {
            None => return Ok(None),
            Some(b) => b == b'"',
        };
        let mut end = usize::from(quoted);
        let mut escaped = false;
        let mut raw = Vec::new();
        while let Some(b) = self.src.peek_at(end)? {
            if quoted && b == b'"' && !escaped {
                break;
            }
            if !quoted && NON_NAME.contains(&b) {
                break;
            }
            escaped = quoted && b == b'\\' && !escaped;
            raw.push(b);
            end += 1;
        }
        let closed = quoted && self.src.peek_at(end)? == Some(b'"');
        self.src.bump(end + usize::from(closed));

        if !quoted && end == 0 {
            // a stray byte that is neither structure nor name
            if let Some(b) = self.src.peek()? {
                if !NON_STARTER.contains(&b) {
                    self.src.bump(1);
                }
            }
        }
        let text = String::from_utf8_lossy(&raw);
        Ok(Some(if quoted {
            decode_value(&text).into_owned()
        } else {
            text.into_owned()
        }))
    }

    fn value_token(&mut self) -> Result<Option<(String, Spelling)>> {
        self.src.skip_whitespace()?;
        if matches!(self.src.peek()?, Some(b':' | b',')) {
            self.src.bump(1);
        }
        if let Some(keyword) = self.keyword()? {
            return Ok(Some((keyword.to_string(), Spelling::Keyword)));
        }
        let quoted = match self.src.peek()? {
            None => return Ok(None),
            Some(b) if NON_STARTER.contains(&b) => return Ok(None),
            Some(b) => b == b'"',
        };
        if quoted {
            self.src.bump(1);
        }
        let mut raw = Vec::new();
        while let Some(b) = self.src.peek()? {
            match b {
                b'\\' => {
                    raw.push(b);
                    self.src.bump(1);
                    if let Some(next) = self.src.peek()? {
                        raw.push(next);
                        self.src.bump(1);
                    }
                }
                b'"' if quoted => {
                    self.src.bump(1);
                    break;
                }
                _ if !quoted && NON_VALUE.contains(&b) => break,
                _ => {
                    raw.push(b);
                    self.src.bump(1);
                }
            }
        }
        let text = match String::from_utf8_lossy(&raw) {
            Cow::Borrowed(text) => decode_value(text).into_owned(),
            Cow::Owned(text) => decode_value(&text).into_owned(),
        };
        let spelling = if quoted {
            Spelling::Quoted
        } else {
            Spelling::Bare
        };
        Ok(Some((text, spelling)))
    }

    /// Steps over one token that is not read as a name. Values of any length
    /// pass through the window.
    fn skip_token(&mut self) -> Result<()> {
        let before = self.src.index();
        self.value_token()?;
        if self.src.index() == before {
            // a stray byte that starts no token
            self.src.bump(1);
        }
        Ok(())
    }

    pub(crate) fn value(&mut self) -> Result<Option<String>> {
        Ok(self.value_token()?.map(|(text, _)| text))
    }

    pub(crate) fn value_scalar(&mut self) -> Result<Option<Value<'static>>> {
        Ok(self.value_token()?.map(|(text, spelling)| match spelling {
            Spelling::Keyword => match text.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::Null,
            },
            Spelling::Quoted => Value::String(Cow::Owned(text)),
            Spelling::Bare => Value::Raw(Cow::Owned(text)),
        }))
    }

    /// Consumes one structural token, or steps over one scalar. Closing
    /// markers are only consumed while deeper than `level`. Returns the last
    /// byte consumed, or `None` at the end of input or at a closing marker at
    /// `level`.
    fn find_token_next(&mut self, level: usize) -> Result<Option<u8>> {
        self.src.skip_whitespace()?;
        let Some(mut c) = self.src.peek()? else {
            return Ok(None);
        };
        if c == b':' {
            self.src.bump(1);
            self.value_token()?;
            self.src.skip_whitespace()?;
            match self.src.peek()? {
                Some(b) => c = b,
                None => return Ok(self.src.last()),
            }
        }
        match c {
            b'{' | b'[' => {
                self.nest.extend(Scope::from_open(c));
                self.src.bump(1);
            }
            b'}' | b']' => {
                if self.nest.len() <= level {
                    return Ok(None);
                }
                self.nest.pop();
                self.src.bump(1);
            }
            _ => self.skip_token()?,
        }
        Ok(self.src.last().or(Some(c)))
    }

    /// Moves to the next name at the current depth, stepping over nested
    /// scopes and array elements. Returns false at the end of the current
    /// scope. Only the name found has to fit in the lookahead window.
    pub(crate) fn find_item_next(&mut self) -> Result<bool> {
        let level = self.nest.len();
        loop {
            self.src.skip_whitespace()?;
            let Some(c) = self.src.peek()? else {
                return Ok(false);
            };
            match c {
                b':' => {
                    self.src.bump(1);
                    self.value_token()?;
                }
                b'{' | b'[' => {
                    self.nest.extend(Scope::from_open(c));
                    self.src.bump(1);
                }
                b'}' | b']' => {
                    if self.nest.len() <= level {
                        return Ok(false);
                    }
                    self.nest.pop();
                    self.src.bump(1);
                }
                _ if self.nest.len() != level || self.nest_scope() == Some(Scope::Array) => {
                    self.skip_token()?;
                }
                _ => {
                    if c == b',' {
                        self.src.bump(1);
                    }
                    self.name = self.item_name()?;
                    return Ok(true);
                }
            }
        }
    }

    fn find_matching(&mut self, names: &[&str]) -> Result<Option<usize>> {
        let level = self.nest.len();
        loop {
            let stepped = self.find_item_next()? || self.find_token_next(level)?.is_some();
            if !stepped {
                break;
            }
            if self.nest.len() != level {
                continue;
            }
            let current = self.name.as_deref();
            if let Some(i) = names.iter().position(|n| Some(*n) == current) {
                return Ok(Some(i));
            }
        }
        if self.throw_if_not_found {
            tracing::debug!(names = ?names, "json item not found");
            return Err(Error::not_found(names.iter().copied()));
        }
        Ok(None)
    }

    pub(crate) fn find_item(&mut self, name: &str) -> Result<bool> {
        Ok(self.find_matching(&[name])?.is_some())
    }

    pub(crate) fn find_item_in(&mut self, names: &[&str]) -> Result<Option<usize>> {
        self.find_matching(names)
    }

    /// Pushes a scope when the next byte, after one optional `:` or `,`,
    /// opens one of the `wanted` kind (any kind for `None`).
    pub(crate) fn enter(&mut self, wanted: Option<Scope>) -> Result<Option<Scope>> {
        self.src.skip_whitespace()?;
        if matches!(self.src.peek()?, Some(b':' | b',')) {
            self.src.bump(1);
            self.src.skip_whitespace()?;
        }
        let Some(scope) = self.src.peek()?.and_then(Scope::from_open) else {
            return Ok(None);
        };
        if wanted.is_some_and(|w| w != scope) {
            return Ok(None);
        }
        self.nest.push(scope);
        self.src.bump(1);
        Ok(Some(scope))
    }

    /// Skips to the end of the innermost scope when it is of the `wanted`
    /// kind. Depth is restored when the input ends first.
    pub(crate) fn leave(&mut self, wanted: Option<Scope>) -> Result<Option<Scope>> {
        let Some(top) = self.nest_scope() else {
            return Ok(None);
        };
        if wanted.is_some_and(|w| w != top) {
            return Ok(None);
        }
        let level = self.nest.len();
        loop {
            if self.find_token_next(0)?.is_none() {
                self.nest.truncate(level);
                return Ok(None);
            }
            if self.nest.len() < level {
                self.name = None;
                return Ok(Some(top));
            }
        }
    }
}
