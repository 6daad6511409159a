//! Configuration for readers and writers.
//!
//! - [`ReaderOptions`]: lookahead window size and the not-found policy
//! - [`WriterOptions`]: line wrapping and optional `/` escaping
//!
//! Both derive `serde` traits with `#[serde(default)]`, so a partial document
//! in any serde format fills in the rest from [`Default`].
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{JsonDeserializer, JsonReader, ReaderOptions, StreamTokenizer};
//!
//! let options = ReaderOptions::new().with_buffer_size(64);
//! let mut reader = JsonReader::with_options(&b"{\"a\":1}"[..], options);
//! reader.enter_object().unwrap();
//! assert!(reader.find_item("a").unwrap());
//! ```

use serde::{Deserialize, Serialize};

/// Default window of the stream readers, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// Smallest window a stream reader will run with. Large enough for every
/// keyword plus delimiter and for the `<![CDATA[` opener.
pub const MIN_BUFFER_SIZE: usize = 16;

/// Options shared by the four readers.
///
/// # Examples
///
/// ```rust
/// use streamtok::ReaderOptions;
///
/// let options = ReaderOptions::new()
///     .with_buffer_size(256)
///     .with_throw_if_not_found(true);
/// assert_eq!(options.window(), 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Lookahead window of stream readers. Ignored by string tokenizers.
    pub buffer_size: usize,
    /// Report `find_*` misses as [`Error::NotFound`](crate::Error::NotFound).
    pub throw_if_not_found: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            throw_if_not_found: false,
        }
    }
}

impl ReaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stream reader window. Values below [`MIN_BUFFER_SIZE`] are raised to it.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Selects strict mode: a failed search returns an error instead of `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use streamtok::ReaderOptions;
    ///
    /// let options = ReaderOptions::new().with_throw_if_not_found(true);
    /// assert!(options.throw_if_not_found);
    /// ```
    #[must_use]
    pub fn with_throw_if_not_found(mut self, throw_if_not_found: bool) -> Self {
        self.throw_if_not_found = throw_if_not_found;
        self
    }

    /// The window a stream reader actually allocates.
    #[must_use]
    pub fn window(&self) -> usize {
        self.buffer_size.max(MIN_BUFFER_SIZE)
    }
}

/// Options shared by the JSON and XML writers.
///
/// # Examples
///
/// ```rust
/// use streamtok::WriterOptions;
///
/// let options = WriterOptions::pretty();
/// assert!(options.line_wrapping);
/// assert!(!options.escape_slash);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Break lines and indent with tabs.
    pub line_wrapping: bool,
    /// Also escape `/` as `\/` in JSON strings.
    pub escape_slash: bool,
}

impl WriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with line wrapping enabled.
    #[must_use]
    pub fn pretty() -> Self {
        WriterOptions {
            line_wrapping: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_line_wrapping(mut self, line_wrapping: bool) -> Self {
        self.line_wrapping = line_wrapping;
        self
    }

    #[must_use]
    pub fn with_escape_slash(mut self, escape_slash: bool) -> Self {
        self.escape_slash = escape_slash;
        self
    }
}
