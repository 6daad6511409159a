//! JSON reader over a byte stream.

use std::io::Read;

use super::scanner::JsonScanner;
use crate::options::ReaderOptions;
use crate::source::StreamSource;

/// Reads JSON from any [`Read`] through a bounded lookahead window.
///
/// The window ([`ReaderOptions::buffer_size`], 128 bytes by default) bounds
/// how long a single name may be; values stream through it at any length.
/// A name that does not fit fails with
/// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded). The reader is
/// one-shot: consumed input is gone.
///
/// # Examples
///
/// ```rust
/// use streamtok::{JsonDeserializer, JsonReader, StreamTokenizer};
///
/// let input = r#"{"rows":[{"id":1},{"id":2}]}"#.as_bytes();
/// let mut reader = JsonReader::new(input);
/// reader.enter_object().unwrap();
/// reader.find_item("rows").unwrap();
/// reader.enter_array().unwrap();
///
/// let mut ids = Vec::new();
/// while reader.enter_object().unwrap() {
///     reader.find_item("id").unwrap();
///     ids.push(reader.value_i32().unwrap().unwrap());
///     reader.leave_object().unwrap();
/// }
/// assert_eq!(ids, [1, 2]);
/// ```
pub struct JsonReader<R> {
    scanner: JsonScanner<StreamSource<R>>,
}

impl<R: Read> JsonReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReaderOptions::default())
    }

    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        JsonReader {
            scanner: JsonScanner::new(
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

super::forward_json_deserializer!([R: Read] JsonReader<R>);
