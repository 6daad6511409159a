//! Error types for the tokenizers, readers and writers.
//!
//! The readers are tolerant: malformed structure never produces an error on its
//! own, the cursor simply moves forward until something recognisable turns up.
//! Errors are reserved for the cases a caller has to act on:
//!
//! - **Not found**: a `find_*` miss while the reader runs in strict mode
//! - **Parse failures**: a typed getter whose text is not a number or a date
//! - **Capacity**: a stream reader asked to look further ahead than its window
//! - **I/O**: failures of the underlying stream or sink
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{JsonTokenizer, ReaderOptions, StreamTokenizer};
//!
//! let options = ReaderOptions::new().with_throw_if_not_found(true);
//! let mut tok = JsonTokenizer::with_options(r#"{"a":1}"#, options);
//! let err = tok.find_item("b").unwrap_err();
//! assert!(err.is_not_found());
//! ```

use std::fmt;
use thiserror::Error;

/// Every error the crate reports.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while reading the source or writing the sink
    #[error("IO error: {0}")]
    Io(String),

    /// A strict-mode search ended without a match
    #[error("Not found: {}", names.join(", "))]
    NotFound { names: Vec<String> },

    /// Text handed to a numeric getter did not parse
    #[error("Invalid number {text:?}: {msg}")]
    InvalidNumber { text: String, msg: String },

    /// Text handed to the date getter did not parse
    #[error("Invalid date {text:?}")]
    InvalidDate { text: String },

    /// A lookahead request larger than the reader's window
    #[error("Lookahead of {needed} bytes exceeds the {capacity}-byte buffer window")]
    CapacityExceeded { needed: usize, capacity: usize },

    /// Writer operation that is not legal in the current scope
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a not-found error for one or more attempted names.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use streamtok::Error;
    ///
    /// let err = Error::not_found(["id", "key"]);
    /// assert_eq!(err.to_string(), "Not found: id, key");
    /// ```
    pub fn not_found<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::NotFound {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid_number<T: fmt::Display>(text: &str, msg: T) -> Self {
        Error::InvalidNumber {
            text: text.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn invalid_date(text: &str) -> Self {
        Error::InvalidDate {
            text: text.to_string(),
        }
    }

    pub fn capacity_exceeded(needed: usize, capacity: usize) -> Self {
        Error::CapacityExceeded { needed, capacity }
    }

    pub fn invalid_state(msg: &str) -> Self {
        Error::InvalidState(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use streamtok::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns true for a strict-mode search miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
