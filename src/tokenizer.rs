//! The read contract shared by all four readers.
//!
//! [`StreamTokenizer`] covers what JSON and XML readers have in common: find a
//! named item ahead of the cursor and read its value. Format specific moves
//! live in [`JsonDeserializer`](crate::JsonDeserializer) and
//! [`XmlDeserializer`](crate::XmlDeserializer). Typed getters are provided
//! methods layered over [`value`](StreamTokenizer::value).
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::{JsonDeserializer, JsonTokenizer, StreamTokenizer, XmlTokenizer};
//!
//! fn read_id(reader: &mut dyn StreamTokenizer) -> Option<i64> {
//!     if reader.find_item("id").ok()? {
//!         reader.value_i64().ok()?
//!     } else {
//!         None
//!     }
//! }
//!
//! let mut json = JsonTokenizer::new(r#"{"id":7}"#);
//! json.enter_object().unwrap();
//! assert_eq!(read_id(&mut json), Some(7));
//! assert_eq!(read_id(&mut XmlTokenizer::new("<row><id>7</id></row>")), Some(7));
//! ```

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;

use crate::date::parse_iso_datetime;
use crate::error::{Error, Result};

/// Forward-only reading shared by the JSON and XML readers.
pub trait StreamTokenizer {
    /// Moves to the next named item at the current depth.
    fn find_item_next(&mut self) -> Result<bool>;

    /// Moves to the next item called `name` at the current depth.
    ///
    /// A miss returns `Ok(false)`, or [`Error::NotFound`] in strict mode.
    fn find_item(&mut self, name: &str) -> Result<bool>;

    /// Like [`find_item`](Self::find_item) for any of `names`, returning the
    /// index of the one that matched first.
    fn find_item_in(&mut self, names: &[&str]) -> Result<Option<usize>>;

    /// Name of the current item.
    fn name(&self) -> Option<&str>;

    /// Consumes and returns the current value as text.
    fn value(&mut self) -> Result<Option<String>>;

    /// Byte offset of the cursor, `None` once the input is consumed.
    fn index(&self) -> Option<usize>;

    fn is_throw_if_not_found(&self) -> bool;

    fn set_throw_if_not_found(&mut self, throw_if_not_found: bool);

    fn value_string(&mut self) -> Result<Option<String>> {
        self.value()
    }

    fn value_u8(&mut self) -> Result<Option<u8>> {
        parse_number(self.value()?)
    }

    fn value_i32(&mut self) -> Result<Option<i32>> {
        parse_number(self.value()?)
    }

    fn value_i64(&mut self) -> Result<Option<i64>> {
        parse_number(self.value()?)
    }

    fn value_f32(&mut self) -> Result<Option<f32>> {
        parse_number(self.value()?)
    }

    fn value_f64(&mut self) -> Result<Option<f64>> {
        parse_number(self.value()?)
    }

    /// Reads an arbitrary precision integer.
    fn value_big_int(&mut self) -> Result<Option<BigInt>> {
        parse_number(self.value()?)
    }

    /// Reads a timestamp in one of the shapes [`parse_iso_datetime`] accepts.
    fn value_date(&mut self) -> Result<Option<DateTime<FixedOffset>>> {
        match absent_or_text(self.value()?) {
            None => Ok(None),
            Some(text) => parse_iso_datetime(&text)
                .map(Some)
                .ok_or_else(|| Error::invalid_date(&text)),
        }
    }
}

/// `None` for a missing value or the `null` keyword, trimmed text otherwise.
fn absent_or_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| text != "null")
}

fn parse_number<T>(value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match absent_or_text(value) {
        None => Ok(None),
        Some(text) => text
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::invalid_number(&text, e)),
    }
}
