//! Scalar values handed to the writers and returned by typed reads.
//!
//! [`Value`] is a scalar only: structure is expressed through the
//! open/close calls of the writers, never through nested values. Text
//! variants borrow where they can, so `writer.add_item("name", "Joe")` does
//! not allocate.
//!
//! ## Examples
//!
//! ```rust
//! use streamtok::Value;
//!
//! assert!(Value::from(()).is_null());
//! assert_eq!(Value::from(42).to_string(), "42");
//! assert_eq!(Value::from("hi").as_str(), Some("hi"));
//! assert!(Value::from(Option::<i32>::None).is_null());
//! ```

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};

/// A scalar written as a JSON value or XML text.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value<'a> {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    BigInt(BigInt),
    Date(DateTime<FixedOffset>),
    String(Cow<'a, str>),
    /// Pre-formatted literal, written without quoting or escaping.
    Raw(Cow<'a, str>),
}

impl<'a> Value<'a> {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numbers and booleans, the values a JSON writer leaves unquoted.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Integer(_)
                | Value::Unsigned(_)
                | Value::Float(_)
                | Value::BigInt(_)
        )
    }

    /// If the value is text (quoted or raw), returns it.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Raw(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Detaches the value from any borrowed text.
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Integer(i) => Value::Integer(i),
            Value::Unsigned(u) => Value::Unsigned(u),
            Value::Float(f) => Value::Float(f),
            Value::BigInt(b) => Value::BigInt(b),
            Value::Date(d) => Value::Date(d),
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Raw(s) => Value::Raw(Cow::Owned(s.into_owned())),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Unsigned(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::BigInt(b) => write!(f, "{}", b),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::String(s) | Value::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Unsigned(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::BigInt(b) => b.serialize(serializer),
            Value::Date(d) => d.serialize(serializer),
            Value::String(s) | Value::Raw(s) => serializer.serialize_str(s),
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Integer(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Unsigned(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<()> for Value<'_> {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value<'_> {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value<'_> {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value<'_> {
    fn from(c: char) -> Self {
        Value::String(Cow::Owned(c.to_string()))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::String(s)
    }
}

impl From<BigInt> for Value<'_> {
    fn from(b: BigInt) -> Self {
        Value::BigInt(b)
    }
}

impl From<DateTime<FixedOffset>> for Value<'_> {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d.into())
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
