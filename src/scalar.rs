//! Scalar leaf values.
//!
//! [`Scalar`] is both the leaf case of [`RawShape`](crate::RawShape) and the
//! default leaf payload of trees built by [`to_tree`](crate::to_tree).
//!
//! ## String rendering
//!
//! | scalar | flat string |
//! |---|---|
//! | `Bool` | `true` / `false` |
//! | `Number::Integer` | decimal |
//! | `Number::Float` | shortest round-trip form, `NaN`, `Infinity`, `-Infinity` |
//! | `String` | unchanged |
//! | `Timestamp` | RFC 3339 in UTC with a `Z` suffix |
//! | `BigInt` | decimal |
//! | `Null` | no flat form, fails |
//!
//! ```rust
//! use serde_shape::{Leaf, Scalar};
//!
//! assert_eq!(Scalar::from(3.5).render_string().unwrap(), "3.5");
//! assert_eq!(Scalar::from(f64::NEG_INFINITY).render_string().unwrap(), "-Infinity");
//! assert!(Scalar::Null.render_string().is_err());
//! ```

use crate::{Error, Leaf, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single resolved value with no further structure.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(DateTime<Utc>),
    BigInt(BigInt),
}

/// A numeric scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as an `i64` for integers and whole floats in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_shape::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Float(9_223_372_036_854_775_808.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) if fl.is_nan() => write!(f, "NaN"),
            Number::Float(fl) if fl.is_infinite() => {
                write!(f, "{}", if *fl > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Scalar {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Scalar::BigInt(bi) => Some(bi),
            _ => None,
        }
    }
}

impl Leaf for Scalar {
    fn render_string(&self) -> Result<String> {
        match self {
            Scalar::Null => Err(Error::leaf_conversion("null has no flat string form")),
            Scalar::Bool(b) => Ok(b.to_string()),
            Scalar::Number(n) => Ok(n.to_string()),
            Scalar::String(s) => Ok(s.clone()),
            Scalar::Timestamp(dt) => Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Scalar::BigInt(bi) => Ok(bi.to_string()),
        }
    }

    fn render_scalar(&self) -> Result<Scalar> {
        Ok(self.clone())
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Scalar::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Timestamp(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Scalar::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

macro_rules! scalar_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::Number(Number::Integer(value as i64))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Scalar::Number(Number::Integer(i)),
            Err(_) => Scalar::BigInt(BigInt::from(value)),
        }
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(Number::Float(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Timestamp(value)
    }
}

impl From<BigInt> for Scalar {
    fn from(value: BigInt) -> Self {
        Scalar::BigInt(value)
    }
}
