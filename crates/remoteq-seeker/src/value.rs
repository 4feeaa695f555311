//! Field values as the query engine sees them.
//!
//! A [`Value`] borrows from the record it was read from. JSON objects that
//! parse as GeoJSON are the one case that has to own its data.

use std::borrow::Cow;
use std::cmp::Ordering;

use remoteq::Geometry;

/// One field of one record.
///
/// # Example
///
/// ```
/// use remoteq_seeker::{Number, Value};
///
/// struct Article {
///     title: String,
///     votes: u32,
/// }
///
/// fn field<'a>(article: &'a Article, name: &str) -> Value<'a> {
///     match name {
///         "title" => Value::String(&article.title),
///         "votes" => Value::Number(Number::from(article.votes)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    Bool(bool),
    Geometry(Cow<'a, Geometry>),
    /// Present, but not something lookups can compare: a plain object, an
    /// array, or a number outside every representation.
    Other,
    /// Absent or `null`.
    None,
}

impl<'a> Value<'a> {
    /// Reads a JSON value. Objects become geometries when they parse as one;
    /// other objects and arrays read as [`Value::Other`].
    pub fn from_json(json: &'a serde_json::Value) -> Value<'a> {
        use serde_json::Value as Json;

        match json {
            Json::String(s) => Value::String(s),
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Number::from_json(n).map_or(Value::Other, Value::Number),
            Json::Object(_) => match Geometry::parse(json) {
                Ok(geometry) => Value::Geometry(Cow::Owned(geometry)),
                Err(_) => Value::Other,
            },
            Json::Array(_) => Value::Other,
            Json::Null => Value::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        if let Value::Geometry(g) = self {
            Some(g)
        } else {
            None
        }
    }
}

/// A JSON number, kept in the representation `serde_json` read it in.
///
/// Integers compare exactly across signedness. Anything involving a float
/// compares as `f64`, so `NaN` compares as nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn from_json(n: &serde_json::Number) -> Option<Number> {
        n.as_i64()
            .map(Number::I64)
            .or_else(|| n.as_u64().map(Number::U64))
            .or_else(|| n.as_f64().map(Number::F64))
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    fn as_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F64(_) => None,
        }
    }

    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n.into())
                }
            }
        )*
    };
}

number_from! {
    i32 => I64,
    i64 => I64,
    u32 => U64,
    u64 => U64,
    f32 => F64,
    f64 => F64,
}
