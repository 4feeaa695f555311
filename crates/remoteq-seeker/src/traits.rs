//! The [`Seekable`] trait: how a [`QuerySet`](crate::QuerySet) reads records.

use crate::lookup::SEP;
use crate::value::Value;

/// Trait for record types that can be queried.
///
/// Field paths arrive with the lookup already stripped, so an implementation
/// sees `title` or `author__name`, never `title__icontains`.
///
/// # Manual Implementation
///
/// ```
/// use remoteq_seeker::{Number, Seekable, Value};
///
/// struct Article {
///     title: String,
///     votes: u32,
///     author: String,
/// }
///
/// impl Seekable for Article {
///     fn seeker_field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "title" => Value::String(&self.title),
///             "votes" => Value::Number(Number::from(self.votes)),
///             "author__name" => Value::String(&self.author),
///             _ => Value::None,
///         }
///     }
///
///     fn seeker_fields() -> Option<&'static [&'static str]> {
///         Some(&["title", "votes", "author"])
///     }
/// }
/// ```
pub trait Seekable {
    /// Returns the value of a field path for comparison: [`Value::None`] when
    /// the field is absent or null, [`Value::Other`] when it is present but not
    /// comparable.
    fn seeker_field_value(&self, field: &str) -> Value<'_>;

    /// Top-level field names, when the type has a fixed schema.
    ///
    /// When this returns `Some`, conditions and orderings on any other field
    /// fail with [`SeekerError::UnknownField`](crate::SeekerError::UnknownField)
    /// instead of silently matching nothing.
    fn seeker_fields() -> Option<&'static [&'static str]>
    where
        Self: Sized,
    {
        None
    }
}

/// JSON records: `__` separated paths walk nested objects.
///
/// ```
/// use remoteq_seeker::{Seekable, Value};
/// use serde_json::json;
///
/// let row = json!({"title": "Nicola", "author": {"name": "Ada"}});
/// assert_eq!(row.seeker_field_value("author__name"), Value::String("Ada"));
/// assert_eq!(row.seeker_field_value("author__age"), Value::None);
/// ```
impl Seekable for serde_json::Value {
    fn seeker_field_value(&self, field: &str) -> Value<'_> {
        field
            .split(SEP)
            .try_fold(self, |node, key| node.get(key))
            .map_or(Value::None, Value::from_json)
    }
}
