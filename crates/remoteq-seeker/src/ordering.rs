//! `order_by` entries and the comparisons behind them.

use std::cmp::Ordering;
use std::fmt;

use crate::traits::Seekable;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self == Dir::Desc {
            ordering.reverse()
        } else {
            ordering
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sort key: a field path and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Parses an `order_by` entry: `field`, `-field` (descending) or `+field`.
    ///
    /// Returns `None` for the random ordering marker `?` and for empty
    /// entries; an in-memory set has no random ordering to offer.
    pub fn parse(entry: &str) -> Option<OrderBy> {
        let (dir, field) = match entry.as_bytes().first() {
            Some(b'-') => (Dir::Desc, &entry[1..]),
            Some(b'+') => (Dir::Asc, &entry[1..]),
            _ => (Dir::Asc, entry),
        };
        match field {
            "" | "?" => None,
            _ => Some(OrderBy {
                field: field.to_string(),
                dir,
            }),
        }
    }

    /// Directed comparison of two field values; `None` when they are not
    /// comparable.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        compare_values(a, b).map(|ordering| self.dir.apply(ordering))
    }

    fn compare_records<T: Seekable>(&self, a: &T, b: &T) -> Ordering {
        let (left, right) = (
            a.seeker_field_value(&self.field),
            b.seeker_field_value(&self.field),
        );
        self.dir.apply(sort_values(&left, &right))
    }
}

/// Rank of a value's kind when sorting a column that mixes kinds.
fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Geometry(_) => 3,
        Value::Other => 4,
        Value::None => 5,
    }
}

/// Total order used by `order_by`.
///
/// Values of one kind use their natural order; kinds are ranked bool, number,
/// string, geometry, other, missing. `NaN` sorts by `f64::total_cmp`, and
/// geometries or other values tie among themselves.
pub fn sort_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    if let (Value::Number(x), Value::Number(y)) = (a, b) {
        return x
            .compare(*y)
            .unwrap_or_else(|| x.to_f64().total_cmp(&y.to_f64()));
    }
    compare_values(a, b).unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b)))
}

/// Natural order of two values of the same kind.
///
/// Missing values sort after everything else in ascending order. Mixed kinds
/// and geometries have no order.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Lexicographic comparison over `orderings`, using [`sort_values`] per key.
pub fn compare_by_orderings<T: Seekable>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering {
    orderings
        .iter()
        .map(|order| order.compare_records(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
