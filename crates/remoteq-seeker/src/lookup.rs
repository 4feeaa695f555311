//! Field lookups.
//!
//! A condition path is a field path optionally followed by a lookup, joined
//! with `__`: `title__icontains`, `author__name`, `votes__gte`. The last
//! segment is treated as a lookup only when it names one; otherwise the whole
//! path is the field and the lookup is [`Lookup::Exact`].

use std::cmp::Ordering;

/// Path segment separator.
pub const SEP: &str = "__";

/// Comparison performed by a clause.
///
/// Lookups are grouped by the values they apply to:
/// - **Universal**: `Exact`, `In`, `IsNull`
/// - **String**: `IExact`, `Contains`, `IContains`, `StartsWith`,
///   `IStartsWith`, `EndsWith`, `IEndsWith`, `Regex`, `IRegex`
/// - **Ordered** (numbers, strings, booleans): `Gt`, `Gte`, `Lt`, `Lte`, `Range`
/// - **Geometry** (by bounding box): `BbContains`, `BbOverlaps`, `Contained`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Regex,
    IRegex,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Range,
    IsNull,
    BbContains,
    BbOverlaps,
    Contained,
}

const ALL: &[Lookup] = &[
    Lookup::Exact,
    Lookup::IExact,
    Lookup::Contains,
    Lookup::IContains,
    Lookup::StartsWith,
    Lookup::IStartsWith,
    Lookup::EndsWith,
    Lookup::IEndsWith,
    Lookup::Regex,
    Lookup::IRegex,
    Lookup::Gt,
    Lookup::Gte,
    Lookup::Lt,
    Lookup::Lte,
    Lookup::In,
    Lookup::Range,
    Lookup::IsNull,
    Lookup::BbContains,
    Lookup::BbOverlaps,
    Lookup::Contained,
];

impl Lookup {
    /// Parses a lookup name.
    pub fn from_name(name: &str) -> Option<Lookup> {
        ALL.iter().copied().find(|lookup| lookup.as_str() == name)
    }

    /// Returns `true` for the case-insensitive string lookups.
    pub fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Lookup::IExact
                | Lookup::IContains
                | Lookup::IStartsWith
                | Lookup::IEndsWith
                | Lookup::IRegex
        )
    }

    /// Returns `true` if this lookup only applies to strings.
    pub fn is_string_lookup(self) -> bool {
        matches!(
            self,
            Lookup::IExact
                | Lookup::Contains
                | Lookup::IContains
                | Lookup::StartsWith
                | Lookup::IStartsWith
                | Lookup::EndsWith
                | Lookup::IEndsWith
                | Lookup::Regex
                | Lookup::IRegex
        )
    }

    /// Returns `true` if this lookup compares bounding boxes.
    pub fn is_geometry_lookup(self) -> bool {
        matches!(
            self,
            Lookup::BbContains | Lookup::BbOverlaps | Lookup::Contained
        )
    }

    /// Returns `true` if this lookup can compare against another field.
    pub fn accepts_field_ref(self) -> bool {
        matches!(
            self,
            Lookup::Exact | Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte
        )
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Lookup::Exact => ordering == Ordering::Equal,
            Lookup::Gt => ordering == Ordering::Greater,
            Lookup::Gte => ordering != Ordering::Less,
            Lookup::Lt => ordering == Ordering::Less,
            Lookup::Lte => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based lookup
        }
    }

    /// Returns the name used in condition paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::IExact => "iexact",
            Lookup::Contains => "contains",
            Lookup::IContains => "icontains",
            Lookup::StartsWith => "startswith",
            Lookup::IStartsWith => "istartswith",
            Lookup::EndsWith => "endswith",
            Lookup::IEndsWith => "iendswith",
            Lookup::Regex => "regex",
            Lookup::IRegex => "iregex",
            Lookup::Gt => "gt",
            Lookup::Gte => "gte",
            Lookup::Lt => "lt",
            Lookup::Lte => "lte",
            Lookup::In => "in",
            Lookup::Range => "range",
            Lookup::IsNull => "isnull",
            Lookup::BbContains => "bbcontains",
            Lookup::BbOverlaps => "bboverlaps",
            Lookup::Contained => "contained",
        }
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Splits a condition path into its field path and lookup.
///
/// ```
/// use remoteq_seeker::{split_lookup, Lookup};
///
/// assert_eq!(split_lookup("title__icontains"), ("title", Lookup::IContains));
/// assert_eq!(split_lookup("author__name"), ("author__name", Lookup::Exact));
/// assert_eq!(split_lookup("votes"), ("votes", Lookup::Exact));
/// ```
pub fn split_lookup(path: &str) -> (&str, Lookup) {
    match path.rsplit_once(SEP) {
        Some((field, last)) if !field.is_empty() => match Lookup::from_name(last) {
            Some(lookup) => (field, lookup),
            None => (path, Lookup::Exact),
        },
        _ => (path, Lookup::Exact),
    }
}
