//! Clause types for query predicates.
//!
//! A [`Clause`] is one compiled condition: a field path, a [`Lookup`], and an
//! owned comparison value. Conditions from a [`ConditionSpec`] are compiled
//! once per `filter`/`exclude` call and then evaluated against every row.

use regex::{Regex, RegexBuilder};
use remoteq::{ConditionSpec, Geometry, Operand};

use crate::error::{Result, SeekerError};
use crate::lookup::{split_lookup, Lookup, SEP};
use crate::ordering::compare_values;
use crate::traits::Seekable;
use crate::value::{Number, Value};

/// A single compiled predicate.
///
/// # Example
///
/// ```
/// use remoteq_seeker::{Clause, ClauseValue, Lookup};
/// use serde_json::json;
///
/// let clause = Clause::new("title", Lookup::IContains, ClauseValue::String("nicola".into()));
/// assert!(clause.matches(&json!({"title": "Nicola Tesla"})));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field path, lookup stripped.
    pub field: String,
    pub lookup: Lookup,
    pub value: ClauseValue,
}

/// Owned value for storage in a clause.
///
/// Case-insensitive lookups store their pattern lowercased.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    String(String),
    Number(Number),
    Bool(bool),
    /// JSON `null`: matches absent or null fields.
    Null,
    /// Candidates for `in`, or `[low, high]` for `range`.
    List(Vec<ClauseValue>),
    /// Compiled pattern for `regex`/`iregex`.
    Regex(Regex),
    Geometry(Geometry),
    /// Another field path of the same row.
    Field(String),
}

impl ClauseValue {
    /// Converts a scalar JSON value. Arrays and objects return `None`.
    pub fn from_scalar(json: &serde_json::Value) -> Option<ClauseValue> {
        match json {
            serde_json::Value::String(s) => Some(ClauseValue::String(s.clone())),
            serde_json::Value::Number(n) => Number::from_json(n).map(ClauseValue::Number),
            serde_json::Value::Bool(b) => Some(ClauseValue::Bool(*b)),
            serde_json::Value::Null => Some(ClauseValue::Null),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// The comparable form of a scalar clause value.
    fn as_value(&self) -> Option<Value<'_>> {
        match self {
            ClauseValue::String(s) => Some(Value::String(s)),
            ClauseValue::Number(n) => Some(Value::Number(*n)),
            ClauseValue::Bool(b) => Some(Value::Bool(*b)),
            _ => None,
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn unsupported(lookup: Lookup, operand: &'static str) -> SeekerError {
    SeekerError::UnsupportedOperand {
        lookup: lookup.as_str(),
        operand,
    }
}

impl Clause {
    pub fn new(field: impl Into<String>, lookup: Lookup, value: ClauseValue) -> Self {
        Clause {
            field: field.into(),
            lookup,
            value,
        }
    }

    /// Compiles every condition of a spec.
    pub fn compile_spec(spec: &ConditionSpec) -> Result<Vec<Clause>> {
        let mut clauses = Vec::with_capacity(spec.len());
        for condition in spec {
            clauses.extend(Clause::compile(&condition.path, &condition.operand)?);
        }
        Ok(clauses)
    }

    /// Compiles one `path = operand` condition.
    ///
    /// A group operand expands into one clause per inner condition, with the
    /// inner path scoped under the outer one: `author` + `{name__iexact: x}`
    /// becomes `author__name__iexact = x`.
    pub fn compile(path: &str, operand: &Operand) -> Result<Vec<Clause>> {
        if let Operand::Group(inner) = operand {
            let mut clauses = Vec::with_capacity(inner.len());
            for condition in inner {
                let scoped = format!("{path}{SEP}{}", condition.path);
                clauses.extend(Clause::compile(&scoped, &condition.operand)?);
            }
            return Ok(clauses);
        }

        let (field, lookup) = split_lookup(path);
        let value = match operand {
            Operand::Field(other) if lookup.accepts_field_ref() => {
                ClauseValue::Field(other.as_str().to_string())
            }
            Operand::Geometry(geometry) if lookup.is_geometry_lookup() || lookup == Lookup::Exact => {
                ClauseValue::Geometry(geometry.clone())
            }
            Operand::Literal(json) => literal_value(lookup, json)?,
            other => return Err(unsupported(lookup, other.kind())),
        };
        Ok(vec![Clause::new(field, lookup, value)])
    }

    /// Field paths this clause reads: its own and, for field comparisons,
    /// the referenced one.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        let other = match &self.value {
            ClauseValue::Field(other) => Some(other.as_str()),
            _ => None,
        };
        std::iter::once(self.field.as_str()).chain(other)
    }

    /// Evaluates this clause against a record.
    ///
    /// Absent and null fields only match `isnull=true` and `exact=null`.
    pub fn matches<T: Seekable>(&self, item: &T) -> bool {
        let field = item.seeker_field_value(&self.field);
        match (&self.value, self.lookup) {
            (ClauseValue::Bool(expected), Lookup::IsNull) => field.is_none() == *expected,
            (ClauseValue::Null, _) => field.is_none(),
            _ if field.is_none() => false,

            (ClauseValue::Field(other), lookup) => {
                let rhs = item.seeker_field_value(other);
                !rhs.is_none()
                    && compare_values(&field, &rhs).is_some_and(|o| lookup.eval_ordering(o))
            }
            (ClauseValue::Regex(regex), _) => field.as_str().is_some_and(|s| regex.is_match(s)),
            (ClauseValue::String(pattern), lookup) if lookup.is_string_lookup() => field
                .as_str()
                .is_some_and(|s| match_string(lookup, s, pattern)),
            (ClauseValue::List(candidates), Lookup::In) => candidates
                .iter()
                .any(|candidate| compare(&field, candidate, Lookup::Exact)),
            (ClauseValue::List(bounds), Lookup::Range) => match bounds.as_slice() {
                [low, high] => {
                    compare(&field, low, Lookup::Gte) && compare(&field, high, Lookup::Lte)
                }
                _ => false,
            },
            (ClauseValue::Geometry(geometry), lookup) => match_geometry(lookup, &field, geometry),
            (value, lookup) => compare(&field, value, lookup),
        }
    }
}

fn literal_value(lookup: Lookup, json: &serde_json::Value) -> Result<ClauseValue> {
    let scalar = |json: &serde_json::Value| {
        ClauseValue::from_scalar(json).ok_or_else(|| unsupported(lookup, json_kind(json)))
    };

    match lookup {
        Lookup::Regex | Lookup::IRegex => {
            let pattern = json
                .as_str()
                .ok_or_else(|| unsupported(lookup, json_kind(json)))?;
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(lookup == Lookup::IRegex)
                .build()?;
            Ok(ClauseValue::Regex(regex))
        }
        Lookup::In => json
            .as_array()
            .ok_or_else(|| unsupported(lookup, json_kind(json)))?
            .iter()
            .map(scalar)
            .collect::<Result<Vec<_>>>()
            .map(ClauseValue::List),
        Lookup::Range => match json.as_array().map(Vec::as_slice) {
            Some([low, high]) if !low.is_null() && !high.is_null() => {
                Ok(ClauseValue::List(vec![scalar(low)?, scalar(high)?]))
            }
            _ => Err(SeekerError::InvalidRange(json.to_string())),
        },
        Lookup::IsNull => json
            .as_bool()
            .map(ClauseValue::Bool)
            .ok_or_else(|| unsupported(lookup, json_kind(json))),
        Lookup::BbContains | Lookup::BbOverlaps | Lookup::Contained => Geometry::parse(json)
            .map(ClauseValue::Geometry)
            .map_err(|_| unsupported(lookup, json_kind(json))),
        _ if lookup.is_string_lookup() => {
            let pattern = json
                .as_str()
                .ok_or_else(|| unsupported(lookup, json_kind(json)))?;
            Ok(ClauseValue::String(if lookup.is_case_insensitive() {
                pattern.to_lowercase()
            } else {
                pattern.to_string()
            }))
        }
        Lookup::Exact if json.is_object() => Geometry::parse(json)
            .map(ClauseValue::Geometry)
            .map_err(|_| unsupported(lookup, json_kind(json))),
        Lookup::Exact => scalar(json),
        _ => match scalar(json)? {
            ClauseValue::Null => Err(unsupported(lookup, "null")),
            value => Ok(value),
        },
    }
}

fn compare(field: &Value<'_>, value: &ClauseValue, lookup: Lookup) -> bool {
    value
        .as_value()
        .and_then(|rhs| compare_values(field, &rhs))
        .is_some_and(|ordering| lookup.eval_ordering(ordering))
}

fn match_string(lookup: Lookup, field: &str, pattern: &str) -> bool {
    let folded;
    let field = if lookup.is_case_insensitive() {
        folded = field.to_lowercase();
        folded.as_str()
    } else {
        field
    };
    match lookup {
        Lookup::IExact => field == pattern,
        Lookup::Contains | Lookup::IContains => field.contains(pattern),
        Lookup::StartsWith | Lookup::IStartsWith => field.starts_with(pattern),
        Lookup::EndsWith | Lookup::IEndsWith => field.ends_with(pattern),
        _ => false,
    }
}

fn match_geometry(lookup: Lookup, field: &Value<'_>, operand: &Geometry) -> bool {
    let Some(geometry) = field.as_geometry() else {
        return false;
    };
    if lookup == Lookup::Exact {
        return geometry == operand;
    }
    let (Some(field_box), Some(operand_box)) = (geometry.bbox(), operand.bbox()) else {
        return false;
    };
    match lookup {
        Lookup::BbContains => field_box.contains(&operand_box),
        Lookup::BbOverlaps => field_box.intersects(&operand_box),
        Lookup::Contained => operand_box.contains(&field_box),
        _ => false,
    }
}
