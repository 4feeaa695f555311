//! Condition and ordering arguments handed to a [`QueryBuilder`](crate::QueryBuilder).
//!
//! A [`ConditionSpec`] is an ordered list of `(field path, operand)` pairs.
//! Field paths are passed through verbatim; their syntax (lookups, relation
//! traversal) belongs to the builder.

use serde::Serialize;
use serde_json::Value;

use crate::geometry::Geometry;

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    /// A raw JSON value that did not coerce to anything richer.
    Literal(Value),
    /// A GeoJSON geometry literal.
    Geometry(Geometry),
    /// Another field of the same row.
    Field(FieldRef),
    /// A nested group of conditions scoped under the outer field path.
    Group(ConditionSpec),
}

impl Operand {
    /// Short name of the operand kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Literal(_) => "literal",
            Operand::Geometry(_) => "geometry",
            Operand::Field(_) => "field reference",
            Operand::Group(_) => "condition group",
        }
    }

    /// Returns the literal value, if this is one.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Operand::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the geometry, if this is one.
    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Operand::Geometry(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Literal(value)
    }
}

impl From<Geometry> for Operand {
    fn from(geometry: Geometry) -> Self {
        Operand::Geometry(geometry)
    }
}

impl From<FieldRef> for Operand {
    fn from(field: FieldRef) -> Self {
        Operand::Field(field)
    }
}

impl From<ConditionSpec> for Operand {
    fn from(spec: ConditionSpec) -> Self {
        Operand::Group(spec)
    }
}

/// Marker for "compare against this other field of the same row".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldRef(String);

impl FieldRef {
    pub fn new(path: impl Into<String>) -> Self {
        FieldRef(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single `path = operand` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub path: String,
    pub operand: Operand,
}

impl Condition {
    pub fn new(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Condition {
            path: path.into(),
            operand: operand.into(),
        }
    }
}

/// Ordered conjunction of conditions.
///
/// Builders receive the whole spec in one call, matching a relational
/// `filter(a=1, b=2)` where every pair must hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ConditionSpec {
    conditions: Vec<Condition>,
}

impl ConditionSpec {
    pub fn new() -> Self {
        ConditionSpec::default()
    }

    /// Creates a spec holding one condition.
    pub fn single(path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        ConditionSpec::new().with(path, operand)
    }

    /// Appends a condition.
    pub fn with(mut self, path: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.conditions.push(Condition::new(path, operand));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl FromIterator<Condition> for ConditionSpec {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        ConditionSpec {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConditionSpec {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}

/// Ordered list of field paths to sort by.
///
/// Entries are kept verbatim. A leading `-` conventionally means descending,
/// but interpreting it is up to the builder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OrderSpec(Vec<String>);

impl OrderSpec {
    pub fn new(fields: Vec<String>) -> Self {
        OrderSpec(fields)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        OrderSpec(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_preserves_insertion_order() {
        let spec = ConditionSpec::single("b", json!(1)).with("a", json!(2));
        let paths: Vec<&str> = spec.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, ["b", "a"]);
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn operand_conversions() {
        assert_eq!(Operand::from(json!("x")).kind(), "literal");
        assert_eq!(Operand::from(FieldRef::new("other")).kind(), "field reference");
        assert_eq!(Operand::from(ConditionSpec::new()).kind(), "condition group");
        assert_eq!(Operand::from(json!(5)).as_literal(), Some(&json!(5)));
        assert!(Operand::from(json!(5)).as_geometry().is_none());
    }

    #[test]
    fn operand_serializes_with_kind() {
        let operand = Operand::Field(FieldRef::new("created"));
        assert_eq!(
            serde_json::to_value(&operand).unwrap(),
            json!({"kind": "field", "value": "created"})
        );
    }

    #[test]
    fn order_spec_from_strs() {
        let order: OrderSpec = ["-priority", "name"].into_iter().collect();
        assert_eq!(order.fields(), ["-priority", "name"]);
        assert_eq!(order.iter().collect::<Vec<_>>(), ["-priority", "name"]);
    }
}
