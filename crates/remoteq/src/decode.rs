//! Decoding query documents into [`QueryNode`] trees.
//!
//! Decoding is fail-soft: [`Decoder::decode`] never surfaces an error, it
//! returns `None` for a document it cannot build, and composite nodes silently
//! drop children that fail to decode. The reasons are still observable:
//! [`Decoder::try_decode`] returns the root [`DecodeError`],
//! [`Decoder::decode_with_diagnostics`] collects one [`Diagnostic`] per dropped
//! child, and every failure is logged through `tracing`.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "_query_class": "compositeand",
//!   "_sub_queries": [
//!     {"_query_class": "filter", "_condition": "title__icontains", "_value": "nicola"},
//!     {"_query_class": "orderby", "_order_by": ["-id"]}
//!   ]
//! }
//! ```

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::builder::QueryBuilder;
use crate::coerce::coerce_with;
use crate::condition::{Condition, ConditionSpec, FieldRef, Operand, OrderSpec};
use crate::error::DecodeError;
use crate::node::QueryNode;
use crate::registry::QueryClass;

/// Key carrying the class tag.
pub const QUERY_CLASS: &str = "_query_class";
/// Key carrying composite children.
pub const SUB_QUERIES: &str = "_sub_queries";
/// Key carrying the condition path(s).
pub const CONDITION: &str = "_condition";
/// Key carrying the condition value(s).
pub const VALUE: &str = "_value";
/// Key carrying the ordering field paths.
pub const ORDER_BY: &str = "_order_by";
/// Key carrying the right-hand field of a self-field comparison.
pub const FIELD_TO_COMPARE: &str = "_field_to_compare";
/// Key carrying the inner path of a nested group.
pub const INNER_CONDITION: &str = "_inner_condition";

/// What to do when `_condition` and `_value` arrays differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapePolicy {
    /// Treat the node as malformed.
    #[default]
    Reject,
    /// Zip up to the shorter length.
    Truncate,
}

/// Decoder settings.
///
/// ```
/// use remoteq::{DecoderConfig, ShapePolicy};
///
/// let config = DecoderConfig::new()
///     .shape_policy(ShapePolicy::Truncate)
///     .nested_groups(false);
///
/// assert_eq!(config.get_shape_policy(), ShapePolicy::Truncate);
/// assert!(!config.get_nested_groups());
/// assert!(config.get_coerce_geometry());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    shape_policy: ShapePolicy,
    nested_groups: bool,
    coerce_geometry: bool,
}

impl DecoderConfig {
    /// Default settings: reject length mismatches, nested groups on,
    /// geometry coercion on.
    pub const fn new() -> Self {
        DecoderConfig {
            shape_policy: ShapePolicy::Reject,
            nested_groups: true,
            coerce_geometry: true,
        }
    }

    pub const fn shape_policy(mut self, policy: ShapePolicy) -> Self {
        self.shape_policy = policy;
        self
    }

    /// Enables or disables the `nestedfilter`/`nestedexclude` classes.
    pub const fn nested_groups(mut self, enabled: bool) -> Self {
        self.nested_groups = enabled;
        self
    }

    /// Enables or disables geometry coercion of `_value` operands.
    pub const fn coerce_geometry(mut self, enabled: bool) -> Self {
        self.coerce_geometry = enabled;
        self
    }

    pub fn get_shape_policy(&self) -> ShapePolicy {
        self.shape_policy
    }

    pub fn get_nested_groups(&self) -> bool {
        self.nested_groups
    }

    pub fn get_coerce_geometry(&self) -> bool {
        self.coerce_geometry
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig::new()
    }
}

/// A composite child that was dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index path from the root: `[2, 0]` is the first sub-query of the
    /// root's third sub-query. Empty for the root itself.
    pub path: Vec<usize>,
    pub error: DecodeError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "root: {}", self.error);
        }
        f.write_str("root")?;
        for index in &self.path {
            write!(f, ".{SUB_QUERIES}[{index}]")?;
        }
        write!(f, ": {}", self.error)
    }
}

/// Result of [`Decoder::decode_with_diagnostics`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub node: Option<QueryNode>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds [`QueryNode`] trees from JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

static DEFAULT_DECODER: Decoder = Decoder::new();

/// Decodes with the default configuration. See [`Decoder::decode`].
pub fn decode(json: Option<&Value>) -> Option<QueryNode> {
    DEFAULT_DECODER.decode(json)
}

/// Decodes with the default configuration and applies the result, passing
/// `builder` through unchanged when the document does not decode.
pub fn apply_document<B: QueryBuilder>(json: Option<&Value>, builder: B) -> Result<B, B::Error> {
    DEFAULT_DECODER.apply(json, builder)
}

impl Decoder {
    pub const fn new() -> Self {
        Decoder {
            config: DecoderConfig::new(),
        }
    }

    pub const fn with_config(config: DecoderConfig) -> Self {
        Decoder { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a document, resolving every failure to `None`.
    ///
    /// Absent input, `null`, a missing or unregistered `_query_class`, and any
    /// construction failure all yield `None`.
    pub fn decode(&self, json: Option<&Value>) -> Option<QueryNode> {
        let json = json?;
        match self.try_decode(json) {
            Ok(node) => Some(node),
            Err(error) => {
                debug!(%error, "query document did not decode");
                None
            }
        }
    }

    /// Decodes a document, returning why the root could not be built.
    ///
    /// Composite children that fail are still dropped silently.
    pub fn try_decode(&self, json: &Value) -> Result<QueryNode, DecodeError> {
        self.decode_node(json, &mut Vec::new(), &mut Vec::new())
    }

    /// Decodes a document and reports every failure, root included.
    pub fn decode_with_diagnostics(&self, json: &Value) -> Decoded {
        let mut diagnostics = Vec::new();
        let node = match self.decode_node(json, &mut Vec::new(), &mut diagnostics) {
            Ok(node) => Some(node),
            Err(error) => {
                diagnostics.push(Diagnostic {
                    path: Vec::new(),
                    error,
                });
                None
            }
        };
        Decoded { node, diagnostics }
    }

    /// Decodes `json` and applies it to `builder`.
    ///
    /// A document that does not decode leaves `builder` unchanged. Builder
    /// errors propagate.
    pub fn apply<B: QueryBuilder>(&self, json: Option<&Value>, builder: B) -> Result<B, B::Error> {
        match self.decode(json) {
            Some(node) => node.apply(builder),
            None => Ok(builder),
        }
    }

    fn decode_node(
        &self,
        json: &Value,
        path: &mut Vec<usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<QueryNode, DecodeError> {
        let object = match json {
            Value::Null => return Err(DecodeError::Null),
            Value::Object(object) => object,
            _ => return Err(DecodeError::NotAnObject),
        };
        let tag = object.get(QUERY_CLASS).ok_or(DecodeError::MissingTag)?;
        let tag = tag.as_str().ok_or(DecodeError::TagNotString)?;
        let class =
            QueryClass::from_tag(tag).ok_or_else(|| DecodeError::UnknownTag(tag.to_string()))?;
        if class.is_nested() && !self.config.nested_groups {
            return Err(DecodeError::Disabled(class.tag()));
        }

        let fields = Fields { class, object };
        let node = match class {
            QueryClass::Identity => QueryNode::Identity,
            QueryClass::All => QueryNode::All,
            QueryClass::Distinct => QueryNode::Distinct,
            QueryClass::Filter => QueryNode::Filter {
                spec: self.condition_spec(&fields)?,
            },
            QueryClass::Exclude => QueryNode::Exclude {
                spec: self.condition_spec(&fields)?,
            },
            QueryClass::OrderBy => QueryNode::OrderBy {
                order: fields.order_spec()?,
            },
            QueryClass::SelfFieldFilter => QueryNode::SelfFieldFilter {
                spec: fields.self_field_spec()?,
            },
            QueryClass::SelfFieldExclude => QueryNode::SelfFieldExclude {
                spec: fields.self_field_spec()?,
            },
            QueryClass::NestedFilter => QueryNode::NestedFilter {
                spec: self.nested_spec(&fields)?,
            },
            QueryClass::NestedExclude => QueryNode::NestedExclude {
                spec: self.nested_spec(&fields)?,
            },
            QueryClass::CompositeAnd => QueryNode::CompositeAnd {
                children: self.sub_queries(&fields, path, diagnostics)?,
            },
            QueryClass::CompositeOr => QueryNode::CompositeOr {
                children: self.sub_queries(&fields, path, diagnostics)?,
            },
        };
        Ok(node)
    }

    fn coerce(&self, raw: &Value) -> Operand {
        coerce_with(raw, self.config.coerce_geometry)
    }

    /// `_condition` + `_value` → spec.
    ///
    /// A single path takes the whole value, so an array value stays an array
    /// (for `__in` and `__range` lookups). A path array is zipped with a value
    /// array position by position.
    fn condition_spec(&self, fields: &Fields<'_>) -> Result<ConditionSpec, DecodeError> {
        const CONDITION_SHAPE: &str = "a string or an array of strings";

        let condition = fields.require(CONDITION)?;
        let value = fields.require(VALUE)?;

        let paths = match condition {
            Value::String(path) => return Ok(ConditionSpec::single(path.as_str(), self.coerce(value))),
            Value::Array(paths) => paths
                .iter()
                .map(|p| p.as_str().ok_or(fields.wrong_shape(CONDITION, CONDITION_SHAPE)))
                .collect::<Result<Vec<&str>, _>>()?,
            _ => return Err(fields.wrong_shape(CONDITION, CONDITION_SHAPE)),
        };
        if paths.is_empty() {
            return Err(DecodeError::EmptyCondition {
                class: fields.class.tag(),
            });
        }

        let values = value
            .as_array()
            .ok_or(fields.wrong_shape(VALUE, "an array when `_condition` is an array"))?;
        if paths.len() != values.len() {
            match self.config.shape_policy {
                ShapePolicy::Reject => {
                    return Err(DecodeError::LengthMismatch {
                        conditions: paths.len(),
                        values: values.len(),
                    })
                }
                ShapePolicy::Truncate => {
                    warn!(
                        class = %fields.class,
                        conditions = paths.len(),
                        values = values.len(),
                        "condition and value lengths differ, truncating"
                    );
                }
            }
        }

        let spec: ConditionSpec = paths
            .into_iter()
            .zip(values)
            .map(|(path, value)| Condition::new(path, self.coerce(value)))
            .collect();
        if spec.is_empty() {
            return Err(DecodeError::EmptyCondition {
                class: fields.class.tag(),
            });
        }
        Ok(spec)
    }

    /// `_condition` + `_inner_condition` + `_value` → `{condition: Group({inner: value})}`.
    ///
    /// The inner value is passed through as a raw literal, never coerced.
    fn nested_spec(&self, fields: &Fields<'_>) -> Result<ConditionSpec, DecodeError> {
        let condition = fields.string(CONDITION)?;
        let inner = fields.string(INNER_CONDITION)?;
        let value = fields.require(VALUE)?;
        Ok(ConditionSpec::single(
            condition,
            ConditionSpec::single(inner, Operand::Literal(value.clone())),
        ))
    }

    fn sub_queries(
        &self,
        fields: &Fields<'_>,
        path: &mut Vec<usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<QueryNode>, DecodeError> {
        let entries = fields
            .require(SUB_QUERIES)?
            .as_array()
            .ok_or(fields.wrong_shape(SUB_QUERIES, "an array of query documents"))?;

        let mut children = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            path.push(index);
            match self.decode_node(entry, path, diagnostics) {
                Ok(child) => children.push(child),
                Err(error) => {
                    warn!(
                        parent = %fields.class,
                        index,
                        %error,
                        "dropping sub-query that did not decode"
                    );
                    diagnostics.push(Diagnostic {
                        path: path.clone(),
                        error,
                    });
                }
            }
            path.pop();
        }
        Ok(children)
    }
}

/// Field access for one document, with errors that name the class.
struct Fields<'a> {
    class: QueryClass,
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn require(&self, field: &'static str) -> Result<&'a Value, DecodeError> {
        self.object.get(field).ok_or(DecodeError::MissingField {
            class: self.class.tag(),
            field,
        })
    }

    fn string(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        self.require(field)?
            .as_str()
            .ok_or(self.wrong_shape(field, "a string"))
    }

    fn wrong_shape(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::WrongShape {
            class: self.class.tag(),
            field,
            expected,
        }
    }

    fn order_spec(&self) -> Result<OrderSpec, DecodeError> {
        const ORDER_SHAPE: &str = "an array of strings";

        self.require(ORDER_BY)?
            .as_array()
            .ok_or(self.wrong_shape(ORDER_BY, ORDER_SHAPE))?
            .iter()
            .map(|field| {
                field
                    .as_str()
                    .map(str::to_string)
                    .ok_or(self.wrong_shape(ORDER_BY, ORDER_SHAPE))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(OrderSpec::new)
    }

    fn self_field_spec(&self) -> Result<ConditionSpec, DecodeError> {
        let condition = self.string(CONDITION)?;
        let other = self.string(FIELD_TO_COMPARE)?;
        Ok(ConditionSpec::single(condition, FieldRef::new(other)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn try_decode(json: Value) -> Result<QueryNode, DecodeError> {
        Decoder::new().try_decode(&json)
    }

    #[test]
    fn filter_with_single_condition() {
        let node = try_decode(json!({
            "_query_class": "filter",
            "_condition": "name__icontains",
            "_value": "nicola"
        }))
        .unwrap();

        assert_eq!(
            node,
            QueryNode::Filter {
                spec: ConditionSpec::single("name__icontains", json!("nicola"))
            }
        );
    }

    #[test]
    fn single_condition_keeps_array_value_whole() {
        let node = try_decode(json!({
            "_query_class": "filter",
            "_condition": "id__in",
            "_value": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(
            node.spec().unwrap(),
            &ConditionSpec::single("id__in", json!([1, 2, 3]))
        );
    }

    #[test]
    fn condition_arrays_zip_positionally() {
        let node = try_decode(json!({
            "_query_class": "exclude",
            "_condition": ["title__startswith", "votes__gte"],
            "_value": ["N", 10]
        }))
        .unwrap();

        assert_eq!(
            node,
            QueryNode::Exclude {
                spec: ConditionSpec::single("title__startswith", json!("N"))
                    .with("votes__gte", json!(10))
            }
        );
    }

    #[test]
    fn length_mismatch_is_rejected_by_default() {
        let result = try_decode(json!({
            "_query_class": "filter",
            "_condition": ["a", "b"],
            "_value": [1]
        }));
        assert_eq!(
            result,
            Err(DecodeError::LengthMismatch {
                conditions: 2,
                values: 1
            })
        );
    }

    #[test]
    fn length_mismatch_truncates_when_configured() {
        let decoder =
            Decoder::with_config(DecoderConfig::new().shape_policy(ShapePolicy::Truncate));
        let node = decoder
            .try_decode(&json!({
                "_query_class": "filter",
                "_condition": ["a", "b"],
                "_value": [1, 2, 3]
            }))
            .unwrap();
        assert_eq!(
            node.spec().unwrap(),
            &ConditionSpec::single("a", json!(1)).with("b", json!(2))
        );

        let empty = decoder.try_decode(&json!({
            "_query_class": "filter",
            "_condition": ["a"],
            "_value": []
        }));
        assert_eq!(empty, Err(DecodeError::EmptyCondition { class: "filter" }));
    }

    #[test]
    fn condition_array_requires_value_array() {
        let result = try_decode(json!({
            "_query_class": "filter",
            "_condition": ["a"],
            "_value": 1
        }));
        assert!(matches!(
            result,
            Err(DecodeError::WrongShape { field: "_value", .. })
        ));
    }

    #[test]
    fn empty_condition_array_is_rejected() {
        let result = try_decode(json!({
            "_query_class": "filter",
            "_condition": [],
            "_value": []
        }));
        assert_eq!(result, Err(DecodeError::EmptyCondition { class: "filter" }));
    }

    #[test]
    fn missing_and_misshaped_fields() {
        assert_eq!(
            try_decode(json!({"_query_class": "filter", "_condition": "a"})),
            Err(DecodeError::MissingField {
                class: "filter",
                field: "_value"
            })
        );
        assert!(matches!(
            try_decode(json!({"_query_class": "filter", "_condition": 5, "_value": 1})),
            Err(DecodeError::WrongShape { field: "_condition", .. })
        ));
        assert!(matches!(
            try_decode(json!({"_query_class": "filter", "_condition": ["a", 1], "_value": [1, 2]})),
            Err(DecodeError::WrongShape { field: "_condition", .. })
        ));
    }

    #[test]
    fn null_value_is_a_literal() {
        let node = try_decode(json!({
            "_query_class": "filter",
            "_condition": "closed_at",
            "_value": null
        }))
        .unwrap();
        assert_eq!(
            node.spec().unwrap(),
            &ConditionSpec::single("closed_at", Value::Null)
        );
    }

    #[test]
    fn geometry_values_are_coerced() {
        let node = try_decode(json!({
            "_query_class": "filter",
            "_condition": "location__bboverlaps",
            "_value": {"type": "Point", "coordinates": [9.19, 45.46]}
        }))
        .unwrap();
        let operand = &node.spec().unwrap().conditions()[0].operand;
        assert_eq!(operand.as_geometry().unwrap().geometry_type(), "Point");

        let plain = Decoder::with_config(DecoderConfig::new().coerce_geometry(false))
            .try_decode(&json!({
                "_query_class": "filter",
                "_condition": "location",
                "_value": {"type": "Point", "coordinates": [9.19, 45.46]}
            }))
            .unwrap();
        assert!(plain.spec().unwrap().conditions()[0].operand.as_literal().is_some());
    }

    #[test]
    fn order_by() {
        let node = try_decode(json!({"_query_class": "orderby", "_order_by": ["-votes", "title"]}))
            .unwrap();
        assert_eq!(
            node,
            QueryNode::OrderBy {
                order: OrderSpec::new(vec!["-votes".into(), "title".into()])
            }
        );

        assert!(matches!(
            try_decode(json!({"_query_class": "orderby", "_order_by": "title"})),
            Err(DecodeError::WrongShape { field: "_order_by", .. })
        ));
    }

    #[test]
    fn no_field_classes() {
        assert_eq!(try_decode(json!({"_query_class": "all"})), Ok(QueryNode::All));
        assert_eq!(
            try_decode(json!({"_query_class": "distinct"})),
            Ok(QueryNode::Distinct)
        );
        assert_eq!(
            try_decode(json!({"_query_class": "query"})),
            Ok(QueryNode::Identity)
        );
    }

    #[test]
    fn self_field_comparison() {
        let node = try_decode(json!({
            "_query_class": "selffieldfilter",
            "_condition": "modified__gt",
            "_field_to_compare": "created"
        }))
        .unwrap();
        assert_eq!(
            node,
            QueryNode::SelfFieldFilter {
                spec: ConditionSpec::single("modified__gt", FieldRef::new("created"))
            }
        );

        assert!(matches!(
            try_decode(json!({"_query_class": "selffieldexclude", "_condition": "a"})),
            Err(DecodeError::MissingField {
                field: "_field_to_compare",
                ..
            })
        ));
    }

    #[test]
    fn nested_values_stay_raw() {
        let point = json!({"type": "Point", "coordinates": [9.19, 45.46]});
        let node = try_decode(json!({
            "_query_class": "nestedfilter",
            "_condition": "place",
            "_inner_condition": "location",
            "_value": point
        }))
        .unwrap();

        let inner = node
            .spec()
            .and_then(|spec| spec.iter().next())
            .map(|condition| condition.operand.clone());
        assert_eq!(
            inner,
            Some(Operand::Group(ConditionSpec::single(
                "location",
                Operand::Literal(point)
            )))
        );
    }

    #[test]
    fn nested_groups() {
        let node = try_decode(json!({
            "_query_class": "nestedexclude",
            "_condition": "author",
            "_inner_condition": "name__iexact",
            "_value": "ada"
        }))
        .unwrap();
        assert_eq!(
            node,
            QueryNode::NestedExclude {
                spec: ConditionSpec::single(
                    "author",
                    ConditionSpec::single("name__iexact", json!("ada"))
                )
            }
        );
    }

    #[test]
    fn nested_groups_can_be_disabled() {
        let decoder = Decoder::with_config(DecoderConfig::new().nested_groups(false));
        let result = decoder.try_decode(&json!({
            "_query_class": "queryfilter",
            "_condition": "author",
            "_inner_condition": "name",
            "_value": "ada"
        }));
        assert_eq!(result, Err(DecodeError::Disabled("nestedfilter")));
    }

    #[test]
    fn tag_errors() {
        assert_eq!(try_decode(json!({})), Err(DecodeError::MissingTag));
        assert_eq!(
            try_decode(json!({"_query_class": 3})),
            Err(DecodeError::TagNotString)
        );
        assert_eq!(
            try_decode(json!({"_query_class": "doesnotexist"})),
            Err(DecodeError::UnknownTag("doesnotexist".into()))
        );
        assert_eq!(try_decode(json!(null)), Err(DecodeError::Null));
        assert_eq!(try_decode(json!([1])), Err(DecodeError::NotAnObject));
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(try_decode(json!({"_query_class": "ALL"})), Ok(QueryNode::All));
        assert!(try_decode(json!({"_query_class": "CompositeOr", "_sub_queries": []})).is_ok());
    }

    #[test]
    fn decode_is_fail_soft() {
        assert_eq!(decode(None), None);
        assert_eq!(decode(Some(&json!(null))), None);
        assert_eq!(decode(Some(&json!({"_query_class": "doesnotexist"}))), None);
        assert_eq!(decode(Some(&json!("filter"))), None);
        assert_eq!(decode(Some(&json!({"_query_class": "all"}))), Some(QueryNode::All));
    }

    #[test]
    fn composite_drops_malformed_children_in_order() {
        let node = try_decode(json!({
            "_query_class": "compositeand",
            "_sub_queries": [
                {"_query_class": "filter", "_condition": "a", "_value": 1},
                {"_query_class": "filter", "_condition": "b"},
                null,
                {"_query_class": "nope"},
                {"_query_class": "filter", "_condition": "c", "_value": 3}
            ]
        }))
        .unwrap();

        let paths: Vec<&str> = node
            .children()
            .iter()
            .map(|child| child.spec().unwrap().conditions()[0].path.as_str())
            .collect();
        assert_eq!(paths, ["a", "c"]);
    }

    #[test]
    fn composite_requires_sub_queries() {
        assert_eq!(
            try_decode(json!({"_query_class": "compositeand"})),
            Err(DecodeError::MissingField {
                class: "compositeand",
                field: "_sub_queries"
            })
        );
        assert!(matches!(
            try_decode(json!({"_query_class": "compositeor", "_sub_queries": {}})),
            Err(DecodeError::WrongShape { .. })
        ));
    }

    #[test]
    fn diagnostics_locate_dropped_children() {
        let decoded = Decoder::new().decode_with_diagnostics(&json!({
            "_query_class": "compositeor",
            "_sub_queries": [
                {"_query_class": "all"},
                {
                    "_query_class": "compositeand",
                    "_sub_queries": [
                        {"_query_class": "distinct"},
                        {"_query_class": "bogus"}
                    ]
                },
                {"_query_class": "orderby"}
            ]
        }));

        assert!(decoded.node.is_some());
        assert_eq!(
            decoded.diagnostics,
            vec![
                Diagnostic {
                    path: vec![1, 1],
                    error: DecodeError::UnknownTag("bogus".into())
                },
                Diagnostic {
                    path: vec![2],
                    error: DecodeError::MissingField {
                        class: "orderby",
                        field: "_order_by"
                    }
                },
            ]
        );
        assert_eq!(
            decoded.diagnostics[0].to_string(),
            "root._sub_queries[1]._sub_queries[1]: unknown query class 'bogus'"
        );
    }

    #[test]
    fn diagnostics_report_root_failure() {
        let decoded = Decoder::new().decode_with_diagnostics(&json!({"_query_class": "x"}));
        assert_eq!(decoded.node, None);
        assert_eq!(decoded.diagnostics.len(), 1);
        assert!(decoded.diagnostics[0].path.is_empty());
        assert_eq!(
            decoded.diagnostics[0].to_string(),
            "root: unknown query class 'x'"
        );
    }
}
