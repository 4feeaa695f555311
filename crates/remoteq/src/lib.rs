//! remoteq - Client-driven query documents for query builders.
//!
//! A client describes a query as a JSON document tagged with `_query_class`.
//! The server decodes it into a [`QueryNode`] tree and applies the tree to any
//! [`QueryBuilder`], producing the same builder calls it would have written
//! by hand.
//!
//! - Leaf classes map one-to-one onto builder operations: `all`, `filter`,
//!   `exclude`, `orderby`, `distinct`
//! - Self-field classes compare one field against another of the same row
//! - Nested classes scope a condition group under a relation path
//! - `compositeand` chains children; `compositeor` unions them
//! - GeoJSON values become [`Geometry`] operands, everything else stays literal
//!
//! # Quick Start
//!
//! ```rust
//! use remoteq::{ConditionSpec, OrderSpec, QueryBuilder};
//! use serde_json::json;
//!
//! // A builder that records the calls it receives
//! #[derive(Clone, Default)]
//! struct Calls(Vec<String>);
//!
//! impl QueryBuilder for Calls {
//!     type Error = std::convert::Infallible;
//!
//!     fn all(self) -> Result<Self, Self::Error> { Ok(self) }
//!     fn none(self) -> Result<Self, Self::Error> { Ok(Calls::default()) }
//!     fn filter(mut self, spec: &ConditionSpec) -> Result<Self, Self::Error> {
//!         self.0.extend(spec.iter().map(|c| format!("filter {}", c.path)));
//!         Ok(self)
//!     }
//!     fn exclude(self, _: &ConditionSpec) -> Result<Self, Self::Error> { Ok(self) }
//!     fn order_by(mut self, order: &OrderSpec) -> Result<Self, Self::Error> {
//!         self.0.push(format!("order_by {}", order.fields().join(",")));
//!         Ok(self)
//!     }
//!     fn distinct(self) -> Result<Self, Self::Error> { Ok(self) }
//!     fn union(mut self, other: Self) -> Result<Self, Self::Error> {
//!         self.0.extend(other.0);
//!         Ok(self)
//!     }
//! }
//!
//! let doc = json!({
//!     "_query_class": "compositeand",
//!     "_sub_queries": [
//!         {"_query_class": "filter", "_condition": "title__icontains", "_value": "nicola"},
//!         {"_query_class": "orderby", "_order_by": ["-id"]}
//!     ]
//! });
//!
//! let calls = remoteq::apply_document(Some(&doc), Calls::default()).unwrap();
//! assert_eq!(calls.0, ["filter title__icontains", "order_by -id"]);
//!
//! // Documents that do not decode leave the builder untouched
//! let bogus = json!({"_query_class": "doesnotexist"});
//! let calls = remoteq::apply_document(Some(&bogus), Calls::default()).unwrap();
//! assert!(calls.0.is_empty());
//! ```
//!
//! # Query Classes
//!
//! | Tag (aliases) | Fields | Builder call |
//! |---------------|--------|--------------|
//! | `query` | | none |
//! | `all` | | `all()` |
//! | `filter` | `_condition`, `_value` | `filter(spec)` |
//! | `exclude` | `_condition`, `_value` | `exclude(spec)` |
//! | `orderby` | `_order_by` | `order_by(order)` |
//! | `distinct` | | `distinct()` |
//! | `selffieldfilter` | `_condition`, `_field_to_compare` | `filter(spec)` |
//! | `selffieldexclude` | `_condition`, `_field_to_compare` | `exclude(spec)` |
//! | `nestedfilter` (`queryfilter`) | `_condition`, `_inner_condition`, `_value` | `filter(spec)` |
//! | `nestedexclude` (`queryexclude`) | `_condition`, `_inner_condition`, `_value` | `exclude(spec)` |
//! | `compositeand` (`compositequery`) | `_sub_queries` | children in sequence |
//! | `compositeor` (`orquery`) | `_sub_queries` | union of children |
//!
//! Tags are matched case-insensitively.

mod builder;
mod coerce;
mod condition;
mod decode;
mod error;
mod geometry;
mod node;
mod registry;
pub mod request;

// Re-export public API
pub use builder::QueryBuilder;
pub use coerce::{coerce, coerce_with};
pub use condition::{Condition, ConditionSpec, FieldRef, Operand, OrderSpec};
pub use decode::{
    apply_document, decode, Decoded, Decoder, DecoderConfig, Diagnostic, ShapePolicy, CONDITION,
    FIELD_TO_COMPARE, INNER_CONDITION, ORDER_BY, QUERY_CLASS, SUB_QUERIES, VALUE,
};
pub use error::{DecodeError, RequestError, RequestFilterError};
pub use geometry::{BoundingBox, Geometry, GeometryError, Position};
pub use node::QueryNode;
pub use registry::QueryClass;
