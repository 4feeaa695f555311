//! Query trees and their evaluation.

use serde::Serialize;
use tracing::trace;

use crate::builder::QueryBuilder;
use crate::condition::{ConditionSpec, OrderSpec};
use crate::registry::QueryClass;

/// A decoded query document.
///
/// Nodes are built once by the [`Decoder`](crate::Decoder) and never mutated.
/// Evaluation threads a builder through the tree depth-first:
///
/// | Variant | Evaluation on builder `B` |
/// |---------|---------------------------|
/// | `Identity` | `B` |
/// | `All` | `B.all()` |
/// | `Filter`, `SelfFieldFilter`, `NestedFilter` | `B.filter(spec)` |
/// | `Exclude`, `SelfFieldExclude`, `NestedExclude` | `B.exclude(spec)` |
/// | `OrderBy` | `B.order_by(order)` |
/// | `Distinct` | `B.distinct()` |
/// | `CompositeAnd` | each child applied to the previous result |
/// | `CompositeOr` | union of each child applied to its own copy of `B` |
///
/// The variants that share an evaluation differ in how their spec was built:
/// self-field nodes carry a [`FieldRef`](crate::FieldRef) operand and nested
/// nodes carry a [`ConditionSpec`] group operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_query_class", rename_all = "lowercase")]
pub enum QueryNode {
    #[serde(rename = "query")]
    Identity,
    All,
    Filter {
        spec: ConditionSpec,
    },
    Exclude {
        spec: ConditionSpec,
    },
    OrderBy {
        order: OrderSpec,
    },
    Distinct,
    SelfFieldFilter {
        spec: ConditionSpec,
    },
    SelfFieldExclude {
        spec: ConditionSpec,
    },
    NestedFilter {
        spec: ConditionSpec,
    },
    NestedExclude {
        spec: ConditionSpec,
    },
    CompositeAnd {
        children: Vec<QueryNode>,
    },
    CompositeOr {
        children: Vec<QueryNode>,
    },
}

impl QueryNode {
    /// Applies this tree to `builder`.
    ///
    /// Builder errors are returned unchanged; the first failing node stops
    /// evaluation.
    pub fn apply<B: QueryBuilder>(&self, builder: B) -> Result<B, B::Error> {
        trace!(class = %self.class(), "applying query node");
        match self {
            QueryNode::Identity => Ok(builder),
            QueryNode::All => builder.all(),
            QueryNode::Filter { spec }
            | QueryNode::SelfFieldFilter { spec }
            | QueryNode::NestedFilter { spec } => builder.filter(spec),
            QueryNode::Exclude { spec }
            | QueryNode::SelfFieldExclude { spec }
            | QueryNode::NestedExclude { spec } => builder.exclude(spec),
            QueryNode::OrderBy { order } => builder.order_by(order),
            QueryNode::Distinct => builder.distinct(),
            QueryNode::CompositeAnd { children } => children
                .iter()
                .try_fold(builder, |current, child| child.apply(current)),
            QueryNode::CompositeOr { children } => {
                let mut union = builder.clone().none()?;
                for child in children {
                    let branch = child.apply(builder.clone())?;
                    union = union.union(branch)?;
                }
                Ok(union)
            }
        }
    }

    /// The class this node was decoded from.
    pub fn class(&self) -> QueryClass {
        match self {
            QueryNode::Identity => QueryClass::Identity,
            QueryNode::All => QueryClass::All,
            QueryNode::Filter { .. } => QueryClass::Filter,
            QueryNode::Exclude { .. } => QueryClass::Exclude,
            QueryNode::OrderBy { .. } => QueryClass::OrderBy,
            QueryNode::Distinct => QueryClass::Distinct,
            QueryNode::SelfFieldFilter { .. } => QueryClass::SelfFieldFilter,
            QueryNode::SelfFieldExclude { .. } => QueryClass::SelfFieldExclude,
            QueryNode::NestedFilter { .. } => QueryClass::NestedFilter,
            QueryNode::NestedExclude { .. } => QueryClass::NestedExclude,
            QueryNode::CompositeAnd { .. } => QueryClass::CompositeAnd,
            QueryNode::CompositeOr { .. } => QueryClass::CompositeOr,
        }
    }

    /// Sub-queries of a composite node; empty for leaves.
    pub fn children(&self) -> &[QueryNode] {
        match self {
            QueryNode::CompositeAnd { children } | QueryNode::CompositeOr { children } => {
                children
            }
            _ => &[],
        }
    }

    /// The condition spec of a filter-like node.
    pub fn spec(&self) -> Option<&ConditionSpec> {
        match self {
            QueryNode::Filter { spec }
            | QueryNode::Exclude { spec }
            | QueryNode::SelfFieldFilter { spec }
            | QueryNode::SelfFieldExclude { spec }
            | QueryNode::NestedFilter { spec }
            | QueryNode::NestedExclude { spec } => Some(spec),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.class().is_composite()
    }
}
