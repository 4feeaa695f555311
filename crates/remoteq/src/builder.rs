//! The query-building capability that query trees are applied to.

use crate::condition::{ConditionSpec, OrderSpec};

/// A query builder in the style of a relational query set.
///
/// Every operation consumes the builder and returns the transformed one, so a
/// tree can thread a single value through all of its nodes. Conditions inside
/// one [`filter`](QueryBuilder::filter) call are conjunctive, and successive
/// calls narrow the previous result.
///
/// `Clone` is required because OR-composition applies each branch to its own
/// copy of the starting builder before combining them with
/// [`union`](QueryBuilder::union).
///
/// Errors raised here (an unknown field path, an operand the builder cannot
/// compare) are returned unchanged by [`QueryNode::apply`](crate::QueryNode::apply).
pub trait QueryBuilder: Clone {
    /// Builder-level failure.
    type Error;

    /// Returns everything currently selected (a copy of the query).
    fn all(self) -> Result<Self, Self::Error>;

    /// Returns an empty selection.
    fn none(self) -> Result<Self, Self::Error>;

    /// Keeps rows matching every condition in `spec`.
    fn filter(self, spec: &ConditionSpec) -> Result<Self, Self::Error>;

    /// Drops rows matching every condition in `spec`.
    fn exclude(self, spec: &ConditionSpec) -> Result<Self, Self::Error>;

    /// Replaces the ordering.
    fn order_by(self, order: &OrderSpec) -> Result<Self, Self::Error>;

    /// Removes duplicate rows.
    fn distinct(self) -> Result<Self, Self::Error>;

    /// Combines two selections; rows present in either are kept once.
    fn union(self, other: Self) -> Result<Self, Self::Error>;
}
