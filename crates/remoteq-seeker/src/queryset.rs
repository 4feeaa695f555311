//! The in-memory [`QueryBuilder`].
//!
//! A [`QuerySet`] is a selection of rows over a borrowed slice of records,
//! plus the ordering and distinct flag to apply when it is materialized.

use std::ptr;

use remoteq::{ConditionSpec, OrderSpec, QueryBuilder};

use crate::clause::Clause;
use crate::error::{Result, SeekerError};
use crate::lookup::SEP;
use crate::ordering::{compare_by_orderings, OrderBy};
use crate::traits::Seekable;

/// A lazily materialized selection of records.
///
/// Row selection happens as each operation is applied. Ordering and
/// de-duplication are deferred to [`results`](QuerySet::results).
///
/// # Example
///
/// ```
/// use remoteq_seeker::QuerySet;
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"title": "Nicola", "votes": 3}),
///     json!({"title": "Ada", "votes": 5}),
///     json!({"title": "nicolas", "votes": 1}),
/// ];
///
/// let doc = json!({
///     "_query_class": "compositeand",
///     "_sub_queries": [
///         {"_query_class": "filter", "_condition": "title__istartswith", "_value": "nicola"},
///         {"_query_class": "orderby", "_order_by": ["votes"]}
///     ]
/// });
///
/// let qs = remoteq::apply_document(Some(&doc), QuerySet::new(&rows)).unwrap();
/// let titles: Vec<&str> = qs.results().iter().map(|r| r["title"].as_str().unwrap()).collect();
/// assert_eq!(titles, ["nicolas", "Nicola"]);
/// ```
pub struct QuerySet<'a, T> {
    items: &'a [T],
    /// Selected indices into `items`, sorted and unique.
    rows: Vec<usize>,
    orderings: Vec<OrderBy>,
    distinct: bool,
}

impl<T> Clone for QuerySet<'_, T> {
    fn clone(&self) -> Self {
        QuerySet {
            items: self.items,
            rows: self.rows.clone(),
            orderings: self.orderings.clone(),
            distinct: self.distinct,
        }
    }
}

impl<T> std::fmt::Debug for QuerySet<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("items", &self.items.len())
            .field("rows", &self.rows)
            .field("orderings", &self.orderings)
            .field("distinct", &self.distinct)
            .finish()
    }
}

impl<'a, T> QuerySet<'a, T> {
    /// Creates a query set selecting every record.
    pub fn new(items: &'a [T]) -> Self {
        QuerySet {
            items,
            rows: (0..items.len()).collect(),
            orderings: Vec::new(),
            distinct: false,
        }
    }

    /// Selected indices into the source slice, in source order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Number of selected rows before de-duplication.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn retain(mut self, keep: impl Fn(&T) -> bool) -> Self {
        let items = self.items;
        self.rows.retain(|&row| keep(&items[row]));
        self
    }
}

impl<'a, T: Seekable + PartialEq> QuerySet<'a, T> {
    /// Materializes the selection: ordered, then de-duplicated if requested.
    ///
    /// Sorting is stable, so rows that compare equal keep source order.
    pub fn results(&self) -> Vec<&'a T> {
        let mut results: Vec<&'a T> = self.rows.iter().map(|&row| &self.items[row]).collect();

        if !self.orderings.is_empty() {
            results.sort_by(|a, b| compare_by_orderings(*a, *b, &self.orderings));
        }

        if self.distinct {
            let mut unique: Vec<&'a T> = Vec::with_capacity(results.len());
            for item in results {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            results = unique;
        }

        results
    }

    /// Number of records [`results`](QuerySet::results) would return.
    pub fn count(&self) -> usize {
        if self.distinct {
            self.results().len()
        } else {
            self.rows.len()
        }
    }

    /// Clones the materialized records.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.results().into_iter().cloned().collect()
    }
}

impl<T: Seekable> QuerySet<'_, T> {
    fn check_field(&self, field: &str) -> Result<()> {
        let Some(known) = T::seeker_fields() else {
            return Ok(());
        };
        let root = field.split(SEP).next().unwrap_or(field);
        if known.contains(&root) {
            Ok(())
        } else {
            Err(SeekerError::UnknownField(field.to_string()))
        }
    }

    fn compile(&self, spec: &ConditionSpec) -> Result<Vec<Clause>> {
        let clauses = Clause::compile_spec(spec)?;
        for clause in &clauses {
            for field in clause.referenced_fields() {
                self.check_field(field)?;
            }
        }
        Ok(clauses)
    }
}

impl<T: Seekable + PartialEq> QueryBuilder for QuerySet<'_, T> {
    type Error = SeekerError;

    fn all(self) -> Result<Self> {
        Ok(self)
    }

    fn none(mut self) -> Result<Self> {
        self.rows.clear();
        Ok(self)
    }

    fn filter(self, spec: &ConditionSpec) -> Result<Self> {
        let clauses = self.compile(spec)?;
        Ok(self.retain(|item| clauses.iter().all(|clause| clause.matches(item))))
    }

    /// Drops rows matching the whole spec; a row that fails any one
    /// condition is kept.
    fn exclude(self, spec: &ConditionSpec) -> Result<Self> {
        let clauses = self.compile(spec)?;
        Ok(self.retain(|item| !clauses.iter().all(|clause| clause.matches(item))))
    }

    fn order_by(mut self, order: &OrderSpec) -> Result<Self> {
        let orderings: Vec<OrderBy> = order.iter().filter_map(OrderBy::parse).collect();
        for ordering in &orderings {
            self.check_field(&ordering.field)?;
        }
        self.orderings = orderings;
        Ok(self)
    }

    fn distinct(mut self) -> Result<Self> {
        self.distinct = true;
        Ok(self)
    }

    fn union(mut self, other: Self) -> Result<Self> {
        if !ptr::eq(self.items, other.items) {
            return Err(SeekerError::ForeignQuerySet);
        }
        self.rows.extend_from_slice(&other.rows);
        self.rows.sort_unstable();
        self.rows.dedup();
        self.distinct |= other.distinct;
        Ok(self)
    }
}
