//! remoteq-seeker - An in-memory query builder for remoteq documents.
//!
//! [`QuerySet`] implements [`remoteq::QueryBuilder`] over a borrowed slice of
//! records, so decoded query documents can be evaluated without a database.
//! Records are read through the [`Seekable`] trait, which is implemented for
//! `serde_json::Value` out of the box.
//!
//! - Django-style condition paths: `title__icontains`, `author__name__iexact`
//! - String, ordered, membership, null and bounding-box lookups
//! - Field-to-field comparisons and nested condition groups
//! - Multi-field ordering with ascending/descending, applied on materialization
//!
//! # Quick Start
//!
//! ```rust
//! use remoteq_seeker::QuerySet;
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"title": "Nicola", "votes": 3, "tag": "physics"}),
//!     json!({"title": "Ada", "votes": 5, "tag": "math"}),
//!     json!({"title": "Grace", "votes": 4, "tag": "cs"}),
//! ];
//!
//! let doc = json!({
//!     "_query_class": "compositeor",
//!     "_sub_queries": [
//!         {"_query_class": "filter", "_condition": "tag", "_value": "math"},
//!         {"_query_class": "filter", "_condition": "votes__lt", "_value": 4}
//!     ]
//! });
//!
//! let qs = remoteq::apply_document(Some(&doc), QuerySet::new(&rows)).unwrap();
//! assert_eq!(qs.rows(), [0, 1]);
//! ```
//!
//! # Lookups
//!
//! | Lookup | Operand |
//! |--------|---------|
//! | `exact` (default) | scalar, `null`, geometry, field reference |
//! | `iexact`, `contains`, `icontains`, `startswith`, `istartswith`, `endswith`, `iendswith` | string |
//! | `regex`, `iregex` | pattern string |
//! | `gt`, `gte`, `lt`, `lte` | scalar or field reference |
//! | `in` | array of scalars |
//! | `range` | `[low, high]` |
//! | `isnull` | boolean |
//! | `bbcontains`, `bboverlaps`, `contained` | geometry |
//!
//! Absent and null fields never satisfy a lookup other than `isnull=true`
//! and `exact=null`. Objects and arrays are present (`isnull=false`) but
//! match no other lookup.
//!
//! `order_by` sorts columns of mixed kinds as bool, number, string,
//! geometry, other, then missing (reversed for descending keys).

mod clause;
mod error;
mod lookup;
mod ordering;
mod queryset;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseValue};
pub use error::{Result, SeekerError};
pub use lookup::{split_lookup, Lookup};
pub use ordering::{compare_values, sort_values, Dir, OrderBy};
pub use queryset::QuerySet;
pub use traits::Seekable;
pub use value::{Number, Value};
