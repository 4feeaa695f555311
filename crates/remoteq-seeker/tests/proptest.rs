//! Property-based tests for query composition over `QuerySet`.

use proptest::prelude::*;
use remoteq::{apply_document, QueryBuilder};
use remoteq_seeker::{Number, QuerySet, Seekable, Value};
use serde_json::{json, Value as Json};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct TestItem {
    value: i64,
    name: String,
    active: bool,
}

impl Seekable for TestItem {
    fn seeker_field_value(&self, field: &str) -> Value<'_> {
        match field {
            "value" => Value::Number(Number::I64(self.value)),
            "name" => Value::String(&self.name),
            "active" => Value::Bool(self.active),
            _ => Value::None,
        }
    }

    fn seeker_fields() -> Option<&'static [&'static str]> {
        Some(&["value", "name", "active"])
    }
}

fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (-50i64..50, "[a-c]{1,4}", any::<bool>()).prop_map(|(value, name, active)| TestItem {
        value,
        name,
        active,
    })
}

/// Leaf documents that always decode and always apply cleanly.
fn leaf_strategy() -> impl Strategy<Value = Json> {
    prop_oneof![
        (-50i64..50).prop_map(|t| json!({
            "_query_class": "filter", "_condition": "value__gt", "_value": t
        })),
        (-50i64..50).prop_map(|t| json!({
            "_query_class": "exclude", "_condition": "value__lte", "_value": t
        })),
        any::<bool>().prop_map(|b| json!({
            "_query_class": "filter", "_condition": "active", "_value": b
        })),
        "[a-c]{1,2}".prop_map(|s| json!({
            "_query_class": "filter", "_condition": "name__icontains", "_value": s
        })),
        Just(json!({"_query_class": "all"})),
    ]
}

fn composite(class: &str, children: &[Json]) -> Json {
    json!({"_query_class": class, "_sub_queries": children})
}

fn rows(doc: &Json, items: &[TestItem]) -> Vec<usize> {
    apply_document(Some(doc), QuerySet::new(items))
        .unwrap()
        .rows()
        .to_vec()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// OR selects exactly the rows some child selects on its own.
    #[test]
    fn or_equals_union_of_children(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        children in prop::collection::vec(leaf_strategy(), 0..5),
    ) {
        let mut expected: Vec<usize> = children
            .iter()
            .flat_map(|child| rows(child, &items))
            .collect();
        expected.sort_unstable();
        expected.dedup();

        prop_assert_eq!(rows(&composite("compositeor", &children), &items), expected);
    }

    /// Duplicated OR children change nothing.
    #[test]
    fn or_is_idempotent(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        child in leaf_strategy(),
    ) {
        let once = composite("compositeor", &[child.clone()]);
        let twice = composite("compositeor", &[child.clone(), child.clone()]);

        prop_assert_eq!(rows(&once, &items), rows(&twice, &items));
        prop_assert_eq!(rows(&once, &items), rows(&child, &items));
    }

    /// OR is independent of child order.
    #[test]
    fn or_ignores_child_order(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        children in prop::collection::vec(leaf_strategy(), 1..5),
    ) {
        let mut reversed = children.clone();
        reversed.reverse();

        prop_assert_eq!(
            rows(&composite("compositeor", &children), &items),
            rows(&composite("orquery", &reversed), &items)
        );
    }

    /// AND is the same as applying each child in turn.
    #[test]
    fn and_is_sequential(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        children in prop::collection::vec(leaf_strategy(), 0..5),
    ) {
        let mut sequential = QuerySet::new(&items);
        for child in &children {
            sequential = apply_document(Some(child), sequential).unwrap();
        }

        prop_assert_eq!(
            rows(&composite("compositeand", &children), &items),
            sequential.rows().to_vec()
        );
    }

    /// AND nests without changing the result.
    #[test]
    fn and_is_associative(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        a in leaf_strategy(),
        b in leaf_strategy(),
        c in leaf_strategy(),
    ) {
        let flat = composite("compositeand", &[a.clone(), b.clone(), c.clone()]);
        let left = composite("compositeand", &[composite("compositeand", &[a.clone(), b.clone()]), c.clone()]);
        let right = composite("compositequery", &[a, composite("compositequery", &[b, c])]);

        prop_assert_eq!(rows(&flat, &items), rows(&left, &items));
        prop_assert_eq!(rows(&flat, &items), rows(&right, &items));
    }

    /// filter and exclude with the same condition partition the input.
    #[test]
    fn filter_and_exclude_partition(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        threshold in -50i64..50,
    ) {
        let doc = |class: &str| json!({
            "_query_class": class, "_condition": "value__gte", "_value": threshold
        });
        let kept = rows(&doc("filter"), &items);
        let dropped = rows(&doc("exclude"), &items);

        prop_assert_eq!(kept.len() + dropped.len(), items.len());
        prop_assert!(kept.iter().all(|row| !dropped.contains(row)));
        prop_assert!(kept.iter().all(|&row| items[row].value >= threshold));
    }

    /// Documents that do not decode pass the query set through.
    #[test]
    fn unknown_tags_pass_through(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        tag in "[a-z]{12,16}",
    ) {
        let doc = json!({"_query_class": tag, "_condition": "value", "_value": 1});
        prop_assert_eq!(rows(&doc, &items), (0..items.len()).collect::<Vec<_>>());
    }

    /// Ordering is stable: equal keys keep source order.
    #[test]
    fn ordering_is_stable(
        items in prop::collection::vec(test_item_strategy(), 0..40),
    ) {
        let doc = json!({"_query_class": "orderby", "_order_by": ["-active"]});
        let qs = apply_document(Some(&doc), QuerySet::new(&items)).unwrap();
        let results = qs.results();

        for pair in results.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if prev.active == curr.active {
                let prev_pos = items.iter().position(|x| std::ptr::eq(x, prev));
                let curr_pos = items.iter().position(|x| std::ptr::eq(x, curr));
                prop_assert!(prev_pos < curr_pos, "Stable sort violated: equal items reordered");
            } else {
                prop_assert!(prev.active && !curr.active, "Sort order violated");
            }
        }
    }
}

// ============================================================================
// Additional edge case tests
// ============================================================================

#[test]
fn empty_or_selects_nothing() {
    let items = vec![TestItem {
        value: 1,
        name: "a".into(),
        active: true,
    }];
    assert!(rows(&composite("compositeor", &[]), &items).is_empty());
}

#[test]
fn empty_collection_stays_empty() {
    let items: Vec<TestItem> = vec![];
    let doc = composite("compositeor", &[json!({"_query_class": "all"})]);
    assert!(rows(&doc, &items).is_empty());
    assert_eq!(QuerySet::new(&items).none().unwrap().count(), 0);
}
