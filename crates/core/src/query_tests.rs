// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use yare::parameterized;

#[test]
fn page_query_wire_shape() {
    let query = PageQuery::new(50)
        .page(2)
        .order_by("created_at", false)
        .filter(Filter::equals("status", "NEW"));

    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(
        value,
        json!({
            "PageNo": 2,
            "PageSize": 50,
            "OrderByField": "created_at",
            "IsAsc": false,
            "Filters": [{"name": "status", "op": "Equal", "value": "NEW"}]
        })
    );
}

#[test]
fn page_number_is_at_least_one() {
    assert_eq!(PageQuery::new(10).page(0).page, 1);
}

#[test]
fn page_decodes_list_and_count() {
    let page: Page<serde_json::Value> =
        serde_json::from_value(json!({"List": [{"id": 1}], "VirtualCount": 30})).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 30);
    assert!(page.has_more(&PageQuery::new(10)));
    assert!(!page.has_more(&PageQuery::new(10).page(3)));
}

#[test]
fn page_tolerates_missing_fields() {
    let page: Page<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[parameterized(
    eq_string = { Filter::equals("status", "NEW"), true },
    eq_number_int_vs_float = { Filter::equals("owner_id", 7.0), true },
    eq_miss = { Filter::equals("status", "WON"), false },
    contains = { Filter::new("company", FilterOp::StringContains, "remod"), true },
    starts_with = { Filter::new("company", FilterOp::StringStartsWith, "reyes"), true },
    gt = { Filter::new("score", FilterOp::GreaterThan, 50), true },
    gte_equal = { Filter::new("score", FilterOp::GreaterThanOrEqual, 64), true },
    lt = { Filter::new("score", FilterOp::LessThan, 64), false },
    lte = { Filter::new("score", FilterOp::LessThanOrEqual, 64), true },
    missing_field = { Filter::equals("nope", 1), false },
    date_strings = { Filter::new("created_at", FilterOp::GreaterThan, "2026-01-01"), true },
)]
fn filter_matches_record(filter: Filter, expected: bool) {
    let record = json!({
        "status": "NEW",
        "owner_id": 7,
        "company": "Reyes Remodeling",
        "score": 64,
        "created_at": "2026-04-01T08:00:00Z"
    });
    assert_eq!(filter.matches(&record), expected);
}
