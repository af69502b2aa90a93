// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use brokee::api::{decode_list, decode_page};
use brokee::error::ApiError;
use brokee::models::{PlannedTxResponse, TxResponse};
use brokee::view::CategoryDirectory;
use brokee::view::mapper::{map_booked, map_planned};
use serde_json::json;

fn envelope(data: serde_json::Value) -> String {
    json!({"success": true, "message": "", "statusCode": 200, "data": data}).to_string()
}

fn good_tx() -> serde_json::Value {
    json!({"id": 1, "type": "E", "amount": "45.00", "categoryId": 1, "txTime": "2025-07-20T09:15:00"})
}

#[test]
fn bad_amount_drops_only_that_transaction() {
    let body = envelope(json!({
        "items": [good_tx(), {"id": 2, "type": "E", "amount": true, "txTime": "2025-07-20T10:00:00"}],
        "page": 0, "size": 10, "total": 2
    }));
    let page = decode_page::<TxResponse>(200, &body)
        .unwrap()
        .into_result()
        .unwrap()
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 1);
    assert_eq!(page.total, 2);
    assert!(map_booked(&page.items[0], &CategoryDirectory::default(), true).is_some());
}

#[test]
fn numeric_timestamp_drops_only_that_transaction() {
    let body = envelope(json!({
        "items": [{"id": 3, "type": "I", "amount": 10, "txTime": 1721466900000_i64}, good_tx()],
        "total": 2
    }));
    let page = decode_page::<TxResponse>(200, &body).unwrap().data.unwrap();
    let ids: Vec<i64> = page.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, [1]);
}

#[test]
fn malformed_planned_item_is_dropped() {
    let body = envelope(json!([
        {"id": 7, "type": "E", "title": "Rent", "amount": 700, "dueDate": "2025-08-01", "categoryId": 3},
        {"id": 8, "type": "E", "title": "Gym", "amount": "30", "dueDate": 20250801},
        {"id": 9, "type": "E", "title": "Phone", "amount": {"value": 20}, "dueDate": "2025-08-03"}
    ]));
    let plans = decode_list::<PlannedTxResponse>(200, &body).unwrap().data.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(map_planned(&plans[0]).unwrap().category, "Rent");
}

#[test]
fn broken_envelope_is_still_an_error() {
    let err = decode_list::<TxResponse>(200, r#"{"success": "yes"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}
