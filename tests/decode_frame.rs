//! Wire payload to typed frame scenarios.
//!
//! Exercises the public decoding surface end to end: parse a raw backend
//! payload, pick out the primary table(s), and decode into typed columns,
//! including the opportunistic JSON handling of `dynamic` cells.

use logfan::{Column, ColumnType, Error, LogsResponse, TableKind, wire};
use serde_json::json;

#[test]
fn full_payload_decodes_into_typed_columns() {
    let body = json!({
        "tables": [
            {
                "name": "PrimaryResult",
                "columns": [
                    {"name": "resource_id", "type": "string"},
                    {"name": "healthy", "type": "bool"},
                    {"name": "samples", "type": "long"},
                    {"name": "p95", "type": "real"},
                    {"name": "seen_at", "type": "datetime"},
                    {"name": "tags", "type": "dynamic"}
                ],
                "rows": [
                    ["/subscriptions/s/vm1", true, 1440, 72.5, "2024-03-01T00:00:00Z", "{\"env\":\"prod\"}"],
                    ["/subscriptions/s/vm2", false, 1440, 91.25, "2024-03-01T00:00:00Z", "oops not json"],
                    ["/subscriptions/s/vm3", null, null, null, null, null]
                ]
            },
            {
                "name": "QueryProperties",
                "columns": [{"name": "Visualization", "type": "string"}],
                "rows": [["table"]]
            }
        ]
    })
    .to_string();

    let response = wire::parse_response(&body).unwrap();
    assert_eq!(response.tables.len(), 2);
    assert_eq!(response.tables[1].kind(), TableKind::QueryProperties);

    // Only the primary table becomes a frame.
    let frames = response.frames().unwrap();
    assert_eq!(frames.len(), 1);

    let frame = response.primary_frame().unwrap();
    assert_eq!(frame.row_count(), 3);
    assert_eq!(frame.columns()[3].column_type, ColumnType::Real);

    assert_eq!(
        frame.column("healthy"),
        Some(&Column::Bool(vec![Some(true), Some(false), None]))
    );
    assert_eq!(
        frame.column("samples"),
        Some(&Column::Long(vec![Some(1440), Some(1440), None]))
    );
    assert_eq!(
        frame.column("p95"),
        Some(&Column::Real(vec![Some(72.5), Some(91.25), None]))
    );

    let Some(Column::Dynamic(tags)) = frame.column("tags") else {
        panic!("expected dynamic column");
    };
    assert_eq!(tags[0], json!({"env": "prod"}));
    assert_eq!(tags[1], json!("oops not json"));
    assert_eq!(tags[2], json!(null));
}

#[test]
fn merged_payloads_decode_as_one_frame() {
    let page = |rows: serde_json::Value| {
        wire::parse_response(
            &json!({
                "tables": [{
                    "name": "PrimaryResult",
                    "columns": [{"name": "n", "type": "int"}],
                    "rows": rows
                }]
            })
            .to_string(),
        )
        .unwrap()
    };

    let merged = LogsResponse::merge(vec![
        page(json!([[1], [2]])),
        page(json!([[3]])),
        page(json!([[4], [5]])),
    ])
    .unwrap();

    let frame = merged.primary_frame().unwrap();
    assert_eq!(
        frame.column("n"),
        Some(&Column::Long(vec![
            Some(1),
            Some(2),
            Some(3),
            Some(4),
            Some(5)
        ]))
    );
}

#[test]
fn ragged_rows_fail_decoding() {
    let body = json!({
        "tables": [{
            "name": "PrimaryResult",
            "columns": [
                {"name": "a", "type": "string"},
                {"name": "b", "type": "string"}
            ],
            "rows": [["only one"]]
        }]
    })
    .to_string();

    let response = wire::parse_response(&body).unwrap();
    let err = response.primary_frame().unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(_)));
}

#[test]
fn guid_and_timespan_columns_decode_as_text() {
    let body = json!({
        "tables": [{
            "name": "PrimaryResult",
            "columns": [
                {"name": "id", "type": "guid"},
                {"name": "window", "type": "timespan"}
            ],
            "rows": [["9f8c4a2e-0000-4000-8000-000000000000", "00:05:00"]]
        }]
    })
    .to_string();

    let frame = wire::parse_response(&body).unwrap().primary_frame().unwrap();
    assert_eq!(
        frame.column("id"),
        Some(&Column::Text(vec![Some(
            "9f8c4a2e-0000-4000-8000-000000000000".into()
        )]))
    );
    assert_eq!(
        frame.column("window"),
        Some(&Column::Text(vec![Some("00:05:00".into())]))
    );
}
