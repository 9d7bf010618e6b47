// tests/chunk_loading.rs
//! Cursor pagination of `loadCachedPageChunk`.

mod common;

use common::*;
use notion_pagegraph::api::load_document;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn loads_until_the_cursor_is_empty() {
    let transport = ScriptedTransport::new();
    transport.enqueue_json(LOAD_CHUNK, chunk(vec![root_page(1, "Root", &[2, 3, 4])], &[2]));
    transport.enqueue_json(LOAD_CHUNK, chunk(vec![block(2, "text", 1, &[])], &[3]));
    transport.enqueue_json(
        LOAD_CHUNK,
        chunk(vec![block(3, "text", 1, &[]), block(4, "divider", 1, &[])], &[]),
    );
    let client = client(&transport);

    let set = load_document(&client, &nid(1)).await.unwrap();

    assert_eq!(set.block_count(), 4);
    let bodies = transport.bodies(LOAD_CHUNK);
    assert_eq!(bodies.len(), 3);

    let limits: Vec<u64> = bodies.iter().map(|b| b["limit"].as_u64().unwrap()).collect();
    assert_eq!(limits, vec![50, 30, 30]);
    let chunk_numbers: Vec<u64> = bodies
        .iter()
        .map(|b| b["chunkNumber"].as_u64().unwrap())
        .collect();
    assert_eq!(chunk_numbers, vec![0, 1, 2]);

    assert_eq!(bodies[0]["page"]["id"], json!("00000000-0000-0000-0000-000000000001"));
    assert_eq!(bodies[0]["cursor"], json!({"stack": []}));
    assert_eq!(bodies[0]["verticalColumns"], json!(false));
}

#[tokio::test]
async fn echoes_the_cursor_verbatim() {
    let transport = ScriptedTransport::new();
    let cursor = json!({"stack": [[{"table": "block", "id": id(2), "index": 7, "extra": "kept"}]]});
    transport.enqueue_json(
        LOAD_CHUNK,
        json!({"recordMap": record_map(&[("block", vec![root_page(1, "Root", &[2])])]), "cursor": cursor}),
    );
    transport.enqueue_json(LOAD_CHUNK, chunk(vec![block(2, "text", 1, &[])], &[]));
    let client = client(&transport);

    load_document(&client, &nid(1)).await.unwrap();

    let bodies = transport.bodies(LOAD_CHUNK);
    assert_eq!(bodies[1]["cursor"], cursor);
}

#[tokio::test]
async fn newer_versions_win_across_chunks() {
    let transport = ScriptedTransport::new();
    let mut old = with_title(block(2, "text", 1, &[]), "old");
    old["version"] = json!(5);
    let mut stale = with_title(block(2, "text", 1, &[]), "stale");
    stale["version"] = json!(3);
    let mut new = with_title(block(2, "text", 1, &[]), "new");
    new["version"] = json!(9);

    transport.enqueue_json(LOAD_CHUNK, chunk(vec![root_page(1, "Root", &[2]), old], &[2]));
    transport.enqueue_json(LOAD_CHUNK, chunk(vec![new], &[2]));
    transport.enqueue_json(LOAD_CHUNK, chunk(vec![stale], &[]));
    let client = client(&transport);

    let set = load_document(&client, &nid(1)).await.unwrap();

    assert_eq!(set.block(&nid(2)).unwrap().title(), "new");
}

#[tokio::test]
async fn records_without_a_value_are_skipped() {
    let transport = ScriptedTransport::new();
    let mut map = record_map(&[("block", vec![root_page(1, "Root", &[2, 3])])]);
    map["block"][id(2)] = json!({"role": "none"});
    map["block"][id(3)] = json!({"role": "reader", "value": null});
    map["user_settings"] = json!({id(9): {"role": "editor", "value": {"id": id(9)}}});
    transport.enqueue_json(LOAD_CHUNK, chunk_with(map, &[]));
    let client = client(&transport);

    let set = load_document(&client, &nid(1)).await.unwrap();

    assert_eq!(set.block_count(), 1);
    assert!(set.is_skipped(&nid(2)));
    assert!(set.is_skipped(&nid(3)));
}

#[tokio::test]
async fn malformed_records_abort_the_load() {
    let transport = ScriptedTransport::new();
    let mut map = record_map(&[("block", vec![root_page(1, "Root", &[])])]);
    map["block"][id(2)] = json!({"role": "reader", "value": {"id": id(2), "type": "text", "version": "high"}});
    transport.enqueue_json(LOAD_CHUNK, chunk_with(map, &[]));
    let client = client(&transport);

    let err = load_document(&client, &nid(1)).await.unwrap_err();

    assert!(matches!(err, notion_pagegraph::AppError::Decode { .. }), "{:?}", err);
}
