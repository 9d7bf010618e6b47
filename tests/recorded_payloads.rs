// tests/recorded_payloads.rs
//! Decoding and loading real `api/v3` responses captured from the server.

mod common;

use common::*;
use notion_pagegraph::api::responses::{GetRecordValuesResponse, LoadPageChunkResponse};
use notion_pagegraph::api::{decode_record, decode_record_map, load_document, RawResponse};
use notion_pagegraph::config::DownloadOptions;
use notion_pagegraph::model::{BlockType, Entity, ParentTable, Table};
use notion_pagegraph::{EntitySet, NotionId, PageDownloader, PageKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const LOAD_CACHED_PAGE_CHUNK: &str = include_str!("fixtures/load_cached_page_chunk.json");
const GET_RECORD_VALUES: &str = include_str!("fixtures/get_record_values.json");
const SYNC_RECORD_VALUES: &str = include_str!("fixtures/sync_record_values.json");

const ROOT: &str = "568ac4c0-64c3-4ef6-a6ad-0b8d77230681";
const SPACE: &str = "bc202e06-6caa-4e3f-81eb-f226ab5deef7";
const AUTHOR: &str = "bb760e2d-d679-4b64-b2a9-03005b21870a";

fn notion_id(s: &str) -> NotionId {
    NotionId::parse(s).unwrap()
}

fn chunk_set() -> EntitySet {
    let response: LoadPageChunkResponse = serde_json::from_str(LOAD_CACHED_PAGE_CHUNK).unwrap();
    assert!(response.cursor.is_exhausted());
    let mut set = EntitySet::for_root(notion_id(ROOT));
    set.absorb(decode_record_map(&response.record_map).unwrap());
    set
}

#[test]
fn decodes_a_recorded_page_chunk() {
    let set = chunk_set();

    assert_eq!(set.block_count(), 5);
    assert_eq!(set.skipped_count(), 0);

    let root = set.block(&notion_id(ROOT)).unwrap();
    assert!(root.alive);
    assert_eq!(root.block_type, BlockType::Page);
    assert_eq!(root.version, 423);
    assert_eq!(root.content.len(), 4);
    assert_eq!(root.parent_id, Some(notion_id(SPACE)));
    assert_eq!(root.parent_table, ParentTable::Space);
    assert_eq!(root.creator_id(), Some(AUTHOR));
    assert_eq!(root.last_editor_id(), Some(AUTHOR));
    assert_eq!(root.format.as_ref().unwrap()["page_full_width"], json!(true));

    let text = set
        .block(&notion_id("aea20e01-890c-4874-ae08-4557d7789195"))
        .unwrap();
    assert_eq!(text.block_type, BlockType::Text);
    assert_eq!(text.version, 48);
    assert_eq!(text.content.len(), 2);
    assert_eq!(text.parent_id, Some(notion_id(ROOT)));
    assert_eq!(text.space_id, Some(notion_id(SPACE)));

    // Only the `_id` author fields are present on this one.
    let diary = set
        .block(&notion_id("30da6655-040f-47e6-93f8-e66eacd308c1"))
        .unwrap();
    assert_eq!(diary.file_ids.len(), 2);
    assert_eq!(diary.file_ids[1], "56c80314-5a27-4407-8980-bbc4a1a9929d");
    assert_eq!(diary.created_by, None);
    assert_eq!(diary.creator_id(), Some(AUTHOR));

    let space = set.space(&notion_id(SPACE)).unwrap();
    assert_eq!(space.name, "Main");
    assert_eq!(space.version, 346);
    assert_eq!(space.pages.len(), 3);
    assert_eq!(space.creator_id(), Some(AUTHOR));
}

#[test]
fn decodes_recorded_record_values() {
    let response: GetRecordValuesResponse = serde_json::from_str(GET_RECORD_VALUES).unwrap();
    assert_eq!(response.results.len(), 1);

    let decoded = decode_record(Table::Block, &response.results[0]).unwrap();
    assert_eq!(decoded.role.as_deref(), Some("reader"));
    match decoded.entity {
        Some(Entity::Block(block)) => {
            assert!(block.alive);
            assert_eq!(block.block_type, BlockType::Page);
            assert_eq!(block.version, 34);
            assert_eq!(
                block.parent_id,
                Some(notion_id("300db9dc-27c8-4958-a08b-8d0c37f4cfe5"))
            );
            assert_eq!(block.creator_id(), Some(AUTHOR));
        }
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn decodes_a_recorded_single_wrapped_record_map() {
    let response: LoadPageChunkResponse = serde_json::from_str(SYNC_RECORD_VALUES).unwrap();
    let records = decode_record_map(&response.record_map).unwrap();
    assert_eq!(records.len(), 1);

    let (key, decoded) = &records[0];
    assert_eq!(*key, notion_id("c3039398-9ae5-49c3-a39f-21ca5a681d72"));
    match &decoded.entity {
        Some(Entity::Block(block)) => {
            assert_eq!(block.block_type, BlockType::Page);
            assert_eq!(block.content.len(), 3);
            assert_eq!(block.format.as_ref().unwrap()["page_full_width"], json!(true));
            assert_eq!(block.creator_id(), Some(AUTHOR));
        }
        other => panic!("expected a block, got {:?}", other),
    }
}

#[tokio::test]
async fn chunk_loader_accepts_a_recorded_response() {
    let transport = ScriptedTransport::new();
    transport.enqueue(LOAD_CHUNK, RawResponse::ok(LOAD_CACHED_PAGE_CHUNK));

    let set = load_document(&client(&transport), &notion_id(ROOT)).await.unwrap();

    assert_eq!(set.block_count(), 5);
    assert!(set.space(&notion_id(SPACE)).is_some());
    assert_eq!(transport.count(LOAD_CHUNK), 1);
}

#[tokio::test]
async fn downloads_a_recorded_page() {
    let fixture: Value = serde_json::from_str(LOAD_CACHED_PAGE_CHUNK).unwrap();
    let root_record = fixture["recordMap"]["block"][ROOT]["value"].clone();

    let transport = ScriptedTransport::new();
    transport.enqueue_json(RECORD_VALUES, json!({ "results": [root_record] }));
    transport.enqueue(LOAD_CHUNK, RawResponse::ok(LOAD_CACHED_PAGE_CHUNK));
    let downloader = PageDownloader::new(client(&transport), DownloadOptions::default());

    let page = downloader.download_page(&notion_id(ROOT)).await.unwrap();

    assert_eq!(page.root().map(|b| b.title()), Some("Website"));
    assert_eq!(page.page_kind(&notion_id(ROOT)), Some(PageKind::TopLevel));
    // Only one of the root's four content ids was delivered.
    let children: Vec<NotionId> = page
        .children_of(&notion_id(ROOT))
        .iter()
        .map(|b| b.id.clone())
        .collect();
    assert_eq!(children, vec![notion_id("30da6655-040f-47e6-93f8-e66eacd308c1")]);
    assert_eq!(
        page.page_kind(&notion_id("30da6655-040f-47e6-93f8-e66eacd308c1")),
        Some(PageKind::SubPage)
    );
    // Pages parented by the root but absent from its content are links.
    assert_eq!(
        page.page_kind(&notion_id("d61b4f94-b10d-4d80-8d3d-238a4e7c4d10")),
        Some(PageKind::Link)
    );

    // The text block's two children were chased and came back empty.
    assert!(page
        .entities()
        .is_skipped(&notion_id("6f70163e-a5b8-4ba9-928a-faa2e45d1f51")));
    assert!(page
        .entities()
        .is_skipped(&notion_id("ed055f63-753e-42ef-9025-e11ac9062c35")));
}
