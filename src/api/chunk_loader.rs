// src/api/chunk_loader.rs
//! Cursor-driven download of a page's initial record set.

use super::client::NotionClient;
use super::parser::decode_record_map;
use super::responses::Cursor;
use crate::constants::{FIRST_CHUNK_LIMIT, NEXT_CHUNK_LIMIT};
use crate::error::Result;
use crate::graph::EntitySet;
use crate::types::NotionId;

/// Loads every chunk of `root_id` into a fresh entity set.
pub async fn load_document(client: &NotionClient, root_id: &NotionId) -> Result<EntitySet> {
    let mut set = EntitySet::for_root(root_id.clone());
    load_chunks_into(client, root_id, &mut set).await?;
    Ok(set)
}

/// Requests chunks until the server returns an empty cursor, merging each
/// record map into `set`. Returns the number of chunks fetched.
///
/// The loop has no iteration cap; it ends when the server says so.
pub async fn load_chunks_into(
    client: &NotionClient,
    root_id: &NotionId,
    set: &mut EntitySet,
) -> Result<u32> {
    let mut cursor = Cursor::default();
    let mut chunk_number = 0u32;

    loop {
        let limit = if chunk_number == 0 {
            FIRST_CHUNK_LIMIT
        } else {
            NEXT_CHUNK_LIMIT
        };

        let response = client
            .load_page_chunk(root_id, chunk_number, limit, cursor)
            .await?;
        chunk_number += 1;

        let records = decode_record_map(&response.record_map)?;
        log::debug!(
            "Chunk {} of {}: {} record(s)",
            chunk_number,
            root_id,
            records.len()
        );
        set.absorb(records);

        if response.cursor.is_exhausted() {
            break;
        }
        cursor = response.cursor;
    }

    log::info!(
        "Loaded {} chunk(s) of {}: {} live block(s), {} skipped",
        chunk_number,
        root_id,
        set.block_count(),
        set.skipped_count()
    );
    Ok(chunk_number)
}
