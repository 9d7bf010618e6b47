// src/api/missing_refs.rs
//! Fetches blocks that are referenced but were never delivered.
//!
//! Chunk responses routinely leave out children and mentioned pages. Each
//! round asks `getRecordValues` for every still-unknown id; every requested
//! id ends the round either live or skipped, so the unknown set shrinks
//! until nothing is left.

use super::client::NotionClient;
use super::parser::decode_record;
use crate::error::Result;
use crate::graph::EntitySet;
use crate::model::rich_text::page_references;
use crate::model::{Block, Entity, Table};
use crate::types::NotionId;
use std::collections::{BTreeSet, HashSet};

/// What the fixpoint loop did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingReport {
    /// Rounds that had something to fetch.
    pub rounds: usize,
    pub requested: usize,
    pub admitted: usize,
    pub skipped: usize,
}

/// Ids referenced by live blocks that are neither live nor skipped, sorted.
///
/// Page blocks are not expanded: their content belongs to another page
/// (a sub-page or a link target), which this download doesn't walk into.
pub fn find_missing(set: &EntitySet) -> Vec<NotionId> {
    let mut missing = BTreeSet::new();

    for block in set.blocks() {
        if !block.alive || block.is_page() {
            continue;
        }

        let mentioned = block.property("title").map(page_references).unwrap_or_default();
        for id in block.content.iter().chain(mentioned.iter()) {
            if !set.is_known(id) {
                missing.insert(id.clone());
            }
        }
    }

    missing.into_iter().collect()
}

/// Fetches missing blocks in batches of at most `batch_size` until none
/// remain.
pub async fn resolve_missing(
    client: &NotionClient,
    set: &mut EntitySet,
    batch_size: usize,
) -> Result<MissingReport> {
    let batch_size = batch_size.max(1);
    let mut report = MissingReport::default();

    loop {
        let missing = find_missing(set);
        if missing.is_empty() {
            break;
        }
        report.rounds += 1;
        log::debug!(
            "{} missing block(s) in round {}",
            missing.len(),
            report.rounds
        );

        for batch in missing.chunks(batch_size) {
            report.requested += batch.len();
            let response = client.get_record_values(Table::Block, batch).await?;

            let mut delivered = HashSet::new();
            for (position, result) in response.results.iter().enumerate() {
                let decoded = decode_record(Table::Block, result)?;
                let Some(Entity::Block(block)) = decoded.entity else {
                    log::debug!(
                        "No value at position {} (expected {})",
                        position,
                        batch
                            .get(position)
                            .map(NotionId::to_string)
                            .unwrap_or_else(|| "-".to_string())
                    );
                    continue;
                };

                if !block.alive {
                    continue;
                }
                if !view_inside_page(set, &block) {
                    log::debug!("Block {} belongs to a view outside this page", block.id);
                    continue;
                }

                delivered.insert(block.id.clone());
                set.admit_block(*block);
                report.admitted += 1;
            }

            for id in batch {
                if !delivered.contains(id) && set.skip(id.clone()) {
                    report.skipped += 1;
                }
            }
        }
    }

    if report.rounds > 0 {
        log::info!(
            "Fetched missing blocks in {} round(s): {} requested, {} admitted, {} skipped",
            report.rounds,
            report.requested,
            report.admitted,
            report.skipped
        );
    }
    Ok(report)
}

/// Rows of a relation column can point at views of another page. A block
/// with views counts as inside only if one of them was loaded here.
fn view_inside_page(set: &EntitySet, block: &Block) -> bool {
    block.view_ids.is_empty()
        || block
            .view_ids
            .iter()
            .any(|view_id| set.collection_view(view_id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn find_missing_scans_content_and_mentions() {
        let mut set = EntitySet::new();
        set.admit_block(
            serde_json::from_value(json!({
                "id": "00000000000000000000000000000001",
                "type": "text",
                "alive": true,
                "content": ["00000000000000000000000000000003", "00000000000000000000000000000002"],
                "properties": {"title": [["‣", [["p", "00000000000000000000000000000004"]]]]}
            }))
            .unwrap(),
        );
        set.admit_block(
            serde_json::from_value(json!({
                "id": "00000000000000000000000000000005",
                "type": "page",
                "alive": true,
                "content": ["00000000000000000000000000000006"]
            }))
            .unwrap(),
        );
        set.skip(NotionId::parse("00000000000000000000000000000002").unwrap());

        let missing: Vec<String> = find_missing(&set).iter().map(NotionId::to_string).collect();
        assert_eq!(
            missing,
            vec![
                "00000000000000000000000000000003",
                "00000000000000000000000000000004"
            ]
        );
    }
}
