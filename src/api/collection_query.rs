// src/api/collection_query.rs
//! Materializes the rows behind every collection view block of a page.

use super::client::NotionClient;
use super::parser::decode_record_map;
use super::responses::QueryCollectionRequest;
use crate::error::{AppError, Result};
use crate::graph::{link_children, EntitySet, TableView};
use crate::model::Block;
use crate::types::NotionId;

/// Queries every view of every `collection_view` / `collection_view_page`
/// block in `set`, in block id order.
pub async fn materialize_table_views(
    client: &NotionClient,
    set: &EntitySet,
) -> Result<Vec<TableView>> {
    let mut views = Vec::new();

    for block_id in set.block_ids_sorted() {
        let Some(block) = set.block(&block_id) else {
            continue;
        };
        if !block.is_collection_view() {
            continue;
        }
        if block.view_ids.is_empty() {
            return Err(AppError::CollectionViewWithoutViews(block_id));
        }

        for view_id in &block.view_ids {
            views.push(query_view(client, set, block, view_id).await?);
        }
    }

    if !views.is_empty() {
        log::info!("Materialized {} table view(s)", views.len());
    }
    Ok(views)
}

async fn query_view(
    client: &NotionClient,
    set: &EntitySet,
    block: &Block,
    view_id: &NotionId,
) -> Result<TableView> {
    let view = set
        .collection_view(view_id)
        .ok_or_else(|| AppError::MissingCollectionView {
            block_id: block.id.clone(),
            view_id: view_id.clone(),
        })?;

    let collection_id = collection_id_of(block);
    let collection = collection_id
        .as_ref()
        .and_then(|id| set.collection(id))
        .ok_or_else(|| AppError::MissingCollection {
            block_id: block.id.clone(),
            collection_id: collection_id
                .as_ref()
                .map(NotionId::to_string)
                .unwrap_or_default(),
        })?;

    let request = QueryCollectionRequest::for_view(collection, view, block.space_id.as_ref());
    let response = client.query_collection(&request).await?;

    let mut rows_set = EntitySet::new();
    rows_set.absorb(decode_record_map(&response.record_map)?);
    link_children(&mut rows_set);

    let mut rows = Vec::with_capacity(response.result.row_ids().len());
    for row_id in response.result.row_ids() {
        let row = NotionId::parse(row_id)
            .ok()
            .and_then(|id| rows_set.block(&id))
            .ok_or_else(|| AppError::MissingRowBlock {
                view_id: view.id.clone(),
                row_id: row_id.clone(),
            })?;
        rows.push(row.clone());
    }

    log::debug!(
        "View {} of collection '{}': {} of {} row(s)",
        view.id,
        collection.name,
        rows.len(),
        response.result.total()
    );

    Ok(TableView::build(
        block.id.clone(),
        view,
        collection,
        rows,
        response.result.total(),
        response.result.aggregation_results.clone(),
    ))
}

/// The collection a view block shows. Newer payloads keep it in
/// `format.collection_pointer` instead of `collection_id`.
fn collection_id_of(block: &Block) -> Option<NotionId> {
    block.collection_id.clone().or_else(|| {
        block
            .format
            .as_ref()
            .and_then(|format| format.get("collection_pointer"))
            .and_then(|pointer| pointer.get("id"))
            .and_then(|id| id.as_str())
            .and_then(|id| NotionId::parse(id).ok())
    })
}
