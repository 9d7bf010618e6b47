use crate::api::responses::AggregationResult;
use crate::model::rich_text::plain_text;
use crate::model::{Block, Collection, CollectionView};
use crate::types::NotionId;
use serde_json::Value;

/// A column shown by a table view.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    /// Property id in the collection schema (`title` for the name column).
    pub id: String,
    pub name: String,
    pub column_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// The row's page block, with its children linked.
    pub block: Block,
    /// Raw property value per column, `None` when the row has no value.
    pub cells: Vec<Option<Value>>,
}

impl TableRow {
    pub fn id(&self) -> &NotionId {
        &self.block.id
    }

    /// Plain text of a cell; empty for missing or non-text values.
    pub fn cell_text(&self, column: usize) -> String {
        self.cells
            .get(column)
            .and_then(Option::as_ref)
            .map(plain_text)
            .unwrap_or_default()
    }
}

/// The materialized result of querying one view of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// The `collection_view` block hosting the view.
    pub block_id: NotionId,
    pub view_id: NotionId,
    pub collection_id: NotionId,
    pub view_name: String,
    pub collection_name: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// Matching rows on the server; may exceed `rows.len()`.
    pub total: u64,
    pub aggregations: Vec<AggregationResult>,
}

impl TableView {
    /// Lays out `rows` under the columns of `view`.
    ///
    /// Columns follow the view's visible `table_properties` order; a view
    /// without one shows the whole schema in schema order.
    pub fn build(
        block_id: NotionId,
        view: &CollectionView,
        collection: &Collection,
        rows: Vec<Block>,
        total: u64,
        aggregations: Vec<AggregationResult>,
    ) -> Self {
        let visible = view.visible_columns();
        let column_ids: Vec<&str> = if visible.is_empty() {
            collection.schema.keys().map(String::as_str).collect()
        } else {
            visible
        };

        let columns: Vec<TableColumn> = column_ids
            .into_iter()
            .filter_map(|id| {
                collection.schema.get(id).map(|schema| TableColumn {
                    id: id.to_string(),
                    name: schema.name.clone(),
                    column_type: schema.column_type.clone(),
                })
            })
            .collect();

        let rows = rows
            .into_iter()
            .map(|block| {
                let cells = columns
                    .iter()
                    .map(|column| block.property(&column.id).cloned())
                    .collect();
                TableRow { block, cells }
            })
            .collect();

        TableView {
            block_id,
            view_id: view.id.clone(),
            collection_id: collection.id.clone(),
            view_name: view.name.clone(),
            collection_name: collection.name.clone(),
            columns,
            rows,
            total,
            aggregations,
        }
    }
}
