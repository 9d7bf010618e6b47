use super::rich_text::deserialize_plain;
use super::{nullable, optional_id, ParentTable};
use crate::types::NotionId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A database: its name and column schema. Rows are ordinary blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Collection {
    pub id: NotionId,
    #[serde(default)]
    pub version: i64,
    #[serde(default, deserialize_with = "deserialize_plain")]
    pub name: String,
    /// Column id to definition, in payload order.
    #[serde(default, deserialize_with = "nullable")]
    pub schema: IndexMap<String, ColumnSchema>,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default)]
    pub alive: bool,
    #[serde(default, deserialize_with = "optional_id")]
    pub space_id: Option<NotionId>,
    #[serde(skip)]
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub options: Vec<Value>,
}

/// One saved view (table, board, list...) over a collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionView {
    pub id: NotionId,
    #[serde(default)]
    pub version: i64,
    #[serde(rename = "type", default)]
    pub view_type: String,
    #[serde(default, deserialize_with = "deserialize_plain")]
    pub name: String,
    #[serde(default)]
    pub alive: bool,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default)]
    pub format: Option<ViewFormat>,
    #[serde(default)]
    pub query2: Option<ViewQuery>,
    #[serde(default, deserialize_with = "nullable")]
    pub page_sort: Vec<NotionId>,
    #[serde(skip)]
    pub raw: Value,
}

impl CollectionView {
    /// Visible column ids in the order the view shows them.
    pub fn visible_columns(&self) -> Vec<&str> {
        self.format
            .as_ref()
            .map(|format| {
                format
                    .table_properties
                    .iter()
                    .filter(|p| p.visible)
                    .map(|p| p.property.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewFormat {
    #[serde(default, deserialize_with = "nullable")]
    pub table_properties: Vec<TableProperty>,
    #[serde(default)]
    pub table_wrap: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableProperty {
    pub property: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub width: Option<u32>,
}

fn default_visible() -> bool {
    true
}

/// Stored query of a view, replayed verbatim by `queryCollection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default, deserialize_with = "nullable")]
    pub sort: Vec<Value>,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub aggregations: Vec<Value>,
}
