// src/api/responses.rs
//! Request and response bodies of the `api/v3` endpoints.
//!
//! Records inside a record map stay as raw JSON here; turning them into
//! typed entities is the parser's job.

use crate::constants::{DEFAULT_USER_TIME_ZONE, QUERY_RESULTS_LIMIT};
use crate::model::{Collection, CollectionView, Table};
use crate::types::NotionId;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `table -> id -> record wrapper`, in the order the server sent them.
pub type RecordMap = IndexMap<String, IndexMap<String, Value>>;

/// Reads a record map, dropping entries that aren't tables, such as the
/// `"__version__": 3` marker.
fn deserialize_record_map<'de, D>(deserializer: D) -> Result<RecordMap, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut tables = RecordMap::new();
    for (name, value) in entries {
        match value {
            Value::Object(records) => {
                tables.insert(name, records.into_iter().collect());
            }
            other => log::debug!("Ignoring non-table record map entry '{}': {}", name, other),
        }
    }
    Ok(tables)
}

/// Pagination cursor of `loadCachedPageChunk`, handed back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub stack: Vec<Vec<CursorPosition>>,
}

impl Cursor {
    /// An empty stack means the server has nothing more to send.
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub table: String,
    pub id: String,
    pub index: u32,
    /// Fields this client doesn't know about, preserved for the round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReference {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkRequest {
    pub page: PageReference,
    pub limit: u32,
    pub cursor: Cursor,
    pub chunk_number: u32,
    pub vertical_columns: bool,
}

impl LoadPageChunkRequest {
    pub fn new(page_id: &NotionId, chunk_number: u32, limit: u32, cursor: Cursor) -> Self {
        Self {
            page: PageReference {
                id: page_id.to_hyphenated(),
            },
            limit,
            cursor,
            chunk_number,
            vertical_columns: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkResponse {
    #[serde(default, deserialize_with = "deserialize_record_map")]
    pub record_map: RecordMap,
    #[serde(default)]
    pub cursor: Cursor,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordRequest {
    pub table: Table,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetRecordValuesRequest {
    pub requests: Vec<RecordRequest>,
}

impl GetRecordValuesRequest {
    pub fn new(table: Table, ids: &[NotionId]) -> Self {
        Self {
            requests: ids
                .iter()
                .map(|id| RecordRequest {
                    table,
                    id: id.to_hyphenated(),
                })
                .collect(),
        }
    }
}

/// One result per requested id, positionally. Results for inaccessible or
/// deleted records carry no `value`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetRecordValuesResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPointer {
    pub id: String,
    pub space_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reducer {
    #[serde(rename = "type")]
    pub reducer_type: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLoader {
    #[serde(rename = "type")]
    pub loader_type: String,
    pub reducers: IndexMap<String, Reducer>,
    pub sort: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    pub search_query: String,
    pub user_time_zone: String,
}

/// Reducer key under which row ids are requested and returned.
pub const COLLECTION_GROUP_RESULTS: &str = "collection_group_results";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCollectionRequest {
    pub collection: RecordPointer,
    pub collection_view: RecordPointer,
    pub loader: QueryLoader,
}

impl QueryCollectionRequest {
    /// Builds the reducer query replaying the view's stored sort and filter.
    pub fn for_view(collection: &Collection, view: &CollectionView, space_id: Option<&NotionId>) -> Self {
        let space_id = space_id
            .or(collection.space_id.as_ref())
            .map(NotionId::to_hyphenated)
            .unwrap_or_default();
        let query = view.query2.clone().unwrap_or_default();

        let mut reducers = IndexMap::new();
        reducers.insert(
            COLLECTION_GROUP_RESULTS.to_string(),
            Reducer {
                reducer_type: "results".to_string(),
                limit: QUERY_RESULTS_LIMIT,
            },
        );

        Self {
            collection: RecordPointer {
                id: collection.id.to_hyphenated(),
                space_id: space_id.clone(),
            },
            collection_view: RecordPointer {
                id: view.id.to_hyphenated(),
                space_id,
            },
            loader: QueryLoader {
                loader_type: "reducer".to_string(),
                reducers,
                sort: query.sort,
                filter: query.filter,
                search_query: String::new(),
                user_time_zone: DEFAULT_USER_TIME_ZONE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCollectionResponse {
    #[serde(default, deserialize_with = "deserialize_record_map")]
    pub record_map: RecordMap,
    #[serde(default)]
    pub result: QueryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(rename = "type", default)]
    pub result_type: String,
    /// Older response shape: rows listed directly on the result.
    #[serde(default)]
    pub block_ids: Vec<String>,
    #[serde(default)]
    pub aggregation_results: Vec<AggregationResult>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub reducer_results: Option<ReducerResults>,
}

impl QueryResult {
    /// Row ids from the reducer results, falling back to the older shape.
    pub fn row_ids(&self) -> &[String] {
        match self
            .reducer_results
            .as_ref()
            .and_then(|r| r.collection_group_results.as_ref())
        {
            Some(group) => &group.block_ids,
            None => &self.block_ids,
        }
    }

    /// Total number of matching rows, which may exceed the rows returned.
    pub fn total(&self) -> u64 {
        self.reducer_results
            .as_ref()
            .and_then(|r| r.collection_group_results.as_ref())
            .map(|group| group.total)
            .or(self.total)
            .unwrap_or(self.row_ids().len() as u64)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReducerResults {
    #[serde(default)]
    pub collection_group_results: Option<GroupResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResults {
    #[serde(rename = "type", default)]
    pub group_type: String,
    #[serde(default)]
    pub block_ids: Vec<String>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub id: String,
    #[serde(default)]
    pub value: Value,
}
