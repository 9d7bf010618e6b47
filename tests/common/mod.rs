// tests/common/mod.rs
//! Shared fixtures: a scripted transport and record builders.
#![allow(dead_code)]

use notion_pagegraph::api::{HttpRequest, RawResponse, Transport};
use notion_pagegraph::config::ClientConfig;
use notion_pagegraph::{AppError, NotionClient, NotionId};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

pub const LOAD_CHUNK: &str = "loadCachedPageChunk";
pub const RECORD_VALUES: &str = "getRecordValues";
pub const QUERY_COLLECTION: &str = "queryCollection";

/// Answers requests from per-endpoint queues. Once the `getRecordValues`
/// queue is empty, block lookups fall back to the `store`.
#[derive(Default)]
pub struct ScriptedTransport {
    queues: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    store: Mutex<HashMap<String, Value>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, endpoint: &str, response: RawResponse) {
        self.queues
            .lock()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn enqueue_json(&self, endpoint: &str, body: Value) {
        self.enqueue(endpoint, RawResponse::ok(body.to_string()));
    }

    /// Makes `value` available to `getRecordValues` lookups by id.
    pub fn store(&self, value: Value) {
        let id = value["id"].as_str().unwrap_or_default().replace('-', "");
        self.store.lock().insert(id, value);
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().clone()
    }

    /// Requests sent to one endpoint, with parsed bodies.
    pub fn bodies(&self, endpoint: &str) -> Vec<Value> {
        self.sent
            .lock()
            .iter()
            .filter(|request| request.url.ends_with(endpoint))
            .map(|request| serde_json::from_str(&request.body).unwrap())
            .collect()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.bodies(endpoint).len()
    }

    fn answer_from_store(&self, body: &str) -> Option<RawResponse> {
        let body: Value = serde_json::from_str(body).ok()?;
        let store = self.store.lock();
        let results: Vec<Value> = body["requests"]
            .as_array()?
            .iter()
            .map(|request| {
                let id = request["id"].as_str().unwrap_or_default().replace('-', "");
                match store.get(&id) {
                    Some(value) => json!({"role": "reader", "value": value}),
                    None => json!({"role": "none"}),
                }
            })
            .collect();
        Some(RawResponse::ok(json!({ "results": results }).to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> notion_pagegraph::Result<RawResponse> {
        self.sent.lock().push(request.clone());

        let endpoint = request.url.rsplit('/').next().unwrap_or_default().to_string();
        if let Some(response) = self
            .queues
            .lock()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
        {
            return Ok(response);
        }
        if endpoint == RECORD_VALUES {
            if let Some(response) = self.answer_from_store(&request.body) {
                return Ok(response);
            }
        }
        Err(AppError::NetworkFailure(format!(
            "no scripted response for {}",
            endpoint
        )))
    }
}

/// Client config without pacing or backoff waits.
pub fn fast_config() -> ClientConfig {
    ClientConfig {
        min_request_interval: Duration::ZERO,
        rate_limit_backoff: vec![Duration::ZERO; 3],
        ..ClientConfig::default()
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> NotionClient {
    NotionClient::with_transport(fast_config(), transport.clone())
}

/// The `n`th test id, as 32 hex characters.
pub fn id(n: u32) -> String {
    format!("{:032x}", n)
}

pub fn nid(n: u32) -> NotionId {
    NotionId::parse(&id(n)).unwrap()
}

/// A live block of `block_type` under block `parent`.
pub fn block(n: u32, block_type: &str, parent: u32, content: &[u32]) -> Value {
    json!({
        "id": id(n),
        "type": block_type,
        "alive": true,
        "version": 1,
        "parent_id": id(parent),
        "parent_table": "block",
        "content": content.iter().map(|c| id(*c)).collect::<Vec<_>>(),
    })
}

/// A live top-level page in a space.
pub fn root_page(n: u32, title: &str, content: &[u32]) -> Value {
    json!({
        "id": id(n),
        "type": "page",
        "alive": true,
        "version": 1,
        "parent_id": id(999),
        "parent_table": "space",
        "space_id": id(999),
        "content": content.iter().map(|c| id(*c)).collect::<Vec<_>>(),
        "properties": {"title": [[title]]},
    })
}

pub fn with_title(mut value: Value, title: &str) -> Value {
    value["properties"] = json!({"title": [[title]]});
    value
}

/// A record map holding `values` under `table`, keyed by their ids.
pub fn record_map(tables: &[(&str, Vec<Value>)]) -> Value {
    let mut map = Map::new();
    for (table, values) in tables {
        let mut records = Map::new();
        for value in values {
            let key = value["id"].as_str().unwrap_or_default().to_string();
            records.insert(key, json!({"role": "reader", "value": value}));
        }
        map.insert(table.to_string(), Value::Object(records));
    }
    Value::Object(map)
}

/// A `loadCachedPageChunk` body. A non-empty `cursor_ids` continues the walk.
pub fn chunk(blocks: Vec<Value>, cursor_ids: &[u32]) -> Value {
    chunk_with(record_map(&[("block", blocks)]), cursor_ids)
}

pub fn chunk_with(record_map: Value, cursor_ids: &[u32]) -> Value {
    let stack: Vec<Value> = if cursor_ids.is_empty() {
        Vec::new()
    } else {
        vec![json!(cursor_ids
            .iter()
            .map(|n| json!({"table": "block", "id": id(*n), "index": 0}))
            .collect::<Vec<_>>())]
    };
    json!({"recordMap": record_map, "cursor": {"stack": stack}})
}

/// Queues the root fetch answer for `root`.
pub fn script_root_fetch(transport: &ScriptedTransport, root: &Value) {
    transport.enqueue_json(
        RECORD_VALUES,
        json!({"results": [{"role": "reader", "value": root}]}),
    );
}
