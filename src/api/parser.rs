// src/api/parser.rs
//! Turns record wrappers into typed entities.
//!
//! The table tag always comes from the caller (the record-map key or the
//! table that was requested); payloads don't carry it themselves.

use super::responses::RecordMap;
use crate::error::{AppError, Result};
use crate::model::{
    Activity, Block, Collection, CollectionView, Comment, Discussion, Entity, Space, Table, User,
};
use crate::types::NotionId;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of decoding one record wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub table: Table,
    /// Access role reported by the server (`reader`, `editor`, `none`...).
    pub role: Option<String>,
    /// `None` when the server sent no value (deleted or inaccessible).
    pub entity: Option<Entity>,
}

macro_rules! decode_entity {
    ($variant:ident, $ty:ty, $table:expr, $payload:expr) => {{
        let mut record: $ty = decode_payload($table, $payload)?;
        record.raw = $payload.clone();
        Entity::$variant(Box::new(record))
    }};
}

/// Decodes a `{ "role", "value" }` wrapper, also accepting the doubly
/// wrapped shape `{ "value": { "role", "value" } }` used by chunk responses.
pub fn decode_record(table: Table, record: &Value) -> Result<DecodedRecord> {
    let (role, payload) = unwrap_record(table, record)?;

    let entity = match payload {
        None => None,
        Some(payload) => Some(match table {
            Table::Block => decode_entity!(Block, Block, table, payload),
            Table::Collection => decode_entity!(Collection, Collection, table, payload),
            Table::CollectionView => decode_entity!(CollectionView, CollectionView, table, payload),
            Table::Comment => decode_entity!(Comment, Comment, table, payload),
            Table::Discussion => decode_entity!(Discussion, Discussion, table, payload),
            Table::Space => decode_entity!(Space, Space, table, payload),
            Table::NotionUser => decode_entity!(User, User, table, payload),
            Table::Activity => decode_entity!(Activity, Activity, table, payload),
        }),
    };

    Ok(DecodedRecord {
        table,
        role,
        entity,
    })
}

/// Decodes every supported table of a record map.
///
/// Each record comes back paired with the id it was keyed under, so callers
/// can account for keys whose value was missing.
pub fn decode_record_map(record_map: &RecordMap) -> Result<Vec<(NotionId, DecodedRecord)>> {
    let mut decoded = Vec::new();

    for (table_name, records) in record_map {
        let Some(table) = Table::from_name(table_name) else {
            log::debug!("Ignoring {} record(s) of table '{}'", records.len(), table_name);
            continue;
        };

        for (key, record) in records {
            let id = NotionId::parse(key)
                .map_err(|e| AppError::decode(table, key.as_str(), e.to_string()))?;
            decoded.push((id, decode_record(table, record)?));
        }
    }

    Ok(decoded)
}

/// Peels the wrapper(s) off a record, returning the role and the payload.
fn unwrap_record(table: Table, record: &Value) -> Result<(Option<String>, Option<&Value>)> {
    let role_of = |v: &Value| v.get("role").and_then(Value::as_str).map(str::to_string);

    let mut role = role_of(record);
    let mut value = record.get("value");

    // A nested wrapper has a role and/or value of its own but no id.
    if let Some(inner) = value {
        if inner.is_object()
            && inner.get("id").is_none()
            && (inner.get("value").is_some() || inner.get("role").is_some())
        {
            role = role_of(inner).or(role);
            value = inner.get("value");
        }
    }

    match value {
        None | Some(Value::Null) => Ok((role, None)),
        Some(Value::Object(fields)) if fields.is_empty() => Ok((role, None)),
        Some(payload @ Value::Object(_)) => Ok((role, Some(payload))),
        Some(other) => Err(AppError::decode(
            table,
            "<unknown>",
            format!("record value is not an object: {}", other),
        )),
    }
}

fn decode_payload<T: DeserializeOwned>(table: Table, payload: &Value) -> Result<T> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        let id = payload
            .get("id")
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "<missing>".to_string());
        log::debug!("Failed to decode {} record '{}': {}", table, id, e);
        AppError::decode(table, id, e.to_string())
    })
}
