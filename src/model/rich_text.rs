// src/model/rich_text.rs
//! Minimal reader for Notion's span-encoded text.
//!
//! Text properties arrive as a list of spans, each span being
//! `[text, [[attr, value?], ...]?]`. Only two things are read here: the
//! concatenated plain text and the ids of inline page mentions (attribute
//! `p`, usually attached to the `‣` placeholder).

use crate::types::NotionId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Attribute tag marking a span as a page mention.
const PAGE_ATTR: &str = "p";

/// Concatenates the text of every span. Anything that isn't a span list
/// yields an empty string.
pub fn plain_text(spans: &Value) -> String {
    let mut out = String::new();
    if let Some(spans) = spans.as_array() {
        for span in spans {
            if let Some(text) = span.get(0).and_then(Value::as_str) {
                out.push_str(text);
            }
        }
    }
    out
}

/// Ids of the pages mentioned inline, in span order.
///
/// Malformed ids are ignored; a dangling mention must not fail the download.
pub fn page_references(spans: &Value) -> Vec<NotionId> {
    let mut ids = Vec::new();
    let Some(spans) = spans.as_array() else {
        return ids;
    };

    for span in spans {
        let Some(attrs) = span.get(1).and_then(Value::as_array) else {
            continue;
        };
        for attr in attrs {
            if attr.get(0).and_then(Value::as_str) != Some(PAGE_ATTR) {
                continue;
            }
            if let Some(Ok(id)) = attr.get(1).and_then(Value::as_str).map(NotionId::parse) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Serde adapter reading a span list (or a bare string) as plain text.
pub(crate) fn deserialize_plain<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(spans) => plain_text(&spans),
        None => String::new(),
    })
}
