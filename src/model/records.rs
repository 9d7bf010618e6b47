// src/model/records.rs
//! The smaller record kinds that travel alongside blocks in a record map.

use super::rich_text::deserialize_plain;
use super::{lenient_millis, nullable, optional_id, ParentTable};
use crate::types::NotionId;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: NotionId,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub alive: bool,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default, deserialize_with = "deserialize_plain")]
    pub text: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_edited_time: i64,
    #[serde(skip)]
    pub raw: Value,
}

impl Comment {
    pub fn creator_id(&self) -> Option<&str> {
        self.created_by_id.as_deref().or(self.created_by.as_deref())
    }
}

/// A thread of comments attached to a block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Discussion {
    pub id: NotionId,
    #[serde(default)]
    pub version: i64,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: Vec<NotionId>,
    #[serde(skip)]
    pub raw: Value,
}

/// A workspace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Space {
    pub id: NotionId,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub pages: Vec<NotionId>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub created_time: i64,
    #[serde(skip)]
    pub raw: Value,
}

impl Space {
    pub fn creator_id(&self) -> Option<&str> {
        self.created_by_id.as_deref().or(self.created_by.as_deref())
    }
}

/// A `notion_user` record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: NotionId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl User {
    /// "Given Family", falling back to whichever part exists, then the email.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Activity {
    pub id: NotionId,
    #[serde(default, deserialize_with = "optional_id")]
    pub space_id: Option<NotionId>,
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default, deserialize_with = "optional_id")]
    pub navigable_block_id: Option<NotionId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub collection_id: Option<NotionId>,
    /// Edit entries are kept raw; their shape varies by activity type.
    #[serde(default, deserialize_with = "nullable")]
    pub edits: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub start_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub invalid: bool,
    #[serde(skip)]
    pub raw: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_display_name() {
        let user: User = serde_json::from_value(json!({
            "id": "2e3d4c5a-9b0d-4f5e-8c3b-4a29a8f7e6d5",
            "given_name": "Ada",
            "family_name": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");

        let user: User = serde_json::from_value(json!({
            "id": "2e3d4c5a-9b0d-4f5e-8c3b-4a29a8f7e6d5",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "ada@example.com");
    }

    #[test]
    fn activity_times_accept_strings() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "2e3d4c5a-9b0d-4f5e-8c3b-4a29a8f7e6d5",
            "type": "block-edited",
            "start_time": "1551396420000",
            "end_time": 1551396480000i64,
            "edits": null
        }))
        .unwrap();
        assert_eq!(activity.start_time, Some(1551396420000));
        assert_eq!(activity.end_time, Some(1551396480000));
        assert!(activity.edits.is_empty());
    }

    #[test]
    fn space_and_comment_accept_both_author_fields() {
        let space: Space = serde_json::from_value(json!({
            "id": "bc202e06-6caa-4e3f-81eb-f226ab5deef7",
            "name": "Main",
            "created_by_table": "notion_user",
            "created_by_id": "bb760e2d-d679-4b64-b2a9-03005b21870a",
            "pages": ["381f674e-a6ce-4131-9d98-90967b1d3c14"]
        }))
        .unwrap();
        assert_eq!(space.creator_id(), Some("bb760e2d-d679-4b64-b2a9-03005b21870a"));
        assert_eq!(space.pages.len(), 1);

        let comment: Comment = serde_json::from_value(json!({
            "id": "2e3d4c5a-9b0d-4f5e-8c3b-4a29a8f7e6d5",
            "text": [["Looks good"]],
            "created_by": "bb760e2d-d679-4b64-b2a9-03005b21870a",
            "created_by_id": "bb760e2d-d679-4b64-b2a9-03005b21870a"
        }))
        .unwrap();
        assert_eq!(comment.creator_id(), Some("bb760e2d-d679-4b64-b2a9-03005b21870a"));
        assert_eq!(comment.text, "Looks good");
    }
}
