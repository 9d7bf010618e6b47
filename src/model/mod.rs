mod block;
mod collection;
pub mod properties;
mod records;
pub mod rich_text;

pub use block::{Block, BlockType};
pub use collection::{Collection, CollectionView, ColumnSchema, TableProperty, ViewFormat, ViewQuery};
pub use properties::DisplayFields;
pub use records::{Activity, Comment, Discussion, Space, User};

use crate::types::NotionId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Record kind tag, as used for record-map keys and `getRecordValues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Block,
    Collection,
    CollectionView,
    Comment,
    Discussion,
    Space,
    NotionUser,
    Activity,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Block,
        Table::Collection,
        Table::CollectionView,
        Table::Comment,
        Table::Discussion,
        Table::Space,
        Table::NotionUser,
        Table::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Block => "block",
            Table::Collection => "collection",
            Table::CollectionView => "collection_view",
            Table::Comment => "comment",
            Table::Discussion => "discussion",
            Table::Space => "space",
            Table::NotionUser => "notion_user",
            Table::Activity => "activity",
        }
    }

    /// Maps a record-map key to a table; tables this crate doesn't model
    /// (`user_root`, `user_settings`, ...) map to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Table::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `parent_table` of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParentTable {
    Block,
    Space,
    Collection,
    Other(String),
}

impl Default for ParentTable {
    fn default() -> Self {
        ParentTable::Other(String::new())
    }
}

impl From<String> for ParentTable {
    fn from(name: String) -> Self {
        match name.as_str() {
            "block" => ParentTable::Block,
            "space" => ParentTable::Space,
            "collection" => ParentTable::Collection,
            _ => ParentTable::Other(name),
        }
    }
}

impl From<ParentTable> for String {
    fn from(table: ParentTable) -> Self {
        match table {
            ParentTable::Block => "block".to_string(),
            ParentTable::Space => "space".to_string(),
            ParentTable::Collection => "collection".to_string(),
            ParentTable::Other(name) => name,
        }
    }
}

/// A decoded record of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Block(Box<Block>),
    Collection(Box<Collection>),
    CollectionView(Box<CollectionView>),
    Comment(Box<Comment>),
    Discussion(Box<Discussion>),
    Space(Box<Space>),
    User(Box<User>),
    Activity(Box<Activity>),
}

impl Entity {
    pub fn id(&self) -> &NotionId {
        match self {
            Entity::Block(b) => &b.id,
            Entity::Collection(c) => &c.id,
            Entity::CollectionView(v) => &v.id,
            Entity::Comment(c) => &c.id,
            Entity::Discussion(d) => &d.id,
            Entity::Space(s) => &s.id,
            Entity::User(u) => &u.id,
            Entity::Activity(a) => &a.id,
        }
    }

    pub fn table(&self) -> Table {
        match self {
            Entity::Block(_) => Table::Block,
            Entity::Collection(_) => Table::Collection,
            Entity::CollectionView(_) => Table::CollectionView,
            Entity::Comment(_) => Table::Comment,
            Entity::Discussion(_) => Table::Discussion,
            Entity::Space(_) => Table::Space,
            Entity::User(_) => Table::NotionUser,
            Entity::Activity(_) => Table::Activity,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde adapters shared by the record types
// ---------------------------------------------------------------------------

/// Treats an explicit `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional id where `null` and `""` both mean absent.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<NotionId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.is_empty() => NotionId::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Millisecond timestamp sent either as a number or a numeric string.
pub(crate) fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(i64),
        Text(String),
    }

    match Option::<Millis>::deserialize(deserializer)? {
        Some(Millis::Number(n)) => Ok(Some(n)),
        Some(Millis::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
