use super::properties::DisplayFields;
use super::{nullable, optional_id, ParentTable};
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of a block, as named by the `type` field.
///
/// Unknown names survive in [`BlockType::Other`] so new Notion block kinds
/// don't break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Page,
    Text,
    Header,
    SubHeader,
    SubSubHeader,
    Todo,
    Toggle,
    BulletedList,
    NumberedList,
    Quote,
    Callout,
    Code,
    Equation,
    Divider,
    Image,
    Video,
    Audio,
    File,
    Pdf,
    Bookmark,
    Embed,
    Gist,
    Tweet,
    Maps,
    Drive,
    Figma,
    Codepen,
    Column,
    ColumnList,
    CollectionView,
    CollectionViewPage,
    TableOfContents,
    Breadcrumb,
    Factory,
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Page => "page",
            BlockType::Text => "text",
            BlockType::Header => "header",
            BlockType::SubHeader => "sub_header",
            BlockType::SubSubHeader => "sub_sub_header",
            BlockType::Todo => "to_do",
            BlockType::Toggle => "toggle",
            BlockType::BulletedList => "bulleted_list",
            BlockType::NumberedList => "numbered_list",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Equation => "equation",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
            BlockType::File => "file",
            BlockType::Pdf => "pdf",
            BlockType::Bookmark => "bookmark",
            BlockType::Embed => "embed",
            BlockType::Gist => "gist",
            BlockType::Tweet => "tweet",
            BlockType::Maps => "maps",
            BlockType::Drive => "drive",
            BlockType::Figma => "figma",
            BlockType::Codepen => "codepen",
            BlockType::Column => "column",
            BlockType::ColumnList => "column_list",
            BlockType::CollectionView => "collection_view",
            BlockType::CollectionViewPage => "collection_view_page",
            BlockType::TableOfContents => "table_of_contents",
            BlockType::Breadcrumb => "breadcrumb",
            BlockType::Factory => "factory",
            BlockType::Other(name) => name,
        }
    }

    /// Types whose `title` property carries their visible text.
    pub fn has_title(&self) -> bool {
        matches!(
            self,
            BlockType::Page
                | BlockType::Text
                | BlockType::Header
                | BlockType::SubHeader
                | BlockType::SubSubHeader
                | BlockType::Todo
                | BlockType::Toggle
                | BlockType::BulletedList
                | BlockType::NumberedList
                | BlockType::Quote
                | BlockType::Callout
                | BlockType::Code
                | BlockType::Equation
                | BlockType::Bookmark
                | BlockType::File
                | BlockType::Factory
        )
    }

    /// Media and embed types that point at external content.
    pub fn is_embedded(&self) -> bool {
        matches!(
            self,
            BlockType::Image
                | BlockType::Video
                | BlockType::Audio
                | BlockType::File
                | BlockType::Pdf
                | BlockType::Bookmark
                | BlockType::Embed
                | BlockType::Gist
                | BlockType::Tweet
                | BlockType::Maps
                | BlockType::Drive
                | BlockType::Figma
                | BlockType::Codepen
        )
    }

    pub fn is_collection_view(&self) -> bool {
        matches!(self, BlockType::CollectionView | BlockType::CollectionViewPage)
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "page" => BlockType::Page,
            "text" => BlockType::Text,
            "header" => BlockType::Header,
            "sub_header" => BlockType::SubHeader,
            "sub_sub_header" => BlockType::SubSubHeader,
            "to_do" => BlockType::Todo,
            "toggle" => BlockType::Toggle,
            "bulleted_list" => BlockType::BulletedList,
            "numbered_list" => BlockType::NumberedList,
            "quote" => BlockType::Quote,
            "callout" => BlockType::Callout,
            "code" => BlockType::Code,
            "equation" => BlockType::Equation,
            "divider" => BlockType::Divider,
            "image" => BlockType::Image,
            "video" => BlockType::Video,
            "audio" => BlockType::Audio,
            "file" => BlockType::File,
            "pdf" => BlockType::Pdf,
            "bookmark" => BlockType::Bookmark,
            "embed" => BlockType::Embed,
            "gist" => BlockType::Gist,
            "tweet" => BlockType::Tweet,
            "maps" => BlockType::Maps,
            "drive" => BlockType::Drive,
            "figma" => BlockType::Figma,
            "codepen" => BlockType::Codepen,
            "column" => BlockType::Column,
            "column_list" => BlockType::ColumnList,
            "collection_view" => BlockType::CollectionView,
            "collection_view_page" => BlockType::CollectionViewPage,
            "table_of_contents" => BlockType::TableOfContents,
            "breadcrumb" => BlockType::Breadcrumb,
            "factory" => BlockType::Factory,
            _ => BlockType::Other(name),
        }
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block record.
///
/// The decoded fields mirror the payload. `display`, `children`, `parent`
/// and `resolved` are filled in by the graph resolver; `raw` keeps the
/// payload exactly as received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Block {
    pub id: NotionId,
    #[serde(default)]
    pub alive: bool,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub version: i64,
    /// Ordered child ids as stored on the server.
    #[serde(default, deserialize_with = "nullable")]
    pub content: Vec<NotionId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<NotionId>,
    #[serde(default)]
    pub parent_table: ParentTable,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub format: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub view_ids: Vec<NotionId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub collection_id: Option<NotionId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub space_id: Option<NotionId>,
    #[serde(default, rename = "discussion", deserialize_with = "nullable")]
    pub discussion_ids: Vec<NotionId>,
    #[serde(default, deserialize_with = "nullable")]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_edited_time: i64,
    /// Legacy author field; newer payloads carry `created_by_id` too.
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub last_edited_by: Option<String>,
    #[serde(default)]
    pub last_edited_by_id: Option<String>,

    #[serde(skip)]
    pub display: DisplayFields,
    /// Content ids that resolved to live blocks, in content order.
    #[serde(skip)]
    pub children: Vec<NotionId>,
    #[serde(skip)]
    pub parent: Option<NotionId>,
    #[serde(skip)]
    pub resolved: bool,
    #[serde(skip)]
    pub raw: Value,
}

impl Block {
    /// Looks up a raw property bag entry.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Plain-text title, available after resolution.
    pub fn title(&self) -> &str {
        &self.display.title
    }

    pub fn is_page(&self) -> bool {
        self.block_type == BlockType::Page
    }

    /// A page that lives directly in a space is shown as a link, not embedded.
    pub fn is_link_to_page(&self) -> bool {
        self.is_page() && self.parent_table == ParentTable::Space
    }

    pub fn is_collection_view(&self) -> bool {
        self.block_type.is_collection_view()
    }

    /// Id of the user who created the block, preferring `created_by_id`.
    pub fn creator_id(&self) -> Option<&str> {
        self.created_by_id.as_deref().or(self.created_by.as_deref())
    }

    pub fn last_editor_id(&self) -> Option<&str> {
        self.last_edited_by_id
            .as_deref()
            .or(self.last_edited_by.as_deref())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_time)
    }

    pub fn last_edited_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_edited_time)
    }
}
