// src/model/properties.rs
//! Presentation fields derived from a block's property bag.

use super::block::BlockType;
use super::rich_text::plain_text;
use serde::Serialize;
use serde_json::{Map, Value};

/// Text the presentation layer needs without re-reading raw properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayFields {
    pub title: String,
    pub caption: Option<String>,
    /// Only meaningful for `to_do` blocks.
    pub checked: bool,
    pub source: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub code_language: Option<String>,
    pub file_size: Option<String>,
}

impl DisplayFields {
    /// Applies the fixed per-type mapping from property names to fields.
    pub fn derive(block_type: &BlockType, properties: Option<&Map<String, Value>>) -> Self {
        let Some(props) = properties else {
            return Self::default();
        };
        let text = |name: &str| props.get(name).map(plain_text).filter(|s| !s.is_empty());

        let mut fields = DisplayFields::default();

        if block_type.has_title() {
            fields.title = text("title").unwrap_or_default();
        }

        if block_type.is_embedded() || *block_type == BlockType::Code {
            fields.caption = text("caption");
        }

        if block_type.is_embedded() {
            fields.source = text("source");
        }

        match block_type {
            BlockType::Todo => {
                fields.checked = text("checked")
                    .map(|s| s.eq_ignore_ascii_case("Yes"))
                    .unwrap_or(false);
            }
            BlockType::Bookmark => {
                fields.link = text("link");
                fields.description = text("description");
            }
            BlockType::Code => {
                fields.code = Some(fields.title.clone());
                fields.code_language = text("language");
            }
            BlockType::File => {
                fields.file_size = text("size");
            }
            _ => {}
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn todo_checked_is_yes() {
        let checked = props(json!({"title": [["Buy milk"]], "checked": [["Yes"]]}));
        let fields = DisplayFields::derive(&BlockType::Todo, Some(&checked));
        assert_eq!(fields.title, "Buy milk");
        assert!(fields.checked);

        let unchecked = props(json!({"title": [["Buy milk"]], "checked": [["No"]]}));
        assert!(!DisplayFields::derive(&BlockType::Todo, Some(&unchecked)).checked);
    }

    #[test]
    fn bookmark_and_code_fields() {
        let bookmark = props(json!({
            "title": [["Rust"]],
            "link": [["https://www.rust-lang.org"]],
            "description": [["A language"]],
            "caption": [["cap"]]
        }));
        let fields = DisplayFields::derive(&BlockType::Bookmark, Some(&bookmark));
        assert_eq!(fields.link.as_deref(), Some("https://www.rust-lang.org"));
        assert_eq!(fields.description.as_deref(), Some("A language"));
        assert_eq!(fields.caption.as_deref(), Some("cap"));

        let code = props(json!({"title": [["fn main() {}"]], "language": [["Rust"]]}));
        let fields = DisplayFields::derive(&BlockType::Code, Some(&code));
        assert_eq!(fields.code.as_deref(), Some("fn main() {}"));
        assert_eq!(fields.code_language.as_deref(), Some("Rust"));
    }

    #[test]
    fn file_size_and_missing_properties() {
        let file = props(json!({"title": [["a.pdf"]], "size": [["1.2MB"]], "source": [["https://x/a.pdf"]]}));
        let fields = DisplayFields::derive(&BlockType::File, Some(&file));
        assert_eq!(fields.file_size.as_deref(), Some("1.2MB"));
        assert_eq!(fields.source.as_deref(), Some("https://x/a.pdf"));

        assert_eq!(DisplayFields::derive(&BlockType::Divider, None), DisplayFields::default());
    }
}
