use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const NO_DASH_ID_LEN: usize = 32;
const DASH_ID_LEN: usize = 36;

/// A Notion record identifier.
///
/// Notion hands out the same 128-bit id in two spellings: 32 hex characters
/// (`2131b10cebf64938a1277089ff02dbe4`) and the hyphenated 8-4-4-4-12 form
/// (`2131b10c-ebf6-4938-a127-7089ff02dbe4`). Both parse into the same value;
/// the canonical key is the lowercase no-dash form and the API always receives
/// [`NotionId::to_hyphenated`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Returns the canonical non-hyphenated ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID form sent to the API.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }

    /// Creates a NotionId from a validated hex string.
    fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        if hex.len() == NO_DASH_ID_LEN && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(NotionId(hex.to_ascii_lowercase()))
        } else {
            Err(ValidationError::InvalidId(format!(
                "Invalid Notion ID format: {}",
                hex
            )))
        }
    }

    /// Parses a bare id in either spelling, or a notion.so URL ending in one.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.len() == DASH_ID_LEN {
            if let Ok(uuid) = Uuid::parse_str(cleaned) {
                return Ok(NotionId(uuid.as_simple().to_string()));
            }
        }

        if cleaned.len() == NO_DASH_ID_LEN {
            return Self::from_hex(cleaned);
        }

        if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts the trailing id from a page URL such as
    /// `https://www.notion.so/Some-Title-ea07db1b9bff415ab180b0525f3898f6#section`.
    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("Failed to compile Notion ID regex - this is a bug in the code");
        }

        if let Some(captures) = ID_REGEX.captures(url) {
            if let Some(id_match) = captures.get(1) {
                let id = id_match.as_str().replace('-', "");
                return Self::from_hex(&id);
            }
        }

        Err(ValidationError::InvalidId(format!(
            "No valid ID found in URL: {}",
            url
        )))
    }
}

/// Normalizes any accepted spelling to the canonical no-dash key.
pub fn normalize_id(input: &str) -> Result<String, ValidationError> {
    NotionId::parse(input).map(|id| id.0)
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NotionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hyphenated().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DASH: &str = "550e8400e29b41d4a716446655440000";
    const DASHED: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_id_parsing() {
        let id = NotionId::parse(NO_DASH).unwrap();
        assert_eq!(id.as_str(), NO_DASH);

        let id = NotionId::parse(DASHED).unwrap();
        assert_eq!(id.as_str(), NO_DASH);

        let id = NotionId::parse("https://www.notion.so/Test-Page-550e8400e29b41d4a716446655440000")
            .unwrap();
        assert_eq!(id.as_str(), NO_DASH);

        let id = NotionId::parse("https://www.notion.so/550e8400e29b41d4a716446655440000#intro")
            .unwrap();
        assert_eq!(id.as_str(), NO_DASH);
    }

    #[test]
    fn test_invalid_ids() {
        assert!(NotionId::parse("too-short").is_err());
        assert!(NotionId::parse("zz0e8400e29b41d4a716446655440000").is_err());
        assert!(NotionId::parse("").is_err());
        assert!(NotionId::parse("https://www.notion.so/no-id-here").is_err());
    }

    #[test]
    fn test_hyphenation_and_case_compare_equal() {
        let upper = NotionId::parse(&DASHED.to_uppercase()).unwrap();
        let lower = NotionId::parse(NO_DASH).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_normalization_is_a_projection() {
        for input in [NO_DASH, DASHED, "550E8400E29B41D4A716446655440000"] {
            let once = normalize_id(input).unwrap();
            let twice = normalize_id(&once).unwrap();
            assert_eq!(once, twice);

            let id = NotionId::parse(input).unwrap();
            assert_eq!(NotionId::parse(&id.to_hyphenated()).unwrap(), id);
        }
    }

    #[test]
    fn test_to_hyphenated() {
        let id = NotionId::parse(NO_DASH).unwrap();
        assert_eq!(id.to_hyphenated(), DASHED);
    }

    #[test]
    fn test_serde_uses_hyphenated_form() {
        let id = NotionId::parse(NO_DASH).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", DASHED));
        let back: NotionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
