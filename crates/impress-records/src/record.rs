//! Record domain model

use super::{Creator, RecordError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A keyword attached to a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Tag {
    pub tag: String,
}

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

/// A bibliographic record supplied by the library for one export batch
///
/// The core treats records as read-only, except that recognized directives
/// embedded in `extra` are stripped as they are consumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Record {
    #[serde(rename = "itemID")]
    pub item_id: String,
    /// Library key, used for the fallback cite key
    #[serde(default)]
    pub key: String,
    pub item_type: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub pages: String,

    // Every other source field, by its source name
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl Record {
    /// Create a record with the required identity fields
    pub fn new(item_id: impl Into<String>, key: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            key: key.into(),
            item_type: item_type.into(),
            creators: Vec::new(),
            title: String::new(),
            date: String::new(),
            extra: String::new(),
            tags: Vec::new(),
            pages: String::new(),
            fields: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.creators.push(creator);
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = pages.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(Tag::new(tag));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field by its source name
    ///
    /// Covers the typed fields as well as the catch-all map. Empty values
    /// count as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "itemID" => self.item_id.as_str(),
            "key" => self.key.as_str(),
            "itemType" => self.item_type.as_str(),
            "title" => self.title.as_str(),
            "date" => self.date.as_str(),
            "extra" => self.extra.as_str(),
            "pages" => self.pages.as_str(),
            _ => self.fields.get(name).map(String::as_str)?,
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Notes and attachments are not exported as entries
    pub fn is_exportable(&self) -> bool {
        !matches!(self.item_type.as_str(), "note" | "attachment")
    }

    /// Parse a single record from JSON
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse a batch of records from a JSON array
pub fn records_from_json(json: &str) -> Result<Vec<Record>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreatorRole;

    #[test]
    fn test_field_lookup() {
        let record = Record::new("1", "ABCD1234", "journalArticle")
            .with_title("Deep Sea")
            .with_field("publicationTitle", "Nature");

        assert_eq!(record.field("title"), Some("Deep Sea"));
        assert_eq!(record.field("key"), Some("ABCD1234"));
        assert_eq!(record.field("publicationTitle"), Some("Nature"));
        assert_eq!(record.field("date"), None);
        assert_eq!(record.field("volume"), None);
    }

    #[test]
    fn test_is_exportable() {
        assert!(Record::new("1", "K", "book").is_exportable());
        assert!(!Record::new("2", "K", "note").is_exportable());
        assert!(!Record::new("3", "K", "attachment").is_exportable());
    }

    #[test]
    fn test_from_json() {
        let record = Record::from_json(
            r#"{
                "itemID": "17",
                "key": "X7Y8Z9",
                "itemType": "book",
                "title": "On Growth and Form",
                "creators": [{"lastName": "Thompson", "firstName": "D'Arcy", "creatorType": "author"}],
                "tags": [{"tag": "biology"}],
                "fields": {"publisher": "Cambridge University Press"}
            }"#,
        )
        .unwrap();

        assert_eq!(record.item_id, "17");
        assert_eq!(record.creators[0].role, CreatorRole::Author);
        assert_eq!(record.tags[0].tag, "biology");
        assert_eq!(record.field("publisher"), Some("Cambridge University Press"));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(Record::from_json("{\"title\": 3}").is_err());
    }
}
