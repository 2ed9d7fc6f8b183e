//! Worksheet records as served by the upstream content API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::to_slug;

/// Image shown for worksheets that have no thumbnail of their own.
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://via.placeholder.com/300x200.png?text=No+Thumbnail";

/// Upstream identifier. The PHP backend emits both numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Numeric value of the identifier, when it has one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            RecordId::Number(n) => Some(*n),
            RecordId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetRecord {
    pub id: RecordId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub subject: String,
    pub subtopic: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl WorksheetRecord {
    pub fn new(
        id: impl Into<RecordId>,
        subject: impl Into<String>,
        subtopic: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            subject: subject.into(),
            subtopic: subtopic.into(),
            thumbnail_url: None,
            created_at: None,
            category: None,
        }
    }

    pub fn subject_slug(&self) -> String {
        to_slug(&self.subject)
    }

    pub fn subtopic_slug(&self) -> String {
        to_slug(&self.subtopic)
    }

    pub fn title_slug(&self) -> String {
        to_slug(&self.title)
    }

    /// The thumbnail URI, or `placeholder` when the record has none.
    pub fn thumbnail_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.thumbnail_url.as_deref().unwrap_or(placeholder)
    }

    /// Copy of the record with `placeholder` filled in for a missing thumbnail.
    pub fn with_thumbnail_fallback(&self, placeholder: &str) -> Self {
        let mut record = self.clone();
        if record.thumbnail_url.is_none() {
            record.thumbnail_url = Some(placeholder.to_string());
        }
        record
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_record() {
        let value = json!({
            "id": 7,
            "title": "Basic Addition",
            "description": "Single digit sums",
            "subject": "Math",
            "subtopic": "Addition",
            "thumbnail_url": "https://cdn.example.org/add.png",
            "created_at": "2024-05-01 10:00:00",
            "category": "Arithmetic"
        });

        let record: WorksheetRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.id, RecordId::Number(7));
        assert_eq!(record.title_slug(), "basic-addition");
        assert_eq!(record.thumbnail_or(PLACEHOLDER_THUMBNAIL), "https://cdn.example.org/add.png");
        assert_eq!(record.category.as_deref(), Some("Arithmetic"));
    }

    #[test]
    fn test_missing_optional_fields_are_tolerated() {
        let value = json!({
            "id": "12",
            "title": "Word Meanings",
            "description": null,
            "subject": "Word Knowledge",
            "subtopic": "Synonyms",
            "thumbnail_url": "",
            "unexpected": true
        });

        let record: WorksheetRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.id.as_number(), Some(12));
        assert_eq!(record.description, "");
        assert_eq!(record.thumbnail_url, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.thumbnail_or(PLACEHOLDER_THUMBNAIL), PLACEHOLDER_THUMBNAIL);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let value = json!({ "id": 1, "title": "Orphan", "subtopic": "None" });
        assert!(serde_json::from_value::<WorksheetRecord>(value).is_err());
    }

    #[test]
    fn test_with_thumbnail_fallback_only_fills_gaps() {
        let bare = WorksheetRecord::new(1, "Math", "Addition", "Sums");
        let filled = bare.with_thumbnail_fallback("placeholder.png");
        assert_eq!(filled.thumbnail_url.as_deref(), Some("placeholder.png"));

        let mut pictured = bare.clone();
        pictured.thumbnail_url = Some("own.png".to_string());
        let kept = pictured.with_thumbnail_fallback("placeholder.png");
        assert_eq!(kept.thumbnail_url.as_deref(), Some("own.png"));
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::Number(42).to_string(), "42");
        assert_eq!(RecordId::Text("abc".into()).to_string(), "abc");
        assert_eq!(RecordId::Text("abc".into()).as_number(), None);
    }
}
