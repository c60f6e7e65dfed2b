use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for lists
pub type ListId = String;

/// Name given to lists created or stored without one
pub const DEFAULT_LIST_NAME: &str = "Untitled";

fn default_name() -> String {
    DEFAULT_LIST_NAME.to_string()
}

fn default_true() -> bool {
    true
}

/// Current UTC time in the ISO-8601 form stored in list documents
/// (microsecond precision, `Z` suffix)
pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Display settings of a list.
///
/// Missing keys take their defaults and unknown keys are dropped, so a
/// serialized value always carries exactly these three keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    #[serde(default = "default_true")]
    pub sort: bool,
    #[serde(default = "default_true")]
    pub checkbox: bool,
    #[serde(default)]
    pub quantity: bool,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            sort: true,
            checkbox: true,
            quantity: false,
        }
    }
}

/// A complete list document as persisted on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDocument {
    #[serde(default)]
    pub id: ListId,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub settings: ListSettings,
    /// Client-defined items, stored opaquely
    #[serde(default)]
    pub items: Vec<Value>,
}

/// A list document without its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(default)]
    pub id: ListId,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub settings: ListSettings,
}

/// Client-supplied list fields for create and update.
///
/// Anything else in the request body (`id`, `created`, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub settings: Option<ListSettings>,
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

impl From<ListDocument> for ListInput {
    fn from(doc: ListDocument) -> Self {
        Self {
            name: Some(doc.name),
            settings: Some(doc.settings),
            items: Some(doc.items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_defaults_fill_missing_keys() {
        let settings: ListSettings = serde_json::from_value(json!({"quantity": true})).unwrap();
        assert_eq!(
            settings,
            ListSettings {
                sort: true,
                checkbox: true,
                quantity: true
            }
        );
    }

    #[test]
    fn test_settings_drop_unknown_keys() {
        let settings: ListSettings =
            serde_json::from_value(json!({"sort": false, "color": "red"})).unwrap();
        let value = serde_json::to_value(settings).unwrap();
        assert_eq!(value, json!({"sort": false, "checkbox": true, "quantity": false}));
    }

    #[test]
    fn test_metadata_ignores_items() {
        let meta: ListMetadata = serde_json::from_value(json!({
            "id": "abc",
            "name": "Groceries",
            "modified": "2024-01-01T00:00:00.000000Z",
            "items": [{"text": "Milk"}]
        }))
        .unwrap();

        assert_eq!(meta.id, "abc");
        assert_eq!(meta.created, None);
        let value = serde_json::to_value(&meta).unwrap();
        assert!(value.get("items").is_none());
    }

    #[test]
    fn test_document_defaults() {
        let doc: ListDocument = serde_json::from_value(json!({})).unwrap();
        assert_eq!(doc.name, DEFAULT_LIST_NAME);
        assert_eq!(doc.settings, ListSettings::default());
        assert!(doc.items.is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        // YYYY-MM-DDTHH:MM:SS.ffffffZ
        assert_eq!(ts.len(), 27);
    }
}
