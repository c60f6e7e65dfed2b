use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::state::ServerState;
use crate::storage::{ListDocument, ListInput};

/// Checkbox patch response
#[derive(Debug, Serialize)]
pub struct CheckboxResponse {
    pub success: bool,
    pub item_index: usize,
    pub checkbox: u8,
}

/// Item index path segment; only plain non-negative integers match the route
fn parse_item_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Checkbox state from a JSON value: 0 or 1 (booleans count as 0/1)
fn parse_checkbox(value: &Value) -> Option<u8> {
    match value {
        Value::Bool(checked) => Some(u8::from(*checked)),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(0),
            Some(v) if v == 1.0 => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// Get a shared list (no authentication required)
pub async fn get_shared_list(
    State(state): State<ServerState>,
    Path(list_id): Path<String>,
) -> Result<Json<ListDocument>, ApiError> {
    state
        .store
        .get(&list_id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::list_not_found)
}

/// Update the checkbox of one item of a shared list (no authentication required)
pub async fn update_shared_item_checkbox(
    State(state): State<ServerState>,
    Path((list_id, raw_index)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<CheckboxResponse>, ApiError> {
    let Some(item_index) = parse_item_index(&raw_index) else {
        return Err(ApiError::endpoint_not_found());
    };

    let data = serde_json::from_slice::<Value>(&body).ok();
    let Some(raw_checkbox) = data
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|map| map.get("checkbox"))
    else {
        return Err(ApiError::BadRequest("Checkbox value required".to_string()));
    };
    let Some(checkbox) = parse_checkbox(raw_checkbox) else {
        return Err(ApiError::BadRequest("Checkbox must be 0 or 1".to_string()));
    };

    // Separate get and update: concurrent patches to one list can lose a change
    let mut doc = state
        .store
        .get(&list_id)
        .await?
        .ok_or_else(ApiError::list_not_found)?;

    let Some(item) = doc.items.get_mut(item_index) else {
        return Err(ApiError::NotFound("Item not found".to_string()));
    };
    let Some(fields) = item.as_object_mut() else {
        return Err(ApiError::Internal(format!(
            "Item {item_index} is not an object"
        )));
    };
    fields.insert("checkbox".to_string(), Value::from(checkbox));

    // Saved through the regular update path, so `modified` advances too
    if !state.store.update(&list_id, ListInput::from(doc)).await? {
        return Err(ApiError::Internal("Failed to update list".to_string()));
    }
    info!("Shared list {} item {} checkbox set to {}", list_id, item_index, checkbox);

    Ok(Json(CheckboxResponse {
        success: true,
        item_index,
        checkbox,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_item_index() {
        assert_eq!(parse_item_index("0"), Some(0));
        assert_eq!(parse_item_index("12"), Some(12));
        assert_eq!(parse_item_index(""), None);
        assert_eq!(parse_item_index("-1"), None);
        assert_eq!(parse_item_index("+1"), None);
        assert_eq!(parse_item_index("one"), None);
    }

    #[test]
    fn test_parse_checkbox() {
        assert_eq!(parse_checkbox(&json!(0)), Some(0));
        assert_eq!(parse_checkbox(&json!(1)), Some(1));
        assert_eq!(parse_checkbox(&json!(1.0)), Some(1));
        assert_eq!(parse_checkbox(&json!(true)), Some(1));
        assert_eq!(parse_checkbox(&json!(2)), None);
        assert_eq!(parse_checkbox(&json!(-1)), None);
        assert_eq!(parse_checkbox(&json!("1")), None);
        assert_eq!(parse_checkbox(&Value::Null), None);
    }
}
