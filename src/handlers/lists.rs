use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::handlers::body::json_object;
use crate::state::ServerState;
use crate::storage::{ListDocument, ListId, ListInput, ListMetadata};

/// All lists, metadata only
#[derive(Debug, Serialize)]
pub struct ListsResponse {
    pub lists: Vec<ListMetadata>,
}

/// Response for create and update
#[derive(Debug, Serialize)]
pub struct ListWriteResponse {
    pub id: ListId,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Decode the list fields of a request body
fn list_input(body: &Bytes) -> Result<ListInput, ApiError> {
    let data = json_object(body)?;
    serde_json::from_value(Value::Object(data))
        .map_err(|e| ApiError::BadRequest(format!("Invalid list data: {e}")))
}

/// Get all lists (metadata only, no items)
pub async fn get_lists(State(state): State<ServerState>) -> Result<Json<ListsResponse>, ApiError> {
    let lists = state.store.list_all().await?;
    Ok(Json(ListsResponse { lists }))
}

/// Get a specific list with all items
pub async fn get_list(
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

/// Create a new list
pub async fn create_list(
    State(state): State<ServerState>,
    Extension(session): Extension<AuthSession>,
    body: Bytes,
) -> Result<(StatusCode, Json<ListWriteResponse>), ApiError> {
    let input = list_input(&body)?;
    if input.name.as_deref().map_or(true, str::is_empty) {
        return Err(ApiError::BadRequest("List name is required".to_string()));
    }

    let id = state.store.create(input).await?;
    info!("{} created list {}", session.username, id);

    Ok((
        StatusCode::CREATED,
        Json(ListWriteResponse {
            id,
            message: "List created successfully".to_string(),
        }),
    ))
}

/// Replace an existing list
pub async fn update_list(
    State(state): State<ServerState>,
    Extension(session): Extension<AuthSession>,
    Path(list_id): Path<String>,
    body: Bytes,
) -> Result<Json<ListWriteResponse>, ApiError> {
    let input = list_input(&body)?;

    if !state.store.update(&list_id, input).await? {
        return Err(ApiError::list_not_found());
    }
    info!("{} updated list {}", session.username, list_id);

    Ok(Json(ListWriteResponse {
        id: list_id,
        message: "List updated successfully".to_string(),
    }))
}

/// Delete a list
pub async fn delete_list(
    State(state): State<ServerState>,
    Extension(session): Extension<AuthSession>,
    Path(list_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete(&list_id).await? {
        return Err(ApiError::list_not_found());
    }
    info!("{} deleted list {}", session.username, list_id);

    Ok(Json(MessageResponse {
        message: "List deleted successfully".to_string(),
    }))
}
