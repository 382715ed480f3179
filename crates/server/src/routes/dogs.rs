use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use models::dog;
use serde::Deserialize;
use service::dog::DogInput;
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::metrics::{observe, record_rejected};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Substring matched against name, breed and supplier
    pub filter: Option<String>,
}

fn rejected(operation: &'static str, message: String, path: &str) -> JsonApiError {
    warn!(operation, %path, reason = %message, "dog_request_malformed");
    record_rejected(operation);
    JsonApiError::bad_request(message, path)
}

#[utoipa::path(
    get, path = "/api/dogs", tag = "dogs",
    params(ListQuery),
    responses(
        (status = 200, description = "Active dogs", body = [crate::openapi::DogRecordDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<dog::Model>>, JsonApiError> {
    let Query(q) = query.map_err(|e| rejected("list", e.body_text(), uri.path()))?;
    let dogs = observe("list", state.dogs.list(q.filter.as_deref()))
        .await
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))?;
    info!(count = dogs.len(), "list dogs");
    Ok(Json(dogs))
}

#[utoipa::path(
    get, path = "/api/dogs/dogs", tag = "dogs",
    responses(
        (status = 200, description = "All dogs, soft-deleted included", body = [crate::openapi::DogRecordDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list_all(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<dog::Model>>, JsonApiError> {
    let dogs = observe("list_all", state.dogs.list_all())
        .await
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))?;
    info!(count = dogs.len(), "list all dogs");
    Ok(Json(dogs))
}

#[utoipa::path(
    get, path = "/api/dogs/{id}", tag = "dogs",
    params(("id" = i32, Path, description = "Dog id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::DogRecordDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<dog::Model>, JsonApiError> {
    let Path(id) = id.map_err(|e| rejected("get", e.body_text(), uri.path()))?;
    observe("get", state.dogs.get_by_id(id))
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))
}

#[utoipa::path(
    post, path = "/api/dogs", tag = "dogs",
    request_body = crate::openapi::DogInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::DogRecordDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    input: Result<Json<DogInput>, JsonRejection>,
) -> Result<Json<dog::Model>, JsonApiError> {
    let Json(input) = input.map_err(|e| rejected("create", e.body_text(), uri.path()))?;
    let created = observe("create", state.dogs.create(&input))
        .await
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))?;
    info!(id = created.id, badge_id = created.badge_id, "created dog");
    Ok(Json(created))
}

#[utoipa::path(
    put, path = "/api/dogs/{id}", tag = "dogs",
    params(("id" = i32, Path, description = "Dog id")),
    request_body = crate::openapi::DogInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DogRecordDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Update Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i32>, PathRejection>,
    input: Result<Json<DogInput>, JsonRejection>,
) -> Result<Json<dog::Model>, JsonApiError> {
    let Path(id) = id.map_err(|e| rejected("update", e.body_text(), uri.path()))?;
    let Json(input) = input.map_err(|e| rejected("update", e.body_text(), uri.path()))?;
    let updated = observe("update", state.dogs.update(id, &input))
        .await
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))?;
    info!(id = updated.id, "updated dog");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/dogs/{id}", tag = "dogs",
    params(("id" = i32, Path, description = "Dog id")),
    responses(
        (status = 200, description = "Soft-deleted", body = String, content_type = "text/plain"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i32>, PathRejection>,
) -> Result<(StatusCode, String), JsonApiError> {
    let Path(id) = id.map_err(|e| rejected("delete", e.body_text(), uri.path()))?;
    observe("delete", state.dogs.soft_delete(id))
        .await
        .map_err(|e| JsonApiError::from_service(&e, uri.path()))?;
    info!(id, "deleted dog");
    Ok((StatusCode::OK, format!("Dog with ID {id} has been successfully deleted")))
}
