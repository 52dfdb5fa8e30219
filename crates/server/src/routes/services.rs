use axum::{
    extract::{Path, Query, State},
    Json,
};
use models::service::{NewService, Service, ServicePatch};
use serde::{Deserialize, Serialize};
use service::services::ServiceQuery;
use service::storage::{DeleteResult, InsertResult, UpdateResult};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceListQuery {
    /// Case-insensitive text matched against title, category and company.
    pub search: Option<String>,
    /// Owner email (`userEmail`), exact match.
    pub email: Option<String>,
    /// Category name; `All` disables the category filter.
    pub category: Option<String>,
}

impl From<ServiceListQuery> for ServiceQuery {
    fn from(q: ServiceListQuery) -> Self {
        ServiceQuery::from_params(q.search, q.email, q.category)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateServiceResponse {
    pub message: &'static str,
    pub result: UpdateResult,
}

#[utoipa::path(
    post, path = "/services", tag = "services",
    request_body = crate::openapi::ServiceDoc,
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertResultDoc),
        (status = 500, description = "Insert failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewService>,
) -> Result<Json<InsertResult>, JsonApiError> {
    let res = state
        .catalog
        .create(&input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to create service"))?;
    info!(id = %res.inserted_id, "service created");
    Ok(Json(res))
}

#[utoipa::path(
    get, path = "/services/featured", tag = "services",
    responses(
        (status = 200, description = "At most 6 services", body = [crate::openapi::ServiceDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn featured_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, JsonApiError> {
    state
        .catalog
        .featured()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch featured services"))
}

/// Single service, or `null` when no record has this id.
#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id (24 hex characters)")),
    responses(
        (status = 200, description = "The service, or null", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Service>>, JsonApiError> {
    state
        .catalog
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch service"))
}

#[utoipa::path(
    get, path = "/services", tag = "services",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Matching services", body = [crate::openapi::ServiceDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(q): Query<ServiceListQuery>,
) -> Result<Json<Vec<Service>>, JsonApiError> {
    let query = ServiceQuery::from(q);
    state
        .catalog
        .list(&query)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch services."))
}

#[utoipa::path(
    get, path = "/categories", tag = "services",
    responses(
        (status = 200, description = "Distinct categories, unordered", body = [String]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, JsonApiError> {
    state
        .catalog
        .categories()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch categories"))
}

#[utoipa::path(
    put, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id (24 hex characters)")),
    request_body = crate::openapi::ServiceDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UpdateServiceDoc),
        (status = 400, description = "Malformed id or empty patch", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Service not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Update failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ServicePatch>,
) -> Result<Json<UpdateServiceResponse>, JsonApiError> {
    let result = state
        .catalog
        .update(&id, &patch)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to update service"))?;
    info!(%id, modified = result.modified_count, "service updated");
    Ok(Json(UpdateServiceResponse { message: "Service updated successfully", result }))
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = String, Path, description = "Service id (24 hex characters)")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteResultDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No service found to delete", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Delete failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, JsonApiError> {
    let res = state
        .catalog
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Internal server error during delete"))?;
    info!(%id, "service deleted");
    Ok(Json(res))
}
