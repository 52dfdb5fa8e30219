use axum::{
    extract::{Path, Query, State},
    Json,
};
use models::review::{NewReview, Review, ReviewPatch};
use serde::Deserialize;
use service::storage::{DeleteResult, InsertResult, UpdateResult};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    /// Author email; required.
    pub email: Option<String>,
}

#[utoipa::path(
    post, path = "/reviews", tag = "reviews",
    request_body = crate::openapi::ReviewDoc,
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertResultDoc),
        (status = 500, description = "Failed to post review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewReview>,
) -> Result<Json<InsertResult>, JsonApiError> {
    let res = state
        .reviews
        .create(&input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to post review"))?;
    info!(id = %res.inserted_id, service_id = ?input.service_id, "review created");
    Ok(Json(res))
}

#[utoipa::path(
    get, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Id of the reviewed service")),
    responses(
        (status = 200, description = "Reviews of the service", body = [crate::openapi::ReviewDoc]),
        (status = 500, description = "Failed to fetch reviews", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn reviews_for_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<Vec<Review>>, JsonApiError> {
    state
        .reviews
        .for_service(&service_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch reviews"))
}

#[utoipa::path(
    get, path = "/reviews", tag = "reviews",
    params(OwnerQuery),
    responses(
        (status = 200, description = "The author's reviews, newest first", body = [crate::openapi::ReviewDoc]),
        (status = 400, description = "Email is required", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Failed to fetch user reviews", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn reviews_for_owner(
    State(state): State<AppState>,
    Query(q): Query<OwnerQuery>,
) -> Result<Json<Vec<Review>>, JsonApiError> {
    state
        .reviews
        .for_owner(q.email.as_deref())
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch user reviews"))
}

#[utoipa::path(
    put, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Review id (24 hex characters)")),
    request_body = crate::openapi::ReviewPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UpdateResultDoc),
        (status = 400, description = "Malformed id or empty patch", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Review not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Failed to update review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ReviewPatch>,
) -> Result<Json<UpdateResult>, JsonApiError> {
    state
        .reviews
        .update(&id, &patch)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to update review"))
}

#[utoipa::path(
    delete, path = "/reviews/{id}", tag = "reviews",
    params(("id" = String, Path, description = "Review id (24 hex characters)")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteResultDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Review not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Failed to delete review", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, JsonApiError> {
    state
        .reviews
        .delete(&id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to delete review"))
}
