//! OpenAPI description served at `/api-docs/openapi.json`.
//!
//! Records are open documents; the schemas below only list the fields the
//! API understands. Other fields are stored and returned unchanged.

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDoc {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDoc {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub service_id: Option<String>,
    pub email: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewPatchDoc {
    pub text: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResultDoc {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultDoc {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
    pub upserted_count: u64,
}

#[derive(ToSchema)]
pub struct UpdateServiceDoc {
    pub message: String,
    pub result: UpdateResultDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResultDoc {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::services::create_service,
        crate::routes::services::featured_services,
        crate::routes::services::get_service,
        crate::routes::services::list_services,
        crate::routes::services::list_categories,
        crate::routes::services::update_service,
        crate::routes::services::delete_service,
        crate::routes::reviews::create_review,
        crate::routes::reviews::reviews_for_service,
        crate::routes::reviews::reviews_for_owner,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            ServiceDoc,
            ReviewDoc,
            ReviewPatchDoc,
            InsertResultDoc,
            UpdateResultDoc,
            UpdateServiceDoc,
            DeleteResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
