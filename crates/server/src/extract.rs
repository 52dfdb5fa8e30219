//! Request extractors whose rejections use the JSON error body.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::JsonApiError;

/// `Json<T>` with malformed, ill-typed or non-JSON bodies answered as a
/// 400 `{"error","message"}` instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| JsonBody(value))
            .map_err(JsonApiError::from)
    }
}
