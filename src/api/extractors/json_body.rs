//! JSON body extractor - Maps every decoding failure to 422.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON extractor whose rejection is an [`AppError::Unprocessable`].
///
/// Missing content type, invalid syntax and type mismatches are all reported
/// the same way: `422 {"code":422,"text":"Could not parse the given parameter"}`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e.body_text());
            AppError::unprocessable("Could not parse the given parameter")
        })?;

        Ok(JsonBody(value))
    }
}
