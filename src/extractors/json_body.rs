//! JSON request body whose rejections render as `AppError` instead of plain text.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// Raw JSON body, left untyped so the schema validator sees exactly what was sent.
#[derive(Clone, Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::BAD_REQUEST => AppError::BadRequest(rejection.body_text()),
                status => AppError::Rejected {
                    status,
                    message: rejection.body_text(),
                },
            })?;
        Ok(JsonBody(value))
    }
}
