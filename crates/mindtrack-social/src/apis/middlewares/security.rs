use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::warn;

use crate::{utils::errors::app_error::AppError, AppState};

/// Requires a valid `Authorization: Bearer <token>` header and exposes the
/// token's `Claims` to handlers through request extensions.
pub async fn verify_jwt(
    State(app_state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = app_state
        .auth_service
        .verify(bearer.token())
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
