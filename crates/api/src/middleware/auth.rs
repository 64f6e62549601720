//! Identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use quicknotes_core::error::CoreError;
use quicknotes_core::types::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the tenant key.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller, resolved from the request headers.
///
/// Resolution order:
/// 1. `Authorization: Bearer <token>`, when a verifier is configured. An
///    invalid token is rejected outright.
/// 2. The `x-user-id` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        if let (Some(token), Some(verifier)) = (bearer, state.identity.as_ref()) {
            let user_id = verifier.verify(token)?;
            return Ok(AuthUser { user_id });
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User ID required".into()))
            })?;

        Ok(AuthUser {
            user_id: user_id.to_string(),
        })
    }
}
