//! Bearer-token session extraction.
//!
//! Token issuance lives with the external auth provider; this extractor
//! only validates presented tokens against the repository's session table
//! and rejects gated requests with 401.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::AppError;
use super::state::AppState;
use crate::db::repository::SessionRepository;

/// The authenticated customer for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub customer_id: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".into()))?;

        let customer_id = state
            .repository
            .resolve_session(token)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::Unauthorized("session is not valid".into()))?;

        Ok(CurrentUser { customer_id })
    }
}
