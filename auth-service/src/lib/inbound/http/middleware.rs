use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use super::handlers::ApiError;
use crate::account::models::Username;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Identity verified from the bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub username: Username,
    pub expires_at: DateTime<Utc>,
}

/// Middleware that validates the bearer token and attaches the caller's identity
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(req.headers()).map_err(IntoResponse::into_response)?;

    let claims = state
        .auth_service
        .validate_token(token)
        .map_err(|e| ApiError::from(e).into_response())?;

    let username = Username::new(claims.sub.clone()).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a valid username");
        unauthorized("Invalid or expired token").into_response()
    })?;
    let expires_at = claims
        .expires_at()
        .ok_or_else(|| unauthorized("Invalid or expired token").into_response())?;

    req.extensions_mut()
        .insert(AuthenticatedAccount {
            username,
            expires_at,
        });

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let value = header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| unauthorized("Expected: Bearer <token>"))?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(unauthorized("Expected: Bearer <token>"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized("Expected: Bearer <token>"));
    }

    Ok(token)
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Unauthorized(message.to_string())
}
