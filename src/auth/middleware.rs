use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::{
    claims::Claims,
    jwt::{rejection_reason, JwtKeys},
};
use crate::error::AppError;

/// Identity decoded from a verified session token, available to handlers
/// behind [`require_session`] as an `Extension<SessionUser>`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(rename = "userActiveName")]
    pub user_active_name: String,
    pub email: String,
}

impl From<Claims> for SessionUser {
    fn from(c: Claims) -> Self {
        Self {
            id: c.id,
            user_active_name: c.user_active_name,
            email: c.email,
        }
    }
}

/// Expect exactly `Bearer <token>`; the scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return None;
    }
    Some(token)
}

pub async fn require_session(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Authorization)?;

    let token = bearer_token(header).ok_or_else(|| {
        warn!("invalid auth scheme");
        AppError::Authorization
    })?;

    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        AppError::Token(rejection_reason(&e))
    })?;

    request.extensions_mut().insert(SessionUser::from(claims));
    Ok(next.run(request).await)
}
