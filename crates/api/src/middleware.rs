use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use hipnosis_auth::{ExternalUserId, JwtValidator};
use hipnosis_infra::IdentityResolver;

use crate::app::errors;
use crate::context::OwnerContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub identity: IdentityResolver,
}

/// Attach an [`OwnerContext`] when the request carries a valid bearer token.
///
/// Requests without a usable token pass through unauthenticated; each route
/// decides how to treat them (login link or redirect).
pub async fn principal_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::now_v7(),
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        if let Some(user_id) = current_principal(state.jwt.as_ref(), req.headers(), Utc::now()) {
            match state.identity.resolve_or_create(user_id.as_str()).await {
                Ok(person) => {
                    req.extensions_mut().insert(OwnerContext::new(person));
                }
                Err(e) => return errors::service_error_to_response(e),
            }
        }

        next.run(req).await
    }
    .instrument(span)
    .await
}

/// The authenticated caller, if any.
///
/// Missing, malformed, badly signed and expired tokens all mean "nobody".
pub fn current_principal(
    jwt: &dyn JwtValidator,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Option<ExternalUserId> {
    let token = extract_bearer(headers)?;

    match jwt.validate(token, now) {
        Ok(claims) => Some(claims.sub),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring invalid bearer token");
            None
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token)
}
