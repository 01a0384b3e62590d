use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

use hipnosis_core::DomainError;
use hipnosis_infra::ServiceError;

use crate::app::services::AppServices;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InvalidInput(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        ServiceError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        ServiceError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        ServiceError::Domain(DomainError::Unauthenticated) => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "login required")
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 303 to the identity provider, coming back to `return_to` afterwards.
pub fn redirect_to_login(services: &AppServices, return_to: &str) -> Response {
    Redirect::to(&services.auth_urls.login_url(return_to)).into_response()
}
