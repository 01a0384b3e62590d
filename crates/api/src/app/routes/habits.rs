use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Extension, OriginalUri, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};

use hipnosis_core::{DomainError, HabitId};
use hipnosis_infra::ServiceError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::OwnerContext;

/// `GET /`: the caller's habits, or a login link for anonymous visitors.
pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    owner: Option<Extension<OwnerContext>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let return_to = uri.to_string();

    let Some(Extension(owner)) = owner else {
        let login_href = services.auth_urls.login_url(&return_to);
        return Json(dto::base_view(&login_href)).into_response();
    };

    match services.habits.list_by_owner(owner.person()).await {
        Ok(habits) => {
            let logout_href = services.auth_urls.logout_url(&return_to);
            Json(dto::habits_view(&habits, &logout_href)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `GET /habit/:id`: one owned habit. Unknown or foreign ids render an empty view.
pub async fn permalink(
    Extension(services): Extension<Arc<AppServices>>,
    owner: Option<Extension<OwnerContext>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let habit_id: HabitId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such page"),
    };

    let Some(Extension(owner)) = owner else {
        return errors::redirect_to_login(&services, &uri.to_string());
    };

    match services.habits.get_by_id(owner.person(), habit_id).await {
        Ok(habit) => Json(dto::permalink_view(Some(&habit))).into_response(),
        Err(ServiceError::Domain(DomainError::NotFound)) => {
            tracing::debug!(person_id = %owner.person_id(), %habit_id, "habit not visible to caller");
            Json(dto::permalink_view(None)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// `GET /newhabit`: empty creation form.
pub async fn new_habit_form(
    Extension(services): Extension<Arc<AppServices>>,
    owner: Option<Extension<OwnerContext>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    if owner.is_none() {
        return errors::redirect_to_login(&services, &uri.to_string());
    }

    Json(dto::new_habit_view("", "", None)).into_response()
}

/// `POST /newhabit`: create a habit, or re-render the form with the entered
/// values and a message.
pub async fn create_habit(
    Extension(services): Extension<Arc<AppServices>>,
    owner: Option<Extension<OwnerContext>>,
    OriginalUri(uri): OriginalUri,
    form: Result<Form<dto::NewHabitForm>, FormRejection>,
) -> Response {
    // Anonymous callers are redirected whatever the body looks like.
    let Some(Extension(owner)) = owner else {
        return errors::redirect_to_login(&services, &uri.to_string());
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!(person_id = %owner.person_id(), %rejection, "unreadable habit form");
            return rejection.into_response();
        }
    };

    match services.habits.create(owner.person(), &form.title, &form.behavior).await {
        Ok(habit_id) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/habit/{habit_id}"))],
            Json(serde_json::json!({ "id": habit_id })),
        )
            .into_response(),
        Err(ServiceError::Domain(DomainError::Validation(msg))) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(dto::new_habit_view(&form.title, &form.behavior, Some(&msg))),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
