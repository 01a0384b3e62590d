//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service construction
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: form input and the JSON view documents handed to the renderer
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use hipnosis_auth::Hs256JwtValidator;
use hipnosis_infra::store::StoreError;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: ApiConfig) -> Result<Router, StoreError> {
    let services = Arc::new(services::build_services(&config).await?);
    Ok(build_router(services, &config.jwt_secret))
}

/// Router over already-built services.
pub fn build_router(services: Arc<services::AppServices>, jwt_secret: &str) -> Router {
    let auth_state = middleware::AuthState {
        jwt: Arc::new(Hs256JwtValidator::new(jwt_secret)),
        identity: services.identity.clone(),
    };

    let pages = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::principal_middleware,
            )),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(pages)
}
