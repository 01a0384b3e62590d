use std::sync::Arc;

use hipnosis_auth::AuthUrls;
use hipnosis_infra::{
    db,
    store::{HabitStore, InMemoryStore, PersonStore, PostgresStore, StoreError},
    HabitService, IdentityResolver,
};

use crate::config::ApiConfig;

/// Everything a handler needs, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub identity: IdentityResolver,
    pub habits: HabitService,
    pub auth_urls: AuthUrls,
}

impl AppServices {
    /// Wire services over a store that holds both people and habits.
    pub fn from_store<S>(store: Arc<S>, auth_urls: AuthUrls) -> Self
    where
        S: PersonStore + HabitStore + 'static,
    {
        Self {
            identity: IdentityResolver::new(store.clone()),
            habits: HabitService::new(store),
            auth_urls,
        }
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    let auth_urls = AuthUrls::new(config.login_url.clone(), config.logout_url.clone());

    match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect(url, config.db_max_connections).await?;
            db::apply_schema(&pool).await?;
            tracing::info!("using postgres store");
            Ok(AppServices::from_store(Arc::new(PostgresStore::new(pool)), auth_urls))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; habits are kept in memory only");
            Ok(AppServices::from_store(Arc::new(InMemoryStore::new()), auth_urls))
        }
    }
}
