use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::graphql::{build_schema, AppContext, AppSchema};
use crate::session::SessionKeys;
use crate::store::{DocumentStore, SqliteStore};

#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub store: Arc<dyn DocumentStore>,
    pub keys: Arc<SessionKeys>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = SqliteStore::connect(&config.database.url)?;

        // An unreachable database is logged, not fatal; operations fail
        // per-request until it comes back.
        if let Err(e) = store.init().await {
            warn!("Database unavailable at startup, continuing: {}", e);
        }
        let store: Arc<dyn DocumentStore> = Arc::new(store);

        let keys = Arc::new(SessionKeys::new(
            &config.session.secret,
            config.session.ttl_secs,
        ));

        let schema = build_schema(AppContext {
            store: store.clone(),
            keys: keys.clone(),
            config: config.clone(),
        });

        Ok(Self {
            schema,
            store,
            keys,
            config,
        })
    }
}
