use std::sync::Arc;

use tracing::info;

use crate::auth::{jwt::JwtKeys, AuthService};
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::notes::NotesService;
use crate::storage::{MemoryStore, NoteStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub auth: AuthService,
    pub notes: NotesService,
    pub db: Option<PgStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            info!("using in-memory store");
            let store = Arc::new(MemoryStore::new());
            return Ok(Self::from_parts(config, store.clone(), store, None));
        }

        let db = PgStore::connect(&config.database_url).await?;
        let store = Arc::new(db.clone());
        Ok(Self::from_parts(config, store.clone(), store, Some(db)))
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        db: Option<PgStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        let auth = AuthService::new(users, keys.clone());
        let notes = NotesService::new(notes, config.notes.enforce_ownership);
        Self {
            config: Arc::new(config),
            keys,
            auth,
            notes,
            db,
        }
    }

    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            info!("database pool closed");
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, NotesConfig};

        let config = AppConfig {
            database_url: "memory://".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 60,
            },
            notes: NotesConfig {
                enforce_ownership: true,
            },
        };
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store, None)
    }
}
