use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsError, Result};
use crate::auth::{AuthService, FirebaseAuth, IdentityProvider};
use crate::config::Config;
use crate::controller::{FavoritesController, FetchController, HeadlineDefaults, SearchDebouncer};
use crate::fetcher::{ArticleSource, GNewsClient};
use crate::store::{FavoritesGateway, SqliteStore};

pub struct AppContext {
    pub config: Config,
    pub source: Arc<dyn ArticleSource>,
    pub store: Arc<SqliteStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub auth: AuthService,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match &config.storage.database_path {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);

        let mut firebase = FirebaseAuth::new(&config.auth)?;
        if config.auth.persist_session {
            if let Some(path) = FirebaseAuth::default_session_path() {
                firebase = firebase.with_session_file(path);
            }
        }

        Self::assemble(config, store, Arc::new(firebase))
    }

    /// Context backed by an in-memory store and a session that is never written to disk.
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        let firebase = FirebaseAuth::new(&config.auth)?;
        Self::assemble(config, store, Arc::new(firebase))
    }

    fn assemble(
        config: Config,
        store: Arc<SqliteStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let source: Arc<dyn ArticleSource> = Arc::new(GNewsClient::new(&config.api)?);
        let favorites: Arc<dyn FavoritesGateway + Send + Sync> = store.clone();
        let auth = AuthService::new(identity.clone(), favorites);

        Ok(Self {
            config,
            source,
            store,
            identity,
            auth,
        })
    }

    /// Fetch controller with no fetch started yet.
    pub fn fetch_controller(&self) -> FetchController {
        FetchController::new(self.source.clone(), HeadlineDefaults::from(&self.config.api))
    }

    pub fn favorites(&self) -> FavoritesController {
        FavoritesController::new(self.store.clone(), self.identity.clone())
    }

    /// Debouncer feeding searches into `controller`, using the configured window.
    pub fn search_debouncer(
        &self,
        controller: FetchController,
    ) -> (SearchDebouncer, tokio::task::JoinHandle<()>) {
        SearchDebouncer::forward_to(self.config.search.debounce(), controller)
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsError::Config("Could not find data directory".into()))?;
        let newsroom_dir = data_dir.join("newsroom");
        std::fs::create_dir_all(&newsroom_dir)?;
        Ok(newsroom_dir.join("newsroom.db"))
    }
}
