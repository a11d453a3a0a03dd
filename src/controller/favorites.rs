use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::app::Result;
use crate::auth::IdentityProvider;
use crate::domain::{Article, FavoritesState};
use crate::store::FavoritesGateway;

const EVENT_CAPACITY: usize = 16;

pub const NO_USER_MESSAGE: &str = "Cannot fetch articles: no user is signed in";

/// Sent once an article has been written to the signed-in user's favorites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteSaved {
    pub title: String,
}

/// Favorites for whoever the identity provider reports as signed in.
pub struct FavoritesController {
    store: Arc<dyn FavoritesGateway + Send + Sync>,
    identity: Arc<dyn IdentityProvider>,
    state: watch::Sender<FavoritesState>,
    saved: broadcast::Sender<FavoriteSaved>,
}

impl FavoritesController {
    pub fn new(
        store: Arc<dyn FavoritesGateway + Send + Sync>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let (state, _) = watch::channel(FavoritesState::default());
        let (saved, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            identity,
            state,
            saved,
        }
    }

    pub fn state(&self) -> FavoritesState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteSaved> {
        self.saved.subscribe()
    }

    /// Save `article` for the current user.
    ///
    /// Returns `Ok(false)` without touching the store when nobody is signed in.
    pub fn add_article(&self, article: &Article) -> Result<bool> {
        let Some(uid) = self.identity.current_user_id() else {
            warn!("Not saving article: no user is signed in");
            return Ok(false);
        };

        self.store
            .save(&uid, article)
            .inspect_err(|e| error!(%uid, "Error saving article: {}", e))?;
        info!(%uid, title = %article.title, "Saved article to favorites");

        let _ = self.saved.send(FavoriteSaved {
            title: article.title.clone(),
        });
        Ok(true)
    }

    /// Reload the favorites list into state.
    pub fn fetch_articles(&self) -> FavoritesState {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = match self.identity.current_user_id() {
            Some(uid) => self.store.fetch_all(&uid).map_err(|e| {
                error!(%uid, "Error fetching favorites: {}", e);
                format!("Error fetching articles: {}", e)
            }),
            None => {
                warn!("{}", NO_USER_MESSAGE);
                Err(NO_USER_MESSAGE.to_string())
            }
        };

        self.state.send_modify(|state| {
            state.is_loading = false;
            match result {
                Ok(articles) => {
                    debug!(count = articles.len(), "Loaded favorites");
                    state.articles = articles;
                }
                Err(message) => state.error = Some(message),
            }
        });
        self.state()
    }

    /// Look up one favorite by title and make it the selected article.
    pub fn fetch_specific_article(&self, title: &str) -> Option<Article> {
        let selected = match self.identity.current_user_id() {
            Some(uid) => match self.store.fetch_one(&uid, title) {
                Ok(article) => article,
                Err(e) => {
                    error!(%uid, title, "Error fetching favorite: {}", e);
                    self.state
                        .send_modify(|state| state.error = Some(format!("Error fetching article: {}", e)));
                    None
                }
            },
            None => {
                warn!("Cannot fetch article: no user is signed in");
                None
            }
        };

        self.state
            .send_modify(|state| state.selected = selected.clone());
        selected
    }
}
