use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::app::Result;
use crate::config::ApiConfig;
use crate::controller::history::{ArticleStore, HistoryPolicy};
use crate::domain::{ArticleCollection, Category, FetchState, NewsResponse};
use crate::fetcher::{ArticleRequest, ArticleSource};

const EVENT_CAPACITY: usize = 64;

/// Countries used by the screen-level helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineDefaults {
    /// Home screen country; empty means worldwide
    pub default_country: String,
    pub category_country: String,
}

impl Default for HeadlineDefaults {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for HeadlineDefaults {
    fn from(config: &ApiConfig) -> Self {
        Self {
            default_country: config.default_country.clone(),
            category_country: config.category_country.clone(),
        }
    }
}

/// Drives fetches against an [`ArticleSource`] and publishes [`FetchState`].
///
/// `request` never cancels earlier requests: when several are in flight, the
/// one that resolves last decides the final state. `request_latest` instead
/// invalidates the previous `request_latest` call, whose result is dropped.
#[derive(Clone)]
pub struct FetchController {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ArticleSource>,
    defaults: HeadlineDefaults,
    history: Mutex<ArticleStore>,
    state: watch::Sender<FetchState>,
    events: broadcast::Sender<FetchState>,
    latest: Mutex<Option<CancellationToken>>,
}

impl FetchController {
    pub fn new(source: Arc<dyn ArticleSource>, defaults: HeadlineDefaults) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                source,
                defaults,
                history: Mutex::new(ArticleStore::new()),
                state,
                events,
                latest: Mutex::new(None),
            }),
        }
    }

    /// Build a controller that immediately loads the home screen headlines.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(source: Arc<dyn ArticleSource>, defaults: HeadlineDefaults) -> Self {
        let controller = Self::new(source, defaults);
        controller.load_default_headlines();
        controller
    }

    /// Current state snapshot.
    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    /// Receiver of every state transition from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FetchState> {
        self.inner.events.subscribe()
    }

    /// Articles accumulated by headline fetches so far.
    pub fn history(&self) -> ArticleCollection {
        self.inner.lock_history().history()
    }

    /// Enter `Loading` now and resolve `request` in the background.
    pub fn request(&self, request: ArticleRequest, policy: HistoryPolicy) -> JoinHandle<()> {
        self.inner.publish(FetchState::Loading);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let result = inner.source.fetch(&request).await;
            inner.finish(&request, policy, result);
        })
    }

    /// Like [`request`](Self::request), but supersedes the previous call to this method.
    pub fn request_latest(&self, request: ArticleRequest, policy: HistoryPolicy) -> JoinHandle<()> {
        let token = CancellationToken::new();
        if let Some(previous) = self.inner.lock_latest().replace(token.clone()) {
            previous.cancel();
        }
        self.inner.publish(FetchState::Loading);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(request = %request.describe(), "Superseded before completion");
                    return;
                }
                result = inner.source.fetch(&request) => result,
            };

            if token.is_cancelled() {
                debug!(request = %request.describe(), "Dropping superseded result");
                return;
            }
            inner.finish(&request, policy, result);
        })
    }

    /// Headlines for the home screen, accumulated across calls.
    pub fn load_top_headlines(
        &self,
        country: Option<&str>,
        category: Option<Category>,
    ) -> JoinHandle<()> {
        self.request(
            ArticleRequest::headlines(country, category),
            HistoryPolicy::Accumulate,
        )
    }

    pub fn load_default_headlines(&self) -> JoinHandle<()> {
        let country = self.inner.defaults.default_country.clone();
        self.load_top_headlines(Some(&country), None)
    }

    /// Search results replace whatever was shown. Blank queries are ignored.
    pub fn search(&self, query: &str) -> Option<JoinHandle<()>> {
        if query.trim().is_empty() {
            debug!("Ignoring blank search query");
            return None;
        }
        Some(self.request_latest(ArticleRequest::search(query), HistoryPolicy::Replace))
    }

    /// Category listing; replaces whatever was shown.
    pub fn load_category(&self, category: Category) -> JoinHandle<()> {
        let country = self.inner.defaults.category_country.clone();
        self.request(
            ArticleRequest::headlines(Some(&country), Some(category)),
            HistoryPolicy::Replace,
        )
    }
}

impl Inner {
    fn lock_history(&self) -> MutexGuard<'_, ArticleStore> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_latest(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: FetchState) {
        self.state.send_replace(state.clone());
        // No subscribers is fine
        let _ = self.events.send(state);
    }

    fn finish(&self, request: &ArticleRequest, policy: HistoryPolicy, result: Result<NewsResponse>) {
        match result {
            Ok(response) => {
                debug!(
                    request = %request.describe(),
                    count = response.articles.len(),
                    "Fetched articles"
                );
                // Publishing under the history lock keeps state and history in step
                let mut history = self.lock_history();
                let articles = history.apply(policy, response.articles);
                self.publish(FetchState::Success(articles));
            }
            Err(e) => {
                error!(request = %request.describe(), "Error fetching articles: {}", e);
                self.publish(FetchState::Failure(e.user_message()));
            }
        }
    }
}
