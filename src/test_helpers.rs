//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{NewsError, Result};
use crate::auth::IdentityProvider;
use crate::domain::{Article, NewsResponse};
use crate::fetcher::{ArticleRequest, ArticleSource};

pub fn articles(urls: &[&str]) -> Vec<Article> {
    urls.iter()
        .map(|url| Article::new(*url, format!("Title {}", url)))
        .collect()
}

pub fn urls(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.url.as_str()).collect()
}

/// Article source that replays queued responses in order.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<(Duration, Result<NewsResponse>)>>,
    requests: Mutex<Vec<ArticleRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, urls: &[&str]) {
        self.push_ok_after(Duration::ZERO, urls);
    }

    pub fn push_ok_after(&self, delay: Duration, urls: &[&str]) {
        let articles = articles(urls);
        let response = NewsResponse {
            total_articles: articles.len() as u64,
            articles,
        };
        self.responses
            .lock()
            .unwrap()
            .push_back((delay, Ok(response)));
    }

    pub fn push_err(&self, err: NewsError) {
        self.push_err_after(Duration::ZERO, err);
    }

    pub fn push_err_after(&self, delay: Duration, err: NewsError) {
        self.responses.lock().unwrap().push_back((delay, Err(err)));
    }

    pub fn requests(&self) -> Vec<ArticleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    async fn fetch(&self, request: &ArticleRequest) -> Result<NewsResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        let (delay, result) =
            next.unwrap_or_else(|| (Duration::ZERO, Err(NewsError::Other("no scripted response".into()))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

/// Identity provider that accepts any credentials unless told to fail.
#[derive(Default)]
pub struct FakeIdentity {
    current: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(uid: &str) -> Self {
        let identity = Self::default();
        *identity.current.lock().unwrap() = Some(uid.to_string());
        identity
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn attempt(&self, email: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(NewsError::Auth(message));
        }
        let uid = format!("uid-{}", email);
        *self.current.lock().unwrap() = Some(uid.clone());
        Ok(uid)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<String> {
        self.attempt(email)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<String> {
        self.attempt(email)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }

    async fn send_password_reset(&self, _email: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
