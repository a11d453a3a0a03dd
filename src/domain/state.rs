use std::sync::Arc;

use crate::domain::Article;

/// Ordered, url-unique list of articles. Replaced wholesale, never mutated.
pub type ArticleCollection = Arc<[Article]>;

/// Observable state of one fetch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(ArticleCollection),
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn articles(&self) -> Option<&[Article]> {
        match self {
            FetchState::Success(articles) => Some(&articles[..]),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// A successful fetch that produced nothing to show.
    pub fn is_empty(&self) -> bool {
        self.articles().is_some_and(|a| a.is_empty())
    }
}

/// Observable state of the saved-articles screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesState {
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected: Option<Article>,
}
