use std::collections::HashSet;

use crate::domain::{Article, ArticleCollection};

/// How a finished fetch combines with what was shown before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Keep earlier articles and append unseen ones (home headlines).
    Accumulate,
    /// Drop earlier articles (search and category listings).
    Replace,
}

/// Concatenate `existing` and `incoming`, keeping the first article seen for each url.
pub fn merge(existing: &[Article], incoming: &[Article]) -> Vec<Article> {
    let mut seen = HashSet::with_capacity(existing.len() + incoming.len());
    existing
        .iter()
        .chain(incoming)
        .filter(|&article| seen.insert(article.url.as_str()))
        .cloned()
        .collect()
}

pub fn replace(incoming: Vec<Article>) -> Vec<Article> {
    incoming
}

/// Articles fetched so far by one controller.
///
/// `history` is what accumulating fetches merge into. `displayed` is the
/// collection currently shown; a replacing fetch changes only that, so the
/// next accumulating fetch builds on the earlier history again.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    history: ArticleCollection,
    displayed: ArticleCollection,
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleStore {
    pub fn new() -> Self {
        let empty: ArticleCollection = Vec::new().into();
        Self {
            history: empty.clone(),
            displayed: empty,
        }
    }

    pub fn history(&self) -> ArticleCollection {
        self.history.clone()
    }

    pub fn displayed(&self) -> ArticleCollection {
        self.displayed.clone()
    }

    pub fn merge_into_history(&mut self, incoming: &[Article]) -> ArticleCollection {
        self.history = merge(&self.history, incoming).into();
        self.displayed = self.history.clone();
        self.displayed()
    }

    pub fn replace_history(&mut self, incoming: Vec<Article>) -> ArticleCollection {
        self.displayed = replace(incoming).into();
        self.displayed()
    }

    pub fn apply(&mut self, policy: HistoryPolicy, incoming: Vec<Article>) -> ArticleCollection {
        match policy {
            HistoryPolicy::Accumulate => self.merge_into_history(&incoming),
            HistoryPolicy::Replace => self.replace_history(incoming),
        }
    }
}
