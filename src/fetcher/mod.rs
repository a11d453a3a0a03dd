pub mod gnews;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Category, NewsResponse};

pub use gnews::GNewsClient;

/// One call against the news API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRequest {
    Search { query: String },
    TopHeadlines,
    TopHeadlinesForCountry { country: String },
    CategoryHeadlines { category: Category, country: String },
}

impl ArticleRequest {
    /// Pick the headline endpoint from the optional filters.
    ///
    /// Both filters select category headlines, a country alone selects
    /// country headlines, and no filter selects worldwide headlines. A
    /// category without a country falls back to worldwide headlines.
    pub fn headlines(country: Option<&str>, category: Option<Category>) -> Self {
        match (country, category) {
            (Some(country), Some(category)) => ArticleRequest::CategoryHeadlines {
                category,
                country: country.to_string(),
            },
            (Some(country), None) => ArticleRequest::TopHeadlinesForCountry {
                country: country.to_string(),
            },
            (None, _) => ArticleRequest::TopHeadlines,
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        ArticleRequest::Search {
            query: query.into(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ArticleRequest::Search { query } => format!("search '{}'", query),
            ArticleRequest::TopHeadlines => "top headlines".to_string(),
            ArticleRequest::TopHeadlinesForCountry { country } => {
                format!("top headlines for '{}'", country)
            }
            ArticleRequest::CategoryHeadlines { category, country } => {
                format!("{} headlines for '{}'", category, country)
            }
        }
    }
}

/// Anything that can answer an [`ArticleRequest`].
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, request: &ArticleRequest) -> Result<NewsResponse>;
}
