use async_trait::async_trait;
use html_escape::decode_html_entities;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::app::{NewsError, Result};
use crate::config::ApiConfig;
use crate::domain::{Article, Category, NewsResponse};
use crate::fetcher::{ArticleRequest, ArticleSource};

/// Client for the GNews v4 REST API.
///
/// Built explicitly from an [`ApiConfig`] and handed to whoever needs it;
/// there is no process-wide instance.
pub struct GNewsClient {
    client: Client,
    base_url: Url,
    api_key: String,
    language: String,
}

impl GNewsClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    pub async fn search(&self, query: &str) -> Result<NewsResponse> {
        self.get("search", &[("q", query)]).await
    }

    pub async fn top_headlines(&self) -> Result<NewsResponse> {
        self.get("top-headlines", &[]).await
    }

    pub async fn top_headlines_for_country(&self, country: &str) -> Result<NewsResponse> {
        self.get("top-headlines", &[("country", country)]).await
    }

    pub async fn category_headlines(
        &self,
        category: Category,
        country: &str,
    ) -> Result<NewsResponse> {
        self.get(
            "top-headlines",
            &[("category", category.as_str()), ("country", country)],
        )
        .await
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<NewsResponse> {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("lang", &self.language);
            pairs.append_pair("apikey", &self.api_key);
        }

        debug!(path, ?params, "Requesting articles");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(path, "News API rate limit hit");
            return Err(NewsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            warn!(path, status = status.as_u16(), %message, "News API returned an error");
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut news: NewsResponse = response.json().await?;
        news.articles.iter_mut().for_each(decode_article);
        debug!(path, count = news.articles.len(), total = news.total_articles, "Fetched articles");

        Ok(news)
    }
}

#[async_trait]
impl ArticleSource for GNewsClient {
    async fn fetch(&self, request: &ArticleRequest) -> Result<NewsResponse> {
        match request {
            ArticleRequest::Search { query } => self.search(query).await,
            ArticleRequest::TopHeadlines => self.top_headlines().await,
            ArticleRequest::TopHeadlinesForCountry { country } => {
                self.top_headlines_for_country(country).await
            }
            ArticleRequest::CategoryHeadlines { category, country } => {
                self.category_headlines(*category, country).await
            }
        }
    }
}

/// GNews reports failures as `{"errors": [...]}` or `{"errors": {"field": "..."}}`.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let messages: Vec<&str> = match value.get("errors")? {
        serde_json::Value::Array(errors) => errors.iter().filter_map(|e| e.as_str()).collect(),
        serde_json::Value::Object(errors) => errors.values().filter_map(|e| e.as_str()).collect(),
        serde_json::Value::String(error) => vec![error.as_str()],
        _ => Vec::new(),
    };

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn decode_article(article: &mut Article) {
    article.title = decode_html_entities(&article.title).into_owned();
    article.description = decode_html_entities(&article.description).into_owned();
    article.content = decode_html_entities(&article.content).into_owned();
}
