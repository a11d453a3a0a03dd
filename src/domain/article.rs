use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// A news article as returned by the news API.
///
/// `url` is the identity of an article: merging and de-duplication key on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
    pub published_at: String,
    pub source: Source,
}

impl Article {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = published_at.into();
        self
    }

    pub fn with_source(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.source = Source {
            name: name.into(),
            url: url.into(),
        };
        self
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Best available body text for the detail view
    pub fn display_content(&self) -> &str {
        if !self.content.is_empty() {
            &self.content
        } else {
            &self.description
        }
    }
}

/// Body of every news API endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsResponse {
    pub total_articles: u64,
    pub articles: Vec<Article>,
}

/// Topic filters offered on the category screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Business,
    Health,
    Science,
    Sports,
    Technology,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Business,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
        Category::Entertainment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
        }
    }

    /// Heading used above a category listing, e.g. "Sports News".
    pub fn heading(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} News", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Expected one of: {}",
                    s,
                    Category::ALL.map(Category::as_str).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_gnews_article() {
        let json = r#"{
            "title": "Rust 2.0 announced",
            "description": "Not really",
            "content": "Body text",
            "url": "https://example.com/rust",
            "image": "https://example.com/rust.png",
            "publishedAt": "2024-05-01T10:00:00Z",
            "source": { "name": "Example", "url": "https://example.com" }
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Rust 2.0 announced");
        assert_eq!(article.image_url.as_deref(), Some("https://example.com/rust.png"));
        assert_eq!(article.published_at, "2024-05-01T10:00:00Z");
        assert_eq!(article.source.name, "Example");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let article: Article = serde_json::from_str(r#"{"url": "https://example.com/a"}"#).unwrap();
        assert_eq!(article.url, "https://example.com/a");
        assert_eq!(article.title, "");
        assert!(article.image_url.is_none());
        assert_eq!(article.source, Source::default());
    }

    #[test]
    fn test_deserialize_news_response() {
        let json = r#"{"totalArticles": 2, "articles": [{"url": "u1"}, {"url": "u2"}]}"#;
        let response: NewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_articles, 2);
        assert_eq!(response.articles.len(), 2);
    }

    #[test]
    fn test_display_title_without_title() {
        assert_eq!(Article::new("u1", "").display_title(), "(Untitled)");
        assert_eq!(Article::new("u1", "Hello").display_title(), "Hello");
    }

    #[test]
    fn test_display_content_falls_back_to_description() {
        let article = Article::new("u1", "t").with_description("summary");
        assert_eq!(article.display_content(), "summary");
        let article = article.with_content("full");
        assert_eq!(article.display_content(), "full");
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("Sports".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!(" technology ".parse::<Category>().unwrap(), Category::Technology);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_heading() {
        assert_eq!(Category::Entertainment.heading(), "Entertainment News");
    }
}
