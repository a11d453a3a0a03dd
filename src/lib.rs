//! # Newsroom
//!
//! Core of a news reader: headlines, categories, search-as-you-type and
//! per-user favorites.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Controller (history, state) → CLI
//!              ↑
//!   Auth → Favorites store
//! ```
//!
//! - [`fetcher`]: GNews HTTP client behind the `ArticleSource` trait
//! - [`controller`]: fetch state machine, history merging, search debouncing
//! - [`store`]: SQLite favorites keyed by user
//! - [`auth`]: Firebase identity client and account form checks
//!
//! ## Quick Start
//!
//! ```bash
//! # Top headlines
//! newsroom headlines
//!
//! # One category, saving the third article
//! newsroom headlines --category sports --save 3
//!
//! # Search
//! newsroom search "rust language"
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the news
/// client, favorites store and identity provider.
pub mod app;

/// Identity provider trait, Firebase client and account flows.
pub mod auth;

/// Command-line interface using clap.
///
/// - `headlines [--country] [--category]` - Top headlines
/// - `categories` - List categories
/// - `search <query>` - Search articles
/// - `watch` - Debounced search fed from stdin
/// - `favorites list|show` - Saved articles
/// - `sign-up`, `sign-in`, `sign-out`, `reset-password` - Account
pub mod cli;

/// Configuration loaded from `~/.config/newsroom/config.toml`.
pub mod config;

/// State holders the screens observe.
///
/// - [`FetchController`](controller::FetchController): Loading/Success/Failure state machine
/// - [`ArticleStore`](controller::ArticleStore): history merge and replace
/// - [`SearchDebouncer`](controller::SearchDebouncer): quiet-window search input
/// - [`FavoritesController`](controller::FavoritesController): favorites list and selection
pub mod controller;

/// Core domain models.
///
/// - [`Article`](domain::Article): one news article, identified by url
/// - [`Category`](domain::Category): topic filters
/// - [`FetchState`](domain::FetchState): what the news screens render
pub mod domain;

/// News API access.
///
/// - [`ArticleSource`](fetcher::ArticleSource): Async trait for article fetching
/// - [`GNewsClient`](fetcher::GNewsClient): reqwest-based implementation
pub mod fetcher;

/// SQLite persistence for favorites.
///
/// - [`FavoritesGateway`](store::FavoritesGateway): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

#[cfg(test)]
mod test_helpers;
