//! Screen-facing state holders built on the fetcher, store and auth layers.

pub mod debounce;
pub mod favorites;
pub mod fetch;
pub mod history;

pub use debounce::SearchDebouncer;
pub use favorites::{FavoriteSaved, FavoritesController};
pub use fetch::{FetchController, HeadlineDefaults};
pub use history::{ArticleStore, HistoryPolicy};
