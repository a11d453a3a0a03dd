pub mod article;
pub mod state;

pub use article::{Article, Category, NewsResponse, Source};
pub use state::{ArticleCollection, FavoritesState, FetchState};
