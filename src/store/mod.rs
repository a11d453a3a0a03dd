pub mod sqlite;

use crate::app::Result;
use crate::domain::Article;

pub use sqlite::SqliteStore;

/// Per-user keyed storage for saved articles.
///
/// Records are keyed by `(uid, article.title)`: saving a second article with
/// the same title for the same user overwrites the first.
pub trait FavoritesGateway {
    /// Create the per-user root record. Returns `true` if it did not exist yet.
    fn initialize_user(&self, uid: &str) -> Result<bool>;

    fn save(&self, uid: &str, article: &Article) -> Result<()>;
    fn fetch_all(&self, uid: &str) -> Result<Vec<Article>>;
    fn fetch_one(&self, uid: &str, title: &str) -> Result<Option<Article>>;
}
