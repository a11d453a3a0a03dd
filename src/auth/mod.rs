pub mod firebase;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::app::{NewsError, Result};
use crate::store::FavoritesGateway;

pub use firebase::{FirebaseAuth, UserSession};

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<String>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<String>;
    async fn sign_out(&self) -> Result<()>;
    async fn send_password_reset(&self, email: &str) -> Result<()>;
}

/// Account flows as the sign-in, sign-up and forgot-password screens use them.
///
/// Form input is checked before the provider is called, and a successful
/// sign-in makes sure the user's favorites root exists.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    favorites: Arc<dyn FavoritesGateway + Send + Sync>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        favorites: Arc<dyn FavoritesGateway + Send + Sync>,
    ) -> Self {
        Self {
            identity,
            favorites,
        }
    }

    pub fn current_user(&self) -> Option<String> {
        let uid = self.identity.current_user_id();
        match &uid {
            Some(uid) => debug!(%uid, "Current user"),
            None => debug!("No user is currently signed in"),
        }
        uid
    }

    pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<String> {
        require(email, "Please enter your email")?;
        require(password, "Please enter a password")?;
        require(confirm, "Please confirm your password")?;
        if password != confirm {
            return Err(NewsError::Auth("Passwords do not match!".to_string()));
        }

        info!("Sign-up started for {}", email);
        let uid = self
            .identity
            .sign_up(email, password)
            .await
            .inspect_err(|e| error!("Sign up failed: {}", e))?;
        Ok(uid)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        require(email, "Please enter your email")?;
        require(password, "Please enter a password")?;

        let uid = self
            .identity
            .sign_in(email, password)
            .await
            .inspect_err(|e| error!("Sign in failed: {}", e))?;
        self.initialize_user(&uid);
        Ok(uid)
    }

    pub async fn reset_password(&self, email: &str) -> Result<()> {
        require(email, "Please enter your email")?;

        info!("Sending password reset email to {}", email);
        self.identity
            .send_password_reset(email)
            .await
            .inspect_err(|e| error!("Failed to send password reset email: {}", e))
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.identity
            .sign_out()
            .await
            .inspect_err(|e| error!("Sign out failed: {}", e))
    }

    fn initialize_user(&self, uid: &str) {
        match self.favorites.initialize_user(uid) {
            Ok(true) => info!(%uid, "Initialized favorites for new user"),
            Ok(false) => debug!(%uid, "Favorites already initialized"),
            Err(e) => error!(%uid, "Error initializing favorites: {}", e),
        }
    }
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        Err(NewsError::Auth(message.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::test_helpers::FakeIdentity;

    fn service() -> (AuthService, Arc<FakeIdentity>, Arc<SqliteStore>) {
        let identity = Arc::new(FakeIdentity::new());
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let service = AuthService::new(identity.clone(), store.clone());
        (service, identity, store)
    }

    #[tokio::test]
    async fn test_sign_up_validates_form() {
        let (service, identity, _) = service();

        let cases = [
            ("", "pw", "pw", "Please enter your email"),
            ("a@b.c", "", "pw", "Please enter a password"),
            ("a@b.c", "pw", "", "Please confirm your password"),
            ("a@b.c", "pw", "other", "Passwords do not match!"),
        ];
        for (email, password, confirm, expected) in cases {
            let err = service.sign_up(email, password, confirm).await.unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_success() {
        let (service, identity, _) = service();
        let uid = service.sign_up("a@b.c", "secret", "secret").await.unwrap();
        assert_eq!(uid, "uid-a@b.c");
        assert_eq!(identity.calls(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_initializes_favorites_root() {
        let (service, _, store) = service();
        let uid = service.sign_in("a@b.c", "secret").await.unwrap();

        assert_eq!(service.current_user().as_deref(), Some(uid.as_str()));
        assert!(!store.initialize_user(&uid).unwrap());
    }

    #[tokio::test]
    async fn test_sign_in_error_is_returned() {
        let (service, identity, _) = service();
        identity.fail_with("The email or password is incorrect.");

        let err = service.sign_in("a@b.c", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "The email or password is incorrect.");
        assert!(service.current_user().is_none());
    }

    #[tokio::test]
    async fn test_reset_password_requires_email() {
        let (service, identity, _) = service();
        assert!(service.reset_password("").await.is_err());
        tokio_test::assert_ok!(service.reset_password("a@b.c").await);
        assert_eq!(identity.calls(), 1);
    }

    #[tokio::test]
    async fn test_sign_out() {
        let (service, _, _) = service();
        service.sign_in("a@b.c", "secret").await.unwrap();
        service.sign_out().await.unwrap();
        assert!(service.current_user().is_none());
    }
}
