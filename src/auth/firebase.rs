use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app::{NewsError, Result};
use crate::auth::IdentityProvider;
use crate::config::AuthConfig;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Email/password accounts through the Identity Toolkit REST API.
pub struct FirebaseAuth {
    client: Client,
    base_url: Url,
    api_key: String,
    session: Mutex<Option<UserSession>>,
    session_path: Option<PathBuf>,
}

impl FirebaseAuth {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            session: Mutex::new(None),
            session_path: None,
        })
    }

    /// Keep the session in `path`, restoring any session already stored there.
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        match Self::read_session(&path) {
            Ok(Some(session)) => {
                debug!(uid = %session.uid, "Restored saved session");
                *self.lock_session() = Some(session);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable session file {}: {}", path.display(), e),
        }
        self.session_path = Some(path);
        self
    }

    /// `<data dir>/newsroom/session.json`
    pub fn default_session_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("newsroom").join("session.json"))
    }

    pub fn session(&self) -> Option<UserSession> {
        self.lock_session().clone()
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<UserSession>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_session(path: &Path) -> Result<Option<UserSession>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn store_session(&self, session: UserSession) -> Result<()> {
        if let Some(path) = &self.session_path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_vec_pretty(&session)?)?;
        }
        *self.lock_session() = Some(session);
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &str, body: serde_json::Value) -> Result<T> {
        // "./" keeps the colon in "accounts:signUp" from being read as a scheme
        let mut url = self.base_url.join(&format!("./{}", endpoint))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), %code, "Identity provider rejected request");
            return Err(NewsError::Auth(describe_error(&code)));
        }

        Ok(response.json().await?)
    }

    async fn authenticate(&self, endpoint: &str, email: &str, password: &str) -> Result<String> {
        let account: AccountResponse = self
            .call(
                endpoint,
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        if account.local_id.is_empty() {
            return Err(NewsError::Auth("User UID is null".to_string()));
        }

        let uid = account.local_id.clone();
        self.store_session(UserSession {
            uid: account.local_id,
            email: if account.email.is_empty() {
                email.to_string()
            } else {
                account.email
            },
            id_token: account.id_token,
            refresh_token: account.refresh_token,
        })?;

        Ok(uid)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    fn current_user_id(&self) -> Option<String> {
        self.lock_session().as_ref().map(|s| s.uid.clone())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<String> {
        let uid = self.authenticate("accounts:signUp", email, password).await?;
        info!(%uid, "Account created");
        Ok(uid)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let uid = self
            .authenticate("accounts:signInWithPassword", email, password)
            .await?;
        info!(%uid, "Signed in");
        Ok(uid)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.lock_session() = None;
        if let Some(path) = &self.session_path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Signed out");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "accounts:sendOobCode",
                serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        info!("Password reset email requested");
        Ok(())
    }
}

/// Turn an Identity Toolkit error code into a sentence.
///
/// Codes sometimes carry detail after " : ", e.g.
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
fn describe_error(code: &str) -> String {
    let (name, detail) = match code.split_once(" : ") {
        Some((name, detail)) => (name.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };

    let text = match name {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "The email or password is incorrect."
        }
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "USER_DISABLED" => "The user account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "WEAK_PASSWORD" => detail.unwrap_or("The password is too weak."),
        "" => "Unknown error",
        other => other,
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth_for(server: &MockServer) -> FirebaseAuth {
        let config = AuthConfig {
            base_url: format!("{}/v1/", server.uri()),
            api_key: "web-key".into(),
            persist_session: false,
        };
        FirebaseAuth::new(&config).unwrap()
    }

    async fn mount_sign_in(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "web-key"))
            .and(body_partial_json(serde_json::json!({
                "email": "reader@example.com",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-42",
                "email": "reader@example.com",
                "idToken": "token",
                "refreshToken": "refresh"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_sign_in_sets_current_user() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;

        let auth = auth_for(&server);
        assert!(auth.current_user_id().is_none());

        let uid = auth.sign_in("reader@example.com", "hunter22").await.unwrap();
        assert_eq!(uid, "uid-42");
        assert_eq!(auth.current_user_id().as_deref(), Some("uid-42"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_described() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
            })))
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let err = auth.sign_in("reader@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "The email or password is incorrect.");
        assert!(auth.current_user_id().is_none());
    }

    #[tokio::test]
    async fn test_session_survives_restart_and_sign_out_clears_it() {
        let server = MockServer::start().await;
        mount_sign_in(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let session_file = dir.path().join("session.json");

        let auth = auth_for(&server).with_session_file(session_file.clone());
        auth.sign_in("reader@example.com", "hunter22").await.unwrap();
        assert!(session_file.exists());

        let restored = auth_for(&server).with_session_file(session_file.clone());
        assert_eq!(restored.current_user_id().as_deref(), Some("uid-42"));
        assert_eq!(restored.session().unwrap().email, "reader@example.com");

        restored.sign_out().await.unwrap();
        assert!(restored.current_user_id().is_none());
        assert!(!session_file.exists());
    }

    #[test]
    fn test_unreadable_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let session_file = dir.path().join("session.json");
        assert!(FirebaseAuth::read_session(&session_file).unwrap().is_none());

        fs::write(&session_file, "not json").unwrap();
        assert!(FirebaseAuth::read_session(session_file.as_path()).is_err());

        let auth = FirebaseAuth::new(&AuthConfig::default())
            .unwrap()
            .with_session_file(session_file);
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn test_password_reset_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sendOobCode"))
            .and(body_partial_json(serde_json::json!({
                "requestType": "PASSWORD_RESET",
                "email": "reader@example.com"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "email": "reader@example.com" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        tokio_test::assert_ok!(auth.send_password_reset("reader@example.com").await);
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(
            describe_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters"
        );
        assert_eq!(
            describe_error("EMAIL_EXISTS"),
            "The email address is already in use by another account."
        );
        assert_eq!(describe_error("SOMETHING_NEW"), "SOMETHING_NEW");
        assert_eq!(describe_error(""), "Unknown error");
    }
}
