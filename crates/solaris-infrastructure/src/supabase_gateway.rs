//! SupabaseGateway - REST implementation of the remote data gateway.
//!
//! Talks to a Supabase-compatible project: GoTrue endpoints under `/auth/v1` for
//! credentials and PostgREST endpoints under `/rest/v1` for profiles and posts.
//! The session lives in memory and, when a session file is configured, is written to
//! disk on every change and restored on the next start. A PostgREST call rejected with
//! 401 refreshes the session once and is retried.

use crate::dto::{AuthErrorBody, SignUpRequest, SignUpResponse, StoredSession, TokenResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use solaris_core::config::BackendConfig;
use solaris_core::gateway::{
    AuthEventKind, AuthListener, AuthListenerRegistry, AuthSession, AuthStateEvent,
    AuthSubscription, RemoteDataGateway,
};
use solaris_core::post::PostRecord;
use solaris_core::user::ProfileRecord;
use solaris_core::{AuthError, DataFetchError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const AUTH_PATH: &str = "/auth/v1";
const REST_PATH: &str = "/rest/v1";

/// Gateway to the hosted auth/database backend.
#[derive(Clone)]
pub struct SupabaseGateway {
    client: Client,
    base_url: Option<String>,
    publishable_key: Option<String>,
    session: Arc<RwLock<Option<AuthSession>>>,
    session_file: Option<PathBuf>,
    listeners: AuthListenerRegistry,
}

impl SupabaseGateway {
    /// Creates a gateway for the given project URL and publishable key.
    pub fn new(base_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self::build(Some(base_url.into()), Some(publishable_key.into()))
    }

    /// Creates a gateway from configuration. Missing values are reported as
    /// misconfiguration on the first credential call.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::build(config.url.clone(), config.publishable_key.clone())
    }

    fn build(base_url: Option<String>, publishable_key: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let publishable_key = publishable_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if base_url.is_none() || publishable_key.is_none() {
            tracing::warn!("[Backend] Project URL or publishable key not configured");
        }

        Self {
            client: Client::new(),
            base_url,
            publishable_key,
            session: Arc::new(RwLock::new(None)),
            session_file: None,
            listeners: AuthListenerRegistry::new(),
        }
    }

    /// Persists the session to `path` and restores any session already stored there.
    ///
    /// A missing or unreadable file starts signed out.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let restored = load_session(&path);
        if let Some(session) = &restored {
            tracing::info!("[Backend] Restored session for user {}", session.user_id);
        }
        self.session = Arc::new(RwLock::new(restored));
        self.session_file = Some(path);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.publishable_key.is_some()
    }

    /// Exchanges the stored refresh token for a new session and notifies listeners.
    pub async fn refresh_session(&self) -> Result<AuthSession, AuthError> {
        let refresh_token = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or_else(|| AuthError::rejected("No refresh token available"))?;

        let response: TokenResponse = self
            .post_auth(
                "token?grant_type=refresh_token",
                &serde_json::json!({ "refresh_token": refresh_token }),
            )
            .await?;

        let session = response.into_session();
        self.store_session(session.clone(), AuthEventKind::TokenRefreshed)
            .await;
        Ok(session)
    }

    fn endpoint(&self) -> Result<(&str, &str), AuthError> {
        match (self.base_url.as_deref(), self.publishable_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(AuthError::misconfigured(
                "Backend URL or publishable API key is not configured",
            )),
        }
    }

    async fn store_session(&self, session: AuthSession, kind: AuthEventKind) {
        *self.session.write().await = Some(session.clone());
        tracing::info!("[Backend] Session stored for user {}", session.user_id);
        self.persist_session(&session).await;
        self.listeners
            .notify(&AuthStateEvent::new(kind, Some(session)));
    }

    async fn persist_session(&self, session: &AuthSession) {
        let Some(path) = &self.session_file else {
            return;
        };
        if let Err(e) = write_session(path, session).await {
            tracing::warn!("[Backend] Failed to persist session to {}: {}", path.display(), e);
        }
    }

    async fn has_refresh_token(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.refresh_token.is_some())
    }

    async fn post_auth<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (base_url, key) = self.endpoint()?;
        let url = format!("{base_url}{AUTH_PATH}/{path}");

        let response = self
            .client
            .post(url)
            .header("apikey", key)
            .bearer_auth(key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_auth_http_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|err| AuthError::rejected(format!("Unexpected auth response: {err}")))
    }

    /// Authorizes a PostgREST request with the session token, or the publishable
    /// key when signed out.
    async fn rest_request(&self, path: &str) -> Result<RequestBuilder, DataFetchError> {
        let (base_url, key) = self
            .endpoint()
            .map_err(|err| DataFetchError::Transport(err.message))?;
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| key.to_string());

        Ok(self
            .client
            .get(format!("{base_url}{REST_PATH}/{path}"))
            .header("apikey", key)
            .bearer_auth(token))
    }

    async fn send_rest(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, DataFetchError> {
        self.rest_request(path)
            .await?
            .query(query)
            .send()
            .await
            .map_err(|err| DataFetchError::Transport(err.to_string()))
    }

    /// Runs a PostgREST query. An expired access token is refreshed once and the
    /// query retried with the new token.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, DataFetchError> {
        let mut response = self.send_rest(path, query).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.has_refresh_token().await {
            tracing::info!("[Backend] Access token rejected, refreshing session");
            match self.refresh_session().await {
                Ok(_) => response = self.send_rest(path, query).await?,
                Err(e) => tracing::warn!("[Backend] Session refresh failed: {}", e),
            }
        }

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataFetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|err| DataFetchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl RemoteDataGateway for SupabaseGateway {
    async fn get_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, DataFetchError> {
        let filter = format!("eq.{user_id}");
        let rows: Vec<ProfileRecord> = self
            .fetch_rows("profiles", &[("id", filter.as_str()), ("select", "*")])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataFetchError> {
        let rows: Vec<serde_json::Value> = self
            .fetch_rows(
                "posts",
                &[("select", "*,user:profiles(*)"), ("order", "created_at.desc")],
            )
            .await?;

        let posts = decode_post_rows(rows);
        tracing::debug!("[Backend] Listed {} posts", posts.len());
        Ok(posts)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        let request = SignUpRequest::new(email, password, display_name);
        let response: SignUpResponse = self.post_auth("signup", &request).await?;

        match response.into_session() {
            Some(session) => {
                self.store_session(session.clone(), AuthEventKind::SignedIn)
                    .await;
                Ok(Some(session))
            }
            None => {
                tracing::info!("[Backend] Sign-up accepted, awaiting email confirmation");
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response: TokenResponse = self
            .post_auth(
                "token?grant_type=password",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        let session = response.into_session();
        self.store_session(session.clone(), AuthEventKind::SignedIn)
            .await;
        Ok(session)
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription {
        self.listeners.subscribe(listener)
    }
}

/// Decodes rows one by one so a single malformed row does not drop the listing.
fn decode_post_rows(rows: Vec<serde_json::Value>) -> Vec<PostRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<PostRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("[Backend] Skipping malformed post row: {}", e);
                None
            }
        })
        .collect()
}

fn load_session(path: &Path) -> Option<AuthSession> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("[Backend] Cannot read session file {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<StoredSession>(&content) {
        Ok(stored) => Some(stored.into()),
        Err(e) => {
            tracing::warn!("[Backend] Ignoring corrupt session file {}: {}", path.display(), e);
            None
        }
    }
}

async fn write_session(path: &Path, session: &AuthSession) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(&StoredSession::from(session))?;
    tokio::fs::write(path, json).await?;

    // Tokens are credentials.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    Ok(())
}

fn map_transport_error(err: reqwest::Error) -> AuthError {
    if err.is_builder() {
        AuthError::misconfigured(format!("Invalid backend URL: {err}"))
    } else if err.is_connect() || err.is_timeout() || err.is_request() {
        AuthError::unreachable(format!("Failed to fetch: {err}"))
    } else {
        AuthError::rejected(format!("Auth request failed: {err}"))
    }
}

fn map_auth_http_error(status: StatusCode, body: &str) -> AuthError {
    let message = serde_json::from_str::<AuthErrorBody>(body)
        .ok()
        .and_then(AuthErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

    let key_problem = {
        let lower = message.to_lowercase();
        lower.contains("api key") || lower.contains("apikey")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if key_problem => {
            AuthError::misconfigured(message)
        }
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            AuthError::unreachable(message)
        }
        _ => AuthError::rejected(message),
    }
}
