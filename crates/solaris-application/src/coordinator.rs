//! Application state coordinator.
//!
//! `AppCoordinator` exclusively owns the [`AppSnapshot`]. Views read cloned
//! snapshots and send intents through the public methods here; every mutation is a
//! [`StateUpdate`] applied under the write lock. The lock is never held across a
//! gateway call, so overlapping calls may resolve in any order while each
//! resolution lands as one atomic write.
//!
//! # Degraded mode
//!
//! Data failures (profile, posts) are logged and leave the seed data in place.
//! Credential failures are surfaced as a notice; when the backend is unreachable or
//! misconfigured the client additionally enters demo mode so it stays usable.

use crate::credentials::{AuthMode, Credentials};
use solaris_core::chat::Message;
use solaris_core::config::CoordinatorConfig;
use solaris_core::gateway::{
    AssistantGateway, AuthEventKind, AuthListener, AuthSession, AuthStateEvent,
    AuthSubscription, RemoteDataGateway,
};
use solaris_core::seed::{ASSISTANT_USERNAME, SOLARIS_PERSONA};
use solaris_core::{
    AppSnapshot, AuthError, DataFetchError, Notice, Result, Screen, SolarisError, StateUpdate,
};
use solaris_interaction::ASSISTANT_TECHNICAL_ISSUE;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub const REGISTERED_NOTICE: &str = "Registration complete! Sign in now.";
const SIGN_IN_REQUIRED: &str = "Sign in to continue";

/// Tunables for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Upper bound for each outbound call; `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
    /// Instruction prepended to prompts sent to the assistant.
    pub persona_instruction: String,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            call_timeout: None,
            persona_instruction: SOLARIS_PERSONA.to_string(),
        }
    }
}

impl CoordinatorSettings {
    pub fn from_config(config: &CoordinatorConfig) -> Self {
        Self {
            call_timeout: config.call_timeout(),
            ..Self::default()
        }
    }
}

/// Result of a credential submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Signed in with a backend session.
    SignedIn,
    /// Account created; `session` tells whether the backend issued one right away.
    Registered { session: bool },
    /// Backend unavailable; authenticated on local data only.
    DemoMode(AuthError),
    /// Backend refused the credentials.
    Failed(AuthError),
    /// Rejected locally before any backend call.
    Invalid,
    /// Another submission is still in flight.
    Busy,
}

/// Owns the client snapshot and coordinates the gateways.
pub struct AppCoordinator {
    remote: Arc<dyn RemoteDataGateway>,
    assistant: Arc<dyn AssistantGateway>,
    state: RwLock<AppSnapshot>,
    settings: CoordinatorSettings,
}

impl AppCoordinator {
    /// Creates a coordinator starting from the seed snapshot.
    pub fn new(remote: Arc<dyn RemoteDataGateway>, assistant: Arc<dyn AssistantGateway>) -> Self {
        Self {
            remote,
            assistant,
            state: RwLock::new(AppSnapshot::seeded()),
            settings: CoordinatorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CoordinatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Returns a read-only copy of the current state.
    pub async fn snapshot(&self) -> AppSnapshot {
        self.state.read().await.clone()
    }

    /// Reads a slice of the state without cloning the whole snapshot.
    pub async fn read<R>(&self, f: impl FnOnce(&AppSnapshot) -> R) -> R {
        f(&*self.state.read().await)
    }

    /// Applies updates as one atomic write: all of them or none.
    pub async fn update<I>(&self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = StateUpdate>,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        for update in updates {
            next.apply(update)?;
        }
        *state = next;
        Ok(())
    }

    /// Registers a listener for backend session transitions.
    pub fn subscribe_auth_events(&self, listener: AuthListener) -> AuthSubscription {
        self.remote.on_auth_state_change(listener)
    }

    // ========================================================================
    // Session bootstrap and reconciliation
    // ========================================================================

    /// Looks up an existing session at startup and reconciles remote data when found.
    pub async fn bootstrap(&self) {
        match self.bounded(self.remote.get_session()).await {
            Some(Some(session)) => {
                tracing::info!("[Coordinator] Resuming session for {}", session.user_id);
                self.enter_authenticated(false).await;
                self.reconcile(&session).await;
            }
            Some(None) => tracing::debug!("[Coordinator] No stored session"),
            None => tracing::warn!("[Coordinator] Session lookup timed out"),
        }
        self.apply_logged(StateUpdate::BootstrapFinished).await;
    }

    /// Reacts to a session transition reported by the backend.
    pub async fn handle_auth_event(&self, event: AuthStateEvent) {
        match (event.kind, event.session) {
            (AuthEventKind::SignedIn | AuthEventKind::TokenRefreshed, Some(session)) => {
                self.enter_authenticated(false).await;
                self.reconcile(&session).await;
            }
            (kind, _) => {
                tracing::debug!("[Coordinator] Ignoring auth event {:?}", kind);
            }
        }
    }

    /// Fetches profile and posts once per process.
    async fn reconcile(&self, session: &AuthSession) {
        {
            let mut state = self.state.write().await;
            if state.reconciled {
                return;
            }
            if state.apply(StateUpdate::MarkReconciled).is_err() {
                return;
            }
        }

        let profile = self
            .bounded(self.remote.get_profile(&session.user_id))
            .await
            .unwrap_or(Err(DataFetchError::Timeout));
        match profile {
            Ok(Some(record)) => {
                let user = record.into_user(&session.user_id);
                tracing::info!("[Coordinator] Loaded profile @{}", user.username);
                self.apply_logged(StateUpdate::ProfileLoaded(user)).await;
            }
            Ok(None) => tracing::info!("[Coordinator] No profile row, keeping local profile"),
            Err(e) => tracing::warn!("[Coordinator] Profile fetch failed: {}", e),
        }

        let posts = self
            .bounded(self.remote.list_posts())
            .await
            .unwrap_or(Err(DataFetchError::Timeout));
        match posts {
            Ok(records) => {
                let posts = records.into_iter().map(|r| r.into_post()).collect();
                self.apply_logged(StateUpdate::PostsLoaded(posts)).await;
            }
            Err(e) => {
                tracing::warn!("[Coordinator] Post listing failed, using local posts: {}", e)
            }
        }
    }

    async fn enter_authenticated(&self, demo: bool) {
        self.apply_logged(StateUpdate::Authenticated { demo }).await;
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Submits credentials from the auth screen.
    pub async fn submit_credentials(&self, credentials: Credentials) -> SubmitOutcome {
        if let Err(err) = credentials.validate() {
            let text = match err {
                SolarisError::Validation(message) => message,
                other => other.to_string(),
            };
            self.apply_logged(StateUpdate::ShowNotice(Notice::error(text)))
                .await;
            return SubmitOutcome::Invalid;
        }

        {
            let mut state = self.state.write().await;
            if state.auth_in_flight {
                tracing::debug!("[Coordinator] Credential submission already in flight");
                return SubmitOutcome::Busy;
            }
            if let Err(e) = state.apply(StateUpdate::SetAuthInFlight(true)) {
                tracing::error!("[Coordinator] State update failed: {}", e);
            }
        }

        tracing::info!("[Coordinator] Submitting {:?}", credentials);
        let outcome = match credentials.mode {
            AuthMode::SignIn => self.sign_in(&credentials).await,
            AuthMode::SignUp => self.sign_up(&credentials).await,
        };

        self.apply_logged(StateUpdate::SetAuthInFlight(false)).await;
        outcome
    }

    async fn sign_in(&self, credentials: &Credentials) -> SubmitOutcome {
        let result = self
            .bounded(
                self.remote
                    .sign_in(&credentials.email, &credentials.password),
            )
            .await
            .unwrap_or_else(|| Err(timed_out()));

        match result {
            Ok(session) => {
                self.enter_authenticated(false).await;
                self.reconcile(&session).await;
                SubmitOutcome::SignedIn
            }
            Err(err) => self.auth_failed(err).await,
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> SubmitOutcome {
        let result = self
            .bounded(self.remote.sign_up(
                &credentials.email,
                &credentials.password,
                &credentials.display_name,
            ))
            .await
            .unwrap_or_else(|| Err(timed_out()));

        match result {
            Ok(session) => {
                self.apply_logged(StateUpdate::ShowNotice(Notice::info(REGISTERED_NOTICE)))
                    .await;
                self.enter_authenticated(false).await;
                if let Some(session) = &session {
                    self.reconcile(session).await;
                }
                SubmitOutcome::Registered {
                    session: session.is_some(),
                }
            }
            Err(err) => self.auth_failed(err).await,
        }
    }

    async fn auth_failed(&self, err: AuthError) -> SubmitOutcome {
        self.apply_logged(StateUpdate::ShowNotice(Notice::error(format!(
            "Error: {}",
            err.message
        ))))
        .await;

        if err.enters_demo_mode() {
            tracing::warn!("[Coordinator] Backend unreachable, entering demo mode");
            self.enter_authenticated(true).await;
            SubmitOutcome::DemoMode(err)
        } else {
            tracing::info!("[Coordinator] Credentials rejected");
            SubmitOutcome::Failed(err)
        }
    }

    /// Switches the active screen.
    pub async fn navigate(&self, screen: Screen) -> Result<()> {
        let mut state = self.state.write().await;
        ensure_authenticated(&state)?;
        state.apply(StateUpdate::Navigate(screen))
    }

    /// Optimistically flips the like state of a post. Returns the new state.
    pub async fn toggle_like(&self, post_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        ensure_authenticated(&state)?;
        state.apply(StateUpdate::ToggleLike {
            post_id: post_id.to_string(),
        })?;
        Ok(state.post(post_id).is_some_and(|p| p.liked_by_me))
    }

    /// Opens a conversation in the messages screen.
    pub async fn open_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        ensure_authenticated(&state)?;
        state.apply(StateUpdate::OpenSession {
            session_id: session_id.to_string(),
        })
    }

    pub async fn close_session(&self) {
        self.apply_logged(StateUpdate::CloseSession).await;
    }

    pub async fn dismiss_notice(&self) {
        self.apply_logged(StateUpdate::DismissNotice).await;
    }

    /// Sends a message to a chat session.
    ///
    /// When the counterpart is the assistant account, the reply is requested after
    /// the user's message is stored and appended as a second message. The session
    /// is marked as composing for the duration of that call. Returns the number of
    /// messages appended.
    ///
    /// While a reply is pending the session refuses further sends with
    /// [`SolarisError::Busy`], so each reply directly follows its prompt.
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<usize> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SolarisError::validation("Message is empty"));
        }

        let counterpart_id = {
            let mut state = self.state.write().await;
            ensure_authenticated(&state)?;
            if state.is_composing(session_id) {
                tracing::debug!("[Coordinator] Reply pending on {}, send refused", session_id);
                return Err(SolarisError::busy("Waiting for the previous reply"));
            }
            let message = Message::outgoing(state.current_user.id.clone(), text);
            state.apply(StateUpdate::AppendMessage {
                session_id: session_id.to_string(),
                message,
            })?;

            let session = state
                .session(session_id)
                .ok_or_else(|| SolarisError::not_found("chat session", session_id))?;
            if !session.is_with(ASSISTANT_USERNAME) {
                return Ok(1);
            }
            let counterpart_id = session.user.id.clone();
            state.apply(StateUpdate::SetComposing {
                session_id: session_id.to_string(),
                composing: true,
            })?;
            counterpart_id
        };

        let reply = match self
            .bounded(
                self.assistant
                    .complete(text, &self.settings.persona_instruction),
            )
            .await
        {
            Some(reply) => reply,
            None => {
                tracing::warn!("[Coordinator] Assistant reply timed out");
                ASSISTANT_TECHNICAL_ISSUE.to_string()
            }
        };

        self.update([
            StateUpdate::AppendMessage {
                session_id: session_id.to_string(),
                message: Message::incoming(counterpart_id, reply),
            },
            StateUpdate::SetComposing {
                session_id: session_id.to_string(),
                composing: false,
            },
        ])
        .await?;
        Ok(2)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Runs an outbound call under the configured timeout. `None` means it elapsed.
    async fn bounded<F, T>(&self, call: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        match self.settings.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.ok(),
            None => Some(call.await),
        }
    }

    /// Applies an update that cannot target a missing entity.
    async fn apply_logged(&self, update: StateUpdate) {
        if let Err(e) = self.state.write().await.apply(update) {
            tracing::error!("[Coordinator] State update failed: {}", e);
        }
    }
}

fn ensure_authenticated(state: &AppSnapshot) -> Result<()> {
    if state.authenticated {
        Ok(())
    } else {
        Err(SolarisError::validation(SIGN_IN_REQUIRED))
    }
}

fn timed_out() -> AuthError {
    AuthError::unreachable("Request timed out")
}
