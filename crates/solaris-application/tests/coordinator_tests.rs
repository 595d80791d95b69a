use async_trait::async_trait;
use solaris_application::coordinator::REGISTERED_NOTICE;
use solaris_application::credentials::MISSING_FIELDS_NOTICE;
use solaris_application::{AppCoordinator, AppShell, CoordinatorSettings, Credentials, SubmitOutcome};
use solaris_core::gateway::{
    AssistantGateway, AuthEventKind, AuthListener, AuthListenerRegistry, AuthSession,
    AuthStateEvent, AuthSubscription, RemoteDataGateway,
};
use solaris_core::post::PostRecord;
use solaris_core::seed::{self, ASSISTANT_USERNAME, SOLARIS_PERSONA};
use solaris_core::user::{DEFAULT_AVATAR_URL, ProfileRecord};
use solaris_core::{AuthError, DataFetchError, NoticeLevel, Screen};
use solaris_interaction::ASSISTANT_TECHNICAL_ISSUE;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mocks
// ============================================================================

fn session(user_id: &str) -> AuthSession {
    AuthSession {
        user_id: user_id.to_string(),
        email: Some("alex@example.com".to_string()),
        access_token: "access".to_string(),
        refresh_token: Some("refresh".to_string()),
    }
}

struct MockRemote {
    stored_session: Option<AuthSession>,
    profile: Result<Option<ProfileRecord>, DataFetchError>,
    posts: Result<Vec<PostRecord>, DataFetchError>,
    sign_in: Result<AuthSession, AuthError>,
    sign_up: Result<Option<AuthSession>, AuthError>,
    /// When set, sign-in waits for a permit before answering
    gate: Option<Arc<Notify>>,
    profile_calls: AtomicUsize,
    posts_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
    listeners: AuthListenerRegistry,
}

impl MockRemote {
    fn new() -> Self {
        Self {
            stored_session: None,
            profile: Ok(None),
            posts: Ok(Vec::new()),
            sign_in: Ok(session("user-1")),
            sign_up: Ok(None),
            gate: None,
            profile_calls: AtomicUsize::new(0),
            posts_calls: AtomicUsize::new(0),
            sign_in_calls: AtomicUsize::new(0),
            listeners: AuthListenerRegistry::new(),
        }
    }
}

#[async_trait]
impl RemoteDataGateway for MockRemote {
    async fn get_session(&self) -> Option<AuthSession> {
        self.stored_session.clone()
    }

    async fn get_profile(&self, _user_id: &str) -> Result<Option<ProfileRecord>, DataFetchError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone()
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataFetchError> {
        self.posts_calls.fetch_add(1, Ordering::SeqCst);
        self.posts.clone()
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        self.sign_up.clone()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.sign_in.clone()
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription {
        self.listeners.subscribe(listener)
    }
}

/// Assistant that records prompts and optionally waits before answering.
struct MockAssistant {
    reply: String,
    prompts: Mutex<Vec<(String, String)>>,
    started: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

impl MockAssistant {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }
}

#[async_trait]
impl AssistantGateway for MockAssistant {
    async fn complete(&self, prompt: &str, persona_instruction: &str) -> String {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), persona_instruction.to_string()));
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone()
    }
}

fn coordinator(remote: MockRemote, assistant: MockAssistant) -> AppCoordinator {
    AppCoordinator::new(Arc::new(remote), Arc::new(assistant))
}

async fn signed_in(remote: MockRemote, assistant: MockAssistant) -> AppCoordinator {
    let coordinator = coordinator(remote, assistant);
    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;
    assert_eq!(outcome, SubmitOutcome::SignedIn);
    coordinator
}

fn assistant_session_id() -> String {
    seed::chat_sessions()
        .into_iter()
        .find(|s| s.is_with(ASSISTANT_USERNAME))
        .map(|s| s.id)
        .unwrap()
}

// ============================================================================
// Bootstrap and reconciliation
// ============================================================================

#[tokio::test]
async fn test_bootstrap_without_session_stays_unauthenticated() {
    let coordinator = coordinator(MockRemote::new(), MockAssistant::replying("hi"));
    assert!(coordinator.snapshot().await.bootstrapping);

    coordinator.bootstrap().await;

    let snapshot = coordinator.snapshot().await;
    assert!(!snapshot.authenticated);
    assert!(!snapshot.bootstrapping);
    assert_eq!(snapshot.current_user, seed::current_user());
}

#[tokio::test]
async fn test_bootstrap_with_session_loads_profile_defaults() {
    let mut remote = MockRemote::new();
    remote.stored_session = Some(session("user-1"));
    remote.profile = Ok(Some(ProfileRecord {
        username: Some("alex".to_string()),
        ..ProfileRecord::default()
    }));

    let coordinator = coordinator(remote, MockAssistant::replying("hi"));
    coordinator.bootstrap().await;

    let snapshot = coordinator.snapshot().await;
    assert!(snapshot.authenticated);
    assert!(!snapshot.demo_mode);
    let user = &snapshot.current_user;
    assert_eq!(user.id, "user-1");
    assert_eq!(user.username, "alex");
    assert_eq!(user.name, "User");
    assert_eq!(user.avatar, DEFAULT_AVATAR_URL);
    assert_eq!(user.bio, "");
    assert_eq!((user.posts, user.followers, user.following), (0, 0, 0));
}

#[tokio::test]
async fn test_empty_post_listing_keeps_seed_posts() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    assert_eq!(coordinator.snapshot().await.posts, seed::posts());
}

#[tokio::test]
async fn test_data_failures_keep_seed_data() {
    let mut remote = MockRemote::new();
    remote.profile = Err(DataFetchError::Transport("connection refused".to_string()));
    remote.posts = Err(DataFetchError::Status {
        status: 500,
        message: "boom".to_string(),
    });

    let coordinator = signed_in(remote, MockAssistant::replying("hi")).await;
    let snapshot = coordinator.snapshot().await;
    assert!(snapshot.authenticated);
    assert_eq!(snapshot.current_user, seed::current_user());
    assert_eq!(snapshot.posts, seed::posts());
    assert!(snapshot.notice.is_none());
}

#[tokio::test]
async fn test_remote_posts_replace_feed() {
    let mut remote = MockRemote::new();
    remote.posts = Ok(vec![PostRecord {
        id: "42".to_string(),
        caption: Some("From the backend".to_string()),
        likes_count: Some(7),
        ..PostRecord::default()
    }]);

    let coordinator = signed_in(remote, MockAssistant::replying("hi")).await;
    let posts = coordinator.snapshot().await.posts;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "42");
    assert_eq!(posts[0].likes, 7);
    assert_eq!(posts[0].user.username, "unknown");
    assert!(!posts[0].liked_by_me);
}

#[tokio::test]
async fn test_reconciliation_runs_once() {
    let remote = Arc::new(MockRemote::new());
    let coordinator = AppCoordinator::new(remote.clone(), Arc::new(MockAssistant::replying("hi")));

    coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;
    coordinator
        .handle_auth_event(AuthStateEvent::new(
            AuthEventKind::TokenRefreshed,
            Some(session("user-1")),
        ))
        .await;

    assert_eq!(remote.profile_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote.posts_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_signed_out_event_is_ignored() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    coordinator
        .handle_auth_event(AuthStateEvent::new(AuthEventKind::SignedOut, None))
        .await;
    assert!(coordinator.snapshot().await.authenticated);
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_blank_fields_are_rejected_locally() {
    let remote = Arc::new(MockRemote::new());
    let coordinator = AppCoordinator::new(remote.clone(), Arc::new(MockAssistant::replying("hi")));

    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("", "secret"))
        .await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(remote.sign_in_calls.load(Ordering::SeqCst), 0);
    let snapshot = coordinator.snapshot().await;
    assert!(!snapshot.authenticated);
    assert_eq!(snapshot.notice.unwrap().text, MISSING_FIELDS_NOTICE);
}

#[tokio::test]
async fn test_unreachable_backend_enters_demo_mode() {
    let mut remote = MockRemote::new();
    remote.sign_in = Err(AuthError::unreachable("Failed to fetch"));

    let coordinator = coordinator(remote, MockAssistant::replying("hi"));
    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;

    assert_eq!(
        outcome,
        SubmitOutcome::DemoMode(AuthError::unreachable("Failed to fetch"))
    );
    let snapshot = coordinator.snapshot().await;
    assert!(snapshot.authenticated);
    assert!(snapshot.demo_mode);
    assert!(!snapshot.auth_in_flight);
    let notice = snapshot.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Error: Failed to fetch");
    assert_eq!(snapshot.posts, seed::posts());
}

#[tokio::test]
async fn test_misconfigured_backend_enters_demo_mode() {
    let mut remote = MockRemote::new();
    remote.sign_in = Err(AuthError::misconfigured("Invalid API key"));

    let coordinator = coordinator(remote, MockAssistant::replying("hi"));
    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;

    assert!(matches!(outcome, SubmitOutcome::DemoMode(_)));
    assert!(coordinator.snapshot().await.demo_mode);
}

#[tokio::test]
async fn test_rejected_credentials_stay_on_auth() {
    let mut remote = MockRemote::new();
    remote.sign_in = Err(AuthError::rejected("Invalid login credentials"));

    let coordinator = coordinator(remote, MockAssistant::replying("hi"));
    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "wrong"))
        .await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    let snapshot = coordinator.snapshot().await;
    assert!(!snapshot.authenticated);
    assert_eq!(
        snapshot.notice.unwrap().text,
        "Error: Invalid login credentials"
    );
}

#[tokio::test]
async fn test_sign_up_without_session_authenticates_with_notice() {
    let remote = Arc::new(MockRemote::new());
    let coordinator = AppCoordinator::new(remote.clone(), Arc::new(MockAssistant::replying("hi")));

    let outcome = coordinator
        .submit_credentials(Credentials::sign_up("alex@example.com", "secret", "Alex"))
        .await;

    assert_eq!(outcome, SubmitOutcome::Registered { session: false });
    let snapshot = coordinator.snapshot().await;
    assert!(snapshot.authenticated);
    assert!(!snapshot.demo_mode);
    assert_eq!(snapshot.notice.unwrap().text, REGISTERED_NOTICE);
    assert_eq!(remote.profile_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_submit_is_refused_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let mut remote = MockRemote::new();
    remote.gate = Some(gate.clone());
    let remote = Arc::new(remote);
    let coordinator = Arc::new(AppCoordinator::new(
        remote.clone(),
        Arc::new(MockAssistant::replying("hi")),
    ));

    let first = tokio::spawn({
        let coordinator = coordinator.clone();
        async move {
            coordinator
                .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
                .await
        }
    });

    while !coordinator.snapshot().await.auth_in_flight {
        tokio::task::yield_now().await;
    }
    let second = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;
    assert_eq!(second, SubmitOutcome::Busy);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), SubmitOutcome::SignedIn);
    assert_eq!(remote.sign_in_calls.load(Ordering::SeqCst), 1);
    assert!(!coordinator.snapshot().await.auth_in_flight);
}

#[tokio::test]
async fn test_sign_in_timeout_enters_demo_mode() {
    let mut remote = MockRemote::new();
    remote.gate = Some(Arc::new(Notify::new()));
    let coordinator = coordinator(remote, MockAssistant::replying("hi")).with_settings(
        CoordinatorSettings {
            call_timeout: Some(Duration::from_millis(20)),
            ..CoordinatorSettings::default()
        },
    );

    let outcome = coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;

    assert!(matches!(outcome, SubmitOutcome::DemoMode(_)));
    assert!(coordinator.snapshot().await.demo_mode);
}

// ============================================================================
// Intents
// ============================================================================

#[tokio::test]
async fn test_intents_require_authentication() {
    let coordinator = coordinator(MockRemote::new(), MockAssistant::replying("hi"));

    assert!(coordinator.toggle_like("p1").await.unwrap_err().is_validation());
    assert!(coordinator.navigate(Screen::Profile).await.is_err());
    assert!(coordinator.send_message("c1", "hello").await.is_err());

    let snapshot = coordinator.snapshot().await;
    assert_eq!(snapshot.screen, Screen::Feed);
    assert_eq!(snapshot.posts, seed::posts());
}

#[tokio::test]
async fn test_toggle_like_twice_restores_post() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    let before = coordinator.snapshot().await.post("p1").cloned().unwrap();

    assert!(coordinator.toggle_like("p1").await.unwrap());
    let liked = coordinator.snapshot().await.post("p1").cloned().unwrap();
    assert_eq!(liked.likes, before.likes + 1);

    assert!(!coordinator.toggle_like("p1").await.unwrap());
    assert_eq!(coordinator.snapshot().await.post("p1").cloned().unwrap(), before);
}

#[tokio::test]
async fn test_toggle_like_unknown_post() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    assert!(coordinator.toggle_like("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_navigation_shows_one_screen() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;

    coordinator.open_session("c1").await.unwrap();
    assert_eq!(coordinator.snapshot().await.screen, Screen::Messages);

    coordinator.navigate(Screen::Stories).await.unwrap();
    let snapshot = coordinator.snapshot().await;
    assert_eq!(snapshot.screen, Screen::Stories);
    assert!(snapshot.open_session.is_none());
}

#[tokio::test]
async fn test_read_projects_current_state() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    coordinator.open_session("c1").await.unwrap();

    let active = coordinator
        .read(|s| s.active_session().map(|session| session.id.clone()))
        .await;
    assert_eq!(active.as_deref(), Some("c1"));
    assert!(!coordinator.read(|s| s.is_composing("c1")).await);
}

#[tokio::test]
async fn test_send_message_to_person() {
    let assistant = MockAssistant::replying("unused");
    let coordinator = signed_in(MockRemote::new(), assistant).await;
    let before = coordinator.snapshot().await.session("c1").cloned().unwrap();
    assert!(before.unread_count > 0);

    let appended = coordinator.send_message("c1", "hello").await.unwrap();

    assert_eq!(appended, 1);
    let after = coordinator.snapshot().await.session("c1").cloned().unwrap();
    assert_eq!(after.messages.len(), before.messages.len() + 1);
    assert_eq!(after.last_message, "hello");
    assert_eq!(after.unread_count, 0);
    assert!(after.messages.last().unwrap().is_me);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let coordinator = signed_in(MockRemote::new(), MockAssistant::replying("hi")).await;
    let before = coordinator.snapshot().await.session("c1").cloned().unwrap();

    assert!(coordinator.send_message("c1", "   ").await.unwrap_err().is_validation());
    assert_eq!(coordinator.snapshot().await.session("c1").cloned().unwrap(), before);
}

#[tokio::test]
async fn test_assistant_reply_follows_user_message() {
    let remote = MockRemote::new();
    let assistant = Arc::new(MockAssistant::replying("Hey there! 🔥"));
    let coordinator = AppCoordinator::new(Arc::new(remote), assistant.clone());
    coordinator
        .submit_credentials(Credentials::sign_in("alex@example.com", "secret"))
        .await;
    let session_id = assistant_session_id();
    let before = coordinator.snapshot().await.session(&session_id).cloned().unwrap();

    let appended = coordinator.send_message(&session_id, "hi").await.unwrap();

    assert_eq!(appended, 2);
    let after = coordinator.snapshot().await.session(&session_id).cloned().unwrap();
    assert_eq!(after.messages.len(), before.messages.len() + 2);
    let tail = &after.messages[after.messages.len() - 2..];
    assert_eq!(tail[0].text, "hi");
    assert!(tail[0].is_me);
    assert_eq!(tail[1].text, "Hey there! 🔥");
    assert!(!tail[1].is_me);
    assert_eq!(tail[1].sender_id, after.user.id);
    assert_eq!(after.last_message, "Hey there! 🔥");

    let prompts = assistant.prompts.lock().unwrap().clone();
    assert_eq!(prompts, vec![("hi".to_string(), SOLARIS_PERSONA.to_string())]);
}

#[tokio::test]
async fn test_composing_indicator_visible_while_waiting() {
    let gate = Arc::new(Notify::new());
    let mut assistant = MockAssistant::replying("Done!");
    assistant.gate = Some(gate.clone());
    let started = assistant.started.clone();
    let coordinator = Arc::new(signed_in(MockRemote::new(), assistant).await);
    let session_id = assistant_session_id();

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        let session_id = session_id.clone();
        async move { coordinator.send_message(&session_id, "hi").await }
    });

    started.notified().await;
    let waiting = coordinator.snapshot().await;
    assert!(waiting.is_composing(&session_id));
    assert_eq!(
        waiting.session(&session_id).unwrap().messages.last().unwrap().text,
        "hi"
    );

    gate.notify_one();
    assert_eq!(pending.await.unwrap().unwrap(), 2);
    assert!(!coordinator.snapshot().await.is_composing(&session_id));
}

#[tokio::test]
async fn test_send_refused_while_reply_pending() {
    let gate = Arc::new(Notify::new());
    let mut assistant = MockAssistant::replying("Done!");
    assistant.gate = Some(gate.clone());
    let started = assistant.started.clone();
    let coordinator = Arc::new(signed_in(MockRemote::new(), assistant).await);
    let session_id = assistant_session_id();
    let before = coordinator.snapshot().await.session(&session_id).cloned().unwrap();

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        let session_id = session_id.clone();
        async move { coordinator.send_message(&session_id, "one").await }
    });
    started.notified().await;

    let second = coordinator.send_message(&session_id, "two").await.unwrap_err();
    assert!(second.is_busy());
    // Other conversations stay usable.
    assert_eq!(coordinator.send_message("c1", "hello").await.unwrap(), 1);
    assert!(coordinator.snapshot().await.is_composing(&session_id));

    gate.notify_one();
    assert_eq!(pending.await.unwrap().unwrap(), 2);

    let after = coordinator.snapshot().await.session(&session_id).cloned().unwrap();
    let texts: Vec<_> = after.messages[before.messages.len()..]
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts, vec!["one", "Done!"]);
    assert!(!coordinator.snapshot().await.is_composing(&session_id));

    gate.notify_one();
    assert_eq!(coordinator.send_message(&session_id, "two").await.unwrap(), 2);
}

#[tokio::test]
async fn test_assistant_timeout_uses_fallback_reply() {
    let mut assistant = MockAssistant::replying("never");
    assistant.gate = Some(Arc::new(Notify::new()));
    let coordinator = signed_in(MockRemote::new(), assistant).await.with_settings(
        CoordinatorSettings {
            call_timeout: Some(Duration::from_millis(20)),
            ..CoordinatorSettings::default()
        },
    );
    let session_id = assistant_session_id();

    coordinator.send_message(&session_id, "hi").await.unwrap();

    let snapshot = coordinator.snapshot().await;
    let session = snapshot.session(&session_id).unwrap();
    assert_eq!(session.last_message, ASSISTANT_TECHNICAL_ISSUE);
    assert!(!snapshot.is_composing(&session_id));
}

// ============================================================================
// Shell
// ============================================================================

#[tokio::test]
async fn test_shell_reacts_to_auth_events_and_releases_listener() {
    let remote = Arc::new(MockRemote::new());
    let coordinator = Arc::new(AppCoordinator::new(
        remote.clone(),
        Arc::new(MockAssistant::replying("hi")),
    ));

    let shell = AppShell::start(coordinator.clone()).await;
    assert_eq!(remote.listeners.listener_count(), 1);
    assert!(!coordinator.snapshot().await.bootstrapping);

    remote.listeners.notify(&AuthStateEvent::new(
        AuthEventKind::SignedIn,
        Some(session("user-1")),
    ));
    while !coordinator.snapshot().await.reconciled {
        tokio::task::yield_now().await;
    }
    assert!(coordinator.snapshot().await.authenticated);

    shell.shutdown().await;
    assert_eq!(remote.listeners.listener_count(), 0);
}

#[tokio::test]
async fn test_dropping_shell_releases_listener() {
    let remote = Arc::new(MockRemote::new());
    let coordinator = Arc::new(AppCoordinator::new(
        remote.clone(),
        Arc::new(MockAssistant::replying("hi")),
    ));

    let shell = AppShell::start(coordinator).await;
    assert_eq!(remote.listeners.listener_count(), 1);
    drop(shell);
    assert_eq!(remote.listeners.listener_count(), 0);
}
