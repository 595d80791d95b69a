//! Application shell: wires the coordinator to the backend's auth-state stream.

use crate::coordinator::{AppCoordinator, CoordinatorSettings};
use solaris_core::config::SolarisConfig;
use solaris_core::gateway::{AuthStateEvent, AuthSubscription};
use solaris_infrastructure::SupabaseGateway;
use solaris_interaction::GeminiAssistant;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Running client session.
///
/// Holds the auth-state subscription for as long as it lives. Events are forwarded
/// to a background task so listeners never block the gateway that emits them.
pub struct AppShell {
    coordinator: Arc<AppCoordinator>,
    subscription: Option<AuthSubscription>,
    event_task: Option<JoinHandle<()>>,
}

impl AppShell {
    /// Builds the production gateways from configuration and starts the shell.
    ///
    /// With a `session_file` the sign-in survives restarts; startup resumes it.
    pub async fn from_config(config: &SolarisConfig, session_file: Option<PathBuf>) -> Self {
        let mut remote = SupabaseGateway::from_config(&config.backend);
        if let Some(path) = session_file {
            remote = remote.with_session_file(path);
        }
        if !remote.is_configured() {
            tracing::warn!("[Shell] Backend not configured, sign-in will fall back to demo mode");
        }
        let assistant = GeminiAssistant::from_config(&config.assistant);
        if !assistant.is_configured() {
            tracing::warn!("[Shell] Assistant API key not configured");
        }

        let coordinator = AppCoordinator::new(Arc::new(remote), Arc::new(assistant))
            .with_settings(CoordinatorSettings::from_config(&config.coordinator));
        Self::start(Arc::new(coordinator)).await
    }

    /// Subscribes to auth-state changes, then runs the startup session lookup.
    pub async fn start(coordinator: Arc<AppCoordinator>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AuthStateEvent>();

        let subscription = coordinator.subscribe_auth_events(Arc::new(move |event| {
            if tx.send(event.clone()).is_err() {
                tracing::debug!("[Shell] Auth event dropped, shell is shutting down");
            }
        }));

        let task_coordinator = Arc::clone(&coordinator);
        let event_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::debug!("[Shell] Auth event {:?}", event.kind);
                task_coordinator.handle_auth_event(event).await;
            }
        });

        coordinator.bootstrap().await;
        tracing::info!("[Shell] Started");

        Self {
            coordinator,
            subscription: Some(subscription),
            event_task: Some(event_task),
        }
    }

    pub fn coordinator(&self) -> &Arc<AppCoordinator> {
        &self.coordinator
    }

    /// Releases the auth-state subscription and waits for pending events to drain.
    pub async fn shutdown(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        // Releasing the listener drops the sender, which ends the task.
        if let Some(task) = self.event_task.take() {
            if let Err(e) = task.await {
                tracing::warn!("[Shell] Auth event task ended abnormally: {}", e);
            }
        }
        tracing::info!("[Shell] Stopped");
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}
