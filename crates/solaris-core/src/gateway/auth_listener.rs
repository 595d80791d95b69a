//! Auth-state change listeners.
//!
//! A gateway owns an [`AuthListenerRegistry`] and calls [`AuthListenerRegistry::notify`]
//! whenever its session changes. Each subscriber holds an [`AuthSubscription`] that
//! removes the listener when unsubscribed or dropped.

use super::remote::AuthSession;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// A session transition delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateEvent {
    pub kind: AuthEventKind,
    pub session: Option<AuthSession>,
}

impl AuthStateEvent {
    pub fn new(kind: AuthEventKind, session: Option<AuthSession>) -> Self {
        Self { kind, session }
    }

    /// Whether the event carries a live session.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Callback invoked on every session transition.
pub type AuthListener = Arc<dyn Fn(&AuthStateEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AuthListener)>,
}

/// Set of registered auth-state listeners.
#[derive(Clone, Default)]
pub struct AuthListenerRegistry {
    inner: Arc<Mutex<Listeners>>,
}

impl AuthListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its subscription handle.
    pub fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
        let mut listeners = lock(&self.inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        tracing::debug!("[AuthListeners] Registered listener {}", id);

        AuthSubscription {
            id,
            registry: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Delivers the event to every registered listener.
    ///
    /// Listeners are invoked outside the registry lock, so a listener may
    /// subscribe or unsubscribe without deadlocking.
    pub fn notify(&self, event: &AuthStateEvent) {
        let listeners: Vec<AuthListener> = lock(&self.inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            "[AuthListeners] Notifying {} listener(s) of {:?}",
            listeners.len(),
            event.kind
        );
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

/// Handle to a registered listener.
pub struct AuthSubscription {
    id: u64,
    registry: Weak<Mutex<Listeners>>,
    active: bool,
}

impl AuthSubscription {
    /// Removes the listener from its registry.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(inner) = self.registry.upgrade() {
            lock(&inner).entries.retain(|(id, _)| *id != self.id);
            tracing::debug!("[AuthListeners] Released listener {}", self.id);
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock(inner: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: &Arc<AtomicUsize>) -> AuthListener {
        let counter = Arc::clone(counter);
        Arc::new(move |_event: &AuthStateEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_notify_reaches_subscriber() {
        let registry = AuthListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _subscription = registry.subscribe(counting_listener(&counter));

        registry.notify(&AuthStateEvent::new(AuthEventKind::SignedOut, None));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let registry = AuthListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = registry.subscribe(counting_listener(&counter));
        assert_eq!(registry.listener_count(), 1);

        subscription.unsubscribe();
        assert_eq!(registry.listener_count(), 0);

        registry.notify(&AuthStateEvent::new(AuthEventKind::SignedOut, None));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_releases_listener() {
        let registry = AuthListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _subscription = registry.subscribe(counting_listener(&counter));
            assert_eq!(registry.listener_count(), 1);
        }
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let registry = AuthListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = registry.subscribe(counting_listener(&counter));
        drop(registry);

        // Nothing left to release from; must not panic.
        subscription.unsubscribe();
    }
}
