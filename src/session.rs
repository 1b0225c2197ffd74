//! Session context for the signed-in identity
//!
//! The identity provider itself is an external collaborator; this is
//! the explicit object components consult instead of ambient global
//! state. Holds the current identity (or none) and notifies
//! subscribers on every change, with a typed subscribe/unsubscribe
//! lifecycle.

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Handle returned by [`Session::subscribe`]; pass it back to
/// [`Session::unsubscribe`] to stop receiving changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type IdentityListener = std::sync::Arc<dyn Fn(Option<&str>) + Send + Sync>;

#[derive(Default)]
pub struct Session {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    identity: Option<String>,
    listeners: HashMap<SubscriptionId, IdentityListener>,
    next_subscription: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current signed-in identity, or `None` when signed out.
    pub fn identity(&self) -> Option<String> {
        self.inner.lock().unwrap().identity.clone()
    }

    /// Replace the identity and notify every subscriber.
    ///
    /// Listeners run after the lock is released, so they may call back
    /// into the session (read the identity, subscribe, unsubscribe)
    /// without deadlocking.
    pub fn set_identity(&self, identity: Option<String>) {
        debug!(
            "Session identity changed: {}",
            identity.as_deref().unwrap_or("<signed out>")
        );
        let (identity, listeners) = {
            let mut inner = self.inner.lock().unwrap();
            inner.identity = identity;
            let listeners: Vec<IdentityListener> = inner.listeners.values().cloned().collect();
            (inner.identity.clone(), listeners)
        };
        for listener in &listeners {
            listener(identity.as_deref());
        }
    }

    /// Register a listener for identity changes.
    pub fn subscribe(&self, listener: impl Fn(Option<&str>) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner.listeners.insert(id, std::sync::Arc::new(listener));
        id
    }

    /// Remove a listener; returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.lock().unwrap().listeners.remove(&id).is_some()
    }
}
