pub mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

/// The two states of the credential lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Where the user is sent after the server rejects their credential
pub trait LoginSurface: Send + Sync {
    fn show_login(&self);
}

impl<F> LoginSurface for F
where
    F: Fn() + Send + Sync,
{
    fn show_login(&self) {
        self()
    }
}

struct NoLoginSurface;

impl LoginSurface for NoLoginSurface {
    fn show_login(&self) {}
}

/// Owns the bearer token slot and publishes authentication-state transitions.
///
/// One session is shared (behind an `Arc`) by the transport and the auth
/// service. Tests build an isolated one with [`Session::in_memory`].
pub struct Session {
    token: RwLock<Option<String>>,
    store: Box<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    login_surface: Box<dyn LoginSurface>,
}

impl Session {
    /// Build a session over a token store, resuming any persisted token
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read stored token, starting anonymous: {}", e);
                None
            }
        };
        let initial = if token.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        let (state, _) = watch::channel(initial);

        Self {
            token: RwLock::new(token),
            store: Box::new(store),
            state,
            login_surface: Box::new(NoLoginSurface),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn with_login_surface(mut self, surface: impl LoginSurface + 'static) -> Self {
        self.login_surface = Box::new(surface);
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// anonymous -> authenticated
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.store.save(&token) {
            warn!("Could not persist session token: {}", e);
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
        self.transition(AuthState::Authenticated);
    }

    /// Explicit logout: authenticated -> anonymous
    pub fn clear(&self) {
        self.purge();
        info!("Session cleared");
        self.transition(AuthState::Anonymous);
    }

    /// The server rejected the credential: purge it and route to the login surface
    pub fn expire(&self) {
        self.purge();
        warn!("Session rejected by server, credential purged");
        self.transition(AuthState::Anonymous);
        self.login_surface.show_login();
    }

    fn purge(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Err(e) = self.store.clear() {
            warn!("Could not clear stored token: {}", e);
        }
    }

    fn transition(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_resumes_persisted_token() {
        let session = Session::new(MemoryTokenStore::with_token("stored"));
        assert_eq!(session.token().as_deref(), Some("stored"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_login_and_logout_transitions() {
        let session = Session::in_memory();
        let rx = session.subscribe();
        assert_eq!(session.state(), AuthState::Anonymous);

        session.set_token("t1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), AuthState::Authenticated);

        session.clear();
        assert_eq!(session.token(), None);
        assert_eq!(session.state(), AuthState::Anonymous);
    }

    #[test]
    fn test_expire_notifies_login_surface() {
        let shown = Arc::new(AtomicUsize::new(0));
        let counter = shown.clone();
        let session = Session::new(MemoryTokenStore::with_token("t"))
            .with_login_surface(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        session.expire();
        assert_eq!(session.token(), None);
        assert_eq!(session.state(), AuthState::Anonymous);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_state_is_not_a_transition() {
        let session = Session::in_memory();
        let rx = session.subscribe();

        session.clear();
        assert!(!rx.has_changed().unwrap());
    }
}
