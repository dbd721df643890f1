use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use whatgram_store::{Database, TOKEN_KEY, USER_KEY};
use whatgram_types::models::User;

use crate::auth::AuthState;
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, LogoutReason, Notice};
use crate::live::LiveHandle;

/// Bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Shared session state: the login state machine, the persisted
/// token/user pair, the open live listener, and the event fan-out.
///
/// Token and user are always written and cleared together.
pub struct SessionContext {
    store: Arc<Database>,
    state: RwLock<AuthState>,
    live: Mutex<Option<LiveHandle>>,
    events: broadcast::Sender<ClientEvent>,
    fallback_language: String,
}

impl SessionContext {
    pub fn new(store: Arc<Database>, fallback_language: impl Into<String>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            store,
            state: RwLock::new(AuthState::Unauthenticated),
            live: Mutex::new(None),
            events,
            fallback_language: fallback_language.into(),
        })
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn update_state<T>(&self, f: impl FnOnce(&mut AuthState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Interface language of the current user, or the configured default.
    pub fn language(&self) -> String {
        self.user()
            .map(|u| u.interface_language)
            .unwrap_or_else(|| self.fallback_language.clone())
    }

    /// Load a persisted session. Only a complete token/user pair counts;
    /// anything else is cleared and treated as logged out.
    pub fn restore(&self) -> Result<Option<User>> {
        if let Some(session) = self.session() {
            return Ok(Some(session.user));
        }

        let token = self.store.get(TOKEN_KEY)?;
        let user_json = self.store.get(USER_KEY)?;

        let (token, user_json) = match (token, user_json) {
            (Some(token), Some(user_json)) => (token, user_json),
            (None, None) => {
                debug!("No persisted session");
                return Ok(None);
            }
            _ => {
                warn!("Persisted session is incomplete, clearing it");
                self.store.remove_many(&[TOKEN_KEY, USER_KEY])?;
                return Ok(None);
            }
        };

        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                warn!("Persisted user record is unreadable ({}), clearing session", e);
                self.store.remove_many(&[TOKEN_KEY, USER_KEY])?;
                return Ok(None);
            }
        };

        self.update_state(|state| {
            *state = AuthState::Authenticated(Session { token, user: user.clone() });
            Ok(())
        })?;
        info!("Restored session for {} ({})", user.username, user.id);
        self.notify(ClientEvent::SessionStarted { user_id: user.id.clone() });
        Ok(Some(user))
    }

    /// Persist and activate a freshly issued session.
    pub fn activate(&self, token: String, user: User) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.store.set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;

        let user_id = user.id.clone();
        self.update_state(|state| {
            *state = AuthState::Authenticated(Session { token, user });
            Ok(())
        })?;
        self.notify(ClientEvent::SessionStarted { user_id });
        Ok(())
    }

    /// End the session: clear persisted credentials, close the live
    /// listener, and return to `Unauthenticated`. Safe to call repeatedly.
    pub fn teardown(&self, reason: LogoutReason) -> Result<()> {
        let cleared = self.store.remove_many(&[TOKEN_KEY, USER_KEY]);
        if let Err(e) = &cleared {
            error!("Failed to clear persisted session: {:#}", e);
        }

        if let Some(handle) = self.live.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.close();
        }

        let was_authenticated = self.update_state(|state| {
            let was = state.is_authenticated();
            *state = AuthState::Unauthenticated;
            Ok(was)
        })?;

        if was_authenticated {
            info!("Session ended ({:?})", reason);
            if reason == LogoutReason::Unauthorized {
                self.notify(ClientEvent::Notice(Notice::info("sessionExpired")));
            }
            self.notify(ClientEvent::SessionEnded { reason });
        }

        cleared.map_err(ClientError::from)
    }

    /// Apply `f` to the current user and persist the result.
    pub fn update_user(&self, f: impl FnOnce(&mut User)) -> Result<User> {
        let user = self.update_state(|state| match state {
            AuthState::Authenticated(session) => {
                f(&mut session.user);
                Ok(session.user.clone())
            }
            _ => Err(ClientError::NotAuthenticated),
        })?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        Ok(user)
    }

    /// Keep `handle` open for the lifetime of the session, replacing any
    /// previous listener. Closed immediately if no session is active.
    pub fn attach_live(&self, handle: LiveHandle) {
        if !self.is_authenticated() {
            handle.close();
            return;
        }
        let previous = self.live.lock().unwrap_or_else(PoisonError::into_inner).replace(handle);
        if let Some(previous) = previous {
            previous.close();
        }
    }

    pub fn has_live(&self) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn notify(&self, event: ClientEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn store(&self) -> &Database {
        &self.store
    }
}
