//! The persisted auth session.
//!
//! Written only by the login/logout flows and by the auth-expiry reset of the
//! outcome normalizer. Everyone else reads a snapshot.

pub mod storage;

use crate::error::StorageError;
use crate::models::accounts::{LoginResponse, Role};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use std::sync::{Arc, PoisonError, RwLock};
use storage::SessionStorage;

pub use storage::{FileStorage, MemoryStorage};

/// The session is exactly what a successful login returned.
pub type AuthSession = LoginResponse;

impl LoginResponse {
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.valid_until, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.valid_until
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.kind() == Some(role))
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Storage has not been read yet.
    #[default]
    NotLoaded,
    Anonymous,
    Authenticated(Arc<AuthSession>),
}

impl SessionState {
    pub fn session(&self) -> Option<&Arc<AuthSession>> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            state: RwLock::new(SessionState::NotLoaded),
        }
    }

    /// Read the persisted session.
    ///
    /// Missing, unreadable, unparsable and expired sessions all load as
    /// anonymous.
    pub fn load(&self) -> SessionState {
        let stored = match self.storage.read(&self.key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read persisted session");
                None
            }
        };

        let session = stored.and_then(|json| {
            serde_json::from_str::<Option<AuthSession>>(&json)
                .map_err(|e| {
                    tracing::warn!(key = %self.key, error = %e, "Discarding unparsable session");
                })
                .ok()
                .flatten()
        });

        let state = match session {
            Some(session) if session.is_expired_at(Utc::now()) => {
                tracing::info!("Persisted session has expired");
                SessionState::Anonymous
            }
            Some(session) => SessionState::Authenticated(Arc::new(session)),
            None => SessionState::Anonymous,
        };

        self.set_state(state.clone());
        state
    }

    /// Persist `session` (or its absence) and make it current.
    ///
    /// Memory is updated even when the write fails, so the running process
    /// never keeps using a session the user asked to drop.
    pub fn save(&self, session: Option<AuthSession>) -> Result<(), StorageError> {
        let written = serde_json::to_string(&session)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.write(&self.key, &json));

        match &session {
            Some(_) => tracing::info!("Session saved"),
            None => tracing::info!("Session cleared"),
        }

        self.set_state(match session {
            Some(session) => SessionState::Authenticated(Arc::new(session)),
            None => SessionState::Anonymous,
        });

        written
    }

    pub fn reset(&self) -> Result<(), StorageError> {
        self.save(None)
    }

    /// Synchronous snapshot of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current(&self) -> Option<Arc<AuthSession>> {
        self.snapshot().session().cloned()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
