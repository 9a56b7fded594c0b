//! Page access levels and the guard that enforces them.

use crate::context::AppContext;
use crate::session::SessionState;
use crate::utils::{failures, routes};
use std::sync::{Arc, PoisonError, RwLock};

/// Declarative authentication requirement of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Access {
    /// Everyone.
    #[default]
    Public = 0,
    /// Only visitors without a session (login, sign-up).
    NoAuthOnly = 1 << 0,
    /// Only logged-in users.
    User = 1 << 1,
}

/// Access level of the page currently shown.
#[derive(Debug, Default)]
pub struct AccessTracker {
    current: RwLock<Option<Access>>,
}

impl AccessTracker {
    pub fn current(&self) -> Option<Access> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, access: Option<Access>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = access;
    }

    pub fn is_user(&self) -> bool {
        self.current() == Some(Access::User)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guardage {
    Allowed,
    /// A logged-in user opened a page meant for anonymous visitors.
    GoHomeInstead,
    /// Storage has not been read yet; wait before deciding.
    AuthNotLoaded,
    AuthUnavailable,
}

pub struct AuthGuard {
    context: Arc<AppContext>,
}

impl AuthGuard {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Does `session` satisfy `access`?
    pub fn check(access: Access, session: &SessionState) -> Guardage {
        match access {
            Access::Public => Guardage::Allowed,
            Access::NoAuthOnly => {
                if session.is_authenticated() {
                    Guardage::GoHomeInstead
                } else {
                    Guardage::Allowed
                }
            }
            Access::User => match session {
                SessionState::NotLoaded => Guardage::AuthNotLoaded,
                SessionState::Anonymous => Guardage::AuthUnavailable,
                SessionState::Authenticated(_) => Guardage::Allowed,
            },
        }
    }

    /// Enter a page: record its access level, evaluate, and act on the result.
    ///
    /// Pages without an explicit level are public.
    pub fn enter(&self, page_access: Option<Access>) -> Guardage {
        let access = page_access.unwrap_or_default();
        self.context.access.set(Some(access));

        let guardage = Self::check(access, &self.context.session.snapshot());
        tracing::debug!(?access, ?guardage, "Page guard evaluated");

        match guardage {
            Guardage::GoHomeInstead => self.context.navigator.replace(&routes::releases()),
            Guardage::AuthUnavailable => {
                self.context.navigator.replace(&routes::login());
                if let Some(message) = failures::default_message("page_auth_unavailable") {
                    self.context.notifier.error(message);
                }
            }
            Guardage::Allowed | Guardage::AuthNotLoaded => {}
        }

        guardage
    }
}
