//! The application context, built once at start and passed explicitly to the
//! transport, the query client and the guard.

use crate::config::Settings;
use crate::guard::AccessTracker;
use crate::session::{FileStorage, SessionStore, storage::SessionStorage};
use std::sync::Arc;

/// User-facing notifications ("toasts").
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Page navigation.
pub trait Navigator: Send + Sync {
    /// Replace the current page with `route`.
    fn replace(&self, route: &str);
}

/// Notifier that writes toasts to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(toast = "error", "{}", message);
    }
}

/// Navigator that only records the requested route in the log.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn replace(&self, route: &str) {
        tracing::info!(route = %route, "Navigation requested");
    }
}

pub struct AppContext {
    pub settings: Settings,
    pub session: SessionStore,
    pub access: AccessTracker,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    pub fn builder(settings: Settings) -> AppContextBuilder {
        AppContextBuilder {
            settings,
            storage: None,
            notifier: None,
            navigator: None,
        }
    }

    /// Absolute dashboard URL for `path`.
    pub fn absolute_url(&self, path: &str) -> String {
        crate::utils::routes::absolute(&self.settings.app.url, path)
    }
}

pub struct AppContextBuilder {
    settings: Settings,
    storage: Option<Arc<dyn SessionStorage>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl AppContextBuilder {
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Defaults: file storage under the configured directory, log-only
    /// notifier and navigator. The session is not loaded yet.
    pub fn build(self) -> Arc<AppContext> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(FileStorage::new(self.settings.storage.dir.clone())));
        let session = SessionStore::new(storage, self.settings.storage.auth_key.clone());

        Arc::new(AppContext {
            settings: self.settings,
            session,
            access: AccessTracker::default(),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
        })
    }
}
