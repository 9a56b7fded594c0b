//! Per-call options and observer lists.

use crate::api::CacheKey;
use crate::error::TransportError;
use crate::models::SoftFailure;
use crate::utils::failures::Messages;
use std::sync::Arc;
use std::time::Duration;

pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Observers run in registration order.
pub struct Observers<T> {
    list: Vec<Observer<T>>,
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn push(&mut self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.list.push(Arc::new(observer));
    }

    /// Register an observer that runs before every existing one.
    pub fn prepend(&mut self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.list.insert(0, Arc::new(observer));
    }

    pub fn notify(&self, value: &T) {
        for observer in &self.list {
            observer(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Ok,
    NotOk,
    Error,
}

/// What global observers see of every settled call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEvent {
    pub operation: &'static str,
    pub settled: Settled,
    pub reason: Option<String>,
    pub status: Option<u16>,
}

/// Observers registered once on the query client. They run before the
/// per-call ones.
#[derive(Clone, Default)]
pub struct DefaultObservers {
    /// Calls that produced an envelope, `ok` or not.
    pub on_success: Observers<OutcomeEvent>,
    pub on_error: Observers<OutcomeEvent>,
    pub on_settled: Observers<OutcomeEvent>,
}

impl DefaultObservers {
    pub fn on_success(mut self, observer: impl Fn(&OutcomeEvent) + Send + Sync + 'static) -> Self {
        self.on_success.push(observer);
        self
    }

    pub fn on_error(mut self, observer: impl Fn(&OutcomeEvent) + Send + Sync + 'static) -> Self {
        self.on_error.push(observer);
        self
    }

    pub fn on_settled(mut self, observer: impl Fn(&OutcomeEvent) + Send + Sync + 'static) -> Self {
        self.on_settled.push(observer);
        self
    }
}

/// Side effects applied to unhandled hard failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magic {
    /// Show an error toast.
    pub toast: bool,
    /// Drop the session and go to login on auth failures.
    pub redirect: bool,
}

impl Default for Magic {
    fn default() -> Self {
        Self {
            toast: true,
            redirect: true,
        }
    }
}

pub struct AppOptions<T> {
    pub on_ok: Observers<T>,
    pub on_not_ok: Observers<SoftFailure>,
    /// When set, replaces the default toast and redirect handling.
    pub on_error: Observers<TransportError>,
    pub on_settled: Observers<Settled>,
    pub messages: Option<Messages>,
    pub magic: Magic,
    /// Background refetching and retries. Queries only.
    pub auto_refetch: bool,
    pub refetch_interval: Option<Duration>,
    /// Queries to invalidate after an `ok:true` mutation.
    pub invalidates: Vec<CacheKey>,
}

impl<T> Default for AppOptions<T> {
    fn default() -> Self {
        Self {
            on_ok: Observers::new(),
            on_not_ok: Observers::new(),
            on_error: Observers::new(),
            on_settled: Observers::new(),
            messages: None,
            magic: Magic::default(),
            auto_refetch: true,
            refetch_interval: None,
            invalidates: Vec::new(),
        }
    }
}

impl<T> AppOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_ok(mut self, observer: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_ok.push(observer);
        self
    }

    pub fn on_not_ok(mut self, observer: impl Fn(&SoftFailure) + Send + Sync + 'static) -> Self {
        self.on_not_ok.push(observer);
        self
    }

    pub fn on_error(mut self, observer: impl Fn(&TransportError) + Send + Sync + 'static) -> Self {
        self.on_error.push(observer);
        self
    }

    pub fn on_settled(mut self, observer: impl Fn(&Settled) + Send + Sync + 'static) -> Self {
        self.on_settled.push(observer);
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn toast(mut self, enabled: bool) -> Self {
        self.magic.toast = enabled;
        self
    }

    pub fn redirect(mut self, enabled: bool) -> Self {
        self.magic.redirect = enabled;
        self
    }

    pub fn auto_refetch(mut self, enabled: bool) -> Self {
        self.auto_refetch = enabled;
        self
    }

    pub fn refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }

    pub fn invalidates(mut self, key: CacheKey) -> Self {
        self.invalidates.push(key);
        self
    }

    /// How long fetched data counts as fresh.
    pub fn stale_time(&self) -> Duration {
        if self.auto_refetch {
            Duration::ZERO
        } else {
            Duration::from_secs(60)
        }
    }

    pub fn refetch_interval_active(&self) -> Option<Duration> {
        self.refetch_interval.filter(|_| self.auto_refetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_observers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::new();

        let first = seen.clone();
        observers.push(move |v: &i32| first.lock().unwrap().push(("first", *v)));
        let second = seen.clone();
        observers.push(move |v: &i32| second.lock().unwrap().push(("second", *v)));
        let zeroth = seen.clone();
        observers.prepend(move |v: &i32| zeroth.lock().unwrap().push(("zeroth", *v)));

        observers.notify(&5);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("zeroth", 5), ("first", 5), ("second", 5)]
        );
    }

    #[test]
    fn test_auto_refetch_off_disables_background_work() {
        let options: AppOptions<()> = AppOptions::new()
            .refetch_interval(Duration::from_secs(5))
            .auto_refetch(false);

        assert_eq!(options.refetch_interval_active(), None);
        assert_eq!(options.stale_time(), Duration::from_secs(60));
        assert!(options.magic.toast && options.magic.redirect);
    }
}
