//! Uniform handling of call outcomes: success, soft failure, hard failure.

use super::options::{AppOptions, DefaultObservers, OutcomeEvent, Settled};
use crate::context::AppContext;
use crate::error::TransportError;
use crate::models::{Envelope, ResponseBody, SoftFailure};
use crate::utils::failures::{self, Messages};
use crate::utils::routes;
use reqwest::StatusCode;

/// Message shown for a soft failure. Never empty.
pub fn failure_message(failure: &SoftFailure, messages: Option<&Messages>) -> String {
    let body = ResponseBody::from(failure);
    failures::make_message(Some(&body), None, messages)
        .or_else(|| messages.and_then(|m| m.error.clone()))
        .unwrap_or_else(|| failures::unknown_failure().to_string())
}

/// Run the side effects and observers for one settled call.
///
/// Global observers run before the per-call ones; `on_settled` runs last on
/// every branch. Returns the failure message of a soft failure.
pub(crate) fn settle<T>(
    context: &AppContext,
    defaults: &DefaultObservers,
    options: &AppOptions<T>,
    operation: &'static str,
    result: Result<&Envelope<T>, &TransportError>,
) -> Option<String> {
    let messages = options.messages.as_ref();

    let (event, message) = match result {
        Err(error) => {
            let event = OutcomeEvent {
                operation,
                settled: Settled::Error,
                reason: failures::extract_reason(None, Some(error)),
                status: error.status().map(|s| s.as_u16()),
            };
            defaults.on_error.notify(&event);
            on_hard_failure(context, options, error, event.reason.as_deref());
            (event, None)
        }
        Ok(Envelope::NotOk(failure)) => {
            let message = failure_message(failure, messages);
            let event = OutcomeEvent {
                operation,
                settled: Settled::NotOk,
                reason: Some(failure.error.reason.clone()),
                status: None,
            };
            tracing::debug!(operation, reason = %failure.error.reason, message = %message, "Call settled with a soft failure");
            defaults.on_success.notify(&event);
            options.on_not_ok.notify(failure);
            (event, Some(message))
        }
        Ok(Envelope::Ok(value)) => {
            let event = OutcomeEvent {
                operation,
                settled: Settled::Ok,
                reason: None,
                status: None,
            };
            defaults.on_success.notify(&event);
            if let Some(ok) = messages.and_then(|m| m.ok.as_deref()) {
                context.notifier.success(ok);
            }
            options.on_ok.notify(value);
            (event, None)
        }
    };

    defaults.on_settled.notify(&event);
    options.on_settled.notify(&event.settled);
    message
}

fn on_hard_failure<T>(
    context: &AppContext,
    options: &AppOptions<T>,
    error: &TransportError,
    reason: Option<&str>,
) {
    if !options.on_error.is_empty() {
        options.on_error.notify(error);
        return;
    }

    if options.magic.toast {
        failures::auto_toast(context.notifier.as_ref(), error, options.messages.as_ref());
    }

    if options.magic.redirect && is_auth_failure(error, reason) && context.access.is_user() {
        tracing::info!(operation = error.operation(), ?reason, "Authentication rejected, returning to login");
        if let Err(e) = context.session.reset() {
            tracing::error!(error = %e, "Failed to clear session");
        }
        context.navigator.replace(&routes::login());
    }
}

fn is_auth_failure(error: &TransportError, reason: Option<&str>) -> bool {
    error.status() == Some(StatusCode::UNAUTHORIZED)
        || reason.is_some_and(|r| r.starts_with("auth_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::context::{Navigator, Notifier};
    use crate::guard::Access;
    use crate::models::{Failure, RawFailure};
    use crate::session::MemoryStorage;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        toasts: Mutex<Vec<(&'static str, String)>>,
        routes: Mutex<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn success(&self, message: &str) {
            self.toasts.lock().unwrap().push(("success", message.to_string()));
        }

        fn error(&self, message: &str) {
            self.toasts.lock().unwrap().push(("error", message.to_string()));
        }
    }

    impl Navigator for Recorder {
        fn replace(&self, route: &str) {
            self.routes.lock().unwrap().push(route.to_string());
        }
    }

    fn context(recorder: &Arc<Recorder>, access: Access) -> Arc<AppContext> {
        let context = AppContext::builder(Settings::for_api("http://localhost:1"))
            .storage(Arc::new(MemoryStorage::new()))
            .notifier(recorder.clone())
            .navigator(recorder.clone())
            .build();
        context.session.load();
        context.access.set(Some(access));
        context
    }

    fn unauthorized() -> TransportError {
        TransportError::Status {
            operation: "accountsApiMe",
            status: StatusCode::UNAUTHORIZED,
            body: None,
        }
    }

    #[test]
    fn test_unauthorized_on_user_page_redirects_to_login() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::User);
        let options: AppOptions<()> = AppOptions::new();

        settle(&ctx, &DefaultObservers::default(), &options, "accountsApiMe", Err(&unauthorized()));

        assert_eq!(*recorder.routes.lock().unwrap(), vec![routes::login()]);
        assert_eq!(recorder.toasts.lock().unwrap().len(), 1);
        assert!(!ctx.session.snapshot().is_authenticated());
    }

    #[test]
    fn test_unauthorized_on_public_page_only_toasts() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::Public);
        let options: AppOptions<()> = AppOptions::new();

        settle(&ctx, &DefaultObservers::default(), &options, "accountsApiMe", Err(&unauthorized()));

        assert!(recorder.routes.lock().unwrap().is_empty());
        assert_eq!(recorder.toasts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_caller_on_error_suppresses_magic() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::User);
        let handled = Arc::new(Mutex::new(0));
        let counter = handled.clone();
        let options: AppOptions<()> =
            AppOptions::new().on_error(move |_| *counter.lock().unwrap() += 1);

        settle(&ctx, &DefaultObservers::default(), &options, "accountsApiMe", Err(&unauthorized()));

        assert_eq!(*handled.lock().unwrap(), 1);
        assert!(recorder.toasts.lock().unwrap().is_empty());
        assert!(recorder.routes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_auth_reason_with_redirect_disabled_stays() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::User);
        let options: AppOptions<()> = AppOptions::new().redirect(false).toast(false);
        let error = TransportError::Status {
            operation: "releasesApiGetAllReleases",
            status: StatusCode::FORBIDDEN,
            body: Some(ResponseBody {
                ok: Some(false),
                error: Some(RawFailure {
                    reason: Some("auth_token_expired".to_string()),
                    detail: None,
                }),
                result: None,
                detail: None,
            }),
        };

        settle(&ctx, &DefaultObservers::default(), &options, "releasesApiGetAllReleases", Err(&error));

        assert!(recorder.routes.lock().unwrap().is_empty());
        assert!(recorder.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_soft_failure_resolves_message_and_notifies() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::NoAuthOnly);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let order = seen.clone();
        let settled = seen.clone();
        let options: AppOptions<()> = AppOptions::new()
            .messages(Messages::new().reason("no_account", "Wrong email or password."))
            .on_not_ok(move |f| order.lock().unwrap().push(f.error.reason.clone()))
            .on_settled(move |s| settled.lock().unwrap().push(format!("{:?}", s)));
        let envelope = Envelope::NotOk(SoftFailure {
            error: Failure::new("no_account"),
            detail: None,
        });

        let message = settle(&ctx, &DefaultObservers::default(), &options, "accountsApiLogin", Ok(&envelope));

        assert_eq!(message.as_deref(), Some("Wrong email or password."));
        assert_eq!(*seen.lock().unwrap(), vec!["no_account".to_string(), "NotOk".to_string()]);
        assert!(recorder.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_soft_failure_with_prose_detail_falls_back_to_generic() {
        let failure = SoftFailure {
            error: Failure::new("something odd"),
            detail: Some("The server said no".to_string()),
        };
        assert_eq!(failure_message(&failure, None), failures::unknown_failure());
        assert_eq!(
            failure_message(&failure, Some(&Messages::new().error("Could not save."))),
            "Could not save."
        );
    }

    #[test]
    fn test_success_toasts_and_runs_globals_first() {
        let recorder = Arc::new(Recorder::default());
        let ctx = context(&recorder, Access::User);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let global = seen.clone();
        let defaults = DefaultObservers::default()
            .on_success(move |e| global.lock().unwrap().push(format!("global:{}", e.operation)));
        let local = seen.clone();
        let options = AppOptions::new()
            .messages(Messages::new().ok("Saved."))
            .on_ok(move |v: &i32| local.lock().unwrap().push(format!("local:{}", v)));

        settle(&ctx, &defaults, &options, "releasesApiUpdateRelease", Ok(&Envelope::Ok(7)));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["global:releasesApiUpdateRelease".to_string(), "local:7".to_string()]
        );
        assert_eq!(
            *recorder.toasts.lock().unwrap(),
            vec![("success", "Saved.".to_string())]
        );
    }
}
