//! Turning failures into something a person can read.

use crate::context::Notifier;
use crate::error::TransportError;
use crate::models::ResponseBody;
use std::collections::HashMap;

/// Built-in messages, keyed by reason code.
pub const FAILURE_MESSAGES: &[(&str, &str)] = &[
    (
        "network_error_online",
        "We're having trouble connecting to our server right now. Please wait a moment and try again.",
    ),
    (
        "network_error_offline",
        "We're having trouble connecting to our server right now. Are you connected to the internet?",
    ),
    (
        "page_auth_unavailable",
        "You need to be logged in to access this page.",
    ),
    (
        "page_unauthorized",
        "You do not have permission to access this page.",
    ),
    (
        "auth_token_not_found",
        "We're having trouble checking your account. Try logging out and then logging back in.",
    ),
    (
        "auth_account_inactive",
        "Your account was deactivated. Contact support for more information.",
    ),
    (
        "auth_token_expired",
        "You session has expired. Please log back in to continue.",
    ),
    (
        "unauthorized",
        "You are not authorized to access this resource.",
    ),
    (
        "session_not_found",
        "We're having trouble checking your access to the challenge.?",
    ),
    (
        "session_not_idle",
        "Your challenge has already started. You cannot access this page anymore.",
    ),
    (
        "session_not_in_progress",
        "You can only access this page when your challenge is in progress.",
    ),
    (
        "validation_failed",
        "Your request could not be processed because it included some invalid data.",
    ),
    (
        "unknown_failure",
        "We couldn't process your request. Something went wrong.",
    ),
];

pub fn default_message(reason: &str) -> Option<&'static str> {
    FAILURE_MESSAGES
        .iter()
        .find(|(code, _)| *code == reason)
        .map(|(_, message)| *message)
}

pub fn unknown_failure() -> &'static str {
    default_message("unknown_failure").unwrap_or("Something went wrong.")
}

/// Caller-supplied messages: per-reason overrides plus the success and
/// generic failure texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pub ok: Option<String>,
    pub error: Option<String>,
    reasons: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, message: impl Into<String>) -> Self {
        self.ok = Some(message.into());
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Message for a reason code, or for an HTTP status written as digits.
    pub fn reason(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        self.reasons.insert(reason.into(), message.into());
        self
    }

    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons.contains_key(reason)
    }

    /// Caller overrides first, then the built-in table.
    pub fn lookup(&self, reason: &str) -> Option<String> {
        self.reasons
            .get(reason)
            .cloned()
            .or_else(|| default_message(reason).map(str::to_string))
    }
}

/// Machine codes never contain whitespace; prose always does.
// TODO: replace with an explicit tag from the backend once `detail` stops
// doubling as a reason placeholder.
pub fn is_machine_code(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.chars().any(char::is_whitespace)
}

/// Find the failure reason of a call.
///
/// Ignores the `ok` flag: a structured error always wins. Hard failures
/// without a structured body fall back to a network reason or the HTTP
/// status written as digits.
pub fn extract_reason(data: Option<&ResponseBody>, error: Option<&TransportError>) -> Option<String> {
    if let Some(error) = error {
        // Non-2xx responses may still carry a structured body.
        if let Some(reason) = error.body().and_then(ResponseBody::reason) {
            return Some(reason.to_string());
        }

        if error.is_network() {
            let reason = if error.is_unreachable() {
                "network_error_offline"
            } else {
                "network_error_online"
            };
            return Some(reason.to_string());
        }

        return error.status().map(|status| status.as_u16().to_string());
    }

    let data = data?;
    if let Some(reason) = data.reason() {
        return Some(reason.to_string());
    }

    data.detail
        .as_deref()
        .filter(|detail| is_machine_code(detail))
        .map(str::to_string)
}

/// Resolve a presentable message for a failure.
///
/// Order: message table entry for the reason (caller overrides first), the
/// error's own `detail`, then a top-level `detail` that looks like a code.
/// Returns `None` when all that is left is free-form prose.
pub fn make_message(
    data: Option<&ResponseBody>,
    error: Option<&TransportError>,
    messages: Option<&Messages>,
) -> Option<String> {
    let reason = extract_reason(data, error);
    let data = data.or_else(|| error.and_then(TransportError::body));

    let from_table = reason.filter(|r| is_machine_code(r)).and_then(|r| match messages {
        Some(messages) => messages.lookup(&r),
        None => default_message(&r).map(str::to_string),
    });

    from_table
        .or_else(|| data.and_then(ResponseBody::error_detail).map(str::to_string))
        .or_else(|| {
            data.and_then(|d| d.detail.as_deref())
                .filter(|detail| is_machine_code(detail))
                .map(str::to_string)
        })
}

/// Show an error toast for a hard failure.
pub fn auto_toast(notifier: &dyn Notifier, error: &TransportError, messages: Option<&Messages>) {
    let message = make_message(None, Some(error), messages)
        .or_else(|| messages.and_then(|m| m.error.clone()))
        .unwrap_or_else(|| unknown_failure().to_string());

    notifier.error(&message);
}
