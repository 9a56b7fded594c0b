//! Login and logout, wired to the persisted session.

use crate::api::endpoints;
use crate::error::TransportError;
use crate::models::Envelope;
use crate::models::accounts::{LoginRequest, LoginResponse, LogoutResponse};
use crate::query::{AppOptions, Mutation, QueryClient};
use crate::utils::failures::Messages;

/// Shown when the backend does not know the email/password pair.
pub const NO_ACCOUNT_MESSAGE: &str = "This email address or password you provided is incorrect.";

/// The login mutation. A successful login is saved as the current session
/// before any caller observer runs.
pub fn login_mutation(client: &QueryClient, mut options: AppOptions<LoginResponse>) -> Mutation<LoginRequest, LoginResponse> {
    let context = client.context().clone();
    options.on_ok.prepend(move |session: &LoginResponse| {
        if let Err(e) = context.session.save(Some(session.clone())) {
            tracing::error!(error = %e, "Failed to persist session");
        }
    });

    let messages = options.messages.take().unwrap_or_default();
    options.messages = Some(login_messages(messages));

    client.mutation(endpoints::ACCOUNTS_API_LOGIN, options)
}

pub async fn login(
    client: &QueryClient,
    request: &LoginRequest,
    options: AppOptions<LoginResponse>,
) -> Result<Envelope<LoginResponse>, TransportError> {
    tracing::info!("Logging in");
    login_mutation(client, options).mutate(request).await
}

/// Log out on the backend. The local session is dropped whatever the outcome.
pub fn logout_mutation(client: &QueryClient, mut options: AppOptions<LogoutResponse>) -> Mutation<(), LogoutResponse> {
    let context = client.context().clone();
    options.on_settled.prepend(move |_| {
        if let Err(e) = context.session.reset() {
            tracing::error!(error = %e, "Failed to clear session");
        }
    });

    client.mutation(endpoints::ACCOUNTS_API_LOGOUT, options)
}

pub async fn logout(
    client: &QueryClient,
    options: AppOptions<LogoutResponse>,
) -> Result<Envelope<LogoutResponse>, TransportError> {
    tracing::info!("Logging out");
    logout_mutation(client, options).mutate(&()).await
}

/// Caller messages plus the login page's `no_account` text, unless the
/// caller already chose one.
fn login_messages(messages: Messages) -> Messages {
    if messages.has_reason("no_account") {
        messages
    } else {
        messages.reason("no_account", NO_ACCOUNT_MESSAGE)
    }
}
