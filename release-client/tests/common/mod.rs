//! Shared setup for client integration tests: a mock backend and a context
//! that records toasts and navigation.

#![allow(dead_code)]

use release_client::config::Settings;
use release_client::models::accounts::LoginResponse;
use release_client::session::MemoryStorage;
use release_client::{Access, AppContext, Navigator, Notifier, QueryClient};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

#[derive(Default)]
pub struct Recorder {
    pub toasts: Mutex<Vec<(&'static str, String)>>,
    pub routes: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn errors(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _)| *kind == "error")
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
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

pub struct TestApp {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub recorder: Arc<Recorder>,
    pub context: Arc<AppContext>,
    pub client: QueryClient,
}

impl TestApp {
    /// Log in locally, without a backend round trip.
    pub fn sign_in(&self) {
        self.context
            .session
            .save(Some(session()))
            .expect("Failed to save session");
    }

    pub fn on_page(&self, access: Access) {
        self.context.access.set(Some(access));
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Start a mock backend and a client pointed at it. The session is loaded
/// (anonymous) and the current page is public.
pub async fn setup() -> TestApp {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let recorder = Arc::new(Recorder::default());

    let context = AppContext::builder(Settings::for_api(server.uri()))
        .storage(storage.clone())
        .notifier(recorder.clone())
        .navigator(recorder.clone())
        .build();
    context.session.load();
    context.access.set(Some(Access::Public));

    let client = QueryClient::new(context.clone()).expect("Failed to build query client");

    TestApp {
        server,
        storage,
        recorder,
        context,
        client,
    }
}

pub fn session() -> LoginResponse {
    LoginResponse {
        token: Secret::new(TOKEN.to_string()),
        valid_until: chrono::Utc::now().timestamp() + 3600,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        roles: vec![],
    }
}

pub fn ok(result: Value) -> Value {
    json!({ "ok": true, "result": result })
}

pub fn not_ok(reason: &str) -> Value {
    json!({ "ok": false, "error": { "reason": reason } })
}

pub fn all_releases() -> Value {
    ok(json!({ "release_list": [] }))
}

pub fn me() -> Value {
    ok(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "roles": [{ "role": 3 }],
        "requested_roles": [],
        "email": "ada@example.com",
        "msid": "al123",
        "team_name": "Platform"
    }))
}

/// Poll `condition` for up to two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
