//! Fake backend and client wiring for the integration tests.
//!
//! The fake backend models the session as a cookie. Protected endpoints only
//! succeed when the request carries the cookie set by the refresh endpoint,
//! anything sent before a refresh completes gets a 401

#![warn(unused_crate_dependencies)]

use nuvylux_client_core::{Client, ClientSettings, Navigator};
use nuvylux_shared::{
    const_config::path::{PATH_AUTH_LOGIN, PATH_AUTH_REFRESH},
    req_args::LoginReqArgs,
    telemetry::{self, get_subscriber, init_subscriber},
    uac::{Role, UserSummary},
};
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const SESSION_COOKIE: &str = "access_token";
const FRESH_SESSION: &str = "fresh";
const STALE_SESSION: &str = "stale";
pub const TEST_REFRESH_TIMEOUT: Duration = Duration::from_secs(2);

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Remembers every navigation instead of performing it
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn hard_redirect(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub backend: MockServer,
    pub core_client: Client,
    pub navigator: Arc<RecordingNavigator>,
    pub test_user: TestUser,
}

impl Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.backend.uri())
            .field("test_user", &self.test_user)
            .finish()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|settings| settings).await
}

/// Allows tests to adjust the settings before the client is built
pub async fn spawn_app_with<F>(customize: F) -> TestApp
where
    F: FnOnce(ClientSettings) -> ClientSettings,
{
    start_tracing();
    let backend = MockServer::start().await;
    let settings =
        customize(ClientSettings::new(backend.uri()).with_refresh_timeout(TEST_REFRESH_TIMEOUT));
    let navigator = Arc::new(RecordingNavigator::default());
    let core_client = Client::with_navigator(settings, Arc::clone(&navigator) as Arc<dyn Navigator>)
        .expect("failed to build client");
    TestApp {
        backend,
        core_client,
        navigator,
        test_user: TestUser::generate(Role::Client),
    }
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

fn session_cookie(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly")
}

/// Matches requests carrying the session cookie set by a successful refresh
fn has_fresh_session(request: &Request) -> bool {
    let expected = format!("{SESSION_COOKIE}={FRESH_SESSION}");
    request
        .headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.split("; ").any(|cookie| cookie == expected))
}

impl TestApp {
    pub fn address(&self) -> String {
        self.backend.uri()
    }

    /// Logs in with a session the backend will treat as expired
    pub async fn login(&self) -> anyhow::Result<Arc<UserSummary>> {
        self.mount_login_success().await;
        self.core_client
            .login(self.test_user.login_args(), no_cb)
            .await
            .expect("failed to receive on rx")
    }

    pub async fn mount_login_success(&self) {
        Mock::given(method(PATH_AUTH_LOGIN.method.as_str()))
            .and(path(&*PATH_AUTH_LOGIN.path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", session_cookie(STALE_SESSION).as_str())
                    .set_body_json(serde_json::json!({ "user": self.test_user.summary_json() })),
            )
            .mount(&self.backend)
            .await;
    }

    /// `GET {route}` answers `body` for a refreshed session and 401 otherwise
    pub async fn mount_protected(&self, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(has_fresh_session)
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .with_priority(1)
            .mount(&self.backend)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Token expired",
                "statusCode": 401
            })))
            .mount(&self.backend)
            .await;
    }

    /// `GET {route}` always answers `status` with `body`
    pub async fn mount_fixed(&self, route: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    /// The refresh endpoint waits `delay` then rotates the session cookie.
    /// Verified on drop to have been called `expected_calls` times
    pub async fn mount_refresh_success(&self, delay: Duration, expected_calls: u64) {
        Mock::given(method(PATH_AUTH_REFRESH.method.as_str()))
            .and(path(PATH_AUTH_REFRESH.path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", session_cookie(FRESH_SESSION).as_str())
                    .set_delay(delay),
            )
            .expect(expected_calls)
            .mount(&self.backend)
            .await;
    }

    /// The refresh endpoint waits `delay` then rejects the session
    pub async fn mount_refresh_failure(&self, delay: Duration, expected_calls: u64) {
        Mock::given(method(PATH_AUTH_REFRESH.method.as_str()))
            .and(path(PATH_AUTH_REFRESH.path))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Unauthorized"}))
                    .set_delay(delay),
            )
            .expect(expected_calls)
            .mount(&self.backend)
            .await;
    }

    /// Number of requests the backend received for `route`
    pub async fn request_count(&self, route: &str) -> usize {
        self.backend
            .received_requests()
            .await
            .expect("request recording is enabled by default")
            .iter()
            .filter(|request| request.url.path() == route)
            .count()
    }

    pub async fn refresh_call_count(&self) -> usize {
        self.request_count(&PATH_AUTH_REFRESH.path).await
    }
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl TestUser {
    pub fn generate(role: Role) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            email: format!("user-{}@example.com", &id[..8]),
            password: Uuid::new_v4().to_string(),
            id,
            role,
        }
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.email.clone(), self.password.clone().into())
    }

    /// The user as the backend sends it
    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "email": self.email,
            "firstName": "Test",
            "lastName": "User",
            "role": self.role,
            "onboardingCompleted": true,
        })
    }

    pub fn summary(&self) -> UserSummary {
        serde_json::from_value(self.summary_json()).expect("test user should be valid")
    }
}
