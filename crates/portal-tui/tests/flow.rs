//! End-to-end screen flow against a mock school API.

use std::sync::Arc;
use std::time::Duration;

use portal_core::api::ApiClient;
use portal_core::session::{self, Screen};
use portal_core::store::{KeyValueStore, MemoryStore, TOKEN_KEY, USER_DATA_KEY, USER_ID_KEY};
use portal_tui::Engine;
use portal_tui::events::{UiEvent, UserAction};
use portal_tui::overlays::Overlay;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Store that serves reads from memory and refuses every write.
struct ReadOnlyStore(MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get(key)
    }
    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

fn engine(server: &MockServer, store: &Arc<MemoryStore>) -> Engine {
    let store: Arc<dyn KeyValueStore> = store.clone();
    Engine::new(ApiClient::new(server.uri()), store)
}

fn act(engine: &mut Engine, action: UserAction) {
    engine.dispatch(UiEvent::Action(action));
}

fn type_str(engine: &mut Engine, text: &str) {
    for c in text.chars() {
        act(engine, UserAction::TypeChar(c));
    }
}

fn dashboard_body() -> serde_json::Value {
    json!({
        "status": true,
        "msg": "ok",
        "user": {"name": "asha", "userid": 1001, "class": "5A"},
        "dashboard": {
            "carousel": ["https://img/1.png", "https://img/2.png"],
            "student": {"Boy": 10, "Girl": 8},
            "amount": "125000",
            "color": {"dynamic_color": "#ff8800"}
        }
    })
}

async fn mount_dashboard(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/dashboard.php"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_otp_dashboard_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .and(body_json(json!({"userid": "S1", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "userid": "S1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify_otp.php"))
        .and(body_json(json!({"userid": "S1", "otp": "123456"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": true, "token": "tok-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_dashboard(&server, "tok-abc").await;

    let store = Arc::new(MemoryStore::new());
    let mut engine = engine(&server, &store);
    engine.start();
    engine.settle().await;
    assert_eq!(engine.state.screen(), Screen::Login);

    type_str(&mut engine, " S1 ");
    act(&mut engine, UserAction::NextField);
    type_str(&mut engine, "x");
    act(&mut engine, UserAction::Submit);
    engine.settle().await;
    assert_eq!(engine.state.screen(), Screen::OtpVerification);
    assert_eq!(engine.state.auth.user_id.as_deref(), Some("S1"));

    type_str(&mut engine, "123456");
    engine.settle().await;
    assert_eq!(engine.state.screen(), Screen::Dashboard);
    assert_eq!(engine.state.nav.depth(), 1);
    assert_eq!(engine.state.otp.token.as_deref(), Some("tok-abc"));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-abc"));
    assert_eq!(store.get(USER_ID_KEY).unwrap().as_deref(), Some("S1"));

    let dashboard = &engine.state.dashboard;
    assert_eq!(dashboard.student.map(|s| s.total()), Some(18));
    assert_eq!(dashboard.amount, Some(125_000.0));
    assert_eq!(dashboard.color, "#ff8800");
    assert_eq!(dashboard.carousel.len(), 2);
    let cached = session::cached_user_profile(store.as_ref()).unwrap().unwrap();
    assert_eq!(cached.userid.as_deref(), Some("1001"));
    assert_eq!(cached.extra.get("class"), Some(&json!("5A")));

    act(&mut engine, UserAction::RequestLogout);
    assert_eq!(engine.state.overlay, Some(Overlay::ConfirmLogout));
    act(&mut engine, UserAction::ConfirmLogout);
    engine.settle().await;
    assert_eq!(engine.state.screen(), Screen::Login);
    assert!(engine.state.otp.token.is_none());
    assert!(engine.state.dashboard.user.is_none());
    for key in [TOKEN_KEY, USER_ID_KEY, USER_DATA_KEY] {
        assert_eq!(store.get(key).unwrap(), None, "{key} should be cleared");
    }
}

#[tokio::test]
async fn test_persisted_token_skips_login() {
    let server = MockServer::start().await;
    mount_dashboard(&server, "stored").await;

    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "stored").unwrap();
    store.set(USER_ID_KEY, "S7").unwrap();

    let mut engine = engine(&server, &store);
    engine.start();
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::Dashboard);
    assert_eq!(engine.state.auth.user_id.as_deref(), Some("S7"));
    assert_eq!(
        engine
            .state
            .dashboard
            .user
            .as_ref()
            .map(|u| u.display_name()),
        Some("asha")
    );
}

#[tokio::test]
async fn test_wrong_otp_stays_and_resets_digits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "userid": 42})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify_otp.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": false, "msg": "Invalid OTP"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut engine = engine(&server, &store);
    engine.start();
    engine.settle().await;

    type_str(&mut engine, "42");
    act(&mut engine, UserAction::NextField);
    type_str(&mut engine, "pw");
    act(&mut engine, UserAction::Submit);
    engine.settle().await;
    assert_eq!(engine.state.auth.user_id.as_deref(), Some("42"));

    type_str(&mut engine, "654321");
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::OtpVerification);
    assert_eq!(engine.state.otp.error.as_deref(), Some("Invalid OTP"));
    assert_eq!(engine.state.otp_input.filled(), 0);
    assert_eq!(engine.state.otp_input.focus, 0);
    assert_eq!(
        engine.state.overlay,
        Some(Overlay::alert("OTP Verification Failed", "Invalid OTP"))
    );
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_rejected_login_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": false, "msg": "Wrong password"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut engine = engine(&server, &store);
    engine.start();
    engine.settle().await;

    type_str(&mut engine, "S1");
    act(&mut engine, UserAction::NextField);
    type_str(&mut engine, "bad");
    act(&mut engine, UserAction::Submit);
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::Login);
    assert_eq!(engine.state.auth.error.as_deref(), Some("Wrong password"));
    assert_eq!(
        engine.state.overlay,
        Some(Overlay::alert("Login Failed", "Wrong password"))
    );
}

#[tokio::test]
async fn test_dashboard_error_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dashboard.php"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Session expired"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_dashboard(&server, "stored").await;

    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "stored").unwrap();

    let mut engine = engine(&server, &store);
    engine.start();
    engine.settle().await;
    assert!(engine.state.dashboard.has_hard_error());
    assert_eq!(
        engine.state.dashboard.error.as_deref(),
        Some("Session expired")
    );

    act(&mut engine, UserAction::Refresh);
    engine.settle().await;
    assert!(engine.state.dashboard.error.is_none());
    assert!(engine.state.dashboard.user.is_some());
}

#[tokio::test]
async fn test_refresh_supersedes_in_flight_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dashboard.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(dashboard_body())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "stored").unwrap();

    let mut engine = engine(&server, &store);
    engine.start();
    while !engine.state.tasks.dashboard.is_running() {
        assert!(engine.step().await);
    }
    let first = engine.state.tasks.dashboard.active;

    act(&mut engine, UserAction::Refresh);
    assert_ne!(engine.state.tasks.dashboard.active, first);
    engine.settle().await;

    assert!(!engine.state.dashboard.loading);
    assert!(engine.state.dashboard.error.is_none());
    assert_eq!(engine.state.dashboard.student.map(|s| s.total()), Some(18));
}

#[tokio::test]
async fn test_unreachable_server_keeps_login_inline_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut engine = Engine::new(ApiClient::new(format!("http://127.0.0.1:{port}")), store);
    engine.start();
    engine.settle().await;

    type_str(&mut engine, "S1");
    act(&mut engine, UserAction::NextField);
    type_str(&mut engine, "x");
    act(&mut engine, UserAction::Submit);
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::Login);
    assert_eq!(engine.state.auth.error.as_deref(), Some("Login failed"));
    assert!(engine.state.overlay.is_none());
}

#[tokio::test]
async fn test_logout_resets_ui_when_store_write_fails() {
    let server = MockServer::start().await;
    mount_dashboard(&server, "stored").await;

    let inner = MemoryStore::new();
    inner.set(TOKEN_KEY, "stored").unwrap();
    inner.set(USER_ID_KEY, "S7").unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(ReadOnlyStore(inner));

    let mut engine = Engine::new(ApiClient::new(server.uri()), store);
    engine.start();
    engine.settle().await;
    assert_eq!(engine.state.screen(), Screen::Dashboard);
    assert!(engine.state.dashboard.user.is_some());

    act(&mut engine, UserAction::RequestLogout);
    act(&mut engine, UserAction::ConfirmLogout);
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::Login);
    assert_eq!(engine.state.nav.depth(), 1);
    assert!(engine.state.overlay.is_none());
    assert!(engine.state.auth.user_id.is_none());
    assert!(engine.state.otp.token.is_none());
    assert!(engine.state.dashboard.user.is_none());
    assert!(engine.state.dashboard.student.is_none());
    assert!(!engine.state.tasks.is_any_running());
}

#[tokio::test]
async fn test_otp_success_reaches_dashboard_when_store_write_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "userid": "S1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify_otp.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": true, "token": "tok-abc"})),
        )
        .mount(&server)
        .await;
    mount_dashboard(&server, "tok-abc").await;

    let store: Arc<dyn KeyValueStore> = Arc::new(ReadOnlyStore(MemoryStore::new()));
    let mut engine = Engine::new(ApiClient::new(server.uri()), store.clone());
    engine.start();
    engine.settle().await;

    type_str(&mut engine, "S1");
    act(&mut engine, UserAction::NextField);
    type_str(&mut engine, "x");
    act(&mut engine, UserAction::Submit);
    engine.settle().await;
    type_str(&mut engine, "123456");
    engine.settle().await;

    assert_eq!(engine.state.screen(), Screen::Dashboard);
    assert_eq!(engine.state.otp.token.as_deref(), Some("tok-abc"));
    assert!(engine.state.overlay.is_none());
    assert_eq!(engine.state.dashboard.student.map(|s| s.total()), Some(18));
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}
