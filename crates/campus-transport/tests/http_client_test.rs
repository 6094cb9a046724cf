use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use campus_core::constants::{ACCESS_TOKEN_KEY, LOCALE_KEY};
use campus_core::errors::ApiError;
use campus_core::models::{CredentialPair, Locale, LogoutReason, Route, SessionEvent};
use campus_core::traits::{KeyValueStore, Method};
use campus_core::ClientConfig;
use campus_session::SessionController;
use campus_storage::{LocaleStore, MemoryStore, TokenStore};
use campus_transport::HttpClient;
use test_fixtures::{data_body, error_body, jwt_for, token_body, ScriptedTransport, BASE_URL};

const REFRESH: &str = "/auth/refresh-token";

struct Harness {
    transport: ScriptedTransport,
    backend: MemoryStore,
    http: Arc<HttpClient<ScriptedTransport>>,
}

impl Harness {
    fn new(pair: Option<(&str, &str)>) -> Self {
        Self::with_config(pair, ClientConfig::with_base_url(BASE_URL))
    }

    fn with_config(pair: Option<(&str, &str)>, config: ClientConfig) -> Self {
        let backend = MemoryStore::new();
        let kv: Arc<dyn KeyValueStore> = Arc::new(backend.clone());
        let tokens = TokenStore::new(kv.clone());
        if let Some((at, rt)) = pair {
            tokens.set(&CredentialPair::new(at, rt)).unwrap();
        }
        let session = Arc::new(SessionController::new(tokens));
        session.initialize();

        let transport = ScriptedTransport::default();
        let locale = LocaleStore::new(kv, Locale::default());
        let http = Arc::new(HttpClient::new(transport.clone(), config, session, locale));
        Self {
            transport,
            backend,
            http,
        }
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.backend.get(key).unwrap()
    }

    fn authorization(&self, method: Method, path: &str, nth: usize) -> Option<String> {
        self.transport.requests_to(method, path)[nth]
            .header("Authorization")
            .map(str::to_string)
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ── refresh protocol ─────────────────────────────────────────────────────

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    h.transport
        .respond(Method::Get, "/courses", 401, error_body(401, "Token expired", None))
        .respond(Method::Post, REFRESH, 200, token_body("new-at", "new-rt"))
        .respond(
            Method::Get,
            "/courses",
            200,
            data_body(json!([{ "courseId": 1, "courseName": "Algebra" }])),
        );

    let response = h.http.get("/courses").await.unwrap();

    let body: Value = response.json().unwrap();
    assert_eq!(body["data"][0]["courseName"], "Algebra");
    assert_eq!(h.stored("accessToken").as_deref(), Some("new-at"));
    assert_eq!(h.stored("refreshToken").as_deref(), Some("new-rt"));
    assert_eq!(h.authorization(Method::Get, "/courses", 0).as_deref(), Some("Bearer expired"));
    assert_eq!(h.authorization(Method::Get, "/courses", 1).as_deref(), Some("Bearer new-at"));
    assert!(h.http.session().is_authenticated());

    let refresh = &h.transport.requests_to(Method::Post, REFRESH)[0];
    assert_eq!(refresh.body, Some(json!({ "refreshToken": "valid-rt" })));
    assert_eq!(refresh.header("Authorization"), None);
}

#[tokio::test]
async fn rejected_refresh_token_ends_session() {
    let h = Harness::new(Some(("expired", "invalid-rt")));
    let mut events = h.http.session().subscribe();
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond(Method::Post, REFRESH, 401, error_body(401, "Invalid refresh token", None));

    let err = h.http.get("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::AuthInvalid { .. }));
    assert_eq!(h.stored("accessToken"), None);
    assert_eq!(h.stored("refreshToken"), None);
    assert!(!h.http.session().is_authenticated());
    assert_eq!(h.transport.count(Method::Get, "/courses"), 1);

    let events = drain(&mut events);
    assert!(events.contains(&SessionEvent::LoggedOut(LogoutReason::RefreshFailed)));
    assert_eq!(events.last(), Some(&SessionEvent::Redirect(Route::Login)));
}

#[tokio::test]
async fn missing_refresh_token_fails_without_calling_refresh() {
    let h = Harness::new(None);
    h.backend.set(ACCESS_TOKEN_KEY, "expired").unwrap();
    h.transport.respond(Method::Get, "/students", 401, json!({}));

    let err = h.http.get("/students").await.unwrap_err();

    assert!(matches!(err, ApiError::AuthInvalid { .. }));
    assert_eq!(h.transport.count(Method::Post, REFRESH), 0);
    assert_eq!(h.stored("accessToken"), None);
}

#[tokio::test]
async fn refresh_network_error_is_terminal() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .fail(Method::Post, REFRESH, "connection reset");

    let err = h.http.get("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::AuthInvalid { .. }));
    assert!(h.http.session().credentials().is_empty());
}

#[tokio::test]
async fn second_401_after_retry_is_not_refreshed_again() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    h.transport
        .respond(Method::Get, "/enrollments", 401, json!({}))
        .respond(Method::Post, REFRESH, 200, token_body("new-at", "new-rt"))
        .respond(Method::Get, "/enrollments", 401, error_body(401, "Account disabled", None));

    let err = h.http.get("/enrollments").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::AuthInvalid {
            reason: "Account disabled".into()
        }
    );
    assert_eq!(h.transport.count(Method::Post, REFRESH), 1);
    assert_eq!(h.transport.count(Method::Get, "/enrollments"), 2);
    assert!(!h.http.session().is_authenticated());
    assert_eq!(h.transport.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_401s_share_one_refresh() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond(Method::Get, "/students", 401, json!({}))
        .respond_after(
            Method::Post,
            REFRESH,
            200,
            token_body("new-at", "new-rt"),
            Duration::from_millis(50),
        )
        .respond(Method::Get, "/courses", 200, data_body(json!([])))
        .respond(Method::Get, "/students", 200, data_body(json!([])));

    let (courses, students) = tokio::join!(h.http.get("/courses"), h.http.get("/students"));

    assert_eq!(courses.unwrap().status, 200);
    assert_eq!(students.unwrap().status, 200);
    assert_eq!(h.transport.count(Method::Post, REFRESH), 1);
    assert_eq!(h.authorization(Method::Get, "/courses", 1).as_deref(), Some("Bearer new-at"));
    assert_eq!(h.authorization(Method::Get, "/students", 1).as_deref(), Some("Bearer new-at"));
    assert_eq!(h.stored("refreshToken").as_deref(), Some("new-rt"));
}

#[tokio::test(start_paused = true)]
async fn concurrent_waiters_share_terminal_failure() {
    let h = Harness::new(Some(("expired", "invalid-rt")));
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond(Method::Get, "/students", 401, json!({}))
        .respond_after(Method::Post, REFRESH, 401, json!({}), Duration::from_millis(50));

    let (courses, students) = tokio::join!(h.http.get("/courses"), h.http.get("/students"));

    assert!(matches!(courses, Err(ApiError::AuthInvalid { .. })));
    assert!(matches!(students, Err(ApiError::AuthInvalid { .. })));
    assert_eq!(h.transport.count(Method::Post, REFRESH), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_refresh_call_counts_as_failure() {
    let config = ClientConfig {
        refresh_timeout_ms: 100,
        ..ClientConfig::with_base_url(BASE_URL)
    };
    let h = Harness::with_config(Some(("expired", "valid-rt")), config);
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond_after(
            Method::Post,
            REFRESH,
            200,
            token_body("late-at", "late-rt"),
            Duration::from_secs(5),
        );

    let err = h.http.get("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::AuthInvalid { .. }));
    assert_eq!(h.stored("accessToken"), None);
}

#[tokio::test(start_paused = true)]
async fn logout_during_refresh_is_not_undone() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    let mut events = h.http.session().subscribe();
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond_after(
            Method::Post,
            REFRESH,
            200,
            token_body("new-at", "new-rt"),
            Duration::from_millis(50),
        );

    let (result, ()) = tokio::join!(h.http.get("/courses"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.http.session().logout_local();
    });

    assert!(matches!(result, Err(ApiError::AuthInvalid { .. })));
    assert_eq!(h.stored("accessToken"), None);
    assert_eq!(h.stored("refreshToken"), None);
    assert!(!h.http.session().is_authenticated());
    assert_eq!(h.transport.count(Method::Get, "/courses"), 1);
    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::LoggedOut(LogoutReason::Local),
            SessionEvent::Redirect(Route::Login)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn login_during_refresh_keeps_the_new_pair() {
    let h = Harness::new(Some(("expired", "valid-rt")));
    let fresh = jwt_for("teacher");
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond_after(
            Method::Post,
            REFRESH,
            200,
            token_body("stale-at", "stale-rt"),
            Duration::from_millis(50),
        );

    let (result, ()) = tokio::join!(h.http.get("/courses"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.http
            .session()
            .login(CredentialPair::new(fresh.clone(), "login-rt"))
            .unwrap();
    });

    assert!(matches!(result, Err(ApiError::AuthInvalid { .. })));
    assert_eq!(h.stored("accessToken"), Some(fresh));
    assert_eq!(h.stored("refreshToken").as_deref(), Some("login-rt"));
    assert_eq!(h.http.session().identity().unwrap().display_name, "teacher");
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_does_not_end_a_newer_login() {
    let h = Harness::new(Some(("expired", "invalid-rt")));
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond_after(Method::Post, REFRESH, 401, json!({}), Duration::from_millis(50));

    let (result, ()) = tokio::join!(h.http.get("/courses"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.http
            .session()
            .login(CredentialPair::new("login-at", "login-rt"))
            .unwrap();
    });

    assert!(matches!(result, Err(ApiError::AuthInvalid { .. })));
    assert!(h.http.session().is_authenticated());
    assert_eq!(h.stored("refreshToken").as_deref(), Some("login-rt"));
}

#[tokio::test]
async fn later_expiry_triggers_a_fresh_refresh() {
    let h = Harness::new(Some(("expired", "rt-1")));
    h.transport
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond(Method::Post, REFRESH, 200, token_body("at-2", "rt-2"))
        .respond(Method::Get, "/courses", 200, data_body(json!([])))
        .respond(Method::Get, "/courses", 401, json!({}))
        .respond(Method::Post, REFRESH, 200, token_body("at-3", "rt-3"))
        .respond(Method::Get, "/courses", 200, data_body(json!([])));

    h.http.get("/courses").await.unwrap();
    h.http.get("/courses").await.unwrap();

    let refreshes = h.transport.requests_to(Method::Post, REFRESH);
    assert_eq!(refreshes.len(), 2);
    assert_eq!(refreshes[1].body, Some(json!({ "refreshToken": "rt-2" })));
    assert_eq!(h.stored("accessToken").as_deref(), Some("at-3"));
}

// ── classification without refresh ───────────────────────────────────────

#[tokio::test]
async fn non_401_errors_are_returned_untouched() {
    let h = Harness::new(Some(("at", "rt")));
    h.transport
        .respond(Method::Get, "/courses", 500, error_body(500, "Database offline", None))
        .respond(Method::Get, "/courses/9", 404, json!({}));

    assert_eq!(
        h.http.get("/courses").await.unwrap_err(),
        ApiError::ServerFault {
            status: 500,
            message: "Database offline".into()
        }
    );
    assert!(matches!(
        h.http.get("/courses/9").await.unwrap_err(),
        ApiError::NotFound { .. }
    ));
    assert_eq!(h.transport.count(Method::Get, "/courses"), 1);
    assert_eq!(h.transport.count(Method::Post, REFRESH), 0);
    assert!(h.http.session().is_authenticated());
}

#[tokio::test]
async fn no_response_is_network_unreachable_and_keeps_session() {
    let h = Harness::new(Some(("at", "rt")));
    h.transport.fail(Method::Get, "/courses", "connection refused");

    let err = h.http.get("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::NetworkUnreachable { .. }));
    assert!(h.http.session().is_authenticated());
}

#[tokio::test]
async fn unparsable_success_body_is_malformed() {
    let h = Harness::new(Some(("at", "rt")));
    h.transport.respond_text(Method::Get, "/courses", 200, "<html>proxy</html>");

    let response = h.http.get("/courses").await.unwrap();
    let err = response.json::<Value>().unwrap_err();

    assert!(matches!(err, ApiError::MalformedResponse { ref path, .. } if path == "/courses"));
}

// ── headers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_request_carries_locale_and_bearer() {
    let h = Harness::new(Some(("at", "rt")));
    h.backend.set(LOCALE_KEY, "vi-VN").unwrap();
    h.transport
        .respond(Method::Get, "/courses", 200, data_body(json!([])))
        .respond(Method::Post, "/courses", 201, data_body(json!({ "courseId": 3 })))
        .respond(Method::Get, "/courses", 200, data_body(json!([])));

    h.http.get("/courses").await.unwrap();
    h.http
        .post("/courses", json!({ "courseName": "Physics" }))
        .await
        .unwrap();
    h.http.session().logout_local();
    h.http.get("/courses").await.unwrap();

    let requests = h.transport.requests();
    assert!(requests
        .iter()
        .all(|r| r.header("accept-language") == Some("vi-VN")));

    assert_eq!(requests[0].url, format!("{BASE_URL}/courses"));
    assert_eq!(requests[0].header("Authorization"), Some("Bearer at"));
    assert_eq!(requests[0].header("Content-Type"), None);
    assert_eq!(requests[1].header("Content-Type"), Some("application/json"));
    assert_eq!(requests[1].body, Some(json!({ "courseName": "Physics" })));
    // Logged out: no bearer, locale survives.
    assert_eq!(requests[2].header("Authorization"), None);
    assert_eq!(h.stored(LOCALE_KEY).as_deref(), Some("vi-VN"));
}

#[tokio::test]
async fn default_locale_applies_when_none_stored() {
    let h = Harness::new(None);
    h.transport.respond(Method::Get, "/courses", 200, data_body(json!([])));

    h.http.get("/courses").await.unwrap();

    assert_eq!(h.transport.requests()[0].header("Accept-Language"), Some("en-US"));
}

#[tokio::test]
async fn anonymous_401_does_not_refresh() {
    let h = Harness::new(Some(("at", "rt")));
    h.transport.respond(Method::Post, "/auth/login", 401, json!({}));

    let err = h
        .http
        .send_anonymous(Method::Post, "/auth/login", Some(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthInvalid { .. }));
    assert_eq!(h.transport.count(Method::Post, REFRESH), 0);
    assert_eq!(h.transport.requests()[0].header("Authorization"), None);
    assert!(h.http.session().is_authenticated());
}
