use std::sync::Arc;

use serde_json::json;

use campus_api::{CampusClient, Course, LatestWins, ListQuery, Page};
use campus_core::models::{Locale, Route, SessionState};
use campus_core::traits::Method;
use campus_core::ClientConfig;
use campus_session::RouteDecision;
use campus_storage::{MemoryStore, SqliteStore};
use campus_transport::LoginRequest;
use test_fixtures::{data_body, jwt_for, token_body, ScriptedTransport, BASE_URL};

fn client_over(store: Arc<MemoryStore>) -> (ScriptedTransport, CampusClient<ScriptedTransport>) {
    let transport = ScriptedTransport::default();
    let client = CampusClient::new(
        ClientConfig::with_base_url(BASE_URL),
        store,
        transport.clone(),
    );
    (transport, client)
}

#[tokio::test]
async fn fresh_client_is_unauthenticated_without_network() {
    let (transport, client) = client_over(Arc::new(MemoryStore::new()));

    let snapshot = client.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(transport.requests().is_empty());
    assert_eq!(client.route("/courses"), RouteDecision::Redirect(Route::Login));
}

#[tokio::test]
async fn login_then_guard_then_logout() {
    let (transport, client) = client_over(Arc::new(MemoryStore::new()));
    transport.respond(
        Method::Post,
        "/auth/login",
        200,
        token_body(&jwt_for("minh.tran"), "rt"),
    );

    client
        .auth()
        .login(&LoginRequest::new("minh.tran", "pw"))
        .await
        .unwrap();
    assert_eq!(client.route("/login"), RouteDecision::Redirect(Route::Courses));
    assert_eq!(
        client.session().identity().unwrap().display_name,
        "minh.tran"
    );

    client.auth().logout_local();
    assert_eq!(client.route("/students"), RouteDecision::Redirect(Route::Login));
}

#[tokio::test]
async fn locale_preference_survives_logout_and_rides_every_request() {
    let store = Arc::new(MemoryStore::new());
    let (transport, client) = client_over(store);
    client.set_locale(&Locale::new("vi-VN")).unwrap();
    transport
        .respond(Method::Post, "/auth/logout", 200, json!({}))
        .respond(Method::Get, "/courses?page=1&itemsPerPage=10", 200, data_body(json!([])));

    client.auth().logout_everywhere().await;
    client
        .resources()
        .list::<Course>(&ListQuery::default())
        .await
        .unwrap();

    assert_eq!(client.locale().as_str(), "vi-VN");
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.header("Accept-Language") == Some("vi-VN")));
}

#[tokio::test]
async fn configured_default_locale_is_used() {
    let transport = ScriptedTransport::default();
    let config = ClientConfig {
        default_locale: "vi-VN".into(),
        ..ClientConfig::with_base_url(BASE_URL)
    };
    let client = CampusClient::new(config, Arc::new(MemoryStore::new()), transport);
    assert_eq!(client.locale(), Locale::new("vi-VN"));
}

#[tokio::test]
async fn session_persists_in_sqlite_between_clients() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let transport = ScriptedTransport::default();
        transport.respond(
            Method::Post,
            "/auth/login",
            200,
            token_body(&jwt_for("admin"), "rt"),
        );
        let client = CampusClient::new(ClientConfig::with_base_url(BASE_URL), store, transport);
        client
            .auth()
            .login(&LoginRequest::new("admin", "pw"))
            .await
            .unwrap();
    }

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let client = CampusClient::new(
        ClientConfig::with_base_url(BASE_URL),
        store,
        ScriptedTransport::default(),
    );
    assert_eq!(
        client.session().identity().unwrap().display_name,
        "admin"
    );
}

#[tokio::test]
async fn stale_list_response_is_discarded() {
    let (transport, client) = client_over(Arc::new(MemoryStore::new()));
    transport
        .respond(
            Method::Get,
            "/courses?page=1&itemsPerPage=10",
            200,
            data_body(json!([{ "courseId": 1 }])),
        )
        .respond(
            Method::Get,
            "/courses?courseName=Alg&page=1&itemsPerPage=10",
            200,
            data_body(json!([{ "courseId": 2 }])),
        );
    let view: LatestWins<Page<Course>> = LatestWins::new();

    // The unfiltered fetch is issued first but its result lands last.
    let stale = view.begin();
    let fresh = view.begin();
    let filtered = client
        .resources()
        .list::<Course>(&ListQuery::default().with_filter("courseName", "Alg"))
        .await
        .unwrap();
    assert!(view.finish(fresh, filtered));
    let unfiltered = client
        .resources()
        .list::<Course>(&ListQuery::default())
        .await
        .unwrap();
    assert!(!view.finish(stale, unfiltered));

    let shown = view.current().unwrap();
    assert_eq!(shown.items[0].course_id.as_ref().map(|id| id.as_str()), Some("2"));
}
