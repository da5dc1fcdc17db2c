//! End-to-end wiring: handshake, session manager, feeds, and item updates
//! against a scripted transport.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use url::Url;

use inktrack_client::api::{ApiHandle, DashboardAnalyticsFeed, ItemUpdater, RecentOrdersFeed};
use inktrack_client::auth::{AuthClient, LoginCredentials, SessionManager};
use inktrack_client::config::ApiConfig;
use inktrack_client::domain::{
    ApiError, HttpTransport, ItemPatch, SessionSource, DEFAULT_CACHE_DURATION,
};
use inktrack_client::test_support::{ManualClock, ScriptedTransport};

const BASE: &str = "http://localhost:8080/api";

struct World {
    transport: Arc<ScriptedTransport>,
    clock: Arc<ManualClock>,
    session: Arc<SessionManager>,
    handle: ApiHandle,
    auth: AuthClient,
}

fn world() -> World {
    let transport = Arc::new(ScriptedTransport::new());
    let clock = Arc::new(ManualClock::at_epoch());
    let session = Arc::new(SessionManager::new(Arc::clone(&clock) as Arc<dyn Clock>));
    let config = ApiConfig::new(Url::parse(BASE).expect("base url"), DEFAULT_CACHE_DURATION);
    let handle = ApiHandle::new(
        Arc::clone(&session) as Arc<dyn SessionSource>,
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        config,
    );
    let auth = AuthClient::new(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        Url::parse(BASE).expect("base url"),
    );
    World {
        transport,
        clock,
        session,
        handle,
        auth,
    }
}

const ANALYTICS_BODY: &[u8] = br#"{
    "ordersInProduction": 2,
    "ordersWaitingShipping": 4,
    "itemsInProduction": 9,
    "ordersShippedLastWeek": 7
}"#;

#[tokio::test]
async fn feeds_refuse_until_login_completes() {
    let w = world();
    let feed = DashboardAnalyticsFeed::new(&w.handle);

    let before = feed.fetch(false).await;
    assert_eq!(before, Err(ApiError::Auth), "signed out: no request runs");
    assert!(w.transport.requests().is_empty());

    w.transport.push_response(
        200,
        br#"{"accessToken":"at-1","expiresIn":3600,"refreshToken":"rt-1"}"#.as_slice(),
    );
    w.transport.push_response(200, ANALYTICS_BODY);

    w.session.begin_login();
    let credentials = LoginCredentials::try_from_parts("ana", "pw").expect("valid credentials");
    let tokens = w.auth.login(&credentials).await.expect("login succeeds");
    w.session.install(tokens);

    let analytics = feed
        .fetch(false)
        .await
        .expect("fetch succeeds")
        .expect("analytics payload present");
    assert_eq!(analytics.orders_waiting_shipping, 4);

    let authed = &w.transport.requests()[1];
    assert_eq!(authed.header("authorization"), Some("Bearer at-1"));
}

#[tokio::test]
async fn refresh_cycle_keeps_feeds_working() {
    let w = world();
    w.transport.push_response(
        200,
        br#"{"accessToken":"at-1","expiresIn":3600,"refreshToken":"rt-1"}"#.as_slice(),
    );
    let credentials = LoginCredentials::try_from_parts("ana", "pw").expect("valid credentials");
    let tokens = w.auth.login(&credentials).await.expect("login succeeds");
    w.session.install(tokens);

    // 56 minutes later the hour-long token is inside the refresh margin.
    w.clock.advance(TimeDelta::minutes(56));
    assert!(w.session.refresh_due());

    w.transport.push_response(
        200,
        br#"{"accessToken":"at-2","expiresIn":3600}"#.as_slice(),
    );
    let current = w.session.token_set().expect("signed in");
    let refreshed = w.auth.refresh(&current).await.expect("refresh succeeds");
    w.session.install(refreshed);
    assert!(!w.session.refresh_due());

    w.transport.push_response(200, br#"[]"#.as_slice());
    let feed = RecentOrdersFeed::new(&w.handle);
    feed.fetch(false).await.expect("fetch succeeds");

    let last = w.transport.requests().last().cloned().expect("a request ran");
    assert_eq!(last.header("authorization"), Some("Bearer at-2"));
}

#[tokio::test]
async fn item_update_round_trip_uses_sparse_patch() {
    let w = world();
    w.transport.push_response(
        200,
        br#"{"accessToken":"at-1","expiresIn":3600}"#.as_slice(),
    );
    let credentials = LoginCredentials::try_from_parts("ana", "pw").expect("valid credentials");
    let tokens = w.auth.login(&credentials).await.expect("login succeeds");
    w.session.install(tokens);

    w.transport.push_response(204, Vec::new());
    let updater = ItemUpdater::new(&w.handle);
    let patch = ItemPatch {
        quantity: Some(30),
        ..ItemPatch::default()
    };
    updater.update(7, &patch).await.expect("update succeeds");

    let last = w.transport.requests().last().cloned().expect("a request ran");
    assert_eq!(last.url.as_str(), "http://localhost:8080/api/item/7");
    assert_eq!(last.body.as_deref(), Some(r#"{"quantity":30}"#));
    assert_eq!(updater.error(), None);
}
