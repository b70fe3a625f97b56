//! # Countdown against a mock event backend
//!
//! Spins up an in-process axum backend serving the deadline endpoints and
//! the `/ws/timer` stream, then drives the resolver, the live listener and
//! a full widget against it.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{
        ws::{Message, WebSocketUpgrade},
        Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use tokio::{net::TcpListener, sync::mpsc, time::timeout};

use expo_countdown::{
    services::{listen, DeadlineResolver},
    spawn_widget,
    tasks::deadline_poll_task,
    CountdownPhase, SiteScope, TimerMode, WidgetConfig,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on
async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn widget_config(addr: SocketAddr) -> WidgetConfig {
    let mut config = WidgetConfig::new(&format!("http://{}/api", addr)).unwrap();
    config.live_updates = false;
    config.tick = Duration::from_millis(20);
    config.retry_delay = Duration::from_millis(50);
    config
}

fn iso(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339()
}

#[tokio::test]
async fn resolver_walks_the_fallback_chain() {
    let deadline = iso(Utc::now() + ChronoDuration::days(30));
    let legacy_body = json!({
        "deadline_iso_utc": deadline,
        "deadline_month_upper": "AUGUST",
        "deadline_day": 25
    });

    let app = Router::new()
        .route("/api/timer/active", get(|| async { "<html>not json</html>" }))
        .route("/api/timer", get(move || async move { Json(legacy_body) }));
    let addr = serve(app).await;

    let config = widget_config(addr).with_scope(SiteScope::new(Some("expo".to_string()), None));
    let resolver = DeadlineResolver::new(&config).unwrap();
    assert_eq!(resolver.candidates().len(), 3);

    let payload = resolver.resolve().await.unwrap();
    assert_eq!(payload.mode, TimerMode::UntilEnd);
    assert_eq!(payload.end_time.as_deref(), Some(deadline.as_str()));
}

#[tokio::test]
async fn scoped_endpoint_wins_when_it_answers() {
    let start = iso(Utc::now() + ChronoDuration::hours(6));

    let app = Router::new().route(
        "/api/timer/active",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            let name = match params.get("site_id").map(String::as_str) {
                Some("5") => "Site five",
                Some(_) => return StatusCode::NOT_FOUND.into_response(),
                None => "Everyone",
            };
            Json(json!({
                "event_name": name,
                "mode": "UNTIL_START",
                "start_time": start,
                "end_time": null,
                "server_time": iso(Utc::now())
            }))
            .into_response()
        }),
    );
    let addr = serve(app).await;

    let five = widget_config(addr).with_scope(SiteScope::new(None, Some(5)));
    let payload = DeadlineResolver::new(&five).unwrap().resolve().await.unwrap();
    assert_eq!(payload.event_name, "Site five");

    let seven = widget_config(addr).with_scope(SiteScope::new(None, Some(7)));
    let payload = DeadlineResolver::new(&seven).unwrap().resolve().await.unwrap();
    assert_eq!(payload.event_name, "Everyone");
}

#[tokio::test]
async fn unreachable_backend_retries_indefinitely() {
    let config = widget_config(dead_addr().await);
    let resolver = DeadlineResolver::new(&config).unwrap();
    assert!(resolver.resolve().await.is_err());

    let (tx, mut rx) = mpsc::channel(4);
    let task = tokio::spawn(deadline_poll_task(resolver, Duration::from_millis(20), None, tx));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!task.is_finished());
    assert!(rx.try_recv().is_err());
    task.abort();
}

#[tokio::test]
async fn failing_sources_are_polled_again_after_backoff() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let app = Router::new().route(
        "/api/timer/active",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let addr = serve(app).await;

    let handle = spawn_widget(&widget_config(addr)).unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(hits.load(Ordering::SeqCst) >= 3);
    let snapshot = handle.current();
    assert_eq!(snapshot.phase, CountdownPhase::Dormant);
    assert!(snapshot.display.is_zeroed());
}

#[tokio::test]
async fn widget_corrects_for_server_clock() {
    // Server clock one hour behind local; event two hours after server now.
    let server_now = Utc::now() - ChronoDuration::hours(1);
    let body = json!({
        "event_name": "Expo 2030",
        "mode": "UNTIL_START",
        "start_time": iso(server_now + ChronoDuration::hours(2)),
        "server_time": iso(server_now)
    });

    let app = Router::new().route("/api/timer/active", get(move || async move { Json(body) }));
    let addr = serve(app).await;

    let handle = spawn_widget(&widget_config(addr)).unwrap();
    let mut snapshots = handle.snapshots.clone();
    let snapshot = timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.phase == CountdownPhase::Running),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert_eq!(snapshot.event_name, "Expo 2030");
    assert!((snapshot.clock_offset_ms - 3_600_000).abs() < 2_000);
    assert_eq!(snapshot.display.days, "00");
    assert!(snapshot.display.hours == "01" || snapshot.display.hours == "02");
}

fn ws_frames(frames: Vec<String>) -> Router {
    Router::new().route(
        "/ws/timer",
        get(move |ws: WebSocketUpgrade| async move {
            let frames = frames.clone();
            let response: Response = ws.on_upgrade(move |mut socket| async move {
                for frame in frames {
                    if socket.send(Message::Text(frame)).await.is_err() {
                        return;
                    }
                }
                let _ = socket.send(Message::Close(None)).await;
            });
            response
        }),
    )
}

fn push_frame(event: &str, name: &str, site_id: Option<i64>) -> String {
    json!({
        "event": event,
        "data": {
            "event_name": name,
            "mode": "UNTIL_END",
            "start_time": iso(Utc::now()),
            "end_time": iso(Utc::now() + ChronoDuration::days(3)),
            "site_id": site_id
        }
    })
    .to_string()
}

#[tokio::test]
async fn live_listener_filters_by_site() {
    let app = ws_frames(vec![
        "garbage".to_string(),
        push_frame("TIMER_UPDATE", "Other site", Some(7)),
        push_frame("TIMER_DELETED", "Wrong event", Some(5)),
        push_frame("TIMER_CREATED", "Our site", Some(5)),
    ]);
    let addr = serve(app).await;

    let config = widget_config(addr).with_scope(SiteScope::new(None, Some(5)));
    let (tx, mut rx) = mpsc::channel(8);

    timeout(Duration::from_secs(5), listen(&config.live_url(), &config.scope, tx))
        .await
        .unwrap()
        .unwrap();

    let update = rx.recv().await.unwrap();
    assert_eq!(update.payload.event_name, "Our site");
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn pushed_update_reaches_the_display() {
    let app = ws_frames(vec![push_frame("TIMER_UPDATE", "Pushed", None)]);
    let addr = serve(app).await;

    let mut config = widget_config(addr);
    config.live_updates = true;
    config.retry_delay = Duration::from_secs(10);

    let handle = spawn_widget(&config).unwrap();
    let mut snapshots = handle.snapshots.clone();
    let snapshot = timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.event_name == "Pushed"),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert_eq!(snapshot.mode, TimerMode::UntilEnd);
    assert_eq!(snapshot.clock_offset_ms, 0);
    assert!(snapshot.display.days == "02" || snapshot.display.days == "03");
}

#[tokio::test]
async fn fixed_deadline_reports_expiry_without_network() {
    let mut config = widget_config(dead_addr().await);
    config.static_deadline = Some(Utc::now() - ChronoDuration::minutes(1));

    let handle = spawn_widget(&config).unwrap();
    let snapshot = handle.current();

    assert_eq!(snapshot.phase, CountdownPhase::Expired);
    assert_eq!(snapshot.display.clock(), "00:00:00:00");
}
