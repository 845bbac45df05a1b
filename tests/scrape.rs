//! End-to-end scrape pipeline tests against a stubbed device.
//!
//! Spins up an in-process stand-in for the device API and the real
//! bridge router, then scrapes over HTTP like Prometheus would.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use dsmr_bridge::{
    fetch::Fetcher,
    metrics::MeterMetrics,
    server::{router, AppState, BridgeServer},
};
use tokio::net::TcpListener;
use url::Url;

const SNAPSHOT: &str = r#"{"Actual":[
    {"Name":"voltage_l1","Value":230.4,"Unit":"V"},
    {"Name":"power_delivered_l1","Value":0.425,"Unit":"kW"},
    {"Name":"energy_delivered_tariff1","Value":1234.5,"Unit":"kWh"},
    {"Name":"gas_delivered","Value":1543.25,"Unit":"m3"},
    {"Name":"wifi_strength","Value":74,"Unit":"%"}
]}"#;

/// Device stub whose failure mode can be toggled at runtime.
async fn spawn_device_stub(failing: Arc<AtomicBool>) -> SocketAddr {
    let app = Router::new().route(
        "/api/v1/sm/actual",
        get(move || {
            let failing = failing.clone();
            async move {
                if failing.load(Ordering::SeqCst) {
                    (StatusCode::SERVICE_UNAVAILABLE, "meter offline".to_string())
                } else {
                    (StatusCode::OK, SNAPSHOT.to_string())
                }
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Boots the bridge against the stub and returns its address plus a
/// handle on the shared state for registry assertions.
async fn spawn_bridge(device_addr: SocketAddr) -> (SocketAddr, Arc<AppState>) {
    let base_url = Url::parse(&format!("http://{device_addr}")).unwrap();
    let state = Arc::new(AppState {
        fetcher: Fetcher::new(base_url).unwrap(),
        metrics: MeterMetrics::new().unwrap(),
    });

    let app = router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

#[tokio::test]
async fn scrape_renders_classified_gauges() {
    let failing = Arc::new(AtomicBool::new(false));
    let device = spawn_device_stub(failing).await;
    let (bridge, _state) = spawn_bridge(device).await;

    let response = reqwest::get(format!("http://{bridge}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains(r#"dsmr_voltage{phase="l1"} 230.4"#));
    assert!(body.contains(r#"dsmr_power{direction="delivered",phase="l1"} 0.425"#));
    assert!(body.contains(r#"dsmr_energy_transported{direction="delivered",tariff="low"} 1234.5"#));
    assert!(body.contains("dsmr_gas_delivered 1543.25"));
    // Unknown upstream names are dropped, not exported.
    assert!(!body.contains("wifi_strength"));
}

#[tokio::test]
async fn scrape_survives_upstream_failure() {
    // The original adapter killed the whole process on a failed device
    // read; the bridge must instead fail only the affected scrape.
    let failing = Arc::new(AtomicBool::new(false));
    let device = spawn_device_stub(failing.clone()).await;
    let (bridge, state) = spawn_bridge(device).await;

    // Seed the registry with one good scrape.
    let response = reqwest::get(format!("http://{bridge}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    // Device goes away: the scrape fails, the process does not.
    failing.store(true, Ordering::SeqCst);
    let response = reqwest::get(format!("http://{bridge}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);

    // No partial writes: prior gauge values are retained.
    let retained = state.metrics.encode().unwrap();
    assert!(retained.contains(r#"dsmr_voltage{phase="l1"} 230.4"#));
    assert!(retained.contains("dsmr_gas_delivered 1543.25"));

    // Device recovers and the next scrape works again.
    failing.store(false, Ordering::SeqCst);
    let response = reqwest::get(format!("http://{bridge}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn concurrent_scrapes_resolve_last_write_wins() {
    // The device answers each call with a different voltage reading.
    // Two concurrent scrapes may interleave freely, but every gauge
    // value seen afterwards must be one that was validly fetched.
    const READINGS: [f64; 2] = [230.4, 231.8];

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        "/api/v1/sm/actual",
        get(move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let value = READINGS[n % READINGS.len()];
                (
                    StatusCode::OK,
                    format!(r#"{{"Actual":[{{"Name":"voltage_l1","Value":{value},"Unit":"V"}}]}}"#),
                )
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let device = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (bridge, state) = spawn_bridge(device).await;

    let url = format!("http://{bridge}/metrics");
    let (first, second) = tokio::join!(reqwest::get(&url), reqwest::get(&url));
    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    assert_eq!(second.status(), reqwest::StatusCode::OK);

    // Each rendered body and the final registry state carry one of the
    // two fetched readings, never anything in between.
    for body in [
        first.text().await.unwrap(),
        second.text().await.unwrap(),
        state.metrics.encode().unwrap(),
    ] {
        assert!(
            body.contains(r#"dsmr_voltage{phase="l1"} 230.4"#)
                || body.contains(r#"dsmr_voltage{phase="l1"} 231.8"#),
            "unexpected voltage reading in: {body}"
        );
    }
}

#[tokio::test]
async fn bridge_drains_and_stops_on_shutdown() {
    let failing = Arc::new(AtomicBool::new(false));
    let device = spawn_device_stub(failing).await;
    let base_url = Url::parse(&format!("http://{device}")).unwrap();
    let server = BridgeServer::new(
        Fetcher::new(base_url).unwrap(),
        MeterMetrics::new().unwrap(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = shutdown_rx.await;
    }));

    // Serves normally until asked to stop.
    let response = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    shutdown_tx.send(()).unwrap();
    let result = handle.await.unwrap();
    assert!(result.is_ok());

    // The listener is gone after shutdown.
    assert!(reqwest::get(format!("http://{addr}/metrics")).await.is_err());
}

#[tokio::test]
async fn health_endpoint_does_not_touch_the_device() {
    // Health answers even while the device is down.
    let failing = Arc::new(AtomicBool::new(true));
    let device = spawn_device_stub(failing).await;
    let (bridge, _state) = spawn_bridge(device).await;

    let response = reqwest::get(format!("http://{bridge}/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}
