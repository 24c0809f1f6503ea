//! Throwaway HTTP targets for forwarding tests.
//!
//! Each target is a real axum server on `127.0.0.1:0` that answers with a
//! fixed status after an optional delay and records what it received.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tokio::task::JoinHandle;
use webhook_router::{
    forwarder::{Forwarder, ForwarderConfig},
    log_store::LogStore,
    providers::{FacebookProvider, InstagramProvider, Provider, ProviderRegistry},
    state::AppState,
    types::ForwardTarget,
};

#[derive(Debug, Clone)]
pub struct Received {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

pub struct TestTarget {
    pub url: String,
    pub received: Arc<Mutex<Vec<Received>>>,
    handle: JoinHandle<()>,
}

impl TestTarget {
    pub fn target(&self) -> ForwardTarget {
        ForwardTarget::new(self.url.clone())
    }

    pub fn requests(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for TestTarget {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_target(status: StatusCode) -> TestTarget {
    spawn_delayed_target(status, Duration::ZERO).await
}

pub async fn spawn_delayed_target(status: StatusCode, delay: Duration) -> TestTarget {
    let received = Arc::new(Mutex::new(Vec::new()));
    let captured = received.clone();

    let app = Router::new().route(
        "/hook",
        post(move |headers: HeaderMap, body: Bytes| {
            let captured = captured.clone();
            async move {
                let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                captured.lock().unwrap().push(Received { headers, body });
                tokio::time::sleep(delay).await;
                status
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test target");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test target failed");
    });

    TestTarget {
        url: format!("http://{addr}/hook"),
        received,
        handle,
    }
}

/// A URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/hook")
}

pub fn forwarder() -> Forwarder {
    forwarder_with_timeout(5_000)
}

pub fn forwarder_with_timeout(timeout_ms: u64) -> Forwarder {
    Forwarder::new(ForwarderConfig {
        timeout_ms,
        ..ForwarderConfig::default()
    })
    .expect("build forwarder")
}

pub fn facebook(targets: Vec<ForwardTarget>, verify_token: Option<&str>) -> Provider {
    Provider::Facebook(FacebookProvider::new(
        targets,
        verify_token.map(str::to_string),
    ))
}

pub fn instagram(targets: Vec<ForwardTarget>, verify_token: Option<&str>) -> Provider {
    Provider::Instagram(InstagramProvider::new(
        targets,
        verify_token.map(str::to_string),
    ))
}

pub fn app_state(providers: Vec<Provider>, inspector_api_token: Option<&str>) -> AppState {
    AppState {
        logs: Arc::new(LogStore::new()),
        forwarder: forwarder(),
        providers: Arc::new(ProviderRegistry::new(providers)),
        inspector_api_token: inspector_api_token.map(str::to_string),
    }
}

pub fn page_payload() -> serde_json::Value {
    serde_json::json!({
        "object": "page",
        "entry": [{
            "id": "104857600",
            "time": 1_700_000_000_000_i64,
            "messaging": [{
                "sender": { "id": "2048" },
                "recipient": { "id": "104857600" },
                "message": { "mid": "m_1", "text": "hello" }
            }]
        }]
    })
}
