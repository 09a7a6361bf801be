//! Shared helpers for the integration tests.

use std::sync::Arc;

use status_monitor::config::MonitorConfig;
use status_monitor::http::HttpServer;
use status_monitor::lifecycle::Shutdown;
use status_monitor::store::StatusStore;

/// A running monitor on an ephemeral port, store in degraded mode so no
/// external backend is needed.
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<StatusStore>,
    // Kept alive so the server's shutdown receiver stays connected.
    _shutdown: Shutdown,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_config(MonitorConfig::default()).await
}

pub async fn spawn_app_with_config(config: MonitorConfig) -> TestApp {
    let store = Arc::new(StatusStore::in_memory());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, store.clone());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestApp {
        base_url: format!("http://{}", addr),
        store,
        _shutdown: shutdown,
    }
}

/// Build a multipart form carrying one JSON document, the way producers
/// upload observations.
pub fn json_upload(payload: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(payload.as_bytes().to_vec())
        .file_name("observation.json")
        .mime_str("application/json")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}
