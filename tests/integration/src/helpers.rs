//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers against an in-process
//! realtime fixture and making HTTP requests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Result;
use pulse_api::{create_app, create_app_state_with, AppState};
use pulse_common::{
    AppConfig, AppSettings, ClientConfig, CorsConfig, Environment, RealtimeConfig, ServerConfig,
    TypingConfig,
};
use pulse_realtime::SharedRealtime;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19000);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server around the given realtime fixture
    pub async fn start(realtime: SharedRealtime) -> Result<Self> {
        Self::start_with_config(realtime, test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(realtime: SharedRealtime, config: AppConfig) -> Result<Self> {
        let port = get_test_port();
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        // Create app state (spawns the sweep loop)
        let state = create_app_state_with(realtime, config);

        // Build application
        let app = create_app(state.clone());

        // Bind to port
        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Create HTTP client
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a CORS preflight request
    pub async fn preflight(&self, path: &str, origin: &str, method: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .request(reqwest::Method::OPTIONS, &url)
            .header("Origin", origin)
            .header("Access-Control-Request-Method", method)
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await?)
    }

    /// Make a POST request with a raw body and content type
    pub async fn post_raw(&self, path: &str, body: &str, content_type: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.state.sweeper().stop();
    }
}

/// Create a test configuration with default liveness windows
pub fn test_config() -> AppConfig {
    test_config_with_typing(3000, 5000)
}

/// Create a test configuration with explicit liveness windows
pub fn test_config_with_typing(ttl_ms: u64, sweep_interval_ms: u64) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "pulse-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        realtime: RealtimeConfig {
            key: None,
            rest_url: None,
            channel: "chat".to_string(),
        },
        typing: TypingConfig {
            ttl_ms,
            sweep_interval_ms,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        client: ClientConfig {
            backend_url: "http://127.0.0.1:0".to_string(),
        },
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Poll a condition until it holds or the timeout elapses
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    condition()
}
