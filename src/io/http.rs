//! REST client for the connection manager endpoints.
//!
//! Request paths are resolved relative to the page the diagram is mounted
//! on, the way a browser resolves relative links. Inside the web console
//! the endpoints live one level down, under `connection-manager/`.

use std::time::Duration;

use reqwest::Response;
use tracing::debug;
use url::Url;

use crate::model::{ConnectionPair, Snapshot};

use super::backend::ConnectionBackend;
use super::error::BackendError;

/// Endpoint prefix used when mounted inside the web console.
pub const CONSOLE_PREFIX: &str = "connection-manager/";

/// Prefix for request paths given the path of the hosting page.
pub fn api_prefix(page_path: &str) -> &'static str {
    match page_path.find("console") {
        Some(pos) if pos > 0 => CONSOLE_PREFIX,
        _ => "",
    }
}

/// HTTP client for one connection manager.
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(page_url: &Url, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, page_url)
    }

    /// Reuses an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, page_url: &Url) -> Result<Self, BackendError> {
        let base = page_url.join(api_prefix(page_url.path()))?;
        debug!("Connection manager API at {}", base);
        Ok(Self { client, base })
    }

    pub fn endpoint_url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(path)?)
    }

    async fn check_status(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get(&self, path: &str) -> Result<Response, BackendError> {
        let response = self.client.get(self.endpoint_url(path)?).send().await?;
        Self::check_status(response).await
    }

    async fn post_pair(&self, path: &str, pair: &ConnectionPair) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.endpoint_url(path)?)
            .json(pair)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

impl ConnectionBackend for HttpBackend {
    async fn current_state(&self) -> Result<Snapshot, BackendError> {
        Ok(self.get("currentState").await?.json().await?)
    }

    async fn connect(&self, pair: &ConnectionPair) -> Result<(), BackendError> {
        self.post_pair("connect", pair).await
    }

    async fn disconnect(&self, pair: &ConnectionPair) -> Result<(), BackendError> {
        self.post_pair("disconnect", pair).await
    }

    async fn autoconnect(&self) -> Result<(), BackendError> {
        self.get("autoconnect").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<(&'static str, Value)>>>;

    async fn serve(app: Router) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn recorder(
        name: &'static str,
        received: &Received,
    ) -> axum::routing::MethodRouter {
        let received = received.clone();
        post(move |Json(body): Json<Value>| {
            received.lock().unwrap().push((name, body));
            async { StatusCode::OK }
        })
    }

    #[test]
    fn test_api_prefix() {
        assert_eq!(api_prefix("/system/console/connections"), CONSOLE_PREFIX);
        assert_eq!(api_prefix("/dashboard/widget/"), "");
        // Only a match past the first character counts.
        assert_eq!(api_prefix("console"), "");
    }

    #[test]
    fn test_endpoint_urls() {
        let timeout = Duration::from_secs(1);

        let page = Url::parse("http://localhost:8080/system/console/connections").unwrap();
        let backend = HttpBackend::new(&page, timeout).unwrap();
        assert_eq!(
            backend.endpoint_url("currentState").unwrap().as_str(),
            "http://localhost:8080/system/console/connection-manager/currentState"
        );

        let page = Url::parse("http://localhost:8080/widget/connection-manager/index.html").unwrap();
        let backend = HttpBackend::new(&page, timeout).unwrap();
        assert_eq!(
            backend.endpoint_url("connect").unwrap().as_str(),
            "http://localhost:8080/widget/connection-manager/connect"
        );
    }

    #[tokio::test]
    async fn test_requests_against_server() {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let autoconnects = Arc::new(Mutex::new(0u32));

        let app = Router::new()
            .route(
                "/system/console/connection-manager/currentState",
                get(|| async {
                    Json(json!({
                        "endpoints": [
                            { "id": "a", "ports": [{ "id": "out", "isMultiple": false, "potentialConnections": ["b:in"] }] },
                            { "id": "b", "ports": [{ "id": "in", "isMultiple": true }] }
                        ],
                        "activeConnections": ["a:out-b:in"]
                    }))
                }),
            )
            .route("/system/console/connection-manager/connect", recorder("connect", &received))
            .route("/system/console/connection-manager/disconnect", recorder("disconnect", &received))
            .route(
                "/system/console/connection-manager/autoconnect",
                get({
                    let autoconnects = autoconnects.clone();
                    move || {
                        *autoconnects.lock().unwrap() += 1;
                        async { StatusCode::OK }
                    }
                }),
            );
        let addr = serve(app).await;

        let page = Url::parse(&format!("http://{}/system/console/connections", addr)).unwrap();
        let backend = HttpBackend::new(&page, Duration::from_secs(5)).unwrap();

        let snapshot = backend.current_state().await.unwrap();
        assert_eq!(snapshot.endpoints.len(), 2);
        assert_eq!(snapshot.active_connections, vec!["a:out-b:in".to_string()]);

        let pair = ConnectionPair::new("a:out", "b:in");
        backend.connect(&pair).await.unwrap();
        backend.disconnect(&pair).await.unwrap();
        backend.autoconnect().await.unwrap();

        let received = received.lock().unwrap().clone();
        assert_eq!(received, vec![
            ("connect", json!({ "source": "a:out", "target": "b:in" })),
            ("disconnect", json!({ "source": "a:out", "target": "b:in" })),
        ]);
        assert_eq!(*autoconnects.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new().route(
            "/connect",
            post(|| async { (StatusCode::CONFLICT, "port busy") }),
        );
        let addr = serve(app).await;

        let page = Url::parse(&format!("http://{}/", addr)).unwrap();
        let backend = HttpBackend::new(&page, Duration::from_secs(5)).unwrap();

        let err = backend
            .connect(&ConnectionPair::new("a:out", "b:in"))
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "port busy");
            }
            other => panic!("Expected status error, got {other}"),
        }
    }
}
