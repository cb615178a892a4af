//! Integration test support for the Schwab API client.
//!
//! [`MockServer`] is an in-process HTTP server on `127.0.0.1:0` that answers
//! with canned responses and records every request it receives. It serves the
//! Trader, Market Data and OAuth paths from one host, so one base URL works
//! for both the API client and the token endpoint.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use schwab_client::{ReqwestTransport, SchwabClient, StaticToken};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use url::form_urlencoded;

/// Request seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    /// Decoded query pairs in order.
    pub query: Vec<(String, String)>,
    /// Headers with lowercase names.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: String,
}

impl RecordedRequest {
    /// First value of query parameter `name`.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header value by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body decoded as a urlencoded form.
    #[must_use]
    pub fn form(&self) -> HashMap<String, String> {
        url_decode_pairs(&self.body).into_iter().collect()
    }

    /// Body decoded as JSON.
    ///
    /// # Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: String,
}

impl MockResponse {
    /// JSON response with status 200.
    #[must_use]
    pub fn json(body: serde_json::Value) -> Self {
        Self::status(200, body.to_string())
    }

    /// Response with `status` and a raw body.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process mock of the brokerage API.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockServer {
    /// Binds to an ephemeral port and starts serving.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queues a response for `method` on `path`.
    ///
    /// Queued responses are served in order; the last one repeats.
    pub fn respond(&self, method: Method, path: &str, response: MockResponse) {
        self.state
            .routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests received on `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Client for this server with a fixed access token.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, access_token: &str) -> SchwabClient {
        let transport =
            ReqwestTransport::new(Duration::from_secs(10)).expect("failed to build transport");
        SchwabClient::with_transport(&self.url(), StaticToken::new(access_token), transport)
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(url_decode_pairs).unwrap_or_default(),
        headers: headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let response = {
        let mut routes = state.routes.lock();
        routes.get_mut(&(method, path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match response {
        Some(canned) => {
            let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::OK);
            let mut resp = (status, canned.body).into_response();
            resp.headers_mut().insert(
                "content-type",
                axum::http::HeaderValue::from_static("application/json"),
            );
            for (name, value) in canned.headers {
                if let (Ok(name), Ok(value)) = (
                    axum::http::HeaderName::try_from(name),
                    axum::http::HeaderValue::try_from(value),
                ) {
                    resp.headers_mut().insert(name, value);
                }
            }
            resp
        }
        None => (StatusCode::NOT_FOUND, r#"{"errors":["no route"]}"#).into_response(),
    }
}

fn url_decode_pairs(input: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}
