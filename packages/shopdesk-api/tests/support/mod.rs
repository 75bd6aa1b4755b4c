//! In-process mock backend for client tests.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use shopdesk_core::config::ShopdeskConfig;
use tokio::net::TcpListener;

/// Canned answer for one method and path.
#[derive(Clone)]
pub struct MockRoute {
    pub method: Method,
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

/// A request the mock backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
pub struct MockBackendBuilder {
    routes: HashMap<String, Vec<MockRoute>>,
}

impl MockBackendBuilder {
    pub fn route(mut self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.push(method, path, status, body.to_string(), None);
        self
    }

    pub fn raw_route(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.push(method, path, status, body.to_string(), None);
        self
    }

    pub fn slow_route(mut self, method: Method, path: &str, delay: Duration) -> Self {
        self.push(method, path, 200, "[]".to_string(), Some(delay));
        self
    }

    fn push(&mut self, method: Method, path: &str, status: u16, body: String, delay: Option<Duration>) {
        self.routes.entry(path.to_string()).or_default().push(MockRoute {
            method,
            status: StatusCode::from_u16(status).expect("valid status"),
            body,
            delay,
        });
    }

    /// Binds an ephemeral port and starts serving.
    pub async fn start(self) -> MockBackend {
        let mut router = matchit::Router::new();
        for (path, routes) in self.routes {
            router.insert(path, routes).expect("unique mock path");
        }
        let state = Arc::new(MockState {
            router,
            requests: Mutex::new(Vec::new()),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let serving = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let io = TokioIo::new(stream);
                let state = Arc::clone(&serving);
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, Arc::clone(&state)));
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        MockBackend { addr, state }
    }
}

struct MockState {
    router: matchit::Router<Vec<MockRoute>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> ShopdeskConfig {
        ShopdeskConfig {
            base_url: self.base_url(),
            request_timeout_ms: 2000,
            ..ShopdeskConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

async fn handle(
    req: Request<Incoming>,
    state: Arc<MockState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let header = |name: hyper::header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header(hyper::header::AUTHORIZATION);
    let content_type = header(hyper::header::CONTENT_TYPE);

    let bytes = req
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    state.requests.lock().expect("requests lock").push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        content_type,
        body,
    });

    let route = state
        .router
        .at(&path)
        .ok()
        .and_then(|matched| matched.value.iter().find(|r| r.method == method).cloned());

    let response = match route {
        Some(route) => {
            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            Response::builder()
                .status(route.status)
                .header("content-type", "application/json")
                .body(Full::new(Bytes::from(route.body)))
        }
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from_static(b"{\"message\":\"Route not found\"}"))),
    };
    Ok(response.expect("valid mock response"))
}

/// A local address with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{}", addr)
}
