//! Local HTTP stand-in for the Sheets and OAuth endpoints, for tests.
//!
//! Every request is recorded; the response comes from a caller-supplied
//! function of the recorded request.

use std::sync::{Arc, Mutex};

use axum::{
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use reqwest::Client;
use tokio::net::TcpListener;

/// RSA key used to sign service-account assertions in tests.
pub const TEST_PRIVATE_KEY: &str = include_str!("../../testdata/service_account_key.pem");

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Serves `respond` on an ephemeral loopback port.
    pub async fn spawn<F>(respond: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (StatusCode, String) + Clone + Send + Sync + 'static,
    {
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let recorded = requests.clone();

        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let recorded = recorded.clone();
                let respond = respond.clone();
                async move {
                    let header_value = |name: header::HeaderName| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    let request = RecordedRequest {
                        method,
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        authorization: header_value(header::AUTHORIZATION),
                        content_type: header_value(header::CONTENT_TYPE),
                        body,
                    };
                    let (status, body) = respond(&request);
                    recorded.lock().unwrap().push(request);
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Answers every request with the same status and body.
    pub async fn fixed(status: StatusCode, body: &str) -> Self {
        let body = body.to_string();
        Self::spawn(move |_| (status, body.clone())).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// A client that never routes loopback traffic through an environment proxy.
pub fn direct_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}
