//! In-process HTTP stand-ins for collaborator services.
//!
//! Unit tests point clients at a [`RecordingServer`] bound to an ephemeral
//! local port. The server hands every request to the test's responder and
//! keeps a log of what arrived, so tests can assert on call counts and
//! request bodies without any network access.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    http::{Method, StatusCode, Uri},
};
use serde_json::Value;

/// One request as the stand-in saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Parsed JSON body, or `Null` for empty/non-JSON bodies.
    pub body: Value,
}

/// A local HTTP server that records requests and answers from a responder.
pub struct RecordingServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingServer {
    /// Bind to an ephemeral port and serve until the test ends.
    pub async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let captured = Arc::clone(&requests);
        let responder: Arc<F> = Arc::new(responder);

        let app = Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
            let captured = Arc::clone(&captured);
            let responder = Arc::clone(&responder);
            async move {
                let recorded = RecordedRequest {
                    method: method.to_string(),
                    path: uri.path().to_string(),
                    query: uri.query().map(ToOwned::to_owned),
                    body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                };
                let (status, response) = responder(&recorded);
                captured.lock().expect("request log poisoned").push(recorded);
                (status, Json(response))
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("test server address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Snapshot of everything received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}
