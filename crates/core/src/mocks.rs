//! Mock implementations of core traits for testing.
//!
//! Shared by the unit and integration tests of every crate in the workspace.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::{
    traits::{HttpTransport, Translator},
    types::{HttpRequest, HttpResponse},
    Error, Result,
};

// =============================================================================
// Mock Transport
// =============================================================================

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

/// Scripted transport that answers by URL path suffix and records every request.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<(String, Reply)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose path ends with `path` with a JSON body.
    pub fn with_json(self, path: &str, status: u16, body: Value) -> Self {
        self.with_raw(path, status, &body.to_string())
    }

    /// Answer with `{"meta": {...}, "data": data}` and status 200.
    pub fn with_data(self, path: &str, data: Value) -> Self {
        self.with_json(
            path,
            200,
            serde_json::json!({
                "meta": { "message": "Success", "code": 200, "status": "success" },
                "data": data,
            }),
        )
    }

    pub fn with_raw(self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((path.to_string(), Reply::Respond(HttpResponse::new(status, body))));
        self
    }

    /// Fail requests to `path` at the transport level.
    pub fn with_failure(self, path: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((path.to_string(), Reply::Fail(message.to_string())));
        self
    }

    /// Number of requests sent so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of requests whose path ends with `path`.
    pub fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| path_of(&r.url).ends_with(path))
            .count()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn path_of(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = path_of(&request.url).to_string();
        self.requests.lock().unwrap().push(request);

        let routes = self.routes.lock().unwrap();
        let reply = routes
            .iter()
            .filter(|(suffix, _)| path.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(Error::transport(message)),
            None => Ok(HttpResponse::new(
                404,
                r#"{"meta":{"message":"Not Found","code":404,"status":"failed"},"data":null}"#,
            )),
        }
    }
}

// =============================================================================
// Mock Translator
// =============================================================================

/// Translator that echoes the key, so tests can assert on message keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoTranslator;

impl Translator for EchoTranslator {
    fn translate(&self, key: &str, _params: &[(&str, &str)]) -> String {
        key.to_string()
    }
}
