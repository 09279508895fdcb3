//! Remote transport trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{HttpRequest, HttpResponse};

/// Sends a request and returns the raw response.
///
/// Implementations report connection-level failures as errors and return any
/// HTTP status, including 4xx/5xx, as a response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
