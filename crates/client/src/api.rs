//! Remote-call primitive.
//!
//! Sends one request to the RajaOngkir API and unwraps the `data` field of the
//! response envelope. No caching and no retries happen at this layer.

use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::sync::Arc;

use rajaongkir_core::{
    traits::{HttpTransport, Translator},
    types::{HttpMethod, HttpRequest},
    ApiError, Error, Result,
};

/// One request against the API, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl ApiCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }
}

/// Authenticated access to the RajaOngkir endpoints.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Secret<String>,
    translator: Arc<dyn Translator>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        api_key: Secret<String>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            translator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the translator used for error messages.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ),
            ("Accept".to_string(), "application/json".to_string()),
            ("key".to_string(), self.api_key.expose_secret().clone()),
        ]
    }

    /// Send `call` and return the `data` payload.
    ///
    /// Fails with [`Error::Api`] on a non-success status and with
    /// [`Error::NoData`] when the payload is missing or empty.
    pub async fn call(&self, call: ApiCall) -> Result<Value> {
        let url = format!("{}{}", self.base_url, call.path);
        tracing::debug!(method = %call.method, url = %url, "Calling RajaOngkir API");

        let request = HttpRequest {
            method: call.method,
            url,
            headers: self.headers(),
            query: call.query,
            form: call.form,
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(self.failure(&call.path, response.status, &response.body));
        }

        let body: Value = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(path = %call.path, error = %e, "Response body is not JSON");
                Value::Null
            }
        };

        extract_data(body).ok_or_else(|| Error::NoData(self.translator.translate("api.no_data", &[])))
    }

    fn failure(&self, path: &str, status: u16, body: &str) -> Error {
        if status >= 500 {
            // Body goes to the log only.
            tracing::error!(path = path, status, body = body, "RajaOngkir API server error");
            return ApiError::server(status, self.translator.translate("api.500", &[])).into();
        }

        let err = ApiError::from_response(body, status);
        tracing::warn!(path = path, status, code = err.code, message = %err.message, "RajaOngkir API rejected request");
        err.into()
    }
}

fn extract_data(mut body: Value) -> Option<Value> {
    let data = body.get_mut("data").map(Value::take)?;
    let empty = match &data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    (!empty).then_some(data)
}
