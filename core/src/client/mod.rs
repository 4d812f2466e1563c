//! Stateless HTTP request builder and response parser for the Haras API.
//!
//! # Design
//! `HarasClient` holds only a base URL and an optional bearer token, and
//! carries no mutable state between calls. Each facade operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. The host executes the round-trip,
//! keeping the core deterministic and free of I/O dependencies.
//!
//! Operations are grouped by backend module, one `impl` block per file.

mod embryos;
mod haras;
mod horses;
mod stalls;
mod veterinary;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Every backend route lives under this prefix.
pub const API_PREFIX: &str = "/haras-pro";

/// Synchronous, stateless client for the Haras API.
#[derive(Debug, Clone)]
pub struct HarasClient {
    base_url: String,
    token: Option<String>,
}

impl HarasClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url);
        match &config.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// Attach a bearer token sent as `Authorization` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let request = HttpRequest {
            method,
            path: self.url(path),
            headers,
            body: None,
        };
        debug!(method = method.as_str(), path = %request.path, "built request");
        request
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .insert(0, ("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        envelope::decode(response)
    }
}
