// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request pipeline building blocks.
//!
//! An [`ApiRequest`] is plain data, so it can be replayed after a token
//! refresh. [`Transport`] implementations are stacked: [`HttpTransport`] talks
//! to the network, [`TracedTransport`] logs, and the authenticated client in
//! `services::client` wraps whatever stack it is given.

use crate::error::AppError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Per-request authentication behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Request needs a session; a 401 triggers the refresh cycle.
    pub auth_required: bool,
    /// Never refresh on 401 (used by the refresh call itself).
    pub skip_auto_refresh: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            auth_required: true,
            skip_auto_refresh: false,
        }
    }
}

/// A file upload part.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Request body variants the API uses.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

/// A request against the DisplayCase API, relative to the base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter if present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, AppError> {
        let value = serde_json::to_value(body)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Set a multipart body.
    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Mark the request as not needing a session.
    ///
    /// A token is still attached when one exists, but a 401 is returned as-is.
    pub fn public(mut self) -> Self {
        self.options.auth_required = false;
        self
    }

    /// Never run the refresh cycle for this request.
    pub fn skip_auto_refresh(mut self) -> Self {
        self.options.skip_auto_refresh = true;
        self
    }
}

/// A complete response. Non-success statuses are data here, not errors.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Integer value of a response header, if present and well-formed.
    pub fn header_u32(&self, name: &str) -> Option<u32> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Body as (lossy) UTF-8, for error messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests. `Err` means no response was received.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<String>,
    ) -> Result<ApiResponse, AppError>;
}

/// Base transport: reqwest against the configured API URL.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport with an explicit per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("displaycase-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<String>,
    ) -> Result<ApiResponse, AppError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_send_error)?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_form(parts: &[FilePart]) -> Result<reqwest::multipart::Form, AppError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let file = reqwest::multipart::Part::bytes(part.bytes.clone())
            .file_name(part.file_name.clone())
            .mime_str(&part.content_type)
            .map_err(|e| {
                AppError::BadRequest(format!("Invalid content type {}: {}", part.content_type, e))
            })?;
        form = form.part(part.field.clone(), file);
    }
    Ok(form)
}

fn map_send_error(e: reqwest::Error) -> AppError {
    if e.is_builder() {
        AppError::BadRequest(e.to_string())
    } else {
        AppError::Connection(e.to_string())
    }
}

/// Logs every request with its outcome and latency.
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<String>,
    ) -> Result<ApiResponse, AppError> {
        let authenticated = bearer.is_some();
        let started = Instant::now();
        let result = self.inner.execute(request, bearer).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = response.status.as_u16(),
                authenticated,
                elapsed_ms,
                "API request completed"
            ),
            Err(e) => tracing::warn!(
                method = %request.method,
                path = %request.path,
                error = %e,
                elapsed_ms,
                "API request failed without response"
            ),
        }

        result
    }
}
