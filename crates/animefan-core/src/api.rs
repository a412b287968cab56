use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::ApiError,
    model::{AnimeId, FieldSource, RelationId, ReviewId},
};

pub const API_BASE: &str = "/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anti-forgery header the backend expects on state-changing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    pub header: String,
    pub token: String,
}

impl CsrfToken {
    /// Reads the `_csrf` and `_csrf_header` page metadata. Both must be present.
    pub fn from_meta(meta: &impl FieldSource) -> Option<Self> {
        let token = meta.field("_csrf").filter(|v| !v.is_empty())?;
        let header = meta.field("_csrf_header").filter(|v| !v.is_empty())?;
        Some(Self { header, token })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the page origin, base included.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back over the wire, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// The server answered but the body could not be read. The status alone
    /// decides the outcome.
    pub fn unread(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

#[async_trait(?Send)]
pub trait Transport {
    /// Performs one network call. Fails only when the server was never reached.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Turns a raw response into the parsed body, or the error the user sees.
pub fn interpret(response: ApiResponse) -> Result<Option<Value>, ApiError> {
    let ApiResponse { status, body } = response;

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(&body).ok().and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });
        return Err(ApiError::Rejected { status, message });
    }

    if status == 204 || body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(Some(Value::String(body))),
    }
}

/// Every REST endpoint the page talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Lists,
    ListEntry(RelationId),
    ListEntryByAnime(AnimeId),
    Favorite(AnimeId),
    Reviews,
    Helpful(ReviewId),
    Unhelpful(ReviewId),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Lists => "/lists".to_string(),
            Endpoint::ListEntry(id) => format!("/lists/{}", id),
            Endpoint::ListEntryByAnime(id) => format!("/lists/anime/{}", id),
            Endpoint::Favorite(id) => format!("/lists/anime/{}/favorite", id),
            Endpoint::Reviews => "/reviews".to_string(),
            Endpoint::Helpful(id) => format!("/reviews/{}/helpful", id),
            Endpoint::Unhelpful(id) => format!("/reviews/{}/unhelpful", id),
        }
    }
}

pub struct ApiClient<T> {
    transport: T,
    base: String,
    csrf: Option<CsrfToken>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
            csrf: None,
        }
    }

    pub fn with_csrf(mut self, csrf: Option<CsrfToken>) -> Self {
        self.csrf = csrf;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build(&self, method: Method, path: &str, body: Option<String>) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(csrf) = &self.csrf {
            headers.push((csrf.header.clone(), csrf.token.clone()));
        }

        ApiRequest {
            method,
            url: format!("{}{}", self.base, path),
            headers,
            body,
        }
    }

    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Unexpected(format!("failed to encode body: {}", e)))?;
        let request = self.build(method, path, body);

        let response = self.transport.send(request).await?;
        debug!("{} {}{} -> {}", method, self.base, path, response.status);

        interpret(response)
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<Value>(Method::Get, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, ApiError> {
        self.request(Method::Post, path, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>, ApiError> {
        self.request(Method::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<Value>(Method::Delete, path, None).await
    }
}
