use animefan_core::{ApiError, ApiRequest, ApiResponse, Transport, api::Method};
use async_trait::async_trait;
use reqwest::RequestBuilder;

/// Sends requests through the browser's `fetch`.
pub struct FetchTransport {
    client: reqwest::Client,
    /// Fetch from wasm needs absolute urls.
    origin: String,
}

impl FetchTransport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.into(),
        }
    }
}

/// Session cookies go with every request.
#[cfg(target_arch = "wasm32")]
fn with_credentials(req: RequestBuilder) -> RequestBuilder {
    req.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn with_credentials(req: RequestBuilder) -> RequestBuilder {
    req
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut req = self
            .client
            .request(method, format!("{}{}", self.origin, request.url));
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }
        req = with_credentials(req);

        let res = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = res.status().as_u16();
        match res.text().await {
            Ok(body) => Ok(ApiResponse { status, body }),
            Err(e) => {
                warn!("failed to read {} response: {}", status, e);
                Ok(ApiResponse::unread(status))
            }
        }
    }
}
