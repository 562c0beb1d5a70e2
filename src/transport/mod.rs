//! HTTP transport layer for VWS requests.
//!
//! The transport performs exactly one round trip per call. It does not retry,
//! and it applies timeouts only when they are configured explicitly.

use crate::error::{TransportError, VwsError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// Default `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!("vuforia-vws-integration/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get the content type.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    /// The body decoded lossily as UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, VwsError>;
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    read_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, VwsError> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    fn map_send_error(&self, e: reqwest::Error) -> VwsError {
        if e.is_timeout() {
            VwsError::Transport(TransportError::Timeout {
                duration: self.read_timeout,
            })
        } else {
            VwsError::Transport(TransportError::ConnectionFailed {
                message: e.to_string(),
            })
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, VwsError> {
        let method = request.method.parse::<reqwest::Method>().map_err(|e| {
            VwsError::Transport(TransportError::ConnectionFailed {
                message: format!("Invalid HTTP method: {}", e),
            })
        })?;

        let mut req_builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                VwsError::Transport(TransportError::Timeout {
                    duration: self.read_timeout,
                })
            } else {
                VwsError::Transport(TransportError::BodyRead {
                    message: e.to_string(),
                })
            }
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    verify_ssl: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    ///
    /// No timeouts are applied unless set.
    pub fn new() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            pool_max_idle_per_host: 16,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            verify_ssl: true,
            user_agent: default_user_agent(),
        }
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total request timeout.
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the idle connection timeout.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to verify SSL certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, VwsError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .user_agent(&self.user_agent);

        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.read_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            VwsError::Transport(TransportError::Tls {
                message: e.to_string(),
            })
        })?;

        Ok(ReqwestTransport {
            client,
            read_timeout: self.read_timeout,
        })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
