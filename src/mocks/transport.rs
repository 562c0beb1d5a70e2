//! Mock HTTP transport for testing.

use crate::error::{TransportError, VwsError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Create a successful response with empty body.
    pub fn ok() -> Self {
        Self::error(200, Bytes::new())
    }

    /// Create a successful response with body.
    pub fn ok_with_body(body: impl Into<Bytes>) -> Self {
        Self::error(200, body)
    }

    /// Create a 201 response with a JSON body.
    pub fn created(body: impl Into<Bytes>) -> Self {
        Self::error(201, body).with_header("content-type", "application/json")
    }

    /// Create a 200 response with a JSON body.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::ok_with_body(body).with_header("content-type", "application/json")
    }

    /// Create a response with any status.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers to the response.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Builder for mock responses.
pub struct MockResponseBuilder {
    responses: Vec<MockResponse>,
}

impl MockResponseBuilder {
    /// Create a new mock response builder.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
        }
    }

    /// Add a response to return.
    pub fn respond(mut self, response: MockResponse) -> Self {
        self.responses.push(response);
        self
    }

    /// Build the mock transport.
    pub fn build(self) -> MockTransport {
        MockTransport::with_responses(self.responses)
    }
}

impl Default for MockResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were queued; once the queue is
/// empty the default response is used, and without one `send` fails with a
/// connection error.
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Some(response),
        }
    }

    /// Create a builder for the mock transport.
    pub fn builder() -> MockResponseBuilder {
        MockResponseBuilder::new()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().push(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Clear all queued responses.
    pub fn clear_responses(&self) {
        self.responses.lock().clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, VwsError> {
        self.requests.lock().push(request);

        let response = {
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                self.default_response.clone()
            } else {
                Some(responses.remove(0))
            }
        };

        match response {
            Some(mock) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            None => Err(VwsError::Transport(TransportError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_returned_in_order() {
        let transport = MockTransport::builder()
            .respond(MockResponse::ok_with_body("first"))
            .respond(MockResponse::error(404, "Not Found"))
            .build();

        let first = transport
            .send(HttpRequest::new("GET", "https://vws.example.com/targets"))
            .await
            .unwrap();
        assert_eq!(first.body, Bytes::from("first"));

        let second = transport
            .send(HttpRequest::new("GET", "https://vws.example.com/targets"))
            .await
            .unwrap();
        assert_eq!(second.status, 404);
    }

    #[tokio::test]
    async fn test_default_response_repeats() {
        let transport = MockTransport::with_default(MockResponse::json(r#"{"result_code":"Success"}"#));

        for _ in 0..3 {
            let response = transport
                .send(HttpRequest::new("GET", "https://vws.example.com/summary"))
                .await
                .unwrap();
            assert_eq!(response.content_type(), Some("application/json"));
        }
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_queue_is_connection_failure() {
        let transport = MockTransport::new();
        let err = transport
            .send(HttpRequest::new("GET", "https://vws.example.com/targets"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let transport = MockTransport::with_default(MockResponse::ok());

        let request = HttpRequest::new("PUT", "https://vws.example.com/targets/t1")
            .with_header("content-type", "application/json")
            .with_body(Bytes::from("{}"));
        transport.send(request).await.unwrap();

        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.method, "PUT");
        assert_eq!(recorded.get_header("Content-Type"), Some("application/json"));
        assert_eq!(recorded.body, Some(Bytes::from("{}")));

        transport.clear_requests();
        assert!(transport.requests().is_empty());
    }
}
