//! In-process HTTP client for the snapform API.
//!
//! [`TestClient`] sends requests straight through an axum [`Router`] with
//! `tower::ServiceExt::oneshot`, so no socket is bound. A bearer token, once
//! set, is attached to every following request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use snapform_test::{test_app, TestClient};
//!
//! async fn example() {
//!     let mut client = TestClient::new(test_app().await);
//!     let response = client.get("/api/forms").await;
//!     assert_eq!(response.status_code(), 401);
//! }
//! ```

use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::{header, HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::Serialize;
use snapform_core::{SnapformError, SnapformResult};
use tower::ServiceExt;

/// A test client for the JSON API.
pub struct TestClient {
    app: Router,
    token: Option<String>,
}

impl TestClient {
    pub const fn new(app: Router) -> Self {
        Self { app, token: None }
    }

    /// Sends `Authorization: Bearer <token>` from now on.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn delete(&mut self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// Sends a POST with no body.
    pub async fn post(&mut self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&mut self, path: &str, data: &T) -> TestResponse {
        self.request(Method::POST, path, Some(Self::encode(data))).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&mut self, path: &str, data: &T) -> TestResponse {
        self.request(Method::PUT, path, Some(Self::encode(data))).await
    }

    /// Sends a PUT with no body.
    pub async fn put(&mut self, path: &str) -> TestResponse {
        self.request(Method::PUT, path, None).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(&mut self, path: &str, data: &T) -> TestResponse {
        self.request(Method::PATCH, path, Some(Self::encode(data))).await
    }

    /// Sends a raw body with a JSON content type, for malformed-input tests.
    pub async fn post_raw(&mut self, path: &str, body: &str) -> TestResponse {
        self.request(Method::POST, path, Some(body.as_bytes().to_vec()))
            .await
    }

    fn encode<T: Serialize + ?Sized>(data: &T) -> Vec<u8> {
        serde_json::to_vec(data).expect("test payload should serialize")
    }

    async fn request(&mut self, method: Method, path: &str, body: Option<Vec<u8>>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        let req = builder.body(body).expect("request builder should not fail");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("router should not error");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_or_else(|_| Bytes::new(), http_body_util::Collected::to_bytes);

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

/// The response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> SnapformResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| SnapformError::SerializationError(e.to_string()))
    }

    /// The body as a JSON value, or `Null` when it is not JSON.
    pub fn value(&self) -> serde_json::Value {
        self.json().unwrap_or(serde_json::Value::Null)
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `error` message of an error body.
    pub fn error_message(&self) -> Option<String> {
        self.value()["error"].as_str().map(str::to_string)
    }
}
