//! Proxy error types and response handling
//!
//! Every per-request failure is reported to the client as HTTP 500 with a
//! `{"error": "<message>"}` body.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use serde_json::json;

/// Message for a 200 response that carried no payload
pub(crate) const EMPTY_RESPONSE_MESSAGE: &str = "Empty response from provider";

/// Errors that can occur during proxying
#[derive(Debug)]
pub(crate) enum ProxyError {
    /// Inbound body could not be read
    BodyRead(String),
    /// Inbound POST body is not valid JSON
    InvalidJson(String),
    /// Transport failure talking to the backend
    Upstream(String),
    /// Backend did not answer within the budget
    Timeout(Duration),
    /// Backend answered 200 with an empty body on a buffered call
    EmptyBody,
    ResponseBuild(String),
}

impl ProxyError {
    pub(crate) fn message(&self) -> String {
        match self {
            ProxyError::BodyRead(msg)
            | ProxyError::InvalidJson(msg)
            | ProxyError::Upstream(msg)
            | ProxyError::ResponseBuild(msg) => msg.clone(),
            ProxyError::Timeout(budget) => {
                format!("Upstream request timed out after {:?}", budget)
            }
            ProxyError::EmptyBody => EMPTY_RESPONSE_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Upstream(e.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response<Body> {
        let message = self.message();
        match &self {
            ProxyError::EmptyBody => tracing::warn!("Proxy error: {}", message),
            _ => tracing::error!("Proxy error: {}", message),
        }

        let body = json!({ "error": message }).to_string();
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| Response::new(Body::from("Internal error building error response")))
    }
}
