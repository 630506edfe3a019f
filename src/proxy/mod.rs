//! Proxy module - HTTP server that translates and forwards requests to an
//! OpenAI-compatible backend
//!
//! Every request under `/v1/` is forwarded to `{backend_url}/{path}`.
//! `chat/completions` bodies are normalized on the way in, the `models`
//! listing is alias-rewritten on the way out, and everything else is relayed
//! verbatim (streamed when the request asked for it).

mod error;
mod headers;
mod relay;
mod server;
mod state;
pub mod translation;

pub use server::start_proxy;
pub use state::ProxyState;

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode},
};
use bytes::Bytes;
use serde_json::Value;

use crate::util::{body_preview, BODY_PREVIEW_BYTES};
use error::ProxyError;
use headers::{credential_fingerprint, forward_request_headers};
use translation::{wants_stream, Endpoint, TranslationPipeline};

/// Parsed inbound body, ready to forward
struct Outbound {
    body: Option<Value>,
    stream: bool,
}

/// Handle one `/v1/{path}` request end to end
pub(crate) async fn proxy_handler(
    State(state): State<ProxyState>,
    req: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    let start = Instant::now();

    let method = req.method().clone();

    // axum routes HEAD to GET handlers; only GET and POST are proxied
    if method != Method::GET && method != Method::POST {
        return Ok(method_not_allowed());
    }

    let uri = req.uri().clone();
    let headers = req.headers().clone();

    let path = uri
        .path()
        .strip_prefix("/v1")
        .unwrap_or(uri.path())
        .trim_start_matches('/')
        .to_string();
    let endpoint = Endpoint::from_path(&path);
    let fingerprint = credential_fingerprint(&headers);

    tracing::debug!("Proxying {} /v1/{}", method, path);

    let result = forward(
        &state,
        &method,
        &path,
        endpoint,
        uri.query(),
        &headers,
        req.into_body(),
    )
    .await;

    let status = match &result {
        Ok(response) => response.status().as_u16(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
    };
    tracing::info!(
        "{} /v1/{} -> {} ({}ms, key {})",
        method,
        path,
        status,
        start.elapsed().as_millis(),
        fingerprint.as_deref().unwrap_or("-")
    );

    result
}

async fn forward(
    state: &ProxyState,
    method: &Method,
    path: &str,
    endpoint: Endpoint,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Body,
) -> Result<Response<Body>, ProxyError> {
    let outbound = if method == Method::POST {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| ProxyError::BodyRead(e.to_string()))?;
        read_outbound(&bytes, endpoint, &state.translation)?
    } else {
        Outbound {
            body: None,
            stream: false,
        }
    };

    let url = state.forward_url(path, query);
    let mut request = state
        .client
        .request(method.clone(), &url)
        .headers(forward_request_headers(headers, outbound.body.is_some()));
    if let Some(body) = &outbound.body {
        let payload = serde_json::to_vec(body).map_err(|e| ProxyError::InvalidJson(e.to_string()))?;
        request = request.body(payload);
    }

    let response = tokio::time::timeout(state.timeout, request.send())
        .await
        .map_err(|_| ProxyError::Timeout(state.timeout))??;

    let status = response.status();
    let response_headers = response.headers().clone();

    if outbound.stream && status == StatusCode::OK {
        tracing::debug!("Streaming response from {}", url);
        let chunks = relay::rechunk(response.bytes_stream(), state.stream_chunk_size);
        return relay::streaming_response(
            status.as_u16(),
            &response_headers,
            Body::from_stream(chunks),
        );
    }

    // The budget covers connect + headers only; a slowly delivered body is
    // bounded by the transport
    let body = response.bytes().await?;

    if status == StatusCode::OK && is_blank(&body) {
        return Err(ProxyError::EmptyBody);
    }

    if endpoint == Endpoint::Models && status == StatusCode::OK {
        if let Some(listing) = state.translation.translate_models_listing(&body) {
            return relay::json_response(&listing);
        }
    }

    relay::buffered_response(status.as_u16(), &response_headers, body)
}

/// Parse and translate a POST body. An empty body is forwarded as no body.
fn read_outbound(
    bytes: &Bytes,
    endpoint: Endpoint,
    translation: &TranslationPipeline,
) -> Result<Outbound, ProxyError> {
    if bytes.is_empty() {
        return Ok(Outbound {
            body: None,
            stream: false,
        });
    }

    let body: Value = serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!(
            "Rejecting non-JSON request body: {} ({})",
            e,
            body_preview(bytes, BODY_PREVIEW_BYTES)
        );
        ProxyError::InvalidJson(format!("Invalid JSON request body: {}", e))
    })?;

    let body = match endpoint {
        Endpoint::ChatCompletions => translation.translate_chat_request(body),
        Endpoint::Models | Endpoint::Other => body,
    };

    Ok(Outbound {
        stream: wants_stream(&body),
        body: Some(body),
    })
}

fn method_not_allowed() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET,POST"));
    response
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}
