//! Response relay: streamed and buffered responses back to the client
//!
//! Streamed bodies are never parsed. Upstream chunks are forwarded as they
//! arrive, split so no relayed chunk exceeds the configured size.

use std::convert::Infallible;
use std::fmt::Display;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response},
};
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

use super::error::ProxyError;
use super::headers::filter_response_headers;

/// Lazily relay an upstream byte stream in chunks of at most `chunk_size`.
///
/// Empty upstream chunks are skipped. A read failure yields one empty terminal
/// chunk and ends the stream instead of erroring the client connection.
pub(crate) fn rechunk<S, E>(
    upstream: S,
    chunk_size: usize,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let chunk_size = chunk_size.max(1);

    stream::unfold(Some(Box::pin(upstream)), move |state| async move {
        let mut upstream = state?;
        match upstream.next().await {
            Some(Ok(bytes)) => Some((split_chunk(bytes, chunk_size), Some(upstream))),
            Some(Err(e)) => {
                tracing::warn!("Upstream stream read failed, closing relay: {}", e);
                Some((vec![Bytes::new()], None))
            }
            None => None,
        }
    })
    .flat_map(stream::iter)
    .map(Ok)
}

fn split_chunk(mut bytes: Bytes, max: usize) -> Vec<Bytes> {
    let mut pieces = Vec::with_capacity(bytes.len().div_ceil(max));
    while !bytes.is_empty() {
        let n = bytes.len().min(max);
        pieces.push(bytes.split_to(n));
    }
    pieces
}

/// Response for a streamed backend reply.
///
/// Keeps the backend's content type, defaulting to `text/event-stream`.
pub(crate) fn streaming_response(
    status: u16,
    upstream_headers: &HeaderMap,
    body: Body,
) -> Result<Response<Body>, ProxyError> {
    let mut headers = filter_response_headers(upstream_headers);
    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/event-stream"),
        );
    }
    build(status, headers, body)
}

/// Response for a fully buffered backend reply, relayed verbatim
pub(crate) fn buffered_response(
    status: u16,
    upstream_headers: &HeaderMap,
    body: Bytes,
) -> Result<Response<Body>, ProxyError> {
    build(status, filter_response_headers(upstream_headers), Body::from(body))
}

/// 200 JSON response for a rewritten body
pub(crate) fn json_response(value: &serde_json::Value) -> Result<Response<Body>, ProxyError> {
    let body = serde_json::to_vec(value).map_err(|e| ProxyError::ResponseBuild(e.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    build(200, headers, Body::from(body))
}

fn build(status: u16, headers: HeaderMap, body: Body) -> Result<Response<Body>, ProxyError> {
    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }
    builder
        .body(body)
        .map_err(|e| ProxyError::ResponseBuild(e.to_string()))
}
