//! Header handling for the forwarded request and the relayed response

use axum::http::{header, HeaderMap, HeaderValue};
use sha2::{Digest, Sha256};

/// Inbound headers never sent upstream. Framing is recomputed for the
/// re-serialized body and compression is negotiated by the HTTP client.
const REQUEST_EXCLUDED: [&str; 5] = [
    "host",
    "content-length",
    "transfer-encoding",
    "connection",
    "accept-encoding",
];

/// Upstream headers never relayed: the relayed body's length and encoding may
/// differ from what the backend sent
const RESPONSE_EXCLUDED: [&str; 4] = [
    "content-encoding",
    "transfer-encoding",
    "connection",
    "content-length",
];

/// Build the outbound header set from the inbound one.
///
/// The credential (`authorization` / `x-api-key`) is forwarded untouched. When
/// the request carries a JSON body and the client sent no content type,
/// `Content-Type: application/json` is added.
pub(crate) fn forward_request_headers(inbound: &HeaderMap, json_body: bool) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 1);
    for (name, value) in inbound.iter() {
        if REQUEST_EXCLUDED.contains(&name.as_str()) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    if json_body && !outbound.contains_key(header::CONTENT_TYPE) {
        outbound.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    outbound
}

/// Copy upstream response headers, minus the framing/encoding ones
pub(crate) fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if RESPONSE_EXCLUDED.contains(&name.as_str()) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}

/// Short SHA-256 fingerprint of the client's credential, for log correlation.
///
/// Checks `x-api-key` first, then `Authorization: Bearer`. Never log the
/// credential itself.
pub(crate) fn credential_fingerprint(headers: &HeaderMap) -> Option<String> {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })?;

    let hash = Sha256::digest(key.as_bytes());
    Some(format!("{:x}", hash)[..12].to_string())
}
