//! Shared utility functions

/// Longest body excerpt written to logs
pub const BODY_PREVIEW_BYTES: usize = 200;

/// Lossy, single-line excerpt of a request or response body for log lines.
///
/// Invalid UTF-8 is replaced, newlines are flattened, and the result is cut at
/// a character boundary with a trailing `…` when truncated.
pub fn body_preview(body: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(body);
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let cut = truncate_utf8_safe(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{}…", cut)
    } else {
        flat
    }
}

/// Safely truncate a string to at most `max_bytes` while respecting UTF-8 boundaries.
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
