use crate::error::ValidationError;

use super::request::{BuiltRequest, RequestSpec};

/// Assemble the request that goes on the wire.
///
/// Header order is: `default_headers`, then the request's own lines, then the
/// auth override. Every line is trimmed and blank lines are dropped; anything
/// else is passed through verbatim. The body is attached only for methods that
/// allow one and only when it is not blank.
pub fn build_request(spec: &RequestSpec, default_headers: &[String]) -> BuiltRequest {
    let headers = default_headers
        .iter()
        .chain(spec.headers.iter())
        .chain(spec.auth_header.iter())
        .filter_map(|line| non_blank(line))
        .collect();

    let body = if spec.method.allows_body() && !spec.body.trim().is_empty() {
        Some(spec.body.clone())
    } else {
        None
    };

    BuiltRequest {
        method: spec.method,
        url: spec.url.trim().to_string(),
        headers,
        body,
    }
}

/// Split a newline-joined header block into raw lines, keeping blank ones out.
pub fn header_lines(block: &str) -> Vec<String> {
    block.lines().filter_map(non_blank).collect()
}

/// Check that a user-typed line looks like `Name: Value`. Only the ad-hoc
/// path calls this; template headers are passed through untouched.
pub fn validate_header_line(line: &str) -> Result<(), ValidationError> {
    let raw = line.trim();
    let (name, _) = raw
        .split_once(':')
        .ok_or_else(|| ValidationError::Header(format!("Invalid header format: `{raw}`, expected `Name: Value`")))?;
    let name = name.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ValidationError::Header(format!("Invalid header name in `{raw}`")));
    }
    Ok(())
}

fn non_blank(line: &str) -> Option<String> {
    let raw = line.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
