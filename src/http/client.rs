use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use super::request::BuiltRequest;
use super::response::ExecutionResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Sends built requests with a hard total timeout.
///
/// Never fails for a received response whatever its status; anything that
/// prevents a response from being obtained is reported through
/// [`ExecutionResult::transport_error`].
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpExecutor {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client, timeout })
    }

    pub async fn execute(&self, request: &BuiltRequest) -> ExecutionResult {
        let url = match reqwest::Url::parse(&request.url) {
            Ok(url) => url,
            Err(e) => return ExecutionResult::transport_failure(format!("Invalid URL `{}`: {e}", request.url), 0),
        };

        let mut req_builder = self
            .client
            .request(request.method.into(), url)
            .headers(wire_headers(&request.headers));
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let started = Instant::now();
        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let elapsed = started.elapsed().as_millis();
                let message = self.describe_failure(&e);
                warn!(url = %request.url, error = %message, "transport failure");
                return ExecutionResult::transport_failure(message, elapsed);
            }
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let elapsed = started.elapsed().as_millis();
                let message = format!("Failed to read response: {}", self.describe_failure(&e));
                warn!(url = %request.url, error = %message, "transport failure");
                return ExecutionResult::transport_failure(message, elapsed);
            }
        };
        let elapsed = started.elapsed().as_millis();
        let size_bytes = bytes.len();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(status, elapsed_ms = elapsed as u64, size_bytes, "response received");
        ExecutionResult::received(status, body, elapsed, size_bytes)
    }

    fn describe_failure(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("Request timed out after {}s", self.timeout.as_secs_f64())
        } else if err.is_connect() {
            format!("Connection failed: {err}")
        } else {
            format!("Request failed: {err}")
        }
    }
}

/// Turn raw header lines into wire headers. A later line replaces any earlier
/// one with the same name, so request lines override defaults and the auth
/// line overrides both. Lines that cannot be expressed as an HTTP header are
/// skipped.
fn wire_headers(headers: &[String]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for raw in headers {
        match parse_header_line(raw) {
            Ok((name, value)) => {
                map.insert(name, value);
            }
            Err(reason) => warn!(header = %raw, %reason, "skipping header line"),
        }
    }
    map
}

fn parse_header_line(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("Invalid header format: {raw}"))?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return Err(format!("Header key is empty: {raw}"));
    }

    let header_name =
        HeaderName::from_bytes(key.as_bytes()).map_err(|e| format!("Invalid header key `{key}`: {e}"))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| format!("Invalid header value `{value}`: {e}"))?;
    Ok((header_name, header_value))
}
